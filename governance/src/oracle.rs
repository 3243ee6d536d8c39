//! Oracle state and the three scoring oracles.
//!
//! The oracle state is rebuilt once per round and handed to the scorer as a
//! read-only snapshot. Every oracle is total: unknown users, categories or
//! rounds degrade to a neutral bonus instead of failing.

use crate::lookup::{ReputationLookup, VotingHistoryLookup};
use crate::params::BonusTables;
use nqg_trust::TrustScores;
use nqg_types::{ReputationCategory, User, UserId, VotingPower};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-round lookup data consumed by the neurons.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OracleState {
    pub trust: TrustScores,
    pub reputation_bonus_map: BTreeMap<ReputationCategory, f64>,
    pub reputation_values: BTreeMap<UserId, ReputationCategory>,
    pub prior_voting_bonus_map: BTreeMap<u32, f64>,
    pub prior_voting_values: BTreeMap<UserId, BTreeSet<u32>>,
}

impl OracleState {
    /// Assemble the snapshot for `users`.
    ///
    /// Users whose lookups do not succeed get no table entry and therefore
    /// no bonus.
    pub fn build(
        trust: TrustScores,
        tables: &BonusTables,
        users: &[User],
        reputation: &dyn ReputationLookup,
        history: &dyn VotingHistoryLookup,
    ) -> Self {
        let mut reputation_values = BTreeMap::new();
        let mut prior_voting_values = BTreeMap::new();
        let mut failed = 0usize;

        for user in users {
            match reputation.get(&user.id).into_value() {
                Some(category) => {
                    reputation_values.insert(user.id.clone(), category);
                }
                None => failed += 1,
            }
            match history.get(&user.id).into_value() {
                Some(rounds) => {
                    prior_voting_values.insert(user.id.clone(), rounds);
                }
                None => failed += 1,
            }
        }

        if failed > 0 {
            tracing::warn!(failed, "lookup services returned non-success; no bonus applied");
        }

        Self {
            trust,
            reputation_bonus_map: tables.reputation.clone(),
            reputation_values,
            prior_voting_bonus_map: tables.past_rounds.clone(),
            prior_voting_values,
        }
    }
}

/// Normalised trust score in `[0, 1]`.
pub fn trust_score(user: &UserId, state: &OracleState) -> VotingPower {
    state.trust.score(user)
}

/// Bonus for the user's reputation category; 0.0 when unknown.
pub fn reputation_score(user: &UserId, state: &OracleState) -> VotingPower {
    state
        .reputation_values
        .get(user)
        .and_then(|category| state.reputation_bonus_map.get(category))
        .copied()
        .unwrap_or(0.0)
}

/// `1.0` plus the bonus of every historical round the user took part in.
/// Unmapped rounds add nothing.
pub fn prior_voting_score(user: &UserId, state: &OracleState) -> VotingPower {
    let mut bonus = 1.0;
    if let Some(rounds) = state.prior_voting_values.get(user) {
        for round in rounds {
            bonus += state.prior_voting_bonus_map.get(round).copied().unwrap_or(0.0);
        }
    }
    bonus
}
