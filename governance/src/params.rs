//! Quorum delegation parameters and oracle bonus tables.

use crate::error::GovernanceError;
use nqg_types::{ReputationCategory, VoteWeights};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters of the quorum delegation consensus gate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuorumParams {
    /// Agreement weight per delegatee vote.
    pub weights: VoteWeights,
    /// Cap on delegatees whose votes are counted. Also the denominator of
    /// absolute agreement.
    pub max_selected_delegates: usize,
    /// Cap on the candidate list a delegator may keep.
    pub max_candidate_delegates: usize,
    pub absolute_threshold: f64,
    pub relative_threshold: f64,
}

impl QuorumParams {
    /// Reject parameters that would fail (or divide by zero) mid-round.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.max_selected_delegates == 0 {
            return Err(GovernanceError::ZeroQuorumSize);
        }
        if self.max_candidate_delegates == 0 {
            return Err(GovernanceError::ZeroCandidateCount);
        }
        for (name, value) in [
            ("absolute", self.absolute_threshold),
            ("relative", self.relative_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GovernanceError::InvalidThreshold { name, value });
            }
        }
        for (outcome, value) in [
            ("yes", self.weights.yes),
            ("no", self.weights.no),
            ("abstain", self.weights.abstain),
        ] {
            if !value.is_finite() {
                return Err(GovernanceError::InvalidWeight { outcome, value });
            }
        }
        Ok(())
    }
}

impl Default for QuorumParams {
    fn default() -> Self {
        Self {
            weights: VoteWeights::default(),
            max_selected_delegates: 5,
            max_candidate_delegates: 10,
            absolute_threshold: 1.0 / 2.0,
            relative_threshold: 2.0 / 3.0,
        }
    }
}

/// Static bonus lookup tables consumed by the reputation and
/// prior-participation oracles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BonusTables {
    pub reputation: BTreeMap<ReputationCategory, f64>,
    /// Historical round index → bonus for having taken part in it.
    pub past_rounds: BTreeMap<u32, f64>,
}

impl BonusTables {
    /// Every bonus must be finite.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        for (category, value) in &self.reputation {
            if !value.is_finite() {
                return Err(GovernanceError::InvalidBonus {
                    table: "reputation",
                    key: format!("{category:?}"),
                    value: *value,
                });
            }
        }
        for (round, value) in &self.past_rounds {
            if !value.is_finite() {
                return Err(GovernanceError::InvalidBonus {
                    table: "past round",
                    key: round.to_string(),
                    value: *value,
                });
            }
        }
        Ok(())
    }
}

impl Default for BonusTables {
    fn default() -> Self {
        Self {
            reputation: BTreeMap::from([
                (ReputationCategory::Tier3, 0.3),
                (ReputationCategory::Tier2, 0.2),
                (ReputationCategory::Tier1, 0.1),
                (ReputationCategory::Uncategorized, 0.0),
            ]),
            past_rounds: BTreeMap::from([(1, 0.0), (2, 0.1), (3, 0.2), (4, 0.3)]),
        }
    }
}
