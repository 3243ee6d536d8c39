//! Nullable lookup services: fixed answers or failures.

use nqg_governance::{Lookup, LookupStatus, ReputationLookup, VotingHistoryLookup};
use nqg_types::{ReputationCategory, UserId};
use std::collections::{BTreeMap, BTreeSet};

/// Reputation service with scripted answers.
pub struct NullReputation {
    answers: BTreeMap<UserId, ReputationCategory>,
    fallback: Option<ReputationCategory>,
    status: LookupStatus,
}

impl NullReputation {
    /// Every user has `category`.
    pub fn uniform(category: ReputationCategory) -> Self {
        Self {
            answers: BTreeMap::new(),
            fallback: Some(category),
            status: LookupStatus::Ok,
        }
    }

    /// Only the listed users are known.
    pub fn with_answers(answers: BTreeMap<UserId, ReputationCategory>) -> Self {
        Self {
            answers,
            fallback: None,
            status: LookupStatus::Ok,
        }
    }

    /// Every lookup reports the service as unavailable.
    pub fn unavailable() -> Self {
        Self {
            answers: BTreeMap::new(),
            fallback: None,
            status: LookupStatus::Unavailable,
        }
    }
}

impl ReputationLookup for NullReputation {
    fn get(&self, user: &UserId) -> Lookup<ReputationCategory> {
        if self.status != LookupStatus::Ok {
            return Lookup::unavailable();
        }
        match self.answers.get(user).copied().or(self.fallback) {
            Some(category) => Lookup::ok(category),
            None => Lookup::not_found(),
        }
    }
}

/// Voting-history service with a fixed answer.
pub struct NullVotingHistory {
    rounds: Option<BTreeSet<u32>>,
}

impl NullVotingHistory {
    /// Every user took part in `rounds`.
    pub fn uniform(rounds: BTreeSet<u32>) -> Self {
        Self {
            rounds: Some(rounds),
        }
    }

    pub fn unavailable() -> Self {
        Self { rounds: None }
    }
}

impl VotingHistoryLookup for NullVotingHistory {
    fn get(&self, _user: &UserId) -> Lookup<BTreeSet<u32>> {
        match &self.rounds {
            Some(rounds) => Lookup::ok(rounds.clone()),
            None => Lookup::unavailable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_and_fallback() {
        let known = NullReputation::with_answers(BTreeMap::from([(
            UserId::new("a"),
            ReputationCategory::Tier2,
        )]));
        assert_eq!(
            known.get(&UserId::new("a")).into_value(),
            Some(ReputationCategory::Tier2)
        );
        assert_eq!(known.get(&UserId::new("b")).status, LookupStatus::NotFound);

        let uniform = NullReputation::uniform(ReputationCategory::Tier3);
        assert_eq!(
            uniform.get(&UserId::new("b")).into_value(),
            Some(ReputationCategory::Tier3)
        );
    }

    #[test]
    fn test_unavailable_services() {
        assert_eq!(
            NullReputation::unavailable().get(&UserId::new("a")).status,
            LookupStatus::Unavailable
        );
        assert_eq!(
            NullVotingHistory::unavailable()
                .get(&UserId::new("a"))
                .into_value(),
            None
        );
    }
}
