//! Round actions and project votes.
//!
//! An [`Action`] is *how* a user takes part in a round; a [`Vote`] is the
//! project-level outcome of that participation. The numeric weight of a vote
//! is looked up separately ([`VoteWeights`]) so the tag never doubles as a
//! number.

use serde::{Deserialize, Serialize};

/// Signed voting power.
pub type VotingPower = f64;

/// The behavioural class of a user for a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Votes directly on projects.
    RoundVote,
    /// Hands its decision to a quorum of delegatees.
    Delegate,
    /// Sits the round out.
    Abstain,
}

/// A decision on a single project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Vote {
    Yes,
    No,
    Abstain,
}

impl Vote {
    /// Canonical voting-power coefficient: Yes = +1, No = -1, Abstain = 0.
    pub fn coefficient(&self) -> VotingPower {
        match self {
            Vote::Yes => 1.0,
            Vote::No => -1.0,
            Vote::Abstain => 0.0,
        }
    }
}

/// Configurable per-outcome weights used when measuring quorum agreement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteWeights {
    pub yes: f64,
    pub no: f64,
    pub abstain: f64,
}

impl VoteWeights {
    pub fn weight(&self, vote: Vote) -> f64 {
        match vote {
            Vote::Yes => self.yes,
            Vote::No => self.no,
            Vote::Abstain => self.abstain,
        }
    }
}

impl Default for VoteWeights {
    fn default() -> Self {
        Self {
            yes: 1.0,
            no: -1.0,
            abstain: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients() {
        assert_eq!(Vote::Yes.coefficient(), 1.0);
        assert_eq!(Vote::No.coefficient(), -1.0);
        assert_eq!(Vote::Abstain.coefficient(), 0.0);
    }

    #[test]
    fn test_weights_are_independent_of_coefficients() {
        let weights = VoteWeights {
            yes: 2.0,
            no: -0.5,
            abstain: 0.25,
        };
        assert_eq!(weights.weight(Vote::Yes), 2.0);
        assert_eq!(weights.weight(Vote::No), -0.5);
        assert_eq!(weights.weight(Vote::Abstain), 0.25);
        assert_eq!(Vote::Yes.coefficient(), 1.0);
    }
}
