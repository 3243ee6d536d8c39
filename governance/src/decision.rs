//! The funding decision rule.

use nqg_types::VotingPower;
use serde::{Deserialize, Serialize};

/// A project is funded when its voting power is positive and at least
/// `min_voters` users contributed non-zero power.
pub fn fund_project(power: VotingPower, voters: usize, min_voters: usize) -> bool {
    power > 0.0 && voters >= min_voters
}

/// Per-project result of a round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectOutcome {
    /// Voting power contributed this round.
    pub power: VotingPower,
    /// Users with a non-zero contribution this round.
    pub voters: usize,
    /// Running tally across all rounds so far.
    pub tally: VotingPower,
    pub funded: bool,
}
