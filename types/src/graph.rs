//! Graphs and per-round matrices.
//!
//! All maps are ordered so that iterating over them is deterministic; a fixed
//! seed must reproduce a run exactly.

use crate::id::{ProjectId, UserId};
use crate::vote::{Vote, VotingPower};
use std::collections::{BTreeMap, BTreeSet};

/// Truster → users it trusts. Directed, may contain cycles, never self-loops.
pub type TrustGraph = BTreeMap<UserId, BTreeSet<UserId>>;

/// Delegator → ordered candidate delegatees.
pub type DelegationGraph = BTreeMap<UserId, Vec<UserId>>;

/// User → project → vote.
pub type ActionMatrix = BTreeMap<UserId, BTreeMap<ProjectId, Vote>>;

/// User → project → signed voting-power contribution.
pub type VotingMatrix = BTreeMap<UserId, BTreeMap<ProjectId, VotingPower>>;

/// Project → summed voting power.
pub type PerProjectVoting = BTreeMap<ProjectId, VotingPower>;
