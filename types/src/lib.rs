//! Fundamental types for the Neural Quorum Governance (NQG) model.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! user and project identifiers, users and their reputation categories, the
//! per-round actions and project votes, and the graphs and matrices that a
//! round produces.

pub mod graph;
pub mod id;
pub mod time;
pub mod user;
pub mod vote;

pub use graph::{ActionMatrix, DelegationGraph, PerProjectVoting, TrustGraph, VotingMatrix};
pub use id::{ProjectId, UserId};
pub use time::Days;
pub use user::{ReputationCategory, User};
pub use vote::{Action, Vote, VoteWeights, VotingPower};
