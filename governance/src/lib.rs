//! Neural Quorum Governance for the NQG model.
//!
//! Two mechanisms decide how much a user's ballot counts:
//! - **Quorum delegation**: a delegating user's vote on a project is resolved
//!   from the direct votes of a bounded quorum of its delegatees, gated by
//!   absolute and relative agreement thresholds.
//! - **Neural governance**: a feed-forward network of layers, each a set of
//!   scoring neurons (trust, reputation, prior participation, ...) folded by
//!   an aggregation, turns a vote into voting power.
//!
//! Scoring and resolution are pure functions of read-only snapshots.

pub mod decision;
pub mod delegation;
pub mod error;
pub mod lookup;
pub mod neural;
pub mod neurons;
pub mod oracle;
pub mod params;

pub use decision::{fund_project, ProjectOutcome};
pub use delegation::{select_quorum, vote_from_quorum_delegation};
pub use error::GovernanceError;
pub use lookup::{Lookup, LookupStatus, PopulationLookup, ReputationLookup, VotingHistoryLookup};
pub use neural::{Aggregation, Aggregator, NeuralGovernance, NeuronLayer, ScoringNeuron};
pub use neurons::{
    default_layers, ConstantNeuron, PriorVotingNeuron, ReputationNeuron, RunningScoreNeuron,
    TrustNeuron, Weighted, Weighting,
};
pub use oracle::{prior_voting_score, reputation_score, trust_score, OracleState};
pub use params::{BonusTables, QuorumParams};
