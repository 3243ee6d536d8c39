//! Round state machine for the NQG model.
//!
//! A run is a sequence of immutable [`RoundState`] snapshots. Each round the
//! [`RoundStateMachine`] copies the previous snapshot and applies the phases
//! in fixed order: time advance, onboarding, behaviour and trust for the new
//! users, oracle refresh, tally. [`Simulation`] drives the machine and keeps
//! the snapshots in a [`RunHistory`].

pub mod config;
pub mod error;
pub mod machine;
pub mod params;
pub mod phases;
pub mod runner;
pub mod state;

pub use config::{
    BonusConfig, LayerConfig, NeuronConfig, OracleKind, ReputationBonuses, RoundBonus,
    SimulationConfig,
};
pub use error::SimulationError;
pub use machine::RoundStateMachine;
pub use params::SimulationParams;
pub use phases::{Phase, Tally};
pub use runner::{run_samples, RunHistory, Simulation, RUN_COUNTERS};
pub use state::{DecisionCounts, RoundState};
