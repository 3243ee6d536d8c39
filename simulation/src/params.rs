//! Runtime parameter object consumed by the round state machine.

use crate::error::SimulationError;
use nqg_governance::{BonusTables, NeuralGovernance, QuorumParams};
use nqg_population::BehaviorParams;
use nqg_trust::RankParams;
use nqg_types::{Days, ProjectId, VotingPower};
use std::collections::BTreeSet;

/// Validated parameters for one simulation run.
///
/// Built from a [`SimulationConfig`](crate::SimulationConfig) or assembled in
/// code; either way [`SimulationParams::validate`] runs before the first round.
#[derive(Clone, Debug)]
pub struct SimulationParams {
    pub label: String,
    pub seed: u64,
    pub timestep_in_days: Days,
    pub initial_users: usize,
    pub initial_power: VotingPower,
    /// Historical round indices, ascending and unique.
    pub past_rounds: Vec<u32>,
    pub projects: Vec<ProjectId>,
    pub min_voters_to_fund: usize,
    pub quorum: QuorumParams,
    pub behavior: BehaviorParams,
    pub bonuses: BonusTables,
    pub trust_ranking: RankParams,
    pub network: NeuralGovernance,
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.timestep_in_days.is_finite() || self.timestep_in_days <= 0.0 {
            return Err(invalid(
                "timestep_in_days",
                format!("must be positive and finite, got {}", self.timestep_in_days),
            ));
        }
        if !self.initial_power.is_finite() {
            return Err(invalid("initial_power", "must be finite".into()));
        }
        if self.projects.is_empty() {
            return Err(invalid("projects", "at least one project is required".into()));
        }
        let unique: BTreeSet<&ProjectId> = self.projects.iter().collect();
        if unique.len() != self.projects.len() {
            return Err(invalid("projects", "project ids must be unique".into()));
        }
        if self.past_rounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid("past_rounds", "must be ascending and unique".into()));
        }
        let rank = &self.trust_ranking;
        if !(0.0..=1.0).contains(&rank.damping) {
            return Err(invalid("trust_ranking.damping", format!("{} not in [0, 1]", rank.damping)));
        }
        if !rank.tolerance.is_finite() || rank.tolerance <= 0.0 {
            return Err(invalid("trust_ranking.tolerance", "must be positive".into()));
        }
        if rank.max_iterations == 0 {
            return Err(invalid("trust_ranking.max_iterations", "must be at least 1".into()));
        }
        self.quorum.validate()?;
        self.bonuses.validate()?;
        self.behavior.validate()?;
        Ok(())
    }

    /// Same parameters, different seed. Used for sample runs.
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            label: "default".to_string(),
            seed: 0,
            timestep_in_days: 1.0,
            initial_users: 0,
            initial_power: 0.0,
            past_rounds: vec![1, 2, 3, 4],
            projects: (0..15).map(|i| ProjectId::new(format!("proj_{i}"))).collect(),
            min_voters_to_fund: 2,
            quorum: QuorumParams::default(),
            behavior: BehaviorParams::default(),
            bonuses: BonusTables::default(),
            trust_ranking: RankParams::default(),
            network: NeuralGovernance::default(),
        }
    }
}

fn invalid(name: &'static str, reason: String) -> SimulationError {
    SimulationError::InvalidParam { name, reason }
}
