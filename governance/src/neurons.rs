//! Built-in scoring neurons and weightings.

use crate::neural::{Aggregation, NeuronLayer, ScoringNeuron};
use crate::oracle::{prior_voting_score, reputation_score, trust_score, OracleState};
use nqg_types::{ProjectId, UserId, VotingPower};
use serde::{Deserialize, Serialize};

/// Normalised trust-graph score.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrustNeuron;

impl ScoringNeuron for TrustNeuron {
    fn oracle(&self, user: &UserId, _: &ProjectId, _: VotingPower, state: &OracleState) -> f64 {
        trust_score(user, state)
    }
}

/// Reputation-category bonus.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReputationNeuron;

impl ScoringNeuron for ReputationNeuron {
    fn oracle(&self, user: &UserId, _: &ProjectId, _: VotingPower, state: &OracleState) -> f64 {
        reputation_score(user, state)
    }
}

/// Prior-participation multiplier (`1.0` + round bonuses).
#[derive(Clone, Copy, Debug, Default)]
pub struct PriorVotingNeuron;

impl ScoringNeuron for PriorVotingNeuron {
    fn oracle(&self, user: &UserId, _: &ProjectId, _: VotingPower, state: &OracleState) -> f64 {
        prior_voting_score(user, state)
    }
}

/// Fixed contribution, e.g. one-person-one-vote.
#[derive(Clone, Copy, Debug)]
pub struct ConstantNeuron(pub f64);

impl ScoringNeuron for ConstantNeuron {
    fn oracle(&self, _: &UserId, _: &ProjectId, _: VotingPower, _: &OracleState) -> f64 {
        self.0
    }
}

/// Echoes the score carried in from the previous layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunningScoreNeuron;

impl ScoringNeuron for RunningScoreNeuron {
    fn oracle(&self, _: &UserId, _: &ProjectId, running: VotingPower, _: &OracleState) -> f64 {
        running
    }
}

/// Declarative weighting functions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Weighting {
    #[default]
    Identity,
    Scale { factor: f64 },
    Offset { amount: f64 },
    Power { exponent: f64 },
}

impl Weighting {
    pub fn apply(&self, raw: f64) -> f64 {
        match *self {
            Weighting::Identity => raw,
            Weighting::Scale { factor } => raw * factor,
            Weighting::Offset { amount } => raw + amount,
            Weighting::Power { exponent } => raw.powf(exponent),
        }
    }

    /// Name and value of the weighting's parameter, `None` for `Identity`.
    pub fn parameter(&self) -> Option<(&'static str, f64)> {
        match *self {
            Weighting::Identity => None,
            Weighting::Scale { factor } => Some(("factor", factor)),
            Weighting::Offset { amount } => Some(("amount", amount)),
            Weighting::Power { exponent } => Some(("exponent", exponent)),
        }
    }
}

/// A neuron whose weighting is replaced by `weighting`.
pub struct Weighted<N, W> {
    neuron: N,
    weighting: W,
}

impl<N, W> Weighted<N, W>
where
    N: ScoringNeuron,
    W: Fn(f64) -> f64 + Send + Sync,
{
    pub fn new(neuron: N, weighting: W) -> Self {
        Self { neuron, weighting }
    }
}

impl<N, W> ScoringNeuron for Weighted<N, W>
where
    N: ScoringNeuron,
    W: Fn(f64) -> f64 + Send + Sync,
{
    fn oracle(
        &self,
        user: &UserId,
        project: &ProjectId,
        running: VotingPower,
        state: &OracleState,
    ) -> f64 {
        self.neuron.oracle(user, project, running, state)
    }

    fn weight(&self, raw: f64) -> f64 {
        (self.weighting)(raw)
    }
}

/// Two-layer default network:
/// 1. `trust_score + reputation_score` (sum)
/// 2. `× past_round` (product)
pub fn default_layers() -> Vec<NeuronLayer> {
    vec![
        NeuronLayer::new(Aggregation::Sum)
            .with_neuron("trust_score", TrustNeuron)
            .with_neuron("reputation_score", ReputationNeuron),
        NeuronLayer::new(Aggregation::Product).with_neuron("past_round", PriorVotingNeuron),
    ]
}
