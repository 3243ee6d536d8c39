//! Feed-forward neural governance.
//!
//! ```text
//! initial power ─▶ [layer 1: n₁ n₂ … ⇒ agg₁] ─▶ [layer 2: … ⇒ agg₂] ─▶ … ─▶ voting power
//! ```
//!
//! Every neuron of a layer sees the same score carried in from the previous
//! layer; none sees another neuron's output. The layer's aggregator folds the
//! weighted outputs into the carried score to produce the next one.

use crate::error::GovernanceError;
use crate::oracle::OracleState;
use nqg_types::{ProjectId, UserId, VotingPower};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// An (oracle, weighting) pair contributing one value to a layer.
///
/// Implementations must be pure.
pub trait ScoringNeuron: Send + Sync {
    /// Raw value for `user` on `project`, given the score carried into the layer.
    fn oracle(
        &self,
        user: &UserId,
        project: &ProjectId,
        running: VotingPower,
        state: &OracleState,
    ) -> f64;

    /// Post-process the raw value. Identity by default.
    fn weight(&self, raw: f64) -> f64 {
        raw
    }
}

/// Folds a layer's weighted neuron outputs into the carried score.
pub trait Aggregator: Send + Sync {
    fn aggregate(&self, carried: VotingPower, outputs: &[f64]) -> VotingPower;
}

/// Built-in aggregations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// `carried + Σ outputs`
    Sum,
    /// `carried × Π outputs`
    Product,
}

impl Aggregator for Aggregation {
    fn aggregate(&self, carried: VotingPower, outputs: &[f64]) -> VotingPower {
        match self {
            Aggregation::Sum => outputs.iter().fold(carried, |acc, x| acc + x),
            Aggregation::Product => outputs.iter().fold(carried, |acc, x| acc * x),
        }
    }
}

impl<F> Aggregator for F
where
    F: Fn(VotingPower, &[f64]) -> VotingPower + Send + Sync,
{
    fn aggregate(&self, carried: VotingPower, outputs: &[f64]) -> VotingPower {
        self(carried, outputs)
    }
}

/// Named neurons plus one aggregator.
#[derive(Clone)]
pub struct NeuronLayer {
    neurons: Vec<(String, Arc<dyn ScoringNeuron>)>,
    aggregator: Arc<dyn Aggregator>,
}

impl NeuronLayer {
    pub fn new(aggregator: impl Aggregator + 'static) -> Self {
        Self {
            neurons: Vec::new(),
            aggregator: Arc::new(aggregator),
        }
    }

    pub fn with_neuron(
        mut self,
        name: impl Into<String>,
        neuron: impl ScoringNeuron + 'static,
    ) -> Self {
        self.neurons.push((name.into(), Arc::new(neuron)));
        self
    }

    pub fn push_neuron(&mut self, name: impl Into<String>, neuron: Arc<dyn ScoringNeuron>) {
        self.neurons.push((name.into(), neuron));
    }

    pub fn neuron_names(&self) -> impl Iterator<Item = &str> {
        self.neurons.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    fn evaluate(
        &self,
        user: &UserId,
        project: &ProjectId,
        carried: VotingPower,
        state: &OracleState,
    ) -> VotingPower {
        let outputs: Vec<f64> = self
            .neurons
            .iter()
            .map(|(_, neuron)| neuron.weight(neuron.oracle(user, project, carried, state)))
            .collect();
        self.aggregator.aggregate(carried, &outputs)
    }
}

impl fmt::Debug for NeuronLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeuronLayer")
            .field("neurons", &self.neuron_names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// A validated, ordered stack of layers.
#[derive(Clone, Debug)]
pub struct NeuralGovernance {
    layers: Vec<NeuronLayer>,
}

/// The two-layer network: trust and reputation summed, then scaled by prior
/// participation.
impl Default for NeuralGovernance {
    fn default() -> Self {
        Self {
            layers: crate::neurons::default_layers(),
        }
    }
}

impl NeuralGovernance {
    /// Validate and wrap `layers`. Empty networks and empty layers are rejected.
    pub fn new(layers: Vec<NeuronLayer>) -> Result<Self, GovernanceError> {
        if layers.is_empty() {
            return Err(GovernanceError::EmptyNetwork);
        }
        if let Some(i) = layers.iter().position(NeuronLayer::is_empty) {
            return Err(GovernanceError::EmptyLayer(i + 1));
        }
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[NeuronLayer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Voting power of `user` towards `project`.
    pub fn score(
        &self,
        user: &UserId,
        project: &ProjectId,
        state: &OracleState,
        initial_power: VotingPower,
    ) -> VotingPower {
        let mut current = initial_power;
        for (i, layer) in self.layers.iter().enumerate() {
            current = layer.evaluate(user, project, current, state);
            tracing::trace!(layer = i + 1, %user, %project, score = current, "neural governance layer");
        }
        current
    }
}
