//! Simulation configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use nqg_governance::{
    Aggregation, BonusTables, ConstantNeuron, GovernanceError, NeuralGovernance, NeuronLayer, PriorVotingNeuron,
    QuorumParams, ReputationNeuron, RunningScoreNeuron, ScoringNeuron, TrustNeuron, Weighted,
    Weighting,
};
use nqg_population::BehaviorParams;
use nqg_trust::RankParams;
use nqg_types::{ProjectId, ReputationCategory};

use crate::{SimulationError, SimulationParams};

/// Configuration for a simulation run.
///
/// Loaded from a TOML file via [`SimulationConfig::from_toml_file`] or built
/// programmatically. Every field has a default, so an empty file is a valid
/// single-run configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Free-form run label, carried into the output.
    #[serde(default = "default_label")]
    pub label: String,

    /// Seed of the single random stream shared by every sampling phase.
    #[serde(default)]
    pub seed: u64,

    /// Length of one round in days.
    #[serde(default = "default_timestep")]
    pub timestep_in_days: f64,

    /// Users onboarded into the genesis state.
    #[serde(default)]
    pub initial_users: usize,

    /// Score fed into the first neuron layer.
    #[serde(default)]
    pub initial_power: f64,

    /// Historical rounds a user may have taken part in.
    #[serde(default = "default_past_rounds")]
    pub past_rounds: Vec<u32>,

    #[serde(default = "default_projects")]
    pub projects: Vec<String>,

    /// Minimum number of non-zero contributors for a project to be funded.
    #[serde(default = "default_min_voters")]
    pub min_voters_to_fund: usize,

    #[serde(default)]
    pub quorum: QuorumParams,

    #[serde(default)]
    pub behavior: BehaviorParams,

    #[serde(default)]
    pub bonuses: BonusConfig,

    #[serde(default)]
    pub trust_ranking: RankParams,

    /// Ordered neuron layers, first to last.
    #[serde(default = "default_neuron_layers")]
    pub neuron_layers: Vec<LayerConfig>,
}

/// Bonus tables in a TOML-friendly shape (string keys only).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusConfig {
    pub reputation: ReputationBonuses,
    pub past_rounds: Vec<RoundBonus>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationBonuses {
    pub tier1: f64,
    pub tier2: f64,
    pub tier3: f64,
    pub uncategorized: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundBonus {
    pub round: u32,
    pub bonus: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub aggregation: Aggregation,
    pub neurons: Vec<NeuronConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeuronConfig {
    pub name: String,
    pub oracle: OracleKind,
    #[serde(default)]
    pub weighting: Weighting,
}

/// Which oracle a configured neuron reads.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OracleKind {
    Trust,
    Reputation,
    PriorVoting,
    Constant { value: f64 },
    RunningScore,
}

// ── Defaults ───────────────────────────────────────────────────────────

fn default_label() -> String {
    "default".to_string()
}

fn default_timestep() -> f64 {
    1.0
}

fn default_past_rounds() -> Vec<u32> {
    vec![1, 2, 3, 4]
}

fn default_projects() -> Vec<String> {
    (0..15).map(|i| format!("proj_{i}")).collect()
}

fn default_min_voters() -> usize {
    2
}

fn default_neuron_layers() -> Vec<LayerConfig> {
    let neuron = |name: &str, oracle| NeuronConfig {
        name: name.to_string(),
        oracle,
        weighting: Weighting::Identity,
    };
    vec![
        LayerConfig {
            aggregation: Aggregation::Sum,
            neurons: vec![
                neuron("trust_score", OracleKind::Trust),
                neuron("reputation_score", OracleKind::Reputation),
            ],
        },
        LayerConfig {
            aggregation: Aggregation::Product,
            neurons: vec![neuron("past_round", OracleKind::PriorVoting)],
        },
    ]
}

impl Default for ReputationBonuses {
    fn default() -> Self {
        Self {
            tier1: 0.1,
            tier2: 0.2,
            tier3: 0.3,
            uncategorized: 0.0,
        }
    }
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            reputation: ReputationBonuses::default(),
            past_rounds: [(1, 0.0), (2, 0.1), (3, 0.2), (4, 0.3)]
                .into_iter()
                .map(|(round, bonus)| RoundBonus { round, bonus })
                .collect(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            seed: 0,
            timestep_in_days: default_timestep(),
            initial_users: 0,
            initial_power: 0.0,
            past_rounds: default_past_rounds(),
            projects: default_projects(),
            min_voters_to_fund: default_min_voters(),
            quorum: QuorumParams::default(),
            behavior: BehaviorParams::default(),
            bonuses: BonusConfig::default(),
            trust_ranking: RankParams::default(),
            neuron_layers: default_neuron_layers(),
        }
    }
}

// ── Impl ───────────────────────────────────────────────────────────────

impl SimulationConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, SimulationError> {
        toml::from_str(s).map_err(|e| SimulationError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, SimulationError> {
        toml::to_string_pretty(self).map_err(|e| SimulationError::Config(e.to_string()))
    }

    /// Validate and turn the declarative configuration into runtime parameters.
    pub fn build(&self) -> Result<SimulationParams, SimulationError> {
        let mut past_rounds = self.past_rounds.clone();
        past_rounds.sort_unstable();
        past_rounds.dedup();

        let layers = self
            .neuron_layers
            .iter()
            .map(LayerConfig::build)
            .collect::<Result<Vec<_>, _>>()?;

        let params = SimulationParams {
            label: self.label.clone(),
            seed: self.seed,
            timestep_in_days: self.timestep_in_days,
            initial_users: self.initial_users,
            initial_power: self.initial_power,
            past_rounds,
            projects: self.projects.iter().map(ProjectId::new).collect(),
            min_voters_to_fund: self.min_voters_to_fund,
            quorum: self.quorum.clone(),
            behavior: self.behavior.clone(),
            bonuses: self.bonuses.tables(),
            trust_ranking: self.trust_ranking,
            network: NeuralGovernance::new(layers)?,
        };
        params.validate()?;
        Ok(params)
    }
}

impl BonusConfig {
    fn tables(&self) -> BonusTables {
        let r = &self.reputation;
        BonusTables {
            reputation: BTreeMap::from([
                (ReputationCategory::Tier1, r.tier1),
                (ReputationCategory::Tier2, r.tier2),
                (ReputationCategory::Tier3, r.tier3),
                (ReputationCategory::Uncategorized, r.uncategorized),
            ]),
            past_rounds: self.past_rounds.iter().map(|b| (b.round, b.bonus)).collect(),
        }
    }
}

impl LayerConfig {
    fn build(&self) -> Result<NeuronLayer, GovernanceError> {
        let mut layer = NeuronLayer::new(self.aggregation);
        for neuron in &self.neurons {
            layer.push_neuron(neuron.name.clone(), neuron.build()?);
        }
        Ok(layer)
    }
}

impl NeuronConfig {
    /// Rejects NaN or infinite oracle and weighting parameters.
    fn build(&self) -> Result<Arc<dyn ScoringNeuron>, GovernanceError> {
        let parameters = [self.oracle.parameter(), self.weighting.parameter()];
        for (field, value) in parameters.into_iter().flatten() {
            if !value.is_finite() {
                return Err(GovernanceError::InvalidNeuron {
                    name: self.name.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(match self.weighting {
            Weighting::Identity => self.oracle.neuron(),
            weighting => Arc::new(Weighted::new(ArcNeuron(self.oracle.neuron()), move |raw| {
                weighting.apply(raw)
            })),
        })
    }
}

impl OracleKind {
    fn parameter(&self) -> Option<(&'static str, f64)> {
        match *self {
            OracleKind::Constant { value } => Some(("value", value)),
            _ => None,
        }
    }

    fn neuron(&self) -> Arc<dyn ScoringNeuron> {
        match *self {
            OracleKind::Trust => Arc::new(TrustNeuron),
            OracleKind::Reputation => Arc::new(ReputationNeuron),
            OracleKind::PriorVoting => Arc::new(PriorVotingNeuron),
            OracleKind::Constant { value } => Arc::new(ConstantNeuron(value)),
            OracleKind::RunningScore => Arc::new(RunningScoreNeuron),
        }
    }
}

/// Lets a shared neuron be wrapped by [`Weighted`].
struct ArcNeuron(Arc<dyn ScoringNeuron>);

impl ScoringNeuron for ArcNeuron {
    fn oracle(
        &self,
        user: &nqg_types::UserId,
        project: &ProjectId,
        running: f64,
        state: &nqg_governance::OracleState,
    ) -> f64 {
        self.0.oracle(user, project, running, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nqg_governance::{GovernanceError, OracleState};
    use nqg_types::UserId;
    use std::io::Write;

    #[test]
    fn test_default_config_builds() {
        let params = SimulationConfig::default().build().unwrap();
        assert_eq!(params.projects.len(), 15);
        assert_eq!(params.past_rounds, vec![1, 2, 3, 4]);
        assert_eq!(params.bonuses, BonusTables::default());
        assert_eq!(params.network.layer_count(), 2);
        let names: Vec<&str> = params.network.layers()[0].neuron_names().collect();
        assert_eq!(names, vec!["trust_score", "reputation_score"]);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = SimulationConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = SimulationConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_override() {
        let config = SimulationConfig::from_toml_str(
            r#"
            seed = 7
            projects = ["a", "b"]

            [quorum]
            max_selected_delegates = 3

            [behavior]
            avg_new_users_per_day = 4.0
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.projects, vec!["a", "b"]);
        assert_eq!(config.quorum.max_selected_delegates, 3);
        assert_eq!(config.quorum.max_candidate_delegates, 10);
        assert_eq!(config.behavior.avg_new_users_per_day, 4.0);
        assert_eq!(config.behavior.new_user_min_delegate_count, 5);
    }

    #[test]
    fn test_declarative_layers() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [[neuron_layers]]
            aggregation = "sum"

            [[neuron_layers.neurons]]
            name = "one_person_one_vote"
            oracle = { kind = "constant", value = 0.5 }
            weighting = { kind = "scale", factor = 4.0 }

            [[neuron_layers]]
            aggregation = "product"

            [[neuron_layers.neurons]]
            name = "echo"
            oracle = { kind = "running_score" }
            "#,
        )
        .unwrap();
        let params = config.build().unwrap();
        let power = params.network.score(
            &UserId::new("0"),
            &ProjectId::new("proj_0"),
            &OracleState::default(),
            0.0,
        );
        // (0 + 0.5 × 4) × 2
        assert_eq!(power, 4.0);
    }

    #[test]
    fn test_empty_layer_rejected_at_build() {
        let config = SimulationConfig {
            neuron_layers: vec![LayerConfig {
                aggregation: Aggregation::Sum,
                neurons: vec![],
            }],
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.build(),
            Err(SimulationError::Governance(GovernanceError::EmptyLayer(1)))
        ));
    }

    #[test]
    fn test_nan_weighting_factor_rejected_at_build() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [[neuron_layers]]
            aggregation = "sum"

            [[neuron_layers.neurons]]
            name = "one_person_one_vote"
            oracle = { kind = "constant", value = 1.0 }
            weighting = { kind = "scale", factor = nan }
            "#,
        )
        .unwrap();
        match config.build() {
            Err(SimulationError::Governance(GovernanceError::InvalidNeuron { name, field, value })) => {
                assert_eq!(name, "one_person_one_vote");
                assert_eq!(field, "factor");
                assert!(value.is_nan());
            }
            other => panic!("expected InvalidNeuron, got {other:?}"),
        }
    }

    #[test]
    fn test_infinite_constant_oracle_rejected_at_build() {
        let config = SimulationConfig {
            neuron_layers: vec![LayerConfig {
                aggregation: Aggregation::Sum,
                neurons: vec![NeuronConfig {
                    name: "flat".into(),
                    oracle: OracleKind::Constant { value: f64::INFINITY },
                    weighting: Weighting::Identity,
                }],
            }],
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.build(),
            Err(SimulationError::Governance(GovernanceError::InvalidNeuron { field: "value", .. }))
        ));
    }

    #[test]
    fn test_non_finite_bonuses_rejected_at_build() {
        let mut config = SimulationConfig::default();
        config.bonuses.reputation.tier2 = f64::NAN;
        assert!(matches!(
            config.build(),
            Err(SimulationError::Governance(GovernanceError::InvalidBonus { table: "reputation", .. }))
        ));

        let mut config = SimulationConfig::default();
        config.bonuses.past_rounds.push(RoundBonus {
            round: 5,
            bonus: f64::NEG_INFINITY,
        });
        assert!(matches!(
            config.build(),
            Err(SimulationError::Governance(GovernanceError::InvalidBonus { table: "past round", .. }))
        ));
    }

    #[test]
    fn test_past_rounds_sorted_and_deduplicated() {
        let config = SimulationConfig {
            past_rounds: vec![3, 1, 3, 2],
            ..SimulationConfig::default()
        };
        assert_eq!(config.build().unwrap().past_rounds, vec![1, 2, 3]);
    }

    #[test]
    fn test_invalid_probability_rejected_at_build() {
        let mut config = SimulationConfig::default();
        config.behavior.new_user_action_probability = 1.5;
        assert!(matches!(
            config.build(),
            Err(SimulationError::Population(_))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            SimulationConfig::from_toml_str("seed = \"x\""),
            Err(SimulationError::Config(_))
        ));
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "label = \"from-file\"\ninitial_users = 12").unwrap();
        let config = SimulationConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.label, "from-file");
        assert_eq!(config.initial_users, 12);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            SimulationConfig::from_toml_file("/nonexistent/nqg.toml"),
            Err(SimulationError::Io(_))
        ));
    }
}
