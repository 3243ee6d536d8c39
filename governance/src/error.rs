use thiserror::Error;

/// Configuration errors rejected before any round runs.
#[derive(Debug, Error, PartialEq)]
pub enum GovernanceError {
    #[error("neuron layer {0} has no neurons")]
    EmptyLayer(usize),

    #[error("neural governance network has no layers")]
    EmptyNetwork,

    #[error("max_quorum_selected_delegates must be at least 1")]
    ZeroQuorumSize,

    #[error("max_quorum_candidate_delegates must be at least 1")]
    ZeroCandidateCount,

    #[error("invalid {name} threshold: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("invalid quorum weight for {outcome}: {value}")]
    InvalidWeight { outcome: &'static str, value: f64 },

    #[error("neuron {name} has a non-finite {field}: {value}")]
    InvalidNeuron {
        name: String,
        field: &'static str,
        value: f64,
    },

    #[error("invalid {table} bonus for {key}: {value}")]
    InvalidBonus {
        table: &'static str,
        key: String,
        value: f64,
    },
}
