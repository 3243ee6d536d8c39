use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("governance config error: {0}")]
    Governance(#[from] nqg_governance::GovernanceError),

    #[error("population config error: {0}")]
    Population(#[from] nqg_population::PopulationError),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParam { name: &'static str, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
