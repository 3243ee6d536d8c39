use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PopulationError {
    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("{name} must be a finite, non-negative rate, got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("minimum delegate count {min} exceeds the average {average}")]
    MinDelegatesAboveAverage { min: usize, average: f64 },
}
