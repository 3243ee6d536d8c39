//! Simulated time.
//!
//! The model advances in discrete timesteps measured in (fractional) days.

/// A number of simulated days.
pub type Days = f64;
