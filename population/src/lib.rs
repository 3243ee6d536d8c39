//! Population generator for the NQG simulation.
//!
//! New users arrive as a Poisson process. Each one gets a reputation
//! category, a set of historical rounds, a round decision (vote, delegate or
//! abstain) and a set of trusted users. Delegation and trust targets are
//! always drawn from users who existed before the current round.

pub mod behavior;
pub mod error;
pub mod onboarding;
pub mod params;

pub use behavior::{assign_behavior, NewUserBehavior};
pub use error::PopulationError;
pub use onboarding::{onboard_users, sample_arrivals};
pub use params::BehaviorParams;
