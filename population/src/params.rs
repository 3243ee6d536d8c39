//! Behavioural sampling rates.

use crate::error::PopulationError;
use serde::{Deserialize, Serialize};

/// Rates and probabilities that drive onboarding and behaviour.
///
/// All values are resolved numbers; probabilities are per coin flip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorParams {
    pub avg_new_users_per_day: f64,
    pub avg_user_past_votes: f64,
    /// Probability that a new user takes part at all (vs. abstains).
    pub new_user_action_probability: f64,
    /// Probability that a participating user votes directly (vs. delegates).
    pub new_user_round_vote_probability: f64,
    /// Per-project probability that a direct voter votes on the project.
    pub new_user_project_vote_probability: f64,
    /// Probability that a project vote is Yes (vs. No).
    pub new_user_project_vote_yes_probability: f64,
    pub new_user_average_delegate_count: f64,
    pub new_user_min_delegate_count: usize,
    pub new_user_average_trustees: f64,
}

impl BehaviorParams {
    pub fn validate(&self) -> Result<(), PopulationError> {
        for (name, value) in [
            ("new_user_action_probability", self.new_user_action_probability),
            ("new_user_round_vote_probability", self.new_user_round_vote_probability),
            ("new_user_project_vote_probability", self.new_user_project_vote_probability),
            (
                "new_user_project_vote_yes_probability",
                self.new_user_project_vote_yes_probability,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PopulationError::InvalidProbability { name, value });
            }
        }
        for (name, value) in [
            ("avg_new_users_per_day", self.avg_new_users_per_day),
            ("avg_user_past_votes", self.avg_user_past_votes),
            ("new_user_average_delegate_count", self.new_user_average_delegate_count),
            ("new_user_average_trustees", self.new_user_average_trustees),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PopulationError::InvalidRate { name, value });
            }
        }
        if self.new_user_min_delegate_count as f64 > self.new_user_average_delegate_count {
            return Err(PopulationError::MinDelegatesAboveAverage {
                min: self.new_user_min_delegate_count,
                average: self.new_user_average_delegate_count,
            });
        }
        Ok(())
    }
}

impl Default for BehaviorParams {
    fn default() -> Self {
        Self {
            avg_new_users_per_day: 1.0,
            avg_user_past_votes: 3.5,
            new_user_action_probability: 0.5,
            new_user_round_vote_probability: 0.5,
            new_user_project_vote_probability: 5.0 / 15.0,
            new_user_project_vote_yes_probability: 0.8,
            new_user_average_delegate_count: 6.5,
            new_user_min_delegate_count: 5,
            new_user_average_trustees: 7.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        assert!(BehaviorParams::default().validate().is_ok());
    }

    #[test]
    fn test_probability_out_of_range() {
        let params = BehaviorParams {
            new_user_action_probability: 1.5,
            ..BehaviorParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(PopulationError::InvalidProbability {
                name: "new_user_action_probability",
                ..
            })
        ));
    }

    #[test]
    fn test_min_delegates_above_average() {
        let params = BehaviorParams {
            new_user_min_delegate_count: 8,
            ..BehaviorParams::default()
        };
        assert_eq!(
            params.validate(),
            Err(PopulationError::MinDelegatesAboveAverage {
                min: 8,
                average: 6.5
            })
        );
    }

    #[test]
    fn test_negative_rate() {
        let params = BehaviorParams {
            avg_new_users_per_day: -1.0,
            ..BehaviorParams::default()
        };
        assert!(matches!(params.validate(), Err(PopulationError::InvalidRate { .. })));
    }
}
