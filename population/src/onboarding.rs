//! Stochastic onboarding of new users.

use crate::params::BehaviorParams;
use nqg_random::{choose, sample_without_replacement, RandomSource};
use nqg_types::{Days, ReputationCategory, User, UserId};
use std::collections::BTreeSet;

/// Number of arrivals in a timestep: `Poisson(avg_new_users_per_day × timestep)`.
pub fn sample_arrivals(
    rng: &mut dyn RandomSource,
    params: &BehaviorParams,
    timestep_in_days: Days,
) -> usize {
    rng.poisson(params.avg_new_users_per_day * timestep_in_days)
}

/// Create `count` users, labelled from `existing` upwards.
///
/// Each user gets a uniformly drawn reputation category and a set of past
/// rounds whose size is `max(Poisson(avg_user_past_votes), |past_rounds|)`,
/// drawn without replacement (and therefore capped at `|past_rounds|`).
pub fn onboard_users(
    rng: &mut dyn RandomSource,
    params: &BehaviorParams,
    past_rounds: &[u32],
    existing: usize,
    count: usize,
) -> Vec<User> {
    (0..count)
        .map(|i| {
            let reputation = choose(rng, &ReputationCategory::ALL)
                .copied()
                .unwrap_or(ReputationCategory::Uncategorized);
            let past_voting_n = rng.poisson(params.avg_user_past_votes).max(past_rounds.len());
            let active_past_rounds: BTreeSet<u32> =
                sample_without_replacement(rng, past_rounds, past_voting_n)
                    .into_iter()
                    .collect();
            User::new(UserId::from_index(existing + i), reputation, active_past_rounds)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nqg_nullables::NullRandom;
    use nqg_random::SeededRandom;

    #[test]
    fn test_labels_continue_from_existing() {
        let mut rng = SeededRandom::new(1);
        let users = onboard_users(&mut rng, &BehaviorParams::default(), &[1, 2, 3, 4], 7, 3);
        let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["7", "8", "9"]);
    }

    #[test]
    fn test_past_rounds_cover_configured_rounds() {
        let mut rng = SeededRandom::new(2);
        let rounds = [1, 2, 3, 4];
        for user in onboard_users(&mut rng, &BehaviorParams::default(), &rounds, 0, 20) {
            assert_eq!(user.active_past_rounds, rounds.iter().copied().collect());
        }
    }

    #[test]
    fn test_no_past_rounds_configured() {
        let mut rng = SeededRandom::new(3);
        let users = onboard_users(&mut rng, &BehaviorParams::default(), &[], 0, 5);
        assert!(users.iter().all(|u| u.active_past_rounds.is_empty()));
    }

    #[test]
    fn test_reputation_drawn_uniformly_by_index() {
        // 0.6 * 4 = 2.4 → third category
        let mut rng = NullRandom::constant(0.6);
        let params = BehaviorParams {
            avg_user_past_votes: 0.0,
            ..BehaviorParams::default()
        };
        let users = onboard_users(&mut rng, &params, &[], 0, 1);
        assert_eq!(users[0].reputation, ReputationCategory::Tier3);
    }

    #[test]
    fn test_zero_rate_means_no_arrivals() {
        let mut rng = SeededRandom::new(4);
        let params = BehaviorParams {
            avg_new_users_per_day: 0.0,
            ..BehaviorParams::default()
        };
        assert_eq!(sample_arrivals(&mut rng, &params, 1.0), 0);
    }
}
