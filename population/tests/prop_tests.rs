use proptest::prelude::*;

use nqg_population::{assign_behavior, onboard_users, BehaviorParams};
use nqg_random::SeededRandom;
use nqg_types::{Action, ProjectId, UserId};

fn projects(n: usize) -> Vec<ProjectId> {
    (0..n).map(|i| ProjectId::new(format!("proj_{i}"))).collect()
}

proptest! {
    /// Onboarded users are labelled consecutively and only remember
    /// configured rounds.
    #[test]
    fn onboarding_labels_and_rounds(
        seed in any::<u64>(),
        existing in 0usize..100,
        count in 0usize..20,
    ) {
        let mut rng = SeededRandom::new(seed);
        let rounds = [1u32, 2, 3, 4];
        let users = onboard_users(&mut rng, &BehaviorParams::default(), &rounds, existing, count);
        prop_assert_eq!(users.len(), count);
        for (i, user) in users.iter().enumerate() {
            prop_assert_eq!(&user.id, &UserId::from_index(existing + i));
            prop_assert!(user.active_past_rounds.iter().all(|r| rounds.contains(r)));
        }
    }

    /// Behaviour is consistent with the decision and never targets the user
    /// itself or anyone outside the prior population.
    #[test]
    fn behaviour_respects_prior_population(
        seed in any::<u64>(),
        prior_count in 0usize..30,
        max_candidates in 1usize..12,
    ) {
        let mut rng = SeededRandom::new(seed);
        let prior: Vec<UserId> = (0..prior_count).map(UserId::from_index).collect();
        let users = onboard_users(&mut rng, &BehaviorParams::default(), &[1, 2], prior_count, 1);
        let b = assign_behavior(
            &mut rng,
            &BehaviorParams::default(),
            &users[0],
            &projects(15),
            &prior,
            max_candidates,
        );

        prop_assert!(b.delegatees.len() <= max_candidates.min(prior_count));
        prop_assert!(b.delegatees.iter().all(|d| prior.contains(d)));
        prop_assert!(b.trustees.iter().all(|t| prior.contains(t)));
        prop_assert!(!b.trustees.contains(&users[0].id));
        match b.decision {
            Action::RoundVote => prop_assert!(b.delegatees.is_empty()),
            Action::Delegate => prop_assert!(b.votes.is_empty()),
            Action::Abstain => {
                prop_assert!(b.votes.is_empty());
                prop_assert!(b.delegatees.is_empty());
            }
        }
    }
}
