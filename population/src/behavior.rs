//! Round decisions, delegation and trust for newly onboarded users.
//!
//! Existing users keep the behaviour they were given when they arrived; only
//! new users are sampled here. Delegatees and trusted users come from
//! `prior_users`, the population as it stood at the previous round boundary.

use crate::params::BehaviorParams;
use nqg_random::{sample_without_replacement, RandomSource};
use nqg_types::{Action, ProjectId, User, UserId, Vote};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Everything sampled for one new user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewUserBehavior {
    pub decision: Action,
    /// Declared project votes (direct voters only).
    pub votes: BTreeMap<ProjectId, Vote>,
    /// Ordered candidate delegatees (delegators only).
    pub delegatees: Vec<UserId>,
    pub trustees: BTreeSet<UserId>,
}

/// Sample decision, votes, delegatees and trust edges for `user`.
///
/// Draw order: participation coin, vote-or-delegate coin, then either the
/// per-project coins or the delegate sample, and finally the trust sample.
pub fn assign_behavior(
    rng: &mut dyn RandomSource,
    params: &BehaviorParams,
    user: &User,
    projects: &[ProjectId],
    prior_users: &[UserId],
    max_candidate_delegates: usize,
) -> NewUserBehavior {
    debug_assert!(
        !prior_users.contains(&user.id),
        "new user {} listed among prior users",
        user.id
    );

    let decision = if rng.bernoulli(params.new_user_action_probability) {
        if rng.bernoulli(params.new_user_round_vote_probability) {
            Action::RoundVote
        } else {
            Action::Delegate
        }
    } else {
        Action::Abstain
    };

    let mut votes = BTreeMap::new();
    let mut delegatees = Vec::new();
    match decision {
        Action::RoundVote => {
            for project in projects {
                if rng.bernoulli(params.new_user_project_vote_probability) {
                    let vote = if rng.bernoulli(params.new_user_project_vote_yes_probability) {
                        Vote::Yes
                    } else {
                        Vote::No
                    };
                    votes.insert(project.clone(), vote);
                }
            }
        }
        Action::Delegate => {
            let mean = params.new_user_average_delegate_count
                - params.new_user_min_delegate_count as f64;
            let count = (rng.poisson(mean) + params.new_user_min_delegate_count)
                .min(max_candidate_delegates);
            delegatees = sample_without_replacement(rng, prior_users, count);
        }
        Action::Abstain => {}
    }

    let trust_count = rng.poisson(params.new_user_average_trustees);
    let trustees: BTreeSet<UserId> = sample_without_replacement(rng, prior_users, trust_count)
        .into_iter()
        .filter(|t| t != &user.id)
        .collect();

    tracing::trace!(
        user = %user.id,
        ?decision,
        votes = votes.len(),
        delegatees = delegatees.len(),
        trustees = trustees.len(),
        "new user behaviour"
    );

    NewUserBehavior {
        decision,
        votes,
        delegatees,
        trustees,
    }
}
