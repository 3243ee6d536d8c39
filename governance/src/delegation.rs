//! Quorum delegation: resolve a delegator's vote from its delegatees.
//!
//! A delegating user keeps an ordered list of candidate delegatees. For each
//! project, the first `max_selected_delegates` candidates that vote directly
//! this round form the quorum, and their direct votes pass a two-threshold
//! consensus gate:
//! - **absolute agreement** = agreement / `max_selected_delegates`
//!   (conviction relative to the largest possible quorum)
//! - **relative agreement** = agreement / quorum size
//!   (conviction among delegatees that actually voted on the project)
//!
//! Both must clear their thresholds for a Yes or No; otherwise the delegator
//! abstains. Delegation is not transitive: delegatees that delegate or
//! abstain themselves are skipped.

use crate::params::QuorumParams;
use nqg_types::{Action, ActionMatrix, ProjectId, UserId, Vote};
use std::collections::BTreeMap;

/// The quorum for a delegator: candidates voting directly this round, in
/// candidate order, truncated to `max_selected`.
pub fn select_quorum<'a>(
    candidates: &'a [UserId],
    decisions: &BTreeMap<UserId, Action>,
    max_selected: usize,
) -> Vec<&'a UserId> {
    candidates
        .iter()
        .filter(|c| decisions.get(*c) == Some(&Action::RoundVote))
        .take(max_selected)
        .collect()
}

/// Resolve the vote of a delegator on `project`.
///
/// `direct_votes` holds only declared project votes; a selected delegatee
/// with no entry for `project` neither counts toward the quorum size nor adds
/// agreement. An empty quorum always resolves to [`Vote::Abstain`].
pub fn vote_from_quorum_delegation(
    candidates: &[UserId],
    project: &ProjectId,
    direct_votes: &ActionMatrix,
    decisions: &BTreeMap<UserId, Action>,
    params: &QuorumParams,
) -> Vote {
    let quorum = select_quorum(candidates, decisions, params.max_selected_delegates);

    let mut agreement = 0.0;
    let mut quorum_size = 0usize;
    for delegatee in quorum {
        if let Some(vote) = direct_votes.get(delegatee).and_then(|v| v.get(project)) {
            quorum_size += 1;
            agreement += params.weights.weight(*vote);
        }
    }

    if quorum_size == 0 {
        return Vote::Abstain;
    }

    let absolute_agreement = agreement / params.max_selected_delegates as f64;
    let relative_agreement = agreement / quorum_size as f64;

    if absolute_agreement.abs() < params.absolute_threshold {
        Vote::Abstain
    } else if relative_agreement.abs() < params.relative_threshold {
        Vote::Abstain
    } else if relative_agreement > 0.0 {
        Vote::Yes
    } else {
        Vote::No
    }
}
