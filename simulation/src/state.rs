//! Round state snapshots.

use nqg_governance::{OracleState, ProjectOutcome};
use nqg_types::{
    Action, ActionMatrix, Days, DelegationGraph, PerProjectVoting, ProjectId, TrustGraph, User,
    UserId, VotingMatrix,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The complete state at a round boundary.
///
/// Snapshots are never mutated once a round has produced them; round `N + 1`
/// is derived from a copy of round `N`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub round: u64,
    pub days_passed: Days,
    /// `None` only for the genesis state.
    pub delta_days: Option<Days>,
    /// Population in onboarding order.
    pub users: Vec<User>,
    /// Users appended during this round.
    pub new_users: usize,
    /// Decision of every user, fixed when the user was onboarded.
    pub decisions: BTreeMap<UserId, Action>,
    /// Declared project votes of direct voters.
    pub direct_votes: ActionMatrix,
    pub delegatees: DelegationGraph,
    pub trustees: TrustGraph,
    pub oracle_state: OracleState,
    /// Resolved vote of every user on every project.
    pub action_matrix: ActionMatrix,
    /// Signed voting power of every user on every project.
    pub vote_matrix: VotingMatrix,
    /// Power contributed this round.
    pub round_voting: PerProjectVoting,
    /// Running tally across all rounds so far.
    pub per_project_voting: PerProjectVoting,
    pub outcomes: BTreeMap<ProjectId, ProjectOutcome>,
}

/// Decision counts over the population.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DecisionCounts {
    pub voters: usize,
    pub delegators: usize,
    pub abstainers: usize,
}

impl RoundState {
    pub fn genesis() -> Self {
        Self::default()
    }

    pub fn population(&self) -> usize {
        self.users.len()
    }

    pub fn user_ids(&self) -> Vec<UserId> {
        self.users.iter().map(|u| u.id.clone()).collect()
    }

    /// Users onboarded during this round.
    pub fn newcomers(&self) -> &[User] {
        &self.users[self.users.len() - self.new_users..]
    }

    /// A user missing from the decision map never acted.
    pub fn decision(&self, user: &UserId) -> Action {
        self.decisions.get(user).copied().unwrap_or(Action::Abstain)
    }

    pub fn decision_counts(&self) -> DecisionCounts {
        let mut counts = DecisionCounts::default();
        for action in self.decisions.values() {
            match action {
                Action::RoundVote => counts.voters += 1,
                Action::Delegate => counts.delegators += 1,
                Action::Abstain => counts.abstainers += 1,
            }
        }
        counts
    }

    pub fn funded_projects(&self) -> impl Iterator<Item = &ProjectId> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.funded)
            .map(|(project, _)| project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nqg_types::ReputationCategory;
    use std::collections::BTreeSet;

    #[test]
    fn test_genesis_is_empty() {
        let state = RoundState::genesis();
        assert_eq!(state.round, 0);
        assert_eq!(state.days_passed, 0.0);
        assert_eq!(state.delta_days, None);
        assert_eq!(state.population(), 0);
        assert!(state.newcomers().is_empty());
    }

    #[test]
    fn test_decision_counts() {
        let mut state = RoundState::genesis();
        state.decisions.insert(UserId::new("0"), Action::RoundVote);
        state.decisions.insert(UserId::new("1"), Action::Delegate);
        state.decisions.insert(UserId::new("2"), Action::Delegate);
        assert_eq!(
            state.decision_counts(),
            DecisionCounts {
                voters: 1,
                delegators: 2,
                abstainers: 0
            }
        );
        assert_eq!(state.decision(&UserId::new("9")), Action::Abstain);
    }

    #[test]
    fn test_newcomers_are_the_tail() {
        let mut state = RoundState::genesis();
        for i in 0..5 {
            state.users.push(User::new(
                UserId::from_index(i),
                ReputationCategory::Tier2,
                BTreeSet::new(),
            ));
        }
        state.new_users = 2;
        let ids: Vec<&str> = state.newcomers().iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4"]);
    }
}
