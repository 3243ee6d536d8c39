//! The five phases of a round.
//!
//! ```text
//! prev ─▶ TimeAdvance ─▶ Onboarding ─▶ BehaviorAndTrust ─▶ OracleRefresh ─▶ Tally ─▶ next
//! ```
//!
//! Each phase reads what the previous one wrote into the in-progress
//! snapshot. Only onboarding and behaviour assignment draw randomness, and
//! they draw it from the one stream owned by the state machine.

use crate::params::SimulationParams;
use crate::state::RoundState;
use nqg_governance::{
    fund_project, vote_from_quorum_delegation, OracleState, PopulationLookup, ProjectOutcome,
    ReputationLookup, VotingHistoryLookup,
};
use nqg_population::{assign_behavior, onboard_users, sample_arrivals};
use nqg_random::RandomSource;
use nqg_trust::TrustScores;
use nqg_types::{
    Action, ActionMatrix, PerProjectVoting, ProjectId, UserId, Vote, VotingMatrix,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Phases in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    TimeAdvance,
    Onboarding,
    BehaviorAndTrust,
    OracleRefresh,
    Tally,
}

impl Phase {
    pub const ORDER: [Phase; 5] = [
        Phase::TimeAdvance,
        Phase::Onboarding,
        Phase::BehaviorAndTrust,
        Phase::OracleRefresh,
        Phase::Tally,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Phase::TimeAdvance => "time_advance",
            Phase::Onboarding => "onboarding",
            Phase::BehaviorAndTrust => "behavior_and_trust",
            Phase::OracleRefresh => "oracle_refresh",
            Phase::Tally => "tally",
        }
    }
}

// ── Time ───────────────────────────────────────────────────────────────

pub fn advance_time(state: &mut RoundState, params: &SimulationParams) {
    state.days_passed += params.timestep_in_days;
    state.delta_days = Some(params.timestep_in_days);
}

// ── Onboarding ─────────────────────────────────────────────────────────

/// Append a Poisson-distributed number of arrivals. Returns how many joined.
pub fn onboard(
    state: &mut RoundState,
    params: &SimulationParams,
    rng: &mut dyn RandomSource,
) -> usize {
    let count = sample_arrivals(rng, &params.behavior, params.timestep_in_days);
    onboard_exact(state, params, rng, count);
    count
}

/// Append exactly `count` users.
pub fn onboard_exact(
    state: &mut RoundState,
    params: &SimulationParams,
    rng: &mut dyn RandomSource,
    count: usize,
) {
    let users = onboard_users(
        rng,
        &params.behavior,
        &params.past_rounds,
        state.users.len(),
        count,
    );
    state.users.extend(users);
    state.new_users = count;
    debug!(new_users = count, population = state.users.len(), "onboarding");
}

// ── Behaviour & trust ──────────────────────────────────────────────────

/// Sample decisions, votes, delegatees and trust edges for this round's
/// newcomers. Targets come from `prior_users` only.
pub fn assign_behaviors(
    state: &mut RoundState,
    params: &SimulationParams,
    prior_users: &[UserId],
    rng: &mut dyn RandomSource,
) {
    let newcomers: Vec<_> = state.newcomers().to_vec();
    for user in &newcomers {
        let behavior = assign_behavior(
            rng,
            &params.behavior,
            user,
            &params.projects,
            prior_users,
            params.quorum.max_candidate_delegates,
        );

        debug_assert!(
            behavior
                .delegatees
                .iter()
                .chain(behavior.trustees.iter())
                .all(|target| prior_users.contains(target)),
            "user {} targets someone who did not exist before this round",
            user.id
        );

        state.decisions.insert(user.id.clone(), behavior.decision);
        match behavior.decision {
            Action::RoundVote => {
                state.direct_votes.insert(user.id.clone(), behavior.votes);
            }
            Action::Delegate => {
                state.delegatees.insert(user.id.clone(), behavior.delegatees);
            }
            Action::Abstain => {}
        }
        if !behavior.trustees.is_empty() {
            state.trustees.insert(user.id.clone(), behavior.trustees);
        }
    }
    debug!(
        newcomers = newcomers.len(),
        trusters = state.trustees.len(),
        "behaviour and trust assigned"
    );
}

// ── Oracle refresh ─────────────────────────────────────────────────────

/// Rerank the trust graph and rebuild the oracle snapshot.
///
/// Reputation and voting history come from the given services, or from the
/// population's own records when none is given.
pub fn refresh_oracle(
    state: &mut RoundState,
    params: &SimulationParams,
    reputation: Option<&dyn ReputationLookup>,
    voting_history: Option<&dyn VotingHistoryLookup>,
) {
    let trust = TrustScores::compute(&state.trustees, &params.trust_ranking);
    let oracle_state = {
        let population = PopulationLookup::new(&state.users);
        let reputation: &dyn ReputationLookup = match reputation {
            Some(service) => service,
            None => &population,
        };
        let voting_history: &dyn VotingHistoryLookup = match voting_history {
            Some(service) => service,
            None => &population,
        };
        OracleState::build(trust, &params.bonuses, &state.users, reputation, voting_history)
    };
    state.oracle_state = oracle_state;
    debug!(ranked = state.oracle_state.trust.len(), "oracle state refreshed");
}

// ── Tally ──────────────────────────────────────────────────────────────

/// Everything the tally phase produces. Computed in full before any of it is
/// written back, so a snapshot never holds half a tally.
#[derive(Clone, Debug, PartialEq)]
pub struct Tally {
    pub action_matrix: ActionMatrix,
    pub vote_matrix: VotingMatrix,
    pub round_voting: PerProjectVoting,
    pub outcomes: BTreeMap<ProjectId, ProjectOutcome>,
}

/// Resolve every user's vote on every project and weigh it.
///
/// Direct voters use their declared votes (undeclared projects abstain),
/// delegators go through the quorum resolver, abstainers abstain
/// everywhere. A non-abstaining vote contributes `±score`.
pub fn compute_tally(state: &RoundState, params: &SimulationParams) -> Tally {
    let mut action_matrix = ActionMatrix::new();
    let mut vote_matrix = VotingMatrix::new();
    let mut round_voting: PerProjectVoting =
        params.projects.iter().map(|p| (p.clone(), 0.0)).collect();
    let mut voters: BTreeMap<&ProjectId, usize> = BTreeMap::new();

    for user in &state.users {
        let decision = state.decision(&user.id);
        let declared = state.direct_votes.get(&user.id);
        let candidates = state.delegatees.get(&user.id).map(Vec::as_slice).unwrap_or(&[]);

        let mut votes = BTreeMap::new();
        let mut powers = BTreeMap::new();
        for project in &params.projects {
            let vote = match decision {
                Action::Abstain => Vote::Abstain,
                Action::RoundVote => declared
                    .and_then(|v| v.get(project))
                    .copied()
                    .unwrap_or(Vote::Abstain),
                Action::Delegate => vote_from_quorum_delegation(
                    candidates,
                    project,
                    &state.direct_votes,
                    &state.decisions,
                    &params.quorum,
                ),
            };

            let power = match vote {
                Vote::Abstain => 0.0,
                _ => {
                    vote.coefficient()
                        * params.network.score(
                            &user.id,
                            project,
                            &state.oracle_state,
                            params.initial_power,
                        )
                }
            };

            if power != 0.0 {
                *voters.entry(project).or_default() += 1;
            }
            *round_voting.entry(project.clone()).or_default() += power;
            votes.insert(project.clone(), vote);
            powers.insert(project.clone(), power);
        }
        action_matrix.insert(user.id.clone(), votes);
        vote_matrix.insert(user.id.clone(), powers);
    }

    let outcomes = round_voting
        .iter()
        .map(|(project, &power)| {
            let count = voters.get(project).copied().unwrap_or(0);
            let carried = state.per_project_voting.get(project).copied().unwrap_or(0.0);
            let outcome = ProjectOutcome {
                power,
                voters: count,
                tally: carried + power,
                funded: fund_project(power, count, params.min_voters_to_fund),
            };
            (project.clone(), outcome)
        })
        .collect();

    Tally {
        action_matrix,
        vote_matrix,
        round_voting,
        outcomes,
    }
}

/// Write a computed tally into the snapshot and fold it into the running
/// per-project totals.
pub fn apply_tally(state: &mut RoundState, tally: Tally) {
    for (project, power) in &tally.round_voting {
        *state.per_project_voting.entry(project.clone()).or_default() += power;
    }
    state.action_matrix = tally.action_matrix;
    state.vote_matrix = tally.vote_matrix;
    state.round_voting = tally.round_voting;
    state.outcomes = tally.outcomes;
    debug!(
        funded = state.funded_projects().count(),
        projects = state.outcomes.len(),
        "tally complete"
    );
}

/// Check that every matrix only references users of the population.
pub fn check_invariants(state: &RoundState) -> bool {
    let known: BTreeSet<&UserId> = state.users.iter().map(|u| &u.id).collect();
    state.decisions.keys().all(|u| known.contains(u))
        && state.direct_votes.keys().all(|u| known.contains(u))
        && state.delegatees.keys().all(|u| known.contains(u))
        && state.action_matrix.keys().all(|u| known.contains(u))
        && state.vote_matrix.keys().all(|u| known.contains(u))
        && state
            .trustees
            .iter()
            .all(|(truster, trusted)| known.contains(truster) && trusted.iter().all(|t| known.contains(t)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nqg_governance::{Aggregation, ConstantNeuron, NeuralGovernance, NeuronLayer};
    use nqg_nullables::NullRandom;
    use nqg_types::{ReputationCategory, User};

    fn uid(s: &str) -> UserId {
        UserId::new(s)
    }

    fn pid(s: &str) -> ProjectId {
        ProjectId::new(s)
    }

    fn user(s: &str) -> User {
        User::new(uid(s), ReputationCategory::Tier1, BTreeSet::new())
    }

    /// One-person-one-vote network and two projects.
    fn flat_params() -> SimulationParams {
        SimulationParams {
            projects: vec![pid("a"), pid("b")],
            network: NeuralGovernance::new(vec![
                NeuronLayer::new(Aggregation::Sum).with_neuron("one", ConstantNeuron(1.0))
            ])
            .unwrap(),
            ..SimulationParams::default()
        }
    }

    /// Users 0..3 vote directly (0,1,2 Yes on `a`; 2 No on `b`), 3 delegates
    /// to 0,1,2, 4 abstains.
    fn scripted_state() -> RoundState {
        let mut state = RoundState::genesis();
        for i in 0..5 {
            state.users.push(user(&i.to_string()));
        }
        for id in ["0", "1", "2"] {
            state.decisions.insert(uid(id), Action::RoundVote);
            state
                .direct_votes
                .insert(uid(id), BTreeMap::from([(pid("a"), Vote::Yes)]));
        }
        state
            .direct_votes
            .get_mut(&uid("2"))
            .unwrap()
            .insert(pid("b"), Vote::No);
        state.decisions.insert(uid("3"), Action::Delegate);
        state
            .delegatees
            .insert(uid("3"), vec![uid("0"), uid("1"), uid("2")]);
        state.decisions.insert(uid("4"), Action::Abstain);
        state
    }

    // ── Time ────────────────────────────────────────────────────────────

    #[test]
    fn test_advance_time() {
        let mut state = RoundState::genesis();
        let params = SimulationParams {
            timestep_in_days: 2.5,
            ..SimulationParams::default()
        };
        advance_time(&mut state, &params);
        advance_time(&mut state, &params);
        assert_eq!(state.days_passed, 5.0);
        assert_eq!(state.delta_days, Some(2.5));
    }

    // ── Onboarding ──────────────────────────────────────────────────────

    #[test]
    fn test_onboard_exact_appends_with_continuing_labels() {
        let mut state = scripted_state();
        let mut rng = NullRandom::new(vec![0.3, 0.0]);
        onboard_exact(&mut state, &flat_params(), &mut rng, 2);
        assert_eq!(state.population(), 7);
        assert_eq!(state.new_users, 2);
        assert_eq!(state.newcomers()[0].id, uid("5"));
    }

    #[test]
    fn test_onboard_zero_arrivals() {
        let mut state = RoundState::genesis();
        // u = 0.1 < e^-1 → Poisson(1.0) returns 0
        let mut rng = NullRandom::constant(0.1);
        let joined = onboard(&mut state, &flat_params(), &mut rng);
        assert_eq!(joined, 0);
        assert_eq!(state.population(), 0);
    }

    // ── Behaviour ───────────────────────────────────────────────────────

    #[test]
    fn test_newcomer_behaviour_targets_prior_users_only() {
        let mut state = scripted_state();
        let prior = state.user_ids();
        let mut rng = NullRandom::new(vec![0.1, 0.9, 0.2, 0.4, 0.7, 0.05, 0.0]);
        onboard_exact(&mut state, &flat_params(), &mut rng, 3);
        assign_behaviors(&mut state, &flat_params(), &prior, &mut rng);

        for newcomer in state.newcomers() {
            assert!(state.decisions.contains_key(&newcomer.id));
            for target in state.delegatees.get(&newcomer.id).into_iter().flatten() {
                assert!(prior.contains(target));
            }
            for target in state.trustees.get(&newcomer.id).into_iter().flatten() {
                assert!(prior.contains(target));
            }
        }
        assert!(check_invariants(&state));
    }

    // ── Tally ───────────────────────────────────────────────────────────

    #[test]
    fn test_tally_resolves_every_user_and_project() {
        let state = scripted_state();
        let tally = compute_tally(&state, &flat_params());
        assert_eq!(tally.action_matrix.len(), 5);
        assert!(tally.action_matrix.values().all(|row| row.len() == 2));

        // Direct voter with an undeclared project abstains there.
        assert_eq!(tally.action_matrix[&uid("0")][&pid("b")], Vote::Abstain);
        // 3/5 absolute agreement clears 0.5, 3/3 relative clears 2/3.
        assert_eq!(tally.action_matrix[&uid("3")][&pid("a")], Vote::Yes);
        // A single No: 1/5 absolute agreement is below 0.5.
        assert_eq!(tally.action_matrix[&uid("3")][&pid("b")], Vote::Abstain);
        assert!(tally.action_matrix[&uid("4")].values().all(|v| *v == Vote::Abstain));
    }

    #[test]
    fn test_tally_power_and_outcomes() {
        let state = scripted_state();
        let tally = compute_tally(&state, &flat_params());

        assert_eq!(tally.round_voting[&pid("a")], 4.0);
        assert_eq!(tally.round_voting[&pid("b")], -1.0);
        assert_eq!(tally.vote_matrix[&uid("2")][&pid("b")], -1.0);
        assert_eq!(tally.vote_matrix[&uid("4")][&pid("a")], 0.0);

        let a = &tally.outcomes[&pid("a")];
        assert_eq!(a.voters, 4);
        assert!(a.funded);
        let b = &tally.outcomes[&pid("b")];
        assert_eq!(b.voters, 1);
        assert!(!b.funded);
    }

    #[test]
    fn test_tally_with_default_network_and_empty_oracle() {
        // trust 0 + reputation 0, × prior voting → every power is zero
        let state = scripted_state();
        let params = SimulationParams {
            projects: vec![pid("a"), pid("b")],
            ..SimulationParams::default()
        };
        let tally = compute_tally(&state, &params);
        assert!(tally.round_voting.values().all(|p| *p == 0.0));
        assert!(tally.outcomes.values().all(|o| !o.funded && o.voters == 0));
    }

    #[test]
    fn test_apply_tally_accumulates() {
        let mut state = scripted_state();
        let params = flat_params();
        for _ in 0..3 {
            let tally = compute_tally(&state, &params);
            apply_tally(&mut state, tally);
        }
        assert_eq!(state.per_project_voting[&pid("a")], 12.0);
        assert_eq!(state.per_project_voting[&pid("b")], -3.0);
        assert_eq!(state.outcomes[&pid("a")].tally, 12.0);
    }

    #[test]
    fn test_tally_on_empty_population() {
        let tally = compute_tally(&RoundState::genesis(), &flat_params());
        assert!(tally.action_matrix.is_empty());
        assert_eq!(tally.round_voting.len(), 2);
        assert!(tally.outcomes.values().all(|o| o.power == 0.0 && !o.funded));
    }

    #[test]
    fn test_phase_order() {
        let names: Vec<&str> = Phase::ORDER.iter().map(Phase::name).collect();
        assert_eq!(
            names,
            vec!["time_advance", "onboarding", "behavior_and_trust", "oracle_refresh", "tally"]
        );
    }
}
