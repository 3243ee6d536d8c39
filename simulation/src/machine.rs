//! The round state machine.

use crate::error::SimulationError;
use crate::params::SimulationParams;
use crate::phases::{self, Phase};
use crate::state::RoundState;
use nqg_governance::{ReputationLookup, VotingHistoryLookup};
use nqg_random::RandomSource;
use tracing::trace;

/// Advances a run one round at a time.
///
/// Owns the parameters, the single random stream and the lookup services;
/// the snapshots themselves live in the caller's history.
pub struct RoundStateMachine {
    params: SimulationParams,
    rng: Box<dyn RandomSource>,
    reputation: Option<Box<dyn ReputationLookup>>,
    voting_history: Option<Box<dyn VotingHistoryLookup>>,
}

impl RoundStateMachine {
    /// Validates `params` before the first round.
    pub fn new(
        params: SimulationParams,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, SimulationError> {
        params.validate()?;
        Ok(Self {
            params,
            rng,
            reputation: None,
            voting_history: None,
        })
    }

    /// Answer reputation lookups from `service` instead of the population.
    pub fn with_reputation_lookup(mut self, service: Box<dyn ReputationLookup>) -> Self {
        self.reputation = Some(service);
        self
    }

    /// Answer voting-history lookups from `service` instead of the population.
    pub fn with_voting_history_lookup(mut self, service: Box<dyn VotingHistoryLookup>) -> Self {
        self.voting_history = Some(service);
        self
    }

    fn refresh_oracle(&self, state: &mut RoundState) {
        phases::refresh_oracle(
            state,
            &self.params,
            self.reputation.as_deref(),
            self.voting_history.as_deref(),
        );
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn random_source(&self) -> &str {
        self.rng.name()
    }

    /// Round 0. Holds `initial_users` users who delegate to and trust nobody.
    pub fn genesis(&mut self) -> RoundState {
        let mut state = RoundState::genesis();
        if self.params.initial_users > 0 {
            phases::onboard_exact(&mut state, &self.params, self.rng.as_mut(), self.params.initial_users);
            phases::assign_behaviors(&mut state, &self.params, &[], self.rng.as_mut());
        }
        self.refresh_oracle(&mut state);
        debug_assert!(phases::check_invariants(&state));
        state
    }

    /// Derive the next snapshot from `prev`. `prev` is left untouched.
    pub fn step(&mut self, prev: &RoundState) -> RoundState {
        let prior_users = prev.user_ids();
        let mut next = prev.clone();
        next.round = prev.round + 1;
        next.new_users = 0;

        for phase in Phase::ORDER {
            trace!(round = next.round, phase = phase.name(), "phase");
            match phase {
                Phase::TimeAdvance => phases::advance_time(&mut next, &self.params),
                Phase::Onboarding => {
                    phases::onboard(&mut next, &self.params, self.rng.as_mut());
                }
                Phase::BehaviorAndTrust => {
                    phases::assign_behaviors(&mut next, &self.params, &prior_users, self.rng.as_mut())
                }
                Phase::OracleRefresh => self.refresh_oracle(&mut next),
                Phase::Tally => {
                    let tally = phases::compute_tally(&next, &self.params);
                    phases::apply_tally(&mut next, tally);
                }
            }
        }

        debug_assert!(phases::check_invariants(&next));
        debug_assert!(next.users.len() >= prev.users.len());
        next
    }
}
