//! Run driver and snapshot history.

use crate::error::SimulationError;
use crate::machine::RoundStateMachine;
use crate::params::SimulationParams;
use crate::state::RoundState;
use nqg_random::{RandomSource, SeededRandom};
use nqg_types::Action;
use nqg_utils::StatsCounter;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

/// Counters maintained by every [`Simulation`].
pub const RUN_COUNTERS: &[&str] = &[
    "rounds",
    "users_onboarded",
    "voters",
    "delegators",
    "abstainers",
];

/// Immutable round snapshots of one run, indexed by round number.
/// Index 0 is the genesis state, so a history is never empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunHistory {
    pub label: String,
    pub sample: usize,
    pub seed: u64,
    #[serde(deserialize_with = "genesis_and_rounds")]
    snapshots: Vec<RoundState>,
}

fn genesis_and_rounds<'de, D>(deserializer: D) -> Result<Vec<RoundState>, D::Error>
where
    D: Deserializer<'de>,
{
    let snapshots = Vec::<RoundState>::deserialize(deserializer)?;
    if snapshots.is_empty() {
        return Err(serde::de::Error::custom(
            "run history needs at least the genesis snapshot",
        ));
    }
    Ok(snapshots)
}

impl RunHistory {
    fn new(label: String, sample: usize, seed: u64, genesis: RoundState) -> Self {
        Self {
            label,
            sample,
            seed,
            snapshots: vec![genesis],
        }
    }

    fn push(&mut self, state: RoundState) {
        debug_assert_eq!(state.round as usize, self.snapshots.len());
        self.snapshots.push(state);
    }

    pub fn get(&self, round: u64) -> Option<&RoundState> {
        self.snapshots.get(round as usize)
    }

    pub fn latest(&self) -> &RoundState {
        // never empty: constructed with the genesis snapshot
        &self.snapshots[self.snapshots.len() - 1]
    }

    /// Completed rounds, genesis excluded.
    pub fn rounds(&self) -> u64 {
        self.snapshots.len() as u64 - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoundState> {
        self.snapshots.iter()
    }
}

/// One simulation run: a state machine plus the snapshots it produced.
pub struct Simulation {
    machine: RoundStateMachine,
    history: RunHistory,
    stats: StatsCounter,
}

impl Simulation {
    /// Seeded run using `params.seed`.
    pub fn new(params: SimulationParams) -> Result<Self, SimulationError> {
        let rng = Box::new(SeededRandom::new(params.seed));
        Self::with_random(params, rng, 0)
    }

    /// Run driven by an arbitrary random source, tagged as `sample`.
    pub fn with_random(
        params: SimulationParams,
        rng: Box<dyn RandomSource>,
        sample: usize,
    ) -> Result<Self, SimulationError> {
        Ok(Self::from_machine(RoundStateMachine::new(params, rng)?, sample))
    }

    /// Run on a preconfigured machine (e.g. with external lookup services).
    pub fn from_machine(mut machine: RoundStateMachine, sample: usize) -> Self {
        let label = machine.params().label.clone();
        let seed = machine.params().seed;
        let stats = StatsCounter::new(RUN_COUNTERS);

        let genesis = machine.genesis();
        record_newcomers(&stats, &genesis);
        info!(
            label = %label,
            sample,
            seed,
            source = machine.random_source(),
            initial_users = genesis.population(),
            "simulation initialised"
        );

        Self {
            machine,
            history: RunHistory::new(label, sample, seed, genesis),
            stats,
        }
    }

    /// Advance exactly one round and return the new snapshot.
    pub fn step(&mut self) -> &RoundState {
        let next = self.machine.step(self.history.latest());
        record_newcomers(&self.stats, &next);
        self.stats.increment("rounds");
        info!(
            round = next.round,
            days = next.days_passed,
            population = next.population(),
            new_users = next.new_users,
            funded = next.funded_projects().count(),
            "round complete"
        );
        self.history.push(next);
        self.history.latest()
    }

    /// Advance `timesteps` rounds.
    pub fn run(&mut self, timesteps: u64) -> &RunHistory {
        for _ in 0..timesteps {
            self.step();
        }
        &self.history
    }

    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    pub fn into_history(self) -> RunHistory {
        self.history
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    pub fn params(&self) -> &SimulationParams {
        self.machine.params()
    }
}

fn record_newcomers(stats: &StatsCounter, state: &RoundState) {
    stats.add("users_onboarded", state.new_users as u64);
    for user in state.newcomers() {
        match state.decision(&user.id) {
            Action::RoundVote => stats.increment("voters"),
            Action::Delegate => stats.increment("delegators"),
            Action::Abstain => stats.increment("abstainers"),
        }
    }
}

/// Run `samples` independent simulations, sample `i` seeded with `seed + i`.
pub fn run_samples(
    params: &SimulationParams,
    timesteps: u64,
    samples: usize,
) -> Result<Vec<RunHistory>, SimulationError> {
    (0..samples)
        .map(|sample| {
            let seeded = params.with_seed(params.seed.wrapping_add(sample as u64));
            let rng = Box::new(SeededRandom::new(seeded.seed));
            let mut simulation = Simulation::with_random(seeded, rng, sample)?;
            simulation.run(timesteps);
            Ok(simulation.into_history())
        })
        .collect()
}
