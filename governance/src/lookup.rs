//! Reputation and voting-history lookup services.
//!
//! The oracles never fail on a lookup: any non-success status means "no
//! bonus". [`PopulationLookup`] answers from the simulated population itself.

use nqg_types::{ReputationCategory, User, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupStatus {
    Ok,
    NotFound,
    Unavailable,
}

/// Result of a service lookup: a status and, on success, a value.
#[derive(Clone, Debug, PartialEq)]
pub struct Lookup<T> {
    pub status: LookupStatus,
    pub value: Option<T>,
}

impl<T> Lookup<T> {
    pub fn ok(value: T) -> Self {
        Self {
            status: LookupStatus::Ok,
            value: Some(value),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: LookupStatus::NotFound,
            value: None,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            status: LookupStatus::Unavailable,
            value: None,
        }
    }

    /// The value, only if the lookup succeeded.
    pub fn into_value(self) -> Option<T> {
        match self.status {
            LookupStatus::Ok => self.value,
            _ => None,
        }
    }
}

/// `get(user) → (status, category)`.
pub trait ReputationLookup {
    fn get(&self, user: &UserId) -> Lookup<ReputationCategory>;
}

/// `get(user) → (status, active past rounds)`.
pub trait VotingHistoryLookup {
    fn get(&self, user: &UserId) -> Lookup<BTreeSet<u32>>;
}

/// Lookup backed by the population's own user records.
pub struct PopulationLookup<'a> {
    users: BTreeMap<&'a UserId, &'a User>,
}

impl<'a> PopulationLookup<'a> {
    pub fn new(users: &'a [User]) -> Self {
        Self {
            users: users.iter().map(|u| (&u.id, u)).collect(),
        }
    }
}

impl ReputationLookup for PopulationLookup<'_> {
    fn get(&self, user: &UserId) -> Lookup<ReputationCategory> {
        match self.users.get(user) {
            Some(u) => Lookup::ok(u.reputation),
            None => Lookup::not_found(),
        }
    }
}

impl VotingHistoryLookup for PopulationLookup<'_> {
    fn get(&self, user: &UserId) -> Lookup<BTreeSet<u32>> {
        match self.users.get(user) {
            Some(u) => Lookup::ok(u.active_past_rounds.clone()),
            None => Lookup::not_found(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_lookup() {
        let users = vec![User::new(
            UserId::new("0"),
            ReputationCategory::Tier2,
            BTreeSet::from([2, 3]),
        )];
        let lookup = PopulationLookup::new(&users);
        assert_eq!(
            ReputationLookup::get(&lookup, &UserId::new("0")).into_value(),
            Some(ReputationCategory::Tier2)
        );
        assert_eq!(
            VotingHistoryLookup::get(&lookup, &UserId::new("0")).into_value(),
            Some(BTreeSet::from([2, 3]))
        );
        assert_eq!(
            ReputationLookup::get(&lookup, &UserId::new("9")).status,
            LookupStatus::NotFound
        );
    }

    #[test]
    fn test_failed_lookup_has_no_value() {
        let failed: Lookup<u32> = Lookup {
            status: LookupStatus::Unavailable,
            value: Some(7),
        };
        assert_eq!(failed.into_value(), None);
    }
}
