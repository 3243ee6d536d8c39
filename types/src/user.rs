//! Simulated users and their static attributes.

use crate::id::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Static reputation tier of a user, as reported by the reputation service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReputationCategory {
    Tier1,
    Tier2,
    Tier3,
    Uncategorized,
}

impl ReputationCategory {
    /// Every category, in declaration order.
    pub const ALL: [ReputationCategory; 4] = [
        ReputationCategory::Tier1,
        ReputationCategory::Tier2,
        ReputationCategory::Tier3,
        ReputationCategory::Uncategorized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tier1 => "tier1",
            Self::Tier2 => "tier2",
            Self::Tier3 => "tier3",
            Self::Uncategorized => "uncategorized",
        }
    }
}

/// A participant in the simulation.
///
/// Created once at onboarding and never mutated afterwards; the population
/// only grows by appending new users.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub reputation: ReputationCategory,
    /// Historical round indices the user took part in.
    pub active_past_rounds: BTreeSet<u32>,
}

impl User {
    pub fn new(
        id: UserId,
        reputation: ReputationCategory,
        active_past_rounds: BTreeSet<u32>,
    ) -> Self {
        Self {
            id,
            reputation,
            active_past_rounds,
        }
    }
}
