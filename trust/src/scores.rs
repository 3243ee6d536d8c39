//! Min-max normalised trust scores.

use crate::rank::{page_rank, RankParams, TrustRanking};
use nqg_types::{TrustGraph, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trust score per user, in `[0, 1]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrustScores {
    scores: BTreeMap<UserId, f64>,
}

impl TrustScores {
    /// Rank `graph` and normalise the result.
    pub fn compute(graph: &TrustGraph, params: &RankParams) -> Self {
        Self::from_ranking(&page_rank(graph, params))
    }

    /// Normalise raw ranks so the minimum maps to 0.0 and the maximum to 1.0.
    ///
    /// With fewer than two ranked users, or when every rank is equal, all
    /// scores are 0.0.
    pub fn from_ranking(ranking: &TrustRanking) -> Self {
        let ranks = &ranking.ranks;
        if ranks.len() < 2 {
            return Self {
                scores: ranks.keys().map(|u| (u.clone(), 0.0)).collect(),
            };
        }
        let max = ranks.values().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = ranks.values().copied().fold(f64::INFINITY, f64::min);
        let spread = max - min;
        let scores = ranks
            .iter()
            .map(|(user, &rank)| {
                let score = if spread > 0.0 { (rank - min) / spread } else { 0.0 };
                (user.clone(), score)
            })
            .collect();
        Self { scores }
    }

    /// Trust score of `user`; 0.0 when fewer than two users are ranked or the
    /// user is absent.
    pub fn score(&self, user: &UserId) -> f64 {
        if self.scores.len() < 2 {
            return 0.0;
        }
        self.scores.get(user).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &f64)> {
        self.scores.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn uid(s: &str) -> UserId {
        UserId::new(s)
    }

    #[test]
    fn test_single_user_scores_zero() {
        let mut g = TrustGraph::new();
        g.insert(uid("solo"), BTreeSet::new());
        let scores = TrustScores::compute(&g, &RankParams::default());
        assert_eq!(scores.score(&uid("solo")), 0.0);
    }

    #[test]
    fn test_missing_user_scores_zero() {
        let mut g = TrustGraph::new();
        g.insert(uid("a"), [uid("b")].into_iter().collect());
        let scores = TrustScores::compute(&g, &RankParams::default());
        assert_eq!(scores.score(&uid("nobody")), 0.0);
    }

    #[test]
    fn test_normalised_extremes() {
        let mut g = TrustGraph::new();
        g.insert(uid("a"), [uid("b")].into_iter().collect());
        g.insert(uid("c"), [uid("b")].into_iter().collect());
        let scores = TrustScores::compute(&g, &RankParams::default());
        assert_eq!(scores.score(&uid("b")), 1.0);
        assert_eq!(scores.score(&uid("a")), 0.0);
        assert_eq!(scores.score(&uid("c")), 0.0);
    }

    #[test]
    fn test_uniform_ranks_do_not_divide_by_zero() {
        let mut g = TrustGraph::new();
        g.insert(uid("a"), [uid("b")].into_iter().collect());
        g.insert(uid("b"), [uid("a")].into_iter().collect());
        let scores = TrustScores::compute(&g, &RankParams::default());
        assert_eq!(scores.score(&uid("a")), 0.0);
        assert_eq!(scores.score(&uid("b")), 0.0);
    }
}
