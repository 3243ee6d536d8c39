//! Damped random-walk ranking over a directed trust graph.

use nqg_types::{TrustGraph, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Parameters of the power iteration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankParams {
    /// Probability of following an edge rather than teleporting.
    pub damping: f64,
    /// Per-node L1 convergence tolerance.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for RankParams {
    fn default() -> Self {
        Self {
            damping: 0.85,
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

/// Raw (un-normalised) ranks. Values sum to 1 over all nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct TrustRanking {
    pub ranks: BTreeMap<UserId, f64>,
    pub iterations: usize,
    pub converged: bool,
}

/// Rank every node of `graph`.
///
/// Nodes are all trusters plus all trusted users. Self-trust edges are
/// ignored. Dangling nodes (no outgoing trust) spread their mass uniformly.
/// If the iteration cap is hit the last iterate is returned with
/// `converged == false`.
pub fn page_rank(graph: &TrustGraph, params: &RankParams) -> TrustRanking {
    let mut nodes: BTreeSet<&UserId> = BTreeSet::new();
    for (truster, trusted) in graph {
        nodes.insert(truster);
        nodes.extend(trusted.iter());
    }
    let n = nodes.len();
    if n == 0 {
        return TrustRanking {
            ranks: BTreeMap::new(),
            iterations: 0,
            converged: true,
        };
    }

    let index: BTreeMap<&UserId, usize> = nodes.iter().enumerate().map(|(i, u)| (*u, i)).collect();
    let mut out_edges: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (truster, trusted) in graph {
        let from = index[truster];
        for target in trusted {
            if target != truster {
                out_edges[from].push(index[target]);
            }
        }
    }

    let uniform = 1.0 / n as f64;
    let alpha = params.damping;
    let mut x = vec![uniform; n];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < params.max_iterations {
        iterations += 1;
        let last = std::mem::replace(&mut x, vec![0.0; n]);

        let dangling_sum: f64 = out_edges
            .iter()
            .zip(&last)
            .filter(|(edges, _)| edges.is_empty())
            .map(|(_, mass)| mass)
            .sum::<f64>()
            * alpha;

        for (from, edges) in out_edges.iter().enumerate() {
            if edges.is_empty() {
                continue;
            }
            let share = alpha * last[from] / edges.len() as f64;
            for &to in edges {
                x[to] += share;
            }
        }
        let base = dangling_sum * uniform + (1.0 - alpha) * uniform;
        for value in x.iter_mut() {
            *value += base;
        }

        let err: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if err < n as f64 * params.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        tracing::warn!(iterations, nodes = n, "trust ranking hit the iteration cap");
    }

    TrustRanking {
        ranks: nodes.into_iter().cloned().zip(x).collect(),
        iterations,
        converged,
    }
}
