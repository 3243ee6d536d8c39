//! The trust oracle.
//!
//! Users trust other users; the resulting directed graph is ranked with a
//! damped random walk (PageRank) and the ranks are min-max normalised into
//! trust scores in `[0, 1]`.
//!
//! ```text
//! TrustGraph ──page_rank──▶ TrustRanking ──normalise──▶ TrustScores
//! ```

pub mod rank;
pub mod scores;

pub use rank::{page_rank, RankParams, TrustRanking};
pub use scores::TrustScores;
