#![deny(missing_docs)]
#![deny(unreachable_pub)]

//! # ScoreQuest Leaderboard Store
//!
//! The data-access layer for the ScoreQuest leaderboard: one SQLite table of
//! per-wallet best scores, with best-score-wins submission, a ranked top-N
//! view, per-wallet rank lookup and a one-way "NFT minted" flag.
//!
//! All operations take the connection pool explicitly; the persistent store is
//! the sole source of truth and is re-read on every call.

/// Error type.
pub mod error;

/// Leaderboard entry model.
pub mod entry;

/// Store operations.
pub mod store;

pub use error::StoreError;
pub use entry::{LeaderboardEntry, PlayerStats, Submission};
pub use store::{init_schema, mark_minted, stats, submit, top};

/// Result type of this crate.
pub type Result<T> = std::result::Result<T, StoreError>;
