use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One row of the `leaderboard` table: a wallet's best score to date.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LeaderboardEntry {
    /// Row id. Not exposed on the wire.
    #[serde(skip)]
    pub id: i64,
    /// Wallet address, exactly 42 characters starting with `0x`. Unique key.
    pub wallet_address: String,
    /// Best score ever submitted by this wallet. Non-negative.
    pub score: i64,
    /// One-way marker set when the external minting process notifies us.
    pub nft_minted: bool,
    /// Set once at first submission.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a score submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// First submission for this wallet; an entry was created.
    Created {
        /// The stored score.
        score: i64,
    },
    /// The submission beat the stored best and replaced it.
    Updated {
        /// The new best score.
        score: i64,
    },
    /// The submission did not beat the stored best; nothing changed.
    Unchanged {
        /// The stored best score.
        best: i64,
        /// The score that was submitted.
        submitted: i64,
    },
}

impl Submission {
    /// The best score on record after this submission.
    pub fn best_score(&self) -> i64 {
        match *self {
            Self::Created { score } | Self::Updated { score } => score,
            Self::Unchanged { best, .. } => best,
        }
    }

    /// Whether the submission set a new best.
    pub fn is_new_best(&self) -> bool {
        !matches!(self, Self::Unchanged { .. })
    }
}

/// A wallet's entry together with its leaderboard rank.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerStats {
    /// The wallet's entry.
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
    /// 1-based rank: one more than the count of entries with a strictly
    /// greater score. Wallets tied at the top all report rank 1.
    pub rank: u32,
}
