use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::{LeaderboardEntry, PlayerStats, Result, StoreError, Submission};

/// Expected length of a wallet address, `0x` prefix included.
pub const WALLET_ADDRESS_LEN: usize = 42;

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS leaderboard (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    wallet_address TEXT NOT NULL UNIQUE,
    score INTEGER NOT NULL DEFAULT 0,
    nft_minted BOOLEAN NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS leaderboard_score_idx ON leaderboard (score DESC);
";

/// Create the `leaderboard` table if it does not exist. Idempotent; run once
/// at startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

fn validate_wallet(wallet: &str) -> Result<()> {
    if !wallet.starts_with("0x") || wallet.len() != WALLET_ADDRESS_LEN {
        return Err(StoreError::validation("Invalid wallet address format"));
    }
    Ok(())
}

/// Record a score for `wallet`, keeping the best score ever submitted.
///
/// The insert-or-improve is a single conditional upsert so that two
/// concurrent submissions for the same wallet cannot race a stale read: the
/// lower score loses the `WHERE excluded.score > leaderboard.score` condition
/// no matter the interleaving.
pub async fn submit(pool: &SqlitePool, wallet: &str, score: i64) -> Result<Submission> {
    validate_wallet(wallet)?;
    if score < 0 {
        return Err(StoreError::validation("Score must be a non-negative integer"));
    }

    let now = Utc::now();
    let written = sqlx::query_as::<_, (i64, DateTime<Utc>)>(
        "INSERT INTO leaderboard (wallet_address, score, nft_minted, created_at, updated_at)
         VALUES (?1, ?2, 0, ?3, ?3)
         ON CONFLICT (wallet_address) DO UPDATE
         SET score = excluded.score, updated_at = excluded.updated_at
         WHERE excluded.score > leaderboard.score
         RETURNING score, created_at",
    )
    .bind(wallet)
    .bind(score)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    let submission = match written {
        // An insert stamps both timestamps with the instant we passed, so a
        // returned `created_at` equal to it means the row is new.
        Some((score, created_at)) if created_at == now => Submission::Created { score },
        Some((score, _)) => Submission::Updated { score },
        // Condition failed: the submission did not beat the stored best.
        // Nothing was written, so a plain read suffices here.
        None => {
            let (best,) =
                sqlx::query_as::<_, (i64,)>("SELECT score FROM leaderboard WHERE wallet_address = ?1")
                    .bind(wallet)
                    .fetch_one(pool)
                    .await?;
            Submission::Unchanged {
                best,
                submitted: score,
            }
        }
    };

    tracing::debug!(wallet, score, ?submission, "score submitted");
    Ok(submission)
}

/// The top `n` entries by score, descending. Tie order beyond the score is
/// the storage's natural order and is not a contracted guarantee.
pub async fn top(pool: &SqlitePool, n: u32) -> Result<Vec<LeaderboardEntry>> {
    let entries = sqlx::query_as::<_, LeaderboardEntry>(
        "SELECT id, wallet_address, score, nft_minted, created_at, updated_at
         FROM leaderboard ORDER BY score DESC LIMIT ?1",
    )
    .bind(n)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Mark that `wallet` has minted its NFT. The flag only ever goes from false
/// to true; re-marking an already-minted wallet is a no-op success.
pub async fn mark_minted(pool: &SqlitePool, wallet: &str) -> Result<()> {
    let result = sqlx::query(
        "UPDATE leaderboard SET nft_minted = 1, updated_at = ?2 WHERE wallet_address = ?1",
    )
    .bind(wallet)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    tracing::debug!(wallet, "nft minted");
    Ok(())
}

/// A wallet's entry together with its rank: one more than the count of
/// entries with a strictly greater score.
pub async fn stats(pool: &SqlitePool, wallet: &str) -> Result<PlayerStats> {
    let entry = sqlx::query_as::<_, LeaderboardEntry>(
        "SELECT id, wallet_address, score, nft_minted, created_at, updated_at
         FROM leaderboard WHERE wallet_address = ?1",
    )
    .bind(wallet)
    .fetch_optional(pool)
    .await?
    .ok_or(StoreError::NotFound)?;

    let (higher,) = sqlx::query_as::<_, (u32,)>("SELECT COUNT(*) FROM leaderboard WHERE score > ?1")
        .bind(entry.score)
        .fetch_one(pool)
        .await?;

    Ok(PlayerStats {
        entry,
        rank: higher + 1,
    })
}
