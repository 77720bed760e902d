/// Error type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Malformed or missing input. Always client-correctable.
    #[error("{0}")]
    Validation(String),
    /// The referenced wallet has no leaderboard entry.
    #[error("Player not found in leaderboard")]
    NotFound,
    /// Persistence-layer failure.
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Create a validation error.
    pub fn validation(msg: impl ToString) -> Self {
        Self::Validation(msg.to_string())
    }
}
