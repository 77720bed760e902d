//! # ScoreQuest Leaderboard Server
//!
//! Thin HTTP/JSON transport over [`scorequest_store`]: four endpoints, one
//! table. See [`app`] for the router.

/// Server configuration.
pub mod config;

/// Route handlers.
pub mod routes;

pub use config::Config;
pub use routes::app;
