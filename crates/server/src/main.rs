use std::path::PathBuf;

use clap::Parser;
use scorequest_server::{app, Config};
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, short, env = "SCOREQUEST_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let pool = SqlitePoolOptions::new()
        .connect(&config.database_url)
        .await?;
    scorequest_store::init_schema(&pool).await?;

    tracing::info!(listen = %config.listen, "serving leaderboard");
    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    axum::serve(listener, app(pool)).await?;
    Ok(())
}
