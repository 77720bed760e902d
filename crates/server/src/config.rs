use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Server configuration, merged from defaults, an optional TOML file and
/// `SCOREQUEST_`-prefixed environment variables (env wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address to serve on.
    pub listen: SocketAddr,
    /// Database URL for the leaderboard store.
    pub database_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: (Ipv4Addr::LOCALHOST, 8080).into(),
            database_url: "sqlite://scorequest.db?mode=rwc".to_string(),
        }
    }
}

impl Config {
    /// Load the configuration, optionally layering `path` on top of the
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("SCOREQUEST_")).extract()
    }
}
