//! Server configuration (§2.3, §6): a typed `{address, db_path}` record
//! loaded from an optional TOML file and `ARC_`-prefixed environment
//! variables, layered over the process defaults via `figment`.

use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default TCP bind address.
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:7432";

/// Typed server configuration -- the only two knobs the core recognizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// TCP bind string, e.g. `0.0.0.0:7432`.
    pub address: String,
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            db_path: default_db_path(),
        }
    }
}

/// Failures while loading configuration from file or environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl Config {
    /// Loads configuration, layering lowest to highest precedence: built-in
    /// defaults, an optional TOML file at `path` (missing file is not an
    /// error -- `Toml::file` merges in nothing), then `ARC_ADDRESS` /
    /// `ARC_DB_PATH` environment variables.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("ARC_"))
            .extract()?;
        Ok(config)
    }
}

/// `~/.arc/data.db`, expanding against `$HOME` (falling back to the current
/// directory if unset).
fn default_db_path() -> PathBuf {
    let home = std::env::var("HOME").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("."));
    home.join(".arc").join("data.db")
}
