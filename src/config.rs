//! Configuration loading and management.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server identity and gameplay settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Address the gateway listens on.
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    /// World generation settings.
    #[serde(default)]
    pub world: WorldConfig,
    /// Persistence settings.
    #[serde(default)]
    pub data: DataConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            listen: default_listen(),
            world: WorldConfig::default(),
            data: DataConfig::default(),
        }
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// World name shown in notices (e.g., "EmberWorld").
    #[serde(default = "default_name")]
    pub name: String,
    /// Administrator character name. A session whose name matches this
    /// case-insensitively may use the admin verb table.
    #[serde(default = "default_admin")]
    pub admin: String,
    /// Message of the day, sent once per connection before authentication.
    /// Supports `#`-prefixed color markup.
    #[serde(default = "default_motd")]
    pub motd: String,
    /// Scheduler pass interval in milliseconds (default: 100, i.e. 10 Hz).
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            admin: default_admin(),
            motd: default_motd(),
            tick_ms: default_tick_ms(),
        }
    }
}

/// World generation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WorldConfig {
    /// Number of rooms to carve out of the grid at startup.
    #[serde(default = "default_rooms")]
    pub rooms: usize,
    /// Number of items to scatter across the built rooms.
    #[serde(default = "default_items")]
    pub items: usize,
    /// Optional fixed seed for reproducible worlds.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            rooms: default_rooms(),
            items: default_items(),
            seed: None,
        }
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Root directory for player profiles and credentials.
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
        }
    }
}

fn default_listen() -> SocketAddr {
    "0.0.0.0:5002".parse().unwrap_or_else(|_| unreachable!())
}

fn default_name() -> String {
    "EmberWorld".to_string()
}

fn default_admin() -> String {
    "Ember".to_string()
}

fn default_motd() -> String {
    concat!(
        "#y*** Welcome to #REmber#YWorld#y ***#n\n\r",
        "A small world of rooms, trinkets, and the occasional hangman.\n\r",
        "Log in with any name to create a character.\n\r",
    )
    .to_string()
}

fn default_tick_ms() -> u64 {
    100
}

fn default_rooms() -> usize {
    500
}

fn default_items() -> usize {
    60
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
