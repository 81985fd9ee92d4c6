//! Application configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Top-level configuration, read from a TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path of the SQLite database file
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Locations of the three source collections
    #[serde(default)]
    pub sources: SourceConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Source file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_teams")]
    pub teams: PathBuf,

    #[serde(default = "default_players")]
    pub players: PathBuf,

    #[serde(default = "default_games")]
    pub games: PathBuf,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Pin CORS to one origin; all origins are allowed when unset
    pub cors_origin: Option<String>,
}

fn default_database() -> PathBuf {
    PathBuf::from("courtline.db")
}

fn default_teams() -> PathBuf {
    PathBuf::from("teams.json")
}

fn default_players() -> PathBuf {
    PathBuf::from("players.json")
}

fn default_games() -> PathBuf {
    PathBuf::from("games.json")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            sources: SourceConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            teams: default_teams(),
            players: default_players(),
            games: default_games(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the given file or return defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: AppConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }
}

impl ServerConfig {
    /// Resolve the listen address
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}
