//! Courtline - play-by-play basketball statistics backend
//!
//! This library normalizes loosely-typed team, player, and game feeds into
//! a relational store and serves per-player summaries grouped by offensive
//! action type over a small HTTP API.

pub mod cli;
pub mod config;
pub mod ingest;
pub mod server;
pub mod storage;
pub mod summary;

/// Re-export commonly used types
pub use config::AppConfig;
pub use ingest::LoadReport;
pub use storage::Database;
pub use summary::{ActionType, PlayerSummary};

/// Application-wide error type
pub use anyhow::Result;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "courtline";
