//! Application configuration.
//!
//! Values come from `config.toml` first, then the environment (a `.env`
//! file is loaded if present), then built-in defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ==================== Config File ====================

const CONFIG_FILE: &str = "config.toml";

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
    server: Option<ServerConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerConfig {
    addr: Option<String>,
    port: Option<u16>,
}

fn load_config_file(path: &Path) -> AppConfig {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return AppConfig::default();
    };
    match toml::from_str::<AppConfig>(&contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring malformed {}: {}", path.display(), e);
            AppConfig::default()
        }
    }
}

// ==================== Database Configuration ====================

/// Default database location relative to the working directory
pub const DEFAULT_DB_PATH: &str = "data/problems.db";

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();
    let config = load_config_file(Path::new(CONFIG_FILE));
    resolve_database_path(&config, std::env::var("DATABASE_PATH").ok())
}

fn resolve_database_path(config: &AppConfig, env_path: Option<String>) -> PathBuf {
    // Priority 1: config.toml
    if let Some(path) = config.database.as_ref().and_then(|db| db.path.clone()) {
        tracing::info!("Using database from config.toml: {}", path);
        return PathBuf::from(path);
    }

    // Priority 2: .env DATABASE_PATH
    if let Some(path) = env_path {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    let default = PathBuf::from(DEFAULT_DB_PATH);
    tracing::info!("Using default database path: {}", default.display());
    default
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Full server bind address; `PORT` overrides the configured port
pub fn server_bind_addr() -> String {
    let _ = dotenvy::dotenv();
    let config = load_config_file(Path::new(CONFIG_FILE));
    resolve_bind_addr(&config, std::env::var("PORT").ok())
}

fn resolve_bind_addr(config: &AppConfig, env_port: Option<String>) -> String {
    let server = config.server.as_ref();
    let addr = server
        .and_then(|s| s.addr.clone())
        .unwrap_or_else(|| SERVER_ADDR.to_string());

    let env_port = env_port.and_then(|p| match p.parse::<u16>() {
        Ok(port) => Some(port),
        Err(_) => {
            tracing::warn!("Ignoring invalid PORT value: {}", p);
            None
        }
    });
    let port = env_port
        .or_else(|| server.and_then(|s| s.port))
        .unwrap_or(SERVER_PORT);

    format!("{}:{}", addr, port)
}
