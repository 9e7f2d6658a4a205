// SPDX-License-Identifier: Apache-2.0

use crate::ServerError;
use mdverse_query::QueryLimits;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_BIND: &str = "MDVERSE_BIND";
pub const ENV_DB_PATH: &str = "MDVERSE_DB_PATH";
pub const ENV_STATIC_DIR: &str = "MDVERSE_STATIC_DIR";
pub const ENV_SQL_TIMEOUT_MS: &str = "MDVERSE_SQL_TIMEOUT_MS";
pub const ENV_MAX_PAGE_LENGTH: &str = "MDVERSE_MAX_PAGE_LENGTH";
pub const ENV_LOG_JSON: &str = "MDVERSE_LOG_JSON";
pub const ENV_SHUTDOWN_DRAIN_MS: &str = "MDVERSE_SHUTDOWN_DRAIN_MS";
pub const ENV_SQLITE_CACHE_KIB: &str = "MDVERSE_SQLITE_CACHE_KIB";
pub const ENV_SQLITE_MMAP_BYTES: &str = "MDVERSE_SQLITE_MMAP_BYTES";
pub const ENV_MAX_IDLE_CONNECTIONS: &str = "MDVERSE_MAX_IDLE_CONNECTIONS";

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub db_path: PathBuf,
    pub static_dir: PathBuf,
    pub sql_timeout: Duration,
    pub shutdown_drain: Duration,
    pub log_json: bool,
    pub sqlite_pragma_cache_kib: i64,
    pub sqlite_pragma_mmap_bytes: i64,
    pub max_idle_connections: usize,
    pub limits: QueryLimits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            db_path: PathBuf::from("database.db"),
            static_dir: PathBuf::from("static"),
            sql_timeout: Duration::from_millis(5000),
            shutdown_drain: Duration::from_millis(2000),
            log_json: true,
            sqlite_pragma_cache_kib: 32 * 1024,
            sqlite_pragma_mmap_bytes: 256 * 1024 * 1024,
            max_idle_connections: 8,
            limits: QueryLimits::default(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; unparsable values fall back to defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: lookup(ENV_BIND).unwrap_or(defaults.bind_addr),
            db_path: lookup(ENV_DB_PATH).map_or(defaults.db_path, PathBuf::from),
            static_dir: lookup(ENV_STATIC_DIR).map_or(defaults.static_dir, PathBuf::from),
            sql_timeout: env_duration_ms(&lookup, ENV_SQL_TIMEOUT_MS, 5000),
            shutdown_drain: env_duration_ms(&lookup, ENV_SHUTDOWN_DRAIN_MS, 2000),
            log_json: env_bool(&lookup, ENV_LOG_JSON, defaults.log_json),
            sqlite_pragma_cache_kib: env_u64(&lookup, ENV_SQLITE_CACHE_KIB, 32 * 1024) as i64,
            sqlite_pragma_mmap_bytes: env_u64(&lookup, ENV_SQLITE_MMAP_BYTES, 256 * 1024 * 1024)
                as i64,
            max_idle_connections: env_usize(
                &lookup,
                ENV_MAX_IDLE_CONNECTIONS,
                defaults.max_idle_connections,
            ),
            limits: QueryLimits {
                max_page_length: env_u64(
                    &lookup,
                    ENV_MAX_PAGE_LENGTH,
                    defaults.limits.max_page_length,
                ),
                ..defaults.limits
            },
        }
    }
}

fn env_bool(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: bool) -> bool {
    lookup(name)
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> u64 {
    lookup(name)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: usize) -> usize {
    lookup(name)
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default_ms: u64,
) -> Duration {
    Duration::from_millis(env_u64(lookup, name, default_ms))
}

pub fn validate_startup_config(cfg: &ServerConfig) -> Result<(), ServerError> {
    if cfg.bind_addr.parse::<std::net::SocketAddr>().is_err() {
        return Err(ServerError::Config(format!(
            "invalid bind addr {}",
            cfg.bind_addr
        )));
    }
    if cfg.sql_timeout.is_zero() {
        return Err(ServerError::Config("sql timeout must be > 0".to_string()));
    }
    if cfg.limits.max_page_length == 0 || cfg.limits.max_search_len == 0 {
        return Err(ServerError::Config("query limits must be > 0".to_string()));
    }
    if cfg.sqlite_pragma_cache_kib < 0 || cfg.sqlite_pragma_mmap_bytes < 0 {
        return Err(ServerError::Config(
            "sqlite pragma sizes must not be negative".to_string(),
        ));
    }
    if !cfg.db_path.is_file() {
        return Err(ServerError::Config(format!(
            "catalog database not found at {}",
            cfg.db_path.display()
        )));
    }
    Ok(())
}
