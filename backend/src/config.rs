//! Server configuration

use crate::error::ConfigError;
use std::env;
use std::net::SocketAddr;
use tracing::info;

/// Where tasks and sessions are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Redis at `redis_url`
    Redis,
    /// Process memory, lost on restart
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub redis_url: String,
    pub storage_backend: StorageBackend,
    /// Directory holding the built frontend.
    pub static_dir: String,
    pub session_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            storage_backend: StorageBackend::Redis,
            static_dir: "frontend/dist".to_string(),
            session_ttl_secs: 60 * 60 * 24,
        }
    }
}

impl Config {
    /// Defaults overridden by whichever environment variables are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("BIND_ADDR") {
            config.bind_addr = val
                .parse()
                .map_err(|e| ConfigError(format!("Invalid BIND_ADDR: {}", e)))?;
        }

        if let Some(val) = lookup("REDIS_URL") {
            config.redis_url = val;
        }

        if let Some(val) = lookup("STORAGE_BACKEND") {
            config.storage_backend = match val.to_lowercase().as_str() {
                "redis" => StorageBackend::Redis,
                "memory" => StorageBackend::Memory,
                _ => {
                    return Err(ConfigError(format!("Invalid STORAGE_BACKEND: {}", val)));
                }
            };
        }

        if let Some(val) = lookup("STATIC_DIR") {
            config.static_dir = val;
        }

        if let Some(val) = lookup("SESSION_TTL_SECS") {
            config.session_ttl_secs = val
                .parse()
                .map_err(|e| ConfigError(format!("Invalid SESSION_TTL_SECS: {}", e)))?;
        }

        config.validate()?;
        info!(
            "Loaded config: bind={}, storage={:?}",
            config.bind_addr, config.storage_backend
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_ttl_secs == 0 {
            return Err(ConfigError(
                "Session TTL must be greater than 0".to_string(),
            ));
        }

        if self.storage_backend == StorageBackend::Redis && self.redis_url.is_empty() {
            return Err(ConfigError(
                "REDIS_URL is required for the redis backend".to_string(),
            ));
        }

        Ok(())
    }
}
