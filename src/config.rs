//! Application configuration
//!
//! Loaded from a TOML file, `~/.config/venue-booking/config.toml` by default
//! or the path in `BOOKING_CONFIG`. Every key is optional.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! shutdown_timeout = 30
//!
//! [database]
//! url = "sqlite://./venue-booking.db?mode=rwc"
//!
//! [logging]
//! level = "info"
//! format = "text"        # or "json"
//!
//! [booking]
//! lock_timeout_ms = 2000
//! cancellation_policy = "void"   # or "delete"
//! storage = "database"           # or "memory"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::booking::CancellationPolicy;
use crate::infrastructure::database::{DatabaseConfig, DEFAULT_DATABASE_URL};

pub const CONFIG_ENV: &str = "BOOKING_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
}

impl DatabaseSettings {
    /// `DATABASE_URL` wins over the file, the file over the built-in default.
    pub fn connection_url(&self) -> String {
        std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.url.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
    }

    pub fn to_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.connection_url(),
            max_connections: self.max_connections,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Database,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Longest wait for a venue/event lock before answering "busy"
    pub lock_timeout_ms: u64,
    pub cancellation_policy: CancellationPolicy,
    pub storage: StorageBackend,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: 2_000,
            cancellation_policy: CancellationPolicy::Void,
            storage: StorageBackend::Database,
        }
    }
}

impl BookingConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub logging: LoggingConfig,
    pub booking: BookingConfig,
}

impl AppConfig {
    /// Read `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw)
    }

    /// Startup load. `strict` (used by `--check`) propagates a bad file;
    /// otherwise the defaults come back together with the error to report.
    pub fn load_for_startup(
        path: &Path,
        strict: bool,
    ) -> Result<(Self, Option<ConfigError>), ConfigError> {
        match Self::load(path) {
            Ok(cfg) => Ok((cfg, None)),
            Err(e) if strict => Err(e),
            Err(e) => Ok((Self::default(), Some(e))),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Write the config, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = toml::to_string_pretty(self)?;
        std::fs::write(path, body).map_err(io_err)
    }
}

/// `BOOKING_CONFIG`, else `<config dir>/venue-booking/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("venue-booking")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::parse("").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.booking.lock_timeout(), Duration::from_secs(2));
        assert_eq!(cfg.booking.cancellation_policy, CancellationPolicy::Void);
        assert_eq!(cfg.booking.storage, StorageBackend::Database);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::parse(
            r#"
            [server]
            port = 9090

            [booking]
            cancellation_policy = "delete"
            storage = "memory"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.booking.cancellation_policy, CancellationPolicy::Delete);
        assert_eq!(cfg.booking.storage, StorageBackend::Memory);
        assert_eq!(cfg.booking.lock_timeout_ms, 2_000);
        assert_eq!(cfg.logging.format, "text");
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(matches!(
            AppConfig::parse("[booking]\ncancellation_policy = \"refund\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(AppConfig::parse("not = [valid").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join(format!("vb-missing-{}.toml", uuid::Uuid::new_v4()));
        assert_eq!(AppConfig::load(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn strict_startup_load_rejects_a_malformed_file() {
        let dir = std::env::temp_dir().join(format!("vb-bad-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[server]\nport = \"not a number\"").unwrap();

        assert!(matches!(
            AppConfig::load_for_startup(&path, true),
            Err(ConfigError::Parse(_))
        ));

        let (cfg, err) = AppConfig::load_for_startup(&path, false).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert!(matches!(err, Some(ConfigError::Parse(_))));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = std::env::temp_dir().join(format!("vb-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.server.port = 8181;
        cfg.database.url = Some("sqlite::memory:".into());
        cfg.booking.lock_timeout_ms = 750;

        cfg.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), cfg);
        let _ = std::fs::remove_dir_all(dir);
    }
}
