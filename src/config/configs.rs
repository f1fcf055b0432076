use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub auth: Option<AuthConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }
}

impl EnvConfig for AppConfig {
    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
    /// Emit one JSON object per event instead of the human-readable format.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_idle: u32,
    /// How long an update waits for a row lock before giving up. `0` waits forever.
    pub lock_timeout_ms: u64,
}

impl DatabaseConfig {
    pub fn lock_timeout(&self) -> Option<Duration> {
        (self.lock_timeout_ms > 0).then(|| Duration::from_millis(self.lock_timeout_ms))
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DEFAULT_DATABASE_URL.to_string(),
            max_connections: defaults::DEFAULT_DB_MAX_CONNECTIONS,
            min_idle: defaults::DEFAULT_DB_MIN_IDLE,
            lock_timeout_ms: defaults::DEFAULT_LOCK_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_access_ttl_secs")]
    pub access_ttl_secs: usize,
}

fn default_access_ttl_secs() -> usize {
    defaults::DEFAULT_ACCESS_TTL_SECS
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{AppConfig, DatabaseConfig};

    #[test]
    fn defaults_point_at_local_sqlite() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.general.port, 3000);
        assert!(cfg.database.url.starts_with("sqlite:"));
        assert!(cfg.auth.is_none());
    }

    #[test]
    fn zero_lock_timeout_means_wait_forever() {
        let cfg = DatabaseConfig {
            lock_timeout_ms: 0,
            ..DatabaseConfig::default()
        };
        assert_eq!(cfg.lock_timeout(), None);

        let cfg = DatabaseConfig {
            lock_timeout_ms: 250,
            ..DatabaseConfig::default()
        };
        assert_eq!(cfg.lock_timeout(), Some(Duration::from_millis(250)));
    }
}
