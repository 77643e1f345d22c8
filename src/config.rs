//! Runtime configuration read from environment variables.
//!
//! | Variable                   | Default         |
//! |----------------------------|-----------------|
//! | `DATABASE_URL`             | required        |
//! | `TASKMANAGER_UPLOAD_DIR`   | `/data/uploads` |
//! | `TASKMANAGER_DB_POOL_SIZE` | `4`             |

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Environment variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Environment variable holding the image upload directory.
pub const UPLOAD_DIR_VAR: &str = "TASKMANAGER_UPLOAD_DIR";
/// Environment variable holding the connection pool size.
pub const POOL_SIZE_VAR: &str = "TASKMANAGER_DB_POOL_SIZE";

/// Upload directory used when none is configured.
pub const DEFAULT_UPLOAD_DIR: &str = "/data/uploads";
/// Pool size used when none is configured.
pub const DEFAULT_POOL_SIZE: u32 = 4;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable holds a value that cannot be used.
    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Rejected value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    database_url: String,
    upload_dir: Utf8PathBuf,
    pool_size: u32,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through a lookup function.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `DATABASE_URL` is absent and
    /// [`ConfigError::Invalid`] when the pool size is not a positive integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let database_url = read(DATABASE_URL_VAR).ok_or(ConfigError::Missing(DATABASE_URL_VAR))?;
        let upload_dir = read(UPLOAD_DIR_VAR)
            .map_or_else(|| Utf8PathBuf::from(DEFAULT_UPLOAD_DIR), Utf8PathBuf::from);
        let pool_size = match read(POOL_SIZE_VAR) {
            Some(raw) => parse_pool_size(raw)?,
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            database_url,
            upload_dir,
            pool_size,
        })
    }

    /// Returns the `PostgreSQL` connection URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the image upload directory.
    #[must_use]
    pub fn upload_dir(&self) -> &Utf8Path {
        &self.upload_dir
    }

    /// Returns the maximum number of pooled connections.
    #[must_use]
    pub const fn pool_size(&self) -> u32 {
        self.pool_size
    }
}

fn parse_pool_size(raw: String) -> Result<u32, ConfigError> {
    match raw.parse::<u32>() {
        Ok(0) => Err(ConfigError::Invalid {
            key: POOL_SIZE_VAR,
            value: raw,
            reason: "must be greater than zero".to_owned(),
        }),
        Ok(size) => Ok(size),
        Err(err) => Err(ConfigError::Invalid {
            key: POOL_SIZE_VAR,
            value: raw,
            reason: err.to_string(),
        }),
    }
}
