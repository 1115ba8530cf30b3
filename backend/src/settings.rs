//! Runtime configuration loaded via OrthoConfig.
//!
//! Values come from `IDTRACK_*` environment variables, command-line flags,
//! or a configuration file, and are read once at startup. The resulting
//! [`AppSettings`] is immutable and handed to the server bootstrap.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::AdminSeed;
use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_ADMIN_FULL_NAME: &str = "System Administrator";
/// Longest accepted token lifetime: one year.
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Configuration values that cannot be turned into runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not a socket address.
    #[error("invalid bind address {value:?}: {message}")]
    BindAddress { value: String, message: String },
    /// Token lifetime must lie between one hour and one year.
    #[error("token TTL must be between 1 and 8760 hours, got {hours}")]
    TokenTtl { hours: i64 },
}

/// Server settings.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "IDTRACK")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. The in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    #[ortho_config(default = 10)]
    pub pool_size: u32,
    /// HS256 signing secret. An ephemeral secret is generated when unset.
    pub token_secret: Option<String>,
    /// Lifetime of issued access tokens.
    #[ortho_config(default = 24)]
    pub token_ttl_hours: i64,
    /// Directory receiving uploaded documents.
    pub upload_dir: Option<PathBuf>,
    /// Origin allowed by CORS. Any origin is allowed when unset.
    pub cors_origin: Option<String>,
    /// Username of the administrator seeded at startup.
    pub admin_username: Option<String>,
    /// Password of the administrator seeded at startup.
    pub admin_password: Option<String>,
    /// Display name of the seeded administrator.
    pub admin_full_name: Option<String>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("pool_size", &self.pool_size)
            .field("token_secret", &self.token_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("upload_dir", &self.upload_dir)
            .field("cors_origin", &self.cors_origin)
            .field("admin_username", &self.admin_username)
            .finish_non_exhaustive()
    }
}

impl AppSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddress`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).trim();
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddress {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Pool configuration when a database URL is set.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| PoolConfig::new(url).with_max_size(self.pool_size))
    }

    /// Access-token lifetime.
    ///
    /// # Errors
    /// Returns [`SettingsError::TokenTtl`] unless the value is between one
    /// hour and one year inclusive.
    pub fn token_ttl(&self) -> Result<Duration, SettingsError> {
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.token_ttl_hours) {
            return Err(SettingsError::TokenTtl {
                hours: self.token_ttl_hours,
            });
        }
        Ok(Duration::hours(self.token_ttl_hours))
    }

    /// Signing secret bytes, if one is configured.
    pub fn token_secret(&self) -> Option<Zeroizing<Vec<u8>>> {
        self.token_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(|secret| Zeroizing::new(secret.as_bytes().to_vec()))
    }

    /// Directory for uploaded documents, `uploads` by default.
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    /// Administrator account to seed, present only when both a username and
    /// password are configured.
    pub fn admin_seed(&self) -> Option<AdminSeed> {
        let username = self.admin_username.as_deref().map(str::trim)?;
        let password = self.admin_password.as_deref()?;
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(AdminSeed {
            username: username.to_owned(),
            full_name: self
                .admin_full_name
                .clone()
                .unwrap_or_else(|| DEFAULT_ADMIN_FULL_NAME.to_owned()),
            password: Zeroizing::new(password.to_owned()),
        })
    }
}
