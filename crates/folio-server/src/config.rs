//! Server configuration for Folio.
//!
//! Every setting is resolved once at startup, here, and injected into the
//! handlers through [`crate::state::AppState`]. An empty variable counts as
//! unset.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use folio_core::token::TokenSecret;
use folio_storage::DEFAULT_CONNECT_TIMEOUT;

/// Default admin credential when `ADMIN_PASSWORD` is unset.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Last-resort token secret, only reachable with the legacy fallback enabled.
const BUILT_IN_TOKEN_SECRET: &str = "folio-legacy-token-secret";

const DEFAULT_PORT: u16 = 3000;

/// Configuration errors detected at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No token secret is configured and the legacy fallback is off.
    #[error(
        "FOLIO_TOKEN_SECRET is not set (set it, or FOLIO_LEGACY_SECRET_FALLBACK=true to derive one)"
    )]
    MissingTokenSecret,

    /// A variable is set to something unparseable.
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Supported storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// In-memory (development only, data lost on restart).
    Memory,
    /// `MongoDB`, one document in one collection.
    MongoDb,
}

/// Which source supplied the token secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    /// `FOLIO_TOKEN_SECRET`.
    Explicit,
    /// The store connection string (legacy fallback).
    ConnectionString,
    /// The built-in string (legacy fallback).
    BuiltIn,
}

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Storage backend type.
    pub storage: StorageKind,
    /// Store connection string.
    pub store_uri: Option<String>,
    /// Database name.
    pub database: String,
    /// Collection holding the portfolio document.
    pub collection: String,
    /// Bound on a single connection attempt.
    pub connect_timeout: Duration,
    /// Default admin credential.
    pub admin_password: String,
    /// Whether `ADMIN_PASSWORD` was set explicitly.
    pub admin_password_set: bool,
    /// Token-signing secret.
    pub token_secret: TokenSecret,
    /// Where the token secret came from.
    pub secret_source: SecretSource,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `FOLIO_BIND_ADDR`: full bind address (default: `127.0.0.1:3000`)
    /// - `PORT`: port to bind on `0.0.0.0` when `FOLIO_BIND_ADDR` is unset
    /// - `FOLIO_STORAGE`: `mongodb` or `memory` (default: `mongodb`)
    /// - `MONGODB_URI`: store connection string
    /// - `MONGODB_DB`: database name (default: `portfolio`)
    /// - `FOLIO_COLLECTION`: collection name (default: `sitedata`)
    /// - `FOLIO_CONNECT_TIMEOUT_MS`: connection attempt bound (default: `5000`)
    /// - `ADMIN_PASSWORD`: default admin credential (default: `admin123`)
    /// - `FOLIO_TOKEN_SECRET`: token-signing secret (required)
    /// - `FOLIO_LEGACY_SECRET_FALLBACK`: derive a missing secret from `MONGODB_URI`,
    ///   then a built-in string (default: `false`)
    /// - `FOLIO_LOG_LEVEL`: log filter (default: `info`)
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingTokenSecret`] if no secret can be resolved.
    /// - [`ConfigError::Invalid`] if an address, port, storage kind or timeout
    ///   does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        // Priority: FOLIO_BIND_ADDR > PORT > default 127.0.0.1:3000
        let bind_addr = if let Some(addr) = var("FOLIO_BIND_ADDR") {
            addr.parse().map_err(|e| ConfigError::Invalid {
                name: "FOLIO_BIND_ADDR",
                reason: format!("{e}"),
            })?
        } else if let Some(port) = var("PORT") {
            let port: u16 = port.parse().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: format!("{e}"),
            })?;
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT))
        };

        let storage = match var("FOLIO_STORAGE")
            .unwrap_or_else(|| "mongodb".to_owned())
            .to_lowercase()
            .as_str()
        {
            "mongodb" | "mongo" => StorageKind::MongoDb,
            "memory" => StorageKind::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    name: "FOLIO_STORAGE",
                    reason: format!("unknown backend '{other}'"),
                });
            }
        };

        let connect_timeout = match var("FOLIO_CONNECT_TIMEOUT_MS") {
            Some(ms) => Duration::from_millis(ms.parse().map_err(|e| ConfigError::Invalid {
                name: "FOLIO_CONNECT_TIMEOUT_MS",
                reason: format!("{e}"),
            })?),
            None => DEFAULT_CONNECT_TIMEOUT,
        };

        let store_uri = var("MONGODB_URI");
        let admin_env = var("ADMIN_PASSWORD");
        let legacy_fallback = var("FOLIO_LEGACY_SECRET_FALLBACK")
            .is_some_and(|v| v == "true" || v == "1");

        let (token_secret, secret_source) =
            resolve_token_secret(var("FOLIO_TOKEN_SECRET"), store_uri.as_deref(), legacy_fallback)?;

        Ok(Self {
            bind_addr,
            storage,
            store_uri,
            database: var("MONGODB_DB").unwrap_or_else(|| "portfolio".to_owned()),
            collection: var("FOLIO_COLLECTION").unwrap_or_else(|| "sitedata".to_owned()),
            connect_timeout,
            admin_password_set: admin_env.is_some(),
            admin_password: admin_env.unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_owned()),
            token_secret,
            secret_source,
            log_level: var("FOLIO_LOG_LEVEL").unwrap_or_else(|| "info".to_owned()),
        })
    }
}

/// Resolve the token secret through its ordered sources.
fn resolve_token_secret(
    explicit: Option<String>,
    store_uri: Option<&str>,
    legacy_fallback: bool,
) -> Result<(TokenSecret, SecretSource), ConfigError> {
    if let Some(secret) = explicit {
        return Ok((TokenSecret::new(secret), SecretSource::Explicit));
    }
    if !legacy_fallback {
        return Err(ConfigError::MissingTokenSecret);
    }
    Ok(match store_uri {
        Some(uri) => (TokenSecret::new(uri), SecretSource::ConnectionString),
        None => (TokenSecret::new(BUILT_IN_TOKEN_SECRET), SecretSource::BuiltIn),
    })
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("storage", &self.storage)
            .field("store_uri", &self.store_uri.as_ref().map(|_| "[redacted]"))
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("connect_timeout", &self.connect_timeout)
            .field("admin_password", &"[REDACTED]")
            .field("token_secret", &self.token_secret)
            .field("secret_source", &self.secret_source)
            .field("log_level", &self.log_level)
            .finish()
    }
}
