//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Unset or unparsable values fall back to
//! the defaults listed on each field.

use std::net::SocketAddr;

use crate::store::AuthorDeletePolicy;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Connection settings for the PostgreSQL store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string.
    pub url: String,
    /// Maximum number of pooled connections (default 10).
    pub max_connections: u32,
    /// Minimum idle connections (default 1).
    pub min_connections: u32,
    /// Seconds to wait when acquiring a connection (default 5).
    pub connect_timeout_secs: u64,
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`BlogConfig::from_env`].
#[derive(Debug, Clone)]
pub struct BlogConfig {
    /// Socket address to bind the HTTP server to (default `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,

    /// Database settings; `None` when `DATABASE_URL` is unset or
    /// `PERSISTENCE_ENABLED` is false, in which case the in-memory store is
    /// used.
    pub database: Option<DatabaseConfig>,

    /// Apply embedded migrations at startup (default `true`).
    pub run_migrations: bool,

    /// Fate of an author's posts when the author is deleted.
    pub author_delete_policy: AuthorDeletePolicy,

    /// Path prefix for the JSON API, e.g. `/api` (default: none).
    pub api_prefix: String,

    /// Allow cross-origin requests from any origin (default `true`).
    pub cors_permissive: bool,

    /// Log output format (default pretty).
    pub log_format: LogFormat,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            database: None,
            run_migrations: true,
            author_delete_policy: AuthorDeletePolicy::Cascade,
            api_prefix: String::new(),
            cors_permissive: true,
            log_format: LogFormat::Pretty,
        }
    }
}

impl BlogConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as a
    /// [`SocketAddr`], or if `AUTHOR_DELETE_POLICY` names an unknown policy.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr: SocketAddr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.listen_addr,
        };

        let persistence_enabled = parse_env_bool("PERSISTENCE_ENABLED", true);
        let database = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| persistence_enabled && !url.trim().is_empty())
            .map(|url| DatabaseConfig {
                url,
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10),
                min_connections: parse_env("DATABASE_MIN_CONNECTIONS", 1),
                connect_timeout_secs: parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5),
            });

        let author_delete_policy = match std::env::var("AUTHOR_DELETE_POLICY") {
            Ok(raw) => raw.parse::<AuthorDeletePolicy>()?,
            Err(_) => defaults.author_delete_policy,
        };

        let api_prefix = normalize_prefix(&std::env::var("API_PREFIX").unwrap_or_default());

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            listen_addr,
            database,
            run_migrations: parse_env_bool("RUN_MIGRATIONS", defaults.run_migrations),
            author_delete_policy,
            api_prefix,
            cors_permissive: parse_env_bool("CORS_PERMISSIVE", defaults.cors_permissive),
            log_format,
        })
    }
}

/// Turns `api`, `/api/` or `/api` into `/api`; blank or `/` into the empty
/// string.
#[must_use]
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => true,
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => false,
        _ => default,
    }
}
