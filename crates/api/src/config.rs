use std::str::FromStr;

/// Error raised when an environment variable holds an unusable value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be set")]
    Missing { name: &'static str },

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Server configuration loaded from environment variables.
///
/// Secrets (`DATABASE_URL`, `ENCRYPTION_KEY`) are read separately at
/// startup and never stored here.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum pool size (default: `10`).
    pub db_max_connections: u32,
    /// Startup connection attempts (default: `5`).
    pub db_connect_attempts: u32,
    /// Initial retry delay in milliseconds, doubled per attempt (default: `500`).
    pub db_retry_delay_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            cors_origins: vec!["*".into()],
            request_timeout_secs: 30,
            db_max_connections: 10,
            db_connect_attempts: 5,
            db_retry_delay_ms: 500,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `HOST`                 | `0.0.0.0` |
    /// | `PORT`                 | `8000`    |
    /// | `CORS_ORIGINS`         | `*`       |
    /// | `REQUEST_TIMEOUT_SECS` | `30`      |
    /// | `DB_MAX_CONNECTIONS`   | `10`      |
    /// | `DB_CONNECT_ATTEMPTS`  | `5`       |
    /// | `DB_RETRY_DELAY_MS`    | `500`     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) => parse_origins(&raw),
            None => defaults.cors_origins,
        };

        Ok(Self {
            host,
            port: parse_or(&lookup, "PORT", defaults.port)?,
            cors_origins,
            request_timeout_secs: parse_or(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            db_max_connections: parse_or(
                &lookup,
                "DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
            db_connect_attempts: parse_or(
                &lookup,
                "DB_CONNECT_ATTEMPTS",
                defaults.db_connect_attempts,
            )?,
            db_retry_delay_ms: parse_or(&lookup, "DB_RETRY_DELAY_MS", defaults.db_retry_delay_ms)?,
        })
    }

    /// Whether CORS should accept any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }

    /// Pool settings derived from the `DB_*` variables.
    pub fn pool_config(&self) -> lawmox_db::PoolConfig {
        lawmox_db::PoolConfig {
            max_connections: self.db_max_connections,
            connect_attempts: self.db_connect_attempts,
            retry_delay: std::time::Duration::from_millis(self.db_retry_delay_ms),
            ..Default::default()
        }
    }
}

/// Read a required variable, failing when it is unset or blank.
pub fn require_env(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing { name }),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
