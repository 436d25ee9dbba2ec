//! Service configuration parsed from environment variables.

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_REMOVAL_API_URL: &str = "http://localhost:7000/remove-background";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:4200";
pub const DEFAULT_REMOVAL_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_PROBE_MAX_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;
pub const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 60 * 60;
pub const DEFAULT_SESSION_SWEEP_SECS: u64 = 60;

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set but its value could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: String, value: String },
}

impl ConfigError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "E_CONFIG_INVALID",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub removal_secs: u64,
    pub probe_secs: u64,
    pub connect_secs: u64,
}

/// Bounds on the in-memory session map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub max_sessions: usize,
    /// Sessions idle for longer than this are evicted.
    pub idle_ttl_secs: u64,
    /// How often the eviction sweep runs.
    pub sweep_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub removal_api_url: String,
    pub cors_origin: String,
    pub timeouts: Timeouts,
    pub sessions: SessionLimits,
    pub probe_max_bytes: usize,
    /// Let the image probe fetch loopback, private and link-local hosts.
    /// Off outside local development.
    pub probe_allow_private_hosts: bool,
    pub upload_max_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            removal_api_url: DEFAULT_REMOVAL_API_URL.to_string(),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            timeouts: Timeouts {
                removal_secs: DEFAULT_REMOVAL_TIMEOUT_SECS,
                probe_secs: DEFAULT_PROBE_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            sessions: SessionLimits {
                max_sessions: DEFAULT_MAX_SESSIONS,
                idle_ttl_secs: DEFAULT_SESSION_IDLE_TTL_SECS,
                sweep_secs: DEFAULT_SESSION_SWEEP_SECS,
            },
            probe_max_bytes: DEFAULT_PROBE_MAX_BYTES,
            probe_allow_private_hosts: false,
            upload_max_bytes: DEFAULT_UPLOAD_MAX_BYTES,
        }
    }
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 5000
    /// - `REMOVAL_API_URL`: background-removal endpoint (falls back to `PYTHON_API`)
    /// - `CORS_ORIGIN`: allowed frontend origin, default `http://localhost:4200`
    /// - `REMOVAL_TIMEOUT_SECS`: default 60
    /// - `PROBE_TIMEOUT_SECS`: default 15
    /// - `HTTP_CONNECT_TIMEOUT_SECS`: default 10
    /// - `PROBE_MAX_BYTES`: default 20 MiB
    /// - `PROBE_ALLOW_PRIVATE_HOSTS`: default false
    /// - `MAX_SESSIONS`: default 10000
    /// - `SESSION_IDLE_TTL_SECS`: default 3600
    /// - `SESSION_SWEEP_SECS`: default 60
    /// - `UPLOAD_MAX_BYTES`: default 20 MiB
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a numeric variable is set but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let removal_api_url = std::env::var("REMOVAL_API_URL")
            .or_else(|_| std::env::var("PYTHON_API"))
            .unwrap_or(defaults.removal_api_url);
        let cors_origin = std::env::var("CORS_ORIGIN")
            .unwrap_or(defaults.cors_origin)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            port: env_parse("PORT", defaults.port)?,
            removal_api_url,
            cors_origin,
            timeouts: Timeouts {
                removal_secs: env_parse("REMOVAL_TIMEOUT_SECS", defaults.timeouts.removal_secs)?,
                probe_secs: env_parse("PROBE_TIMEOUT_SECS", defaults.timeouts.probe_secs)?,
                connect_secs: env_parse("HTTP_CONNECT_TIMEOUT_SECS", defaults.timeouts.connect_secs)?,
            },
            sessions: SessionLimits {
                max_sessions: env_parse("MAX_SESSIONS", defaults.sessions.max_sessions)?,
                idle_ttl_secs: env_parse("SESSION_IDLE_TTL_SECS", defaults.sessions.idle_ttl_secs)?,
                sweep_secs: env_parse("SESSION_SWEEP_SECS", defaults.sessions.sweep_secs)?,
            },
            probe_max_bytes: env_parse("PROBE_MAX_BYTES", defaults.probe_max_bytes)?,
            probe_allow_private_hosts: env_parse("PROBE_ALLOW_PRIVATE_HOSTS", defaults.probe_allow_private_hosts)?,
            upload_max_bytes: env_parse("UPLOAD_MAX_BYTES", defaults.upload_max_bytes)?,
        })
    }
}

fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var: key.to_string(), value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
