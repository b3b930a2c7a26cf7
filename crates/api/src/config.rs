use std::time::Duration;

use forgefit_core::autosave::{AutosaveConfig, DEFAULT_AUTOSAVE_DELAY_MS};

use crate::auth::jwt::JwtConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Default idle time before a live session is evicted from memory: 4 hours.
pub const DEFAULT_LIVE_SESSION_IDLE_MINS: u64 = 240;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Per-request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Quiet period before live-session progress is written.
    pub autosave: AutosaveConfig,
    /// Live sessions untouched for this long are dropped from memory.
    pub live_session_idle: Duration,
    /// Token signing and lifetime settings.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `AUTOSAVE_DELAY_MS`       | `30000`                 |
    /// | `LIVE_SESSION_IDLE_MINS`  | `240`                   |
    /// | `JWT_SECRET`              | required                |
    /// | `JWT_ACCESS_EXPIRY_MINS`  | `15`                    |
    /// | `JWT_REFRESH_EXPIRY_DAYS` | `7`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "PORT", 3000u16)?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30u64)?;
        let autosave_delay_ms =
            parse_or(&lookup, "AUTOSAVE_DELAY_MS", DEFAULT_AUTOSAVE_DELAY_MS)?;
        let idle_mins = parse_or(
            &lookup,
            "LIVE_SESSION_IDLE_MINS",
            DEFAULT_LIVE_SESSION_IDLE_MINS,
        )?;
        if idle_mins == 0 {
            return Err(ConfigError::Invalid {
                name: "LIVE_SESSION_IDLE_MINS",
                value: idle_mins.to_string(),
            });
        }

        let jwt = JwtConfig::from_lookup(&lookup)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            autosave: AutosaveConfig {
                delay: Duration::from_millis(autosave_delay_ms),
            },
            live_session_idle: Duration::from_secs(idle_mins * 60),
            jwt,
        })
    }
}

/// Parse `name` from `lookup`, falling back to `default` when unset.
pub(crate) fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = ServerConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.autosave.delay, Duration::from_secs(30));
        assert_eq!(config.live_session_idle, Duration::from_secs(4 * 3600));
        assert_eq!(config.jwt.access_token_expiry_mins, 15);
        assert_eq!(config.jwt.refresh_token_expiry_days, 7);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("PORT", "8080"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("AUTOSAVE_DELAY_MS", "5000"),
            ("LIVE_SESSION_IDLE_MINS", "90"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.autosave.delay, Duration::from_millis(5000));
        assert_eq!(config.live_session_idle, Duration::from_secs(90 * 60));
    }

    #[test]
    fn zero_idle_timeout_is_rejected() {
        let result = ServerConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("LIVE_SESSION_IDLE_MINS", "0"),
        ]));
        assert_matches!(
            result,
            Err(ConfigError::Invalid { name: "LIVE_SESSION_IDLE_MINS", .. })
        );
    }

    #[test]
    fn missing_secret_is_an_error() {
        let result = ServerConfig::from_lookup(lookup_from(&[]));
        assert_matches!(result, Err(ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn malformed_number_is_an_error() {
        let result = ServerConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("AUTOSAVE_DELAY_MS", "soon"),
        ]));
        assert_matches!(
            result,
            Err(ConfigError::Invalid { name: "AUTOSAVE_DELAY_MS", .. })
        );
    }
}
