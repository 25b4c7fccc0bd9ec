//! Server configuration from environment variables.

use std::env;

/// Default lifetime of the session cookie: 28800 seconds = 8 hours.
pub const DEFAULT_COOKIE_MAX_AGE_SECS: i64 = 28800;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server port to listen on.
    pub port: u16,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// CORS allowed origins (comma-separated or "*" for all).
    pub cors_allowed_origins: String,
    /// Max age in seconds of the session cookie set on login.
    pub cookie_max_age_secs: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `PORT`: Server port (default: 8080)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    /// - `CORS_ALLOWED_ORIGINS`: Allowed CORS origins (default: "*")
    /// - `SESSION_COOKIE_MAX_AGE_SECS`: Session cookie lifetime
    ///   (default: 28800, must be positive)
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let cors_allowed_origins =
            env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string());

        let cookie_max_age_secs = match env::var("SESSION_COOKIE_MAX_AGE_SECS") {
            Ok(raw) => {
                let secs: i64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                    name: "SESSION_COOKIE_MAX_AGE_SECS".to_string(),
                    reason: format!("'{raw}' is not an integer"),
                })?;
                if secs <= 0 {
                    return Err(ConfigError::InvalidValue {
                        name: "SESSION_COOKIE_MAX_AGE_SECS".to_string(),
                        reason: "must be positive".to_string(),
                    });
                }
                secs
            }
            Err(_) => DEFAULT_COOKIE_MAX_AGE_SECS,
        };

        Ok(Self {
            port,
            log_level,
            cors_allowed_origins,
            cookie_max_age_secs,
        })
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            log_level: "info".to_string(),
            cors_allowed_origins: "*".to_string(),
            cookie_max_age_secs: DEFAULT_COOKIE_MAX_AGE_SECS,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}
