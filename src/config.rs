//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {var}")]
    Missing { var: &'static str },
    #[error("config parse failed: {0}")]
    Parse(String),
}

/// Naming scheme for the auth endpoints exposed by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthRoutes {
    /// `login`, `register`
    #[default]
    Flat,
    /// `users/login`, `users/register`
    Users,
}

impl AuthRoutes {
    #[must_use]
    pub fn login_path(self) -> &'static str {
        match self {
            Self::Flat => "login",
            Self::Users => "users/login",
        }
    }

    #[must_use]
    pub fn register_path(self) -> &'static str {
        match self {
            Self::Flat => "register",
            Self::Users => "users/register",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub auth_routes: AuthRoutes,
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Config with defaults for everything except the base URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            auth_routes: AuthRoutes::default(),
            session_file: None,
        }
    }

    /// Build typed client config from environment variables.
    ///
    /// Required:
    /// - `WORKOUTS_API_URL`
    ///
    /// Optional:
    /// - `WORKOUTS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `WORKOUTS_AUTH_ROUTES`: `flat` (default) or `users`
    /// - `WORKOUTS_SESSION_FILE`: token file path, default under the user config dir
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is missing or a value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("WORKOUTS_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing { var: "WORKOUTS_API_URL" })?;
        Self::from_env_with_base_url(&base_url)
    }

    /// Like [`ClientConfig::from_env`] but with the base URL supplied by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if an optional value does not parse.
    pub fn from_env_with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let timeout_secs = match std::env::var("WORKOUTS_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Parse(format!("invalid WORKOUTS_REQUEST_TIMEOUT_SECS: {raw}")))?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };
        let auth_routes = parse_auth_routes(std::env::var("WORKOUTS_AUTH_ROUTES").ok().as_deref())?;
        let session_file = std::env::var("WORKOUTS_SESSION_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            base_url: normalize_base_url(base_url),
            request_timeout: Duration::from_secs(timeout_secs),
            auth_routes,
            session_file,
        })
    }

    /// Join an endpoint path onto the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn parse_auth_routes(raw: Option<&str>) -> Result<AuthRoutes, ConfigError> {
    match raw.unwrap_or("flat") {
        "flat" => Ok(AuthRoutes::Flat),
        "users" => Ok(AuthRoutes::Users),
        other => Err(ConfigError::Parse(format!(
            "unsupported WORKOUTS_AUTH_ROUTES '{other}' (expected 'flat' or 'users')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
