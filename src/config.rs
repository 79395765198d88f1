//! Client and proxy configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_LANDING_PATH: &str = "/dashboard";
pub const DEFAULT_STATE_DIR: &str = ".gistauth";
pub const DEFAULT_PORT: u16 = 3000;

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required env var {var}")]
    Missing { var: &'static str },

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Where session checks and login lookups are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRoute {
    /// Talk to the backend authority directly, relying on the cookie jar.
    Direct,
    /// Go through the same-origin proxy at this base URL.
    Proxy(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub backend_url: String,
    pub route: SessionRoute,
    pub session_cookie: Option<String>,
    pub landing_path: String,
    pub state_dir: PathBuf,
    pub port: u16,
}

impl AuthConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `BE_URL`: backend authority base URL
    ///
    /// Optional:
    /// - `PROXY_URL`: route session checks through the proxy at this URL
    /// - `SESSION_COOKIE`: session token to seed into the cookie jar
    /// - `LANDING_PATH`: default `/dashboard`
    /// - `GISTAUTH_STATE_DIR`: default `.gistauth`
    /// - `PORT`: proxy listen port, default 3000
    ///
    /// # Errors
    ///
    /// Returns an error if `BE_URL` is missing or `PORT` does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_url = non_empty_var("BE_URL")
            .map(|url| normalize_base_url(&url))
            .ok_or(ConfigError::Missing { var: "BE_URL" })?;

        let route = match non_empty_var("PROXY_URL") {
            Some(url) => SessionRoute::Proxy(normalize_base_url(&url)),
            None => SessionRoute::Direct,
        };

        let port = match non_empty_var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            backend_url,
            route,
            session_cookie: non_empty_var("SESSION_COOKIE"),
            landing_path: non_empty_var("LANDING_PATH").unwrap_or_else(|| DEFAULT_LANDING_PATH.to_owned()),
            state_dir: non_empty_var("GISTAUTH_STATE_DIR").map_or_else(|| PathBuf::from(DEFAULT_STATE_DIR), PathBuf::from),
            port,
        })
    }

    /// Config pointing directly at `backend_url` with every other value defaulted.
    #[must_use]
    pub fn direct(backend_url: &str) -> Self {
        Self {
            backend_url: normalize_base_url(backend_url),
            route: SessionRoute::Direct,
            session_cookie: None,
            landing_path: DEFAULT_LANDING_PATH.to_owned(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            port: DEFAULT_PORT,
        }
    }

    /// The backend's OAuth entry point, tagged so the backend redirects back
    /// to this client once the provider completes.
    #[must_use]
    pub fn login_url(&self) -> String {
        format!("{}/api/auth/google/login?r=client", self.backend_url)
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

/// Trimmed value, `None` when blank.
pub(crate) fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}

fn non_empty_var(key: &str) -> Option<String> {
    non_empty(std::env::var(key).ok().as_deref())
}


#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
