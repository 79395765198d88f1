//! Command-line surface of the `gistauth` binary.
//!
//! Every configuration value is a flag with an environment fallback, so a
//! `.env` file, the shell environment and explicit flags all feed the same
//! [`AuthConfig`]. Flags win over the environment.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{
    AuthConfig, ConfigError, DEFAULT_LANDING_PATH, DEFAULT_PORT, DEFAULT_STATE_DIR, SessionRoute, non_empty,
    normalize_base_url,
};

#[derive(Parser, Debug)]
#[command(name = "gistauth", about = "Gist client session tools and same-origin session proxy")]
pub struct Cli {
    /// Backend authority base URL.
    #[arg(long, env = "BE_URL")]
    pub be_url: Option<String>,

    /// Route session checks and login lookups through the proxy at this URL.
    #[arg(long, env = "PROXY_URL")]
    pub proxy_url: Option<String>,

    /// Session token to present as the `session` cookie.
    #[arg(long, env = "SESSION_COOKIE")]
    pub session_cookie: Option<String>,

    /// Client path a signed-in user is sent to by `login`.
    #[arg(long, env = "LANDING_PATH", default_value = DEFAULT_LANDING_PATH)]
    pub landing_path: String,

    /// Directory holding the persisted identity record.
    #[arg(long, env = "GISTAUTH_STATE_DIR", default_value = DEFAULT_STATE_DIR)]
    pub state_dir: PathBuf,

    /// Port the session proxy listens on.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the session proxy.
    Serve,
    /// Print the stored identity without contacting the backend.
    Whoami,
    #[command(flatten)]
    Client(ClientCommand),
}

/// Commands that drive a [`crate::services::session::SessionController`].
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    /// Check the session with the backend and update the stored identity.
    Check,
    /// Open the OAuth login page, or the landing page if already signed in.
    Login,
    /// Sign out on the backend and clear the stored identity.
    Logout,
}

impl Cli {
    /// Resolve parsed flags and env fallbacks into typed config, normalized
    /// the same way as [`AuthConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if no backend URL was given by flag or `BE_URL`.
    pub fn auth_config(&self) -> Result<AuthConfig, ConfigError> {
        let backend_url = non_empty(self.be_url.as_deref())
            .map(|url| normalize_base_url(&url))
            .ok_or(ConfigError::Missing { var: "BE_URL" })?;

        let route = match non_empty(self.proxy_url.as_deref()) {
            Some(url) => SessionRoute::Proxy(normalize_base_url(&url)),
            None => SessionRoute::Direct,
        };

        let landing_path =
            non_empty(Some(self.landing_path.as_str())).unwrap_or_else(|| DEFAULT_LANDING_PATH.to_owned());
        let state_dir = if self.state_dir.as_os_str().is_empty() {
            PathBuf::from(DEFAULT_STATE_DIR)
        } else {
            self.state_dir.clone()
        };

        Ok(AuthConfig {
            backend_url,
            route,
            session_cookie: non_empty(self.session_cookie.as_deref()),
            landing_path,
            state_dir,
            port: self.port,
        })
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
