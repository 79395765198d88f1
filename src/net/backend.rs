//! HTTP transport to the backend authority.
//!
//! ARCHITECTURE
//! ============
//! [`SessionBackend`] is the seam between session logic and HTTP. The
//! controller and the proxy both talk through it, and tests swap in mocks.
//!
//! Credentials travel two ways. [`HttpBackend`] owns a cookie jar seeded with
//! the session token, so controller calls carry the cookie the way a browser
//! would. The proxy instead passes the cookie it received explicitly and it
//! is sent as a `Cookie` header; its relay client ([`HttpBackend::relay`])
//! keeps no cookie store, since it serves many users at once.

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::header::COOKIE;
use reqwest::{Response, Url};

use super::types::{BackendResponse, Envelope, LoginRedirect, SessionError};
use crate::config::{AuthConfig, SessionRoute};

/// Name of the session cookie set by the backend authority.
pub const SESSION_COOKIE_NAME: &str = "session";

#[async_trait::async_trait]
pub trait SessionBackend: Send + Sync {
    /// `GET` the session endpoint. When `cookie` is given it is forwarded as
    /// the session cookie; otherwise the transport's own credentials apply.
    async fn fetch_session(&self, cookie: Option<&str>) -> Result<BackendResponse, SessionError>;

    /// `POST` the logout endpoint.
    async fn logout(&self) -> Result<BackendResponse, SessionError>;

    /// Where to send the browser to start the OAuth flow.
    async fn login_url(&self) -> Result<String, SessionError>;
}

/// reqwest-backed [`SessionBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    backend_url: String,
    route: SessionRoute,
    login_url: String,
}

impl HttpBackend {
    /// Build a backend client from config, seeding the cookie jar with
    /// `config.session_cookie` for both the backend and the proxy origin.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured URL does not parse or the HTTP client
    /// cannot be built.
    pub fn new(config: &AuthConfig) -> Result<Self, SessionError> {
        let jar = Arc::new(Jar::default());
        if let Some(token) = &config.session_cookie {
            let cookie = format!("{SESSION_COOKIE_NAME}={token}; Path=/");
            jar.add_cookie_str(&cookie, &parse_url(&config.backend_url)?);
            if let SessionRoute::Proxy(proxy_url) = &config.route {
                jar.add_cookie_str(&cookie, &parse_url(proxy_url)?);
            }
        }

        let client = reqwest::Client::builder()
            .cookie_provider(jar)
            .build()
            .map_err(|e| SessionError::HttpClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            backend_url: config.backend_url.clone(),
            route: config.route.clone(),
            login_url: config.login_url(),
        })
    }

    /// Build the proxy's relay client: always direct to the backend, no
    /// cookie store. Credentials only travel as the explicit cookie passed
    /// to [`SessionBackend::fetch_session`], and `Set-Cookie` answers are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn relay(config: &AuthConfig) -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SessionError::HttpClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            backend_url: config.backend_url.clone(),
            route: SessionRoute::Direct,
            login_url: config.login_url(),
        })
    }

    async fn fetch_direct(&self, cookie: Option<&str>) -> Result<BackendResponse, SessionError> {
        let mut request = self.client.get(format!("{}/api/auth/session", self.backend_url));
        if let Some(token) = cookie {
            request = request.header(COOKIE, format!("{SESSION_COOKIE_NAME}={token}"));
        }
        let resp = request.send().await.map_err(transport)?;
        read_response(resp).await
    }

    async fn fetch_via_proxy(&self, proxy_url: &str) -> Result<BackendResponse, SessionError> {
        let resp = self
            .client
            .get(format!("{proxy_url}/api/session"))
            .send()
            .await
            .map_err(transport)?;
        let envelope: Envelope<serde_json::Value> = parse_envelope(resp).await?;
        Ok(BackendResponse { status: envelope.status, body: Some(envelope.data) })
    }
}

#[async_trait::async_trait]
impl SessionBackend for HttpBackend {
    async fn fetch_session(&self, cookie: Option<&str>) -> Result<BackendResponse, SessionError> {
        match (&self.route, cookie) {
            (SessionRoute::Proxy(proxy_url), None) => self.fetch_via_proxy(proxy_url).await,
            _ => self.fetch_direct(cookie).await,
        }
    }

    async fn logout(&self) -> Result<BackendResponse, SessionError> {
        let resp = self
            .client
            .post(format!("{}/api/auth/logout", self.backend_url))
            .send()
            .await
            .map_err(transport)?;
        read_response(resp).await
    }

    async fn login_url(&self) -> Result<String, SessionError> {
        let SessionRoute::Proxy(proxy_url) = &self.route else {
            return Ok(self.login_url.clone());
        };

        let resp = self
            .client
            .get(format!("{proxy_url}/api/login"))
            .send()
            .await
            .map_err(transport)?;
        let envelope: Envelope<LoginRedirect> = parse_envelope(resp).await?;
        Ok(envelope.data.redirect_uri)
    }
}

fn parse_url(raw: &str) -> Result<Url, SessionError> {
    Url::parse(raw).map_err(|e| SessionError::HttpClientBuild(format!("invalid url {raw}: {e}")))
}

fn transport(e: reqwest::Error) -> SessionError {
    SessionError::Transport(e.to_string())
}

/// Read status and body; a body that is empty or not JSON becomes `None`.
async fn read_response(resp: Response) -> Result<BackendResponse, SessionError> {
    let status = resp.status().as_u16();
    let text = resp.text().await.map_err(transport)?;
    let body = if text.trim().is_empty() { None } else { serde_json::from_str(&text).ok() };
    Ok(BackendResponse { status, body })
}

async fn parse_envelope<T: serde::de::DeserializeOwned>(resp: Response) -> Result<Envelope<T>, SessionError> {
    let text = resp.text().await.map_err(transport)?;
    serde_json::from_str(&text).map_err(|e| SessionError::Payload(format!("malformed proxy envelope: {e}")))
}
