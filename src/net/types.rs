//! Wire-level types shared by the controller, the proxy, and the transport.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures and non-2xx statuses both end up as a [`SessionError`];
//! callers react to either the same way, so nothing downstream branches on
//! which one it was beyond formatting the message.

use serde::{Deserialize, Serialize};

/// Message returned by the proxy when the request carries no session cookie.
pub const NO_COOKIE_MESSAGE: &str = "Unauthorized! No Cookie Found.";

/// Errors produced by session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("unexpected payload: {0}")]
    Payload(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl SessionError {
    /// HTTP-like status for this failure. Anything without a real status
    /// reports 500.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Rejected { status, .. } => *status,
            Self::Transport(_) | Self::Payload(_) | Self::HttpClientBuild(_) => 500,
        }
    }
}

/// Raw response from the backend authority or the proxy.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendResponse {
    pub status: u16,
    /// Parsed JSON body; `None` if the body was empty or not JSON.
    pub body: Option<serde_json::Value>,
}

impl BackendResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body's `message` field, if present.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.body.as_ref()?.get("message")?.as_str()
    }
}

/// Outcome of one session fetch. Consumed once by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCheck {
    /// 2xx with a `data` payload.
    Fetched { status: u16, data: serde_json::Value },
    /// Transport failure, non-2xx, or a body without `data`.
    Failed { status: u16, error: SessionError },
}

impl SessionCheck {
    /// Normalize a transport result into a check result.
    #[must_use]
    pub fn from_response(result: Result<BackendResponse, SessionError>) -> Self {
        let response = match result {
            Ok(response) => response,
            Err(error) => return Self::Failed { status: error.status(), error },
        };

        if !response.is_success() {
            let message = response
                .message()
                .map_or_else(|| format!("session request returned {}", response.status), str::to_owned);
            return Self::Failed {
                status: response.status,
                error: SessionError::Rejected { status: response.status, message },
            };
        }

        match response.body.and_then(|mut body| body.get_mut("data").map(serde_json::Value::take)) {
            Some(data) => Self::Fetched { status: response.status, data },
            None => Self::Failed {
                status: response.status,
                error: SessionError::Payload("session response has no data field".into()),
            },
        }
    }
}

/// Uniform `{status, data}` wrapper returned by every proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub data: T,
}

/// Payload of the proxy's login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRedirect {
    #[serde(rename = "redirectURI")]
    pub redirect_uri: String,
}

/// `{message}` body used for error envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
