//! Proxy routes: login redirect instruction and session relay.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use super::ProxyState;
use crate::net::backend::SESSION_COOKIE_NAME;
use crate::net::types::{Envelope, LoginRedirect, MessageBody, NO_COOKIE_MESSAGE};

fn message_envelope(status: StatusCode, message: impl Into<String>) -> Response {
    let body = Envelope { status: status.as_u16(), data: MessageBody { message: message.into() } };
    (status, Json(body)).into_response()
}

/// `GET /api/login`: tell the client where the backend's OAuth flow starts.
pub async fn login(State(state): State<ProxyState>) -> Json<Envelope<LoginRedirect>> {
    Json(Envelope {
        status: StatusCode::TEMPORARY_REDIRECT.as_u16(),
        data: LoginRedirect { redirect_uri: state.login_url.clone() },
    })
}

/// `GET /api/session`: forward the `session` cookie to the backend and
/// relay its JSON body untouched.
pub async fn session(State(state): State<ProxyState>, jar: CookieJar) -> Response {
    let token = jar.get(SESSION_COOKIE_NAME).map(Cookie::value).unwrap_or_default();
    if token.is_empty() {
        return message_envelope(StatusCode::UNAUTHORIZED, NO_COOKIE_MESSAGE);
    }

    let resp = match state.backend.fetch_session(Some(token)).await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(error = %e, "session relay request failed");
            return message_envelope(StatusCode::BAD_GATEWAY, "Failed to reach session backend.");
        }
    };

    let Some(body) = resp.body else {
        tracing::error!(status = resp.status, "session relay got a non-JSON body");
        return message_envelope(StatusCode::BAD_GATEWAY, "Session backend returned an invalid body.");
    };

    let status = StatusCode::OK;
    (status, Json(Envelope { status: status.as_u16(), data: body })).into_response()
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
