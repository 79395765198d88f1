//! Router assembly for the same-origin session proxy.
//!
//! SYSTEM CONTEXT
//! ==============
//! The proxy sits on the client's origin and relays session lookups to the
//! backend authority, so the client never depends on cross-origin cookie
//! behavior. It holds no session state of its own.

pub mod proxy;

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::net::backend::SessionBackend;

/// Shared proxy state, injected into handlers via the `State` extractor.
#[derive(Clone)]
pub struct ProxyState {
    pub backend: Arc<dyn SessionBackend>,
    /// Backend OAuth entry point handed out by `/api/login`.
    pub login_url: String,
}

impl ProxyState {
    #[must_use]
    pub fn new(backend: Arc<dyn SessionBackend>, login_url: String) -> Self {
        Self { backend, login_url }
    }
}

/// Proxy routes plus health check, with request tracing.
pub fn app(state: ProxyState) -> Router {
    Router::new()
        .route("/api/login", get(proxy::login))
        .route("/api/session", get(proxy::session))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
