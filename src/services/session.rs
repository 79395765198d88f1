//! Session controller: verifies the session, starts login, signs out.
//!
//! ARCHITECTURE
//! ============
//! The controller owns the identity store and the auth UI state behind one
//! mutex. Every network call happens with the lock released; results are
//! applied afterwards in a single critical section, so a response is either
//! applied whole or not at all.
//!
//! CONCURRENCY
//! ===========
//! Overlapping `check_session` calls are allowed and not ordered: whichever
//! response resolves last overwrites the identity. `is_loading` counts calls
//! in flight and stays raised until the last one finishes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::navigation::{Navigation, Navigator};
use crate::net::backend::SessionBackend;
use crate::net::types::{SessionCheck, SessionError};
use crate::notify::{Notification, NotificationSink, Tone};
use crate::state::auth::AuthState;
use crate::state::identity::{Identity, IdentityStore};

const SIGN_OUT_FALLBACK_MESSAGE: &str = "Failed to sign out";

struct Inner {
    identity: IdentityStore,
    ui: AuthState,
    in_flight: usize,
}

/// Raises `is_loading` for its lifetime. Dropping it lowers the flag on every
/// exit path, including a cancelled future.
struct LoadingGuard {
    inner: Arc<Mutex<Inner>>,
}

impl LoadingGuard {
    fn begin(inner: &Arc<Mutex<Inner>>) -> Self {
        let mut state = lock(inner);
        state.in_flight += 1;
        state.ui.is_loading = true;
        Self { inner: Arc::clone(inner) }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut state = lock(&self.inner);
        state.in_flight = state.in_flight.saturating_sub(1);
        state.ui.is_loading = state.in_flight > 0;
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone)]
pub struct SessionController {
    backend: Arc<dyn SessionBackend>,
    sink: Arc<dyn NotificationSink>,
    navigator: Arc<dyn Navigator>,
    landing_path: String,
    inner: Arc<Mutex<Inner>>,
}

impl SessionController {
    #[must_use]
    pub fn new(
        backend: Arc<dyn SessionBackend>,
        identity: IdentityStore,
        sink: Arc<dyn NotificationSink>,
        navigator: Arc<dyn Navigator>,
        landing_path: impl Into<String>,
    ) -> Self {
        let inner = Inner { identity, ui: AuthState::default(), in_flight: 0 };
        Self { backend, sink, navigator, landing_path: landing_path.into(), inner: Arc::new(Mutex::new(inner)) }
    }

    /// Snapshot of the current identity record.
    #[must_use]
    pub fn identity(&self) -> Identity {
        lock(&self.inner).identity.get().clone()
    }

    /// Snapshot of the auth UI state.
    #[must_use]
    pub fn ui_state(&self) -> AuthState {
        lock(&self.inner).ui.clone()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        lock(&self.inner).ui.is_logged_in
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        lock(&self.inner).ui.is_loading
    }

    async fn fetch_session(&self) -> SessionCheck {
        let _loading = LoadingGuard::begin(&self.inner);
        SessionCheck::from_response(self.backend.fetch_session(None).await)
    }

    /// Ask the backend who is signed in and reconcile local state with it.
    ///
    /// Failures are logged, never notified: "not logged in" is already the
    /// natural state for the caller to render. Returns whether a user is
    /// signed in.
    pub async fn check_session(&self) -> bool {
        let fetched = match self.fetch_session().await {
            SessionCheck::Fetched { status, data } => serde_json::from_value::<Identity>(data)
                .map_err(|e| (status, SessionError::Payload(format!("incomplete session payload: {e}")))),
            SessionCheck::Failed { status, error } => Err((status, error)),
        };

        let identity = match fetched {
            Ok(identity) => identity,
            Err((status, error)) => {
                tracing::error!(status, error = %error, "session check failed");
                self.apply(Identity::empty());
                return false;
            }
        };

        let logged_in = identity.is_authenticated();
        let name = identity.name.clone();
        self.apply(identity);

        if logged_in {
            self.sink.notify(
                Notification::new("Welcome back!", Tone::Success)
                    .with_description(format!("You are now logged in as {name}")),
            );
        }
        logged_in
    }

    /// Replace identity and UI mirrors in one critical section.
    ///
    /// Persistence is written through inside the lock, so storage order
    /// matches the order responses were applied. The write blocks briefly.
    fn apply(&self, identity: Identity) {
        let mut state = lock(&self.inner);
        let Inner { identity: store, ui, .. } = &mut *state;
        ui.is_logged_in = identity.is_authenticated();
        if ui.is_logged_in {
            store.set(identity);
        } else {
            store.reset();
        }
        ui.mirror(store.get());
    }

    /// Sign out on the backend, then clear local state.
    ///
    /// Local state only changes once the backend confirms, so a failure
    /// leaves the identity exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns the backend's `message` on a non-success status, or the
    /// transport error if the request never completed.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        self.sink.notify(Notification::new("Signing out!", Tone::Warning));

        let result = {
            let _loading = LoadingGuard::begin(&self.inner);
            self.backend.logout().await
        };

        let outcome = match result {
            Ok(resp) if resp.is_success() => Ok(()),
            Ok(resp) => Err(SessionError::Rejected {
                status: resp.status,
                message: resp.message().unwrap_or(SIGN_OUT_FALLBACK_MESSAGE).to_owned(),
            }),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                {
                    let mut state = lock(&self.inner);
                    state.identity.reset();
                    state.ui.clear();
                }
                self.sink.notify(Notification::new("Signed out!", Tone::Success));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "sign out failed");
                self.sink.notify(Notification::new("Failed to sign out!", Tone::Error));
                Err(e)
            }
        }
    }

    /// Send a signed-in user to the landing page, anyone else to the
    /// backend's OAuth entry point.
    ///
    /// # Errors
    ///
    /// Returns an error if the login URL has to be fetched from the proxy and
    /// that request fails. Nothing is navigated in that case.
    pub async fn redirect_to_login(&self) -> Result<(), SessionError> {
        if self.is_logged_in() {
            self.navigator.navigate(Navigation::Internal(self.landing_path.clone()));
            return Ok(());
        }

        let login_url = {
            let _loading = LoadingGuard::begin(&self.inner);
            self.backend.login_url().await
        };

        match login_url {
            Ok(url) => {
                self.navigator.navigate(Navigation::External(url));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not resolve login url");
                self.sink.notify(Notification::new("Failed to start sign in!", Tone::Error));
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("landing_path", &self.landing_path)
            .field("ui", &self.ui_state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
