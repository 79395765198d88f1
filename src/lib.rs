//! # gistauth
//!
//! Session authentication and state reconciliation for the gist-sharing
//! client. A [`services::session::SessionController`] checks the session
//! against the backend authority (directly or through the same-origin proxy
//! in [`routes`]), keeps the local [`state::identity::IdentityStore`] in step
//! with it, and reports outcomes to a [`notify::NotificationSink`].

pub mod cli;
pub mod config;
pub mod net;
pub mod notify;
pub mod routes;
pub mod services;
pub mod state;
