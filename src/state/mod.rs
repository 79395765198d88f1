//! Client-side session state.
//!
//! DESIGN
//! ======
//! State is split by concern: `identity` owns the persisted user record,
//! `storage` is where that record lives between runs, and `auth` holds the
//! transient flags and mirrors the controller exposes to callers.

pub mod auth;
pub mod identity;
pub mod storage;
