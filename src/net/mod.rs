//! Wire types and HTTP transport to the backend authority.

pub mod backend;
pub mod types;
