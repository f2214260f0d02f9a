//! # planboard_core
//!
//! Session lifecycle, password hashing and project role authorization for
//! Planboard. Storage is reached through the ports in [`store`].

pub mod auth;
pub mod ids;
pub mod migrate;
pub mod models;
pub mod store;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
