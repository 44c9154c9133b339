//! portal-gate web server.
//!
//! Hosts the admission gate in front of the login route and its nested
//! child routes, backed by the identity provider and an in-memory session
//! registry.

pub mod auth;
pub mod config;
pub mod navigator;
pub mod provider;
