//! Core types shared across the portal-gate crates.
//!
//! This crate provides the `Result` alias used with rootcause reports and
//! the strongly-typed identifiers for users and sessions.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ParseIdError, SessionId, UserId};
