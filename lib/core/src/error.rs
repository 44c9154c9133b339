//! Error handling foundation for portal-gate.
//!
//! This module provides only the `Result` type alias using rootcause.
//! Each crate defines its own domain error enums and returns them wrapped
//! in a `Report`, so callers can log the full chain without downcasting.

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
