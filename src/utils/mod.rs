//! Utility modules for web, DOM, and formatting operations.
//!
//! Provides:
//! - [`dom`] - Browser API access helpers
//! - [`fetch_json`], [`fetch_catalog`], [`fetch_config`] - Network fetching
//! - [`format`] - Display formatting for catalog values
//! - [`logger`] - Console backend for the `log` facade

pub mod dom;
mod fetch;
pub mod format;
pub mod logger;

pub use fetch::{fetch_catalog, fetch_config, fetch_json};
