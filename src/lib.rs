//! Dataset catalog browser with a virtualized preview-video grid.
//!
//! - [`core`] - Target-independent layout, windowing, reconciliation and media lifecycle
//! - [`platform`] - `web-sys` host for the core
//! - [`components`] / [`app`] - Leptos UI

pub mod app;
pub mod components;
pub mod config;
pub mod core;
pub mod models;
pub mod platform;
pub mod utils;
