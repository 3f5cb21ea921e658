//! Target-independent grid core.
//!
//! This module provides:
//! - [`compute_layout`] and [`compute_window`] for layout and windowing
//! - [`VideoGrid`], the reconciler over an [`ElementCache`]
//! - [`MediaLifecycle`], the lazy preview-media state machine
//! - [`VisibilityHub`], one shared visibility subscription for all cards
//! - [`RenderQueue`] and [`FlagBatch`] for pass serialization
//!
//! Nothing here touches the DOM; see [`crate::platform`] for the browser host.

mod cache;
pub mod error;
mod grid;
pub mod host;
mod layout;
mod media;
mod schedule;
#[cfg(test)]
mod testing;
mod visibility;
mod window;

pub use cache::ElementCache;
pub use grid::{RenderReport, VideoGrid};
pub use layout::{compute_layout, parse_px, LayoutMetrics, StyleMetrics};
pub use media::{MediaCommand, MediaFailure, MediaLifecycle, MediaState};
pub use schedule::{Backlog, FlagBatch, RenderQueue};
pub use visibility::VisibilityHub;
pub use window::{compute_window, content_height, ViewportWindow, WindowInput};
