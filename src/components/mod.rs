//! UI components built with Leptos.
//!
//! - [`card`] - Card markup for catalog datasets
//! - [`VideoGrid`] - Virtualized grid of dataset preview cards

pub mod card;
mod video_grid;

pub use video_grid::VideoGrid;
