//! Data models for the catalog page.
//!
//! - [`Dataset`], [`Statistics`] - catalog records as served in `datasets.json`

mod dataset;

pub use dataset::{Dataset, Statistics};
