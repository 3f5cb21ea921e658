//! Application configuration.
//!
//! Centralizes the constants used by the catalog page and the grid, plus the
//! [`GridConfig`] that can be overridden at runtime from `config.json`.

use serde::Deserialize;

// =============================================================================
// Application Metadata
// =============================================================================

/// Title shown in the page header.
pub const APP_NAME: &str = "Dataset Catalog";

// =============================================================================
// Network Configuration
// =============================================================================

/// Catalog of dataset records, relative to the page.
pub const CATALOG_URL: &str = "data/datasets.json";

/// Optional runtime configuration, relative to the page.
pub const CONFIG_URL: &str = "config.json";

// =============================================================================
// DOM Hooks
// =============================================================================

/// Element id of the absolutely-positioned grid surface.
pub const GRID_ELEMENT_ID: &str = "videoGrid";

/// CSS classes shared between the grid core and the card markup.
pub mod classes {
    pub const CARD: &str = "video-card";
    pub const SELECTED: &str = "selected";
    pub const IN_CART: &str = "in-cart";
    pub const THUMBNAIL: &str = "video-thumbnail";
    pub const THUMBNAIL_IMAGE: &str = "thumbnail-image";
    pub const LAZY_VIDEO: &str = "lazy-video";
    pub const CART_TOGGLE: &str = "cart-toggle";
}

/// Cart toggle button text.
pub mod labels {
    pub const ADD_TO_CART: &str = "Add to cart";
    pub const IN_CART: &str = "In cart";

    pub fn cart_toggle(in_cart: bool) -> &'static str {
        if in_cart { IN_CART } else { ADD_TO_CART }
    }
}

/// CSS custom properties read from and written to the document.
pub mod css_vars {
    /// Style-declared minimum card width (input).
    pub const MIN_CARD_WIDTH: &str = "--grid-min-card-width";
    /// Style-declared card height (input).
    pub const CARD_HEIGHT: &str = "--grid-card-height";
    /// Style-declared gap (input).
    pub const GAP: &str = "--grid-gap";
    /// Computed card width (output).
    pub const CARD_WIDTH: &str = "--grid-card-width";
    /// Computed column count (output).
    pub const COLUMNS: &str = "--grid-columns";
    /// Page padding mirrored for the grid (output).
    pub const GRID_PADDING: &str = "--grid-padding";
    /// Page padding source.
    pub const CONTENT_PADDING: &str = "--content-padding";
}

// =============================================================================
// Grid Defaults
// =============================================================================

/// Fallback metrics used when stylesheet measurement fails.
pub mod defaults {
    pub const MIN_CARD_WIDTH: f64 = 250.0;
    pub const CARD_HEIGHT: f64 = 300.0;
    pub const GAP: f64 = 16.0;
    pub const BUFFER_ROWS: usize = 2;
    /// Pre-load margin around the scroll container for the visibility observer.
    pub const ROOT_MARGIN: &str = "200px";
    /// Fraction of a card that must be visible to count as intersecting.
    pub const THRESHOLD: f64 = 0.01;
}

/// Grid settings: buffering, fallback metrics and observer tuning.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Extra rows materialized above and below the viewport.
    pub buffer_rows: usize,
    /// Fallback for `--grid-min-card-width`.
    pub min_card_width: f64,
    /// Fallback for `--grid-card-height`.
    pub card_height: f64,
    /// Fallback for `--grid-gap`.
    pub gap: f64,
    pub root_margin: String,
    pub threshold: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            buffer_rows: defaults::BUFFER_ROWS,
            min_card_width: defaults::MIN_CARD_WIDTH,
            card_height: defaults::CARD_HEIGHT,
            gap: defaults::GAP,
            root_margin: defaults::ROOT_MARGIN.to_string(),
            threshold: defaults::THRESHOLD,
        }
    }
}

/// Shape of `config.json`. Unknown keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub grid: GridConfig,
}
