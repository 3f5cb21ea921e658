//! Viewport window calculation.
//!
//! Maps a scroll position onto the contiguous index range of items that must
//! exist as cards, padded by buffer rows so media starts loading before the
//! user scrolls onto it.

use std::ops::Range;

/// Half-open `[start, end)` range of list indices to materialize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportWindow {
    pub start: usize,
    pub end: usize,
}

impl ViewportWindow {
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Inputs for [`compute_window`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowInput {
    /// Total number of items in the filtered list.
    pub total: usize,
    pub columns: usize,
    /// Row pitch (card height plus gap).
    pub row_height: f64,
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub buffer_rows: usize,
}

/// Compute the window of items to materialize.
///
/// Always satisfies `0 <= start <= end <= total`.
pub fn compute_window(input: &WindowInput) -> ViewportWindow {
    let total = input.total;
    if total == 0 || !(input.row_height.is_finite() && input.row_height > 0.0) {
        return ViewportWindow::default();
    }

    let columns = input.columns.max(1);
    let scroll_top = finite_or_zero(input.scroll_top);
    let viewport_height = finite_or_zero(input.viewport_height);

    let first_row = (scroll_top / input.row_height).floor() as usize;
    let last_row = ((scroll_top + viewport_height) / input.row_height).ceil() as usize;

    let start_row = first_row.saturating_sub(input.buffer_rows);
    let end_row = last_row.saturating_add(input.buffer_rows);

    let start = start_row.saturating_mul(columns).min(total);
    let end = end_row.saturating_mul(columns).min(total).max(start);

    ViewportWindow { start, end }
}

/// Scrollable height for `total` items: every row, none materialized.
pub fn content_height(total: usize, columns: usize, row_height: f64) -> f64 {
    total.div_ceil(columns.max(1)) as f64 * row_height
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
