//! Responsive column layout.
//!
//! Derives the column count and card width from the live container width and
//! the style-declared minimums. Nothing is cached: containers resize.

use super::error::MeasureError;
use super::host::StyleProbe;
use crate::config::{css_vars, GridConfig};

/// The three style-declared minimums, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleMetrics {
    pub min_card_width: f64,
    pub card_height: f64,
    pub gap: f64,
}

impl StyleMetrics {
    /// Fallback metrics taken from configuration.
    pub fn from_config(config: &GridConfig) -> Self {
        Self {
            min_card_width: config.min_card_width,
            card_height: config.card_height,
            gap: config.gap,
        }
    }

    /// Parse a probe, substituting `fallback` for any value that is missing,
    /// non-numeric or not positive.
    pub fn resolve(probe: &StyleProbe, fallback: &StyleMetrics) -> Self {
        Self {
            min_card_width: px_or(
                css_vars::MIN_CARD_WIDTH,
                &probe.min_card_width,
                fallback.min_card_width,
            ),
            card_height: px_or(css_vars::CARD_HEIGHT, &probe.card_height, fallback.card_height),
            gap: px_or(css_vars::GAP, &probe.gap, fallback.gap),
        }
    }
}

fn px_or(property: &'static str, value: &str, fallback: f64) -> f64 {
    match parse_px(property, value) {
        Ok(px) => px,
        Err(e) => {
            log::debug!("{e}; using {fallback}px");
            fallback
        }
    }
}

/// Parse the leading number of a computed length such as `"250px"` or `"16.5px"`.
pub fn parse_px(property: &'static str, value: &str) -> Result<f64, MeasureError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MeasureError::Missing { property });
    }

    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(trimmed.len(), |(i, _)| i);

    let px: f64 = trimmed[..end]
        .parse()
        .map_err(|_| MeasureError::NotNumeric {
            property,
            value: value.to_string(),
        })?;

    if px.is_finite() && px > 0.0 {
        Ok(px)
    } else {
        Err(MeasureError::NotPositive { property, value: px })
    }
}

/// Derived per-render layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutMetrics {
    /// Always at least 1.
    pub columns: usize,
    pub card_width: f64,
    pub card_height: f64,
    pub gap: f64,
}

impl LayoutMetrics {
    /// Vertical distance between the tops of two consecutive rows.
    #[inline]
    pub fn row_height(&self) -> f64 {
        self.card_height + self.gap
    }

    /// Absolute `(left, top)` of the item at `index` in the full list.
    pub fn position(&self, index: usize) -> (f64, f64) {
        let row = index / self.columns;
        let col = index % self.columns;
        (
            col as f64 * (self.card_width + self.gap),
            row as f64 * self.row_height(),
        )
    }
}

/// Compute columns and card width for a container `width` pixels wide.
///
/// `columns` cards plus `columns - 1` gaps never exceed `width`, and there is
/// always at least one column even when the container is narrower than a card.
pub fn compute_layout(width: f64, style: &StyleMetrics) -> LayoutMetrics {
    let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    let gap = style.gap;
    let stride = style.min_card_width + gap;

    let columns = if stride > 0.0 {
        (((width + gap) / stride).floor() as usize).max(1)
    } else {
        1
    };
    let card_width = ((width - gap * (columns - 1) as f64) / columns as f64)
        .floor()
        .max(0.0);

    LayoutMetrics {
        columns,
        card_width,
        card_height: style.card_height,
        gap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(min: f64, height: f64, gap: f64) -> StyleMetrics {
        StyleMetrics {
            min_card_width: min,
            card_height: height,
            gap,
        }
    }

    #[test]
    fn test_compute_layout_fits_width() {
        let style = style(250.0, 300.0, 16.0);
        for width in (0..3000).step_by(7) {
            let width = width as f64;
            let layout = compute_layout(width, &style);
            assert!(layout.columns >= 1);
            if width >= style.min_card_width {
                let used =
                    layout.card_width * layout.columns as f64 + style.gap * (layout.columns - 1) as f64;
                assert!(used <= width, "width {width} overflowed: {used}");
            }
        }
    }

    #[test]
    fn test_compute_layout_exact_fit() {
        // 4 * 250 + 3 * 16 = 1048
        let layout = compute_layout(1048.0, &style(250.0, 300.0, 16.0));
        assert_eq!(layout.columns, 4);
        assert_eq!(layout.card_width, 250.0);
    }

    #[test]
    fn test_compute_layout_narrow_container() {
        let layout = compute_layout(120.0, &style(250.0, 300.0, 16.0));
        assert_eq!(layout.columns, 1);
        assert_eq!(layout.card_width, 120.0);

        let layout = compute_layout(0.0, &style(250.0, 300.0, 16.0));
        assert_eq!(layout.columns, 1);
        assert_eq!(layout.card_width, 0.0);
    }

    #[test]
    fn test_compute_layout_spreads_remainder() {
        // 3 columns fit in 1000px; (1000 - 32) / 3 = 322.67
        let layout = compute_layout(1000.0, &style(250.0, 300.0, 16.0));
        assert_eq!(layout.columns, 3);
        assert_eq!(layout.card_width, 322.0);
    }

    #[test]
    fn test_position() {
        let layout = compute_layout(1048.0, &style(250.0, 300.0, 16.0));
        assert_eq!(layout.position(0), (0.0, 0.0));
        assert_eq!(layout.position(3), (3.0 * 266.0, 0.0));
        assert_eq!(layout.position(5), (266.0, 316.0));
    }

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px("w", "250px"), Ok(250.0));
        assert_eq!(parse_px("w", " 16.5px "), Ok(16.5));
        assert_eq!(parse_px("w", "300"), Ok(300.0));
        assert_eq!(parse_px("w", ""), Err(MeasureError::Missing { property: "w" }));
        assert!(matches!(parse_px("w", "auto"), Err(MeasureError::NotNumeric { .. })));
        assert!(matches!(parse_px("w", "0px"), Err(MeasureError::NotPositive { .. })));
        assert!(matches!(parse_px("w", "-4px"), Err(MeasureError::NotPositive { .. })));
    }

    #[test]
    fn test_resolve_falls_back_per_value() {
        let probe = StyleProbe {
            min_card_width: "200px".into(),
            card_height: "".into(),
            gap: "normal".into(),
        };
        let resolved = StyleMetrics::resolve(&probe, &StyleMetrics::from_config(&GridConfig::default()));
        assert_eq!(resolved, style(200.0, 300.0, 16.0));
    }
}
