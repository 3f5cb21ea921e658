//! Error types for the grid core and its browser host.
//!
//! - [`MeasureError`] - a style-derived length could not be used
//! - [`MediaError`] - a preview video failed with a specific error code
//! - [`GridError`] - a host (DOM) operation failed
//! - [`FetchError`] - catalog or configuration download failed
//!
//! None of these are fatal: callers degrade to defaults or placeholders
//! and keep rendering.

use thiserror::Error;

/// A style-declared length that could not be turned into pixels.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// The computed value was empty.
    #[error("{property} is not set")]
    Missing { property: &'static str },
    /// The computed value does not start with a number.
    #[error("{property} is not a length: {value:?}")]
    NotNumeric {
        property: &'static str,
        value: String,
    },
    /// The value parsed but is zero or negative.
    #[error("{property} must be positive, got {value}")]
    NotPositive { property: &'static str, value: f64 },
}

/// A media failure that carried an error code from the element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("media error code {code}: {message}")]
pub struct MediaError {
    pub code: u16,
    pub message: String,
}

impl MediaError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Human-readable name of the code (1 aborted, 2 network, 3 decode, 4 unsupported).
    pub fn kind(&self) -> &'static str {
        match self.code {
            1 => "aborted",
            2 => "network",
            3 => "decode",
            4 => "unsupported source",
            _ => "unknown",
        }
    }
}

/// Host-side failures while materializing or driving cards.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// The document refused to create an element.
    #[error("failed to create <{0}> element")]
    ElementCreation(&'static str),
    /// The card markup has no preview video URL.
    #[error("card has no media source")]
    MissingMediaSource,
    /// A browser API (window, document, observer) is not available.
    #[error("browser API unavailable: {0}")]
    Unavailable(&'static str),
    /// A DOM call threw.
    #[error("DOM operation failed: {0}")]
    Js(String),
}

/// Network/fetch-related errors for catalog and config requests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Request could not be sent or the connection failed.
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx response.
    #[error("HTTP error: {0}")]
    Http(u16),
    /// Body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Json(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_error_kind() {
        assert_eq!(MediaError::new(2, "").kind(), "network");
        assert_eq!(MediaError::new(4, "").kind(), "unsupported source");
        assert_eq!(MediaError::new(9, "").kind(), "unknown");
    }

    #[test]
    fn test_error_display() {
        let err = MediaError::new(3, "PIPELINE_ERROR_DECODE");
        assert_eq!(err.to_string(), "media error code 3: PIPELINE_ERROR_DECODE");

        let err = MeasureError::NotNumeric {
            property: "--grid-gap",
            value: "auto".into(),
        };
        assert_eq!(err.to_string(), "--grid-gap is not a length: \"auto\"");
    }
}
