//! Animation-frame scheduling.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::core::error::GridError;
use crate::utils::dom::{self, js_error};

/// Run `callback` once before the next repaint.
pub fn request_animation_frame(callback: impl FnOnce() + 'static) -> Result<(), GridError> {
    let window = dom::window().ok_or(GridError::Unavailable("window"))?;
    let closure = Closure::once_into_js(move |_timestamp: f64| callback());
    window
        .request_animation_frame(closure.unchecked_ref())
        .map(|_| ())
        .map_err(js_error)
}
