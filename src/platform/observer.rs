//! Shared `IntersectionObserver` driving card visibility.

use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::dom::{DomCard, DATA_GENERATION, DATA_PATH};
use crate::config::GridConfig;
use crate::core::error::GridError;
use crate::core::host::{Generation, VisibilityBackend};
use crate::utils::dom::js_error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityEvent {
    pub key: String,
    pub generation: Generation,
    pub intersecting: bool,
}

/// Receives intersection changes for every observed card.
pub type VisibilitySink = Rc<dyn Fn(VisibilityEvent)>;

/// One observer for the whole grid, rooted at the viewport.
pub struct ObserverBackend {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl ObserverBackend {
    pub fn new(config: &GridConfig, sink: VisibilitySink) -> Result<Self, GridError> {
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    let target = entry.target();
                    let Some(key) = target.get_attribute(DATA_PATH) else {
                        continue;
                    };
                    let Some(generation) = target
                        .get_attribute(DATA_GENERATION)
                        .and_then(|g| g.parse::<Generation>().ok())
                    else {
                        continue;
                    };
                    sink(VisibilityEvent {
                        key,
                        generation,
                        intersecting: entry.is_intersecting(),
                    });
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_root_margin(&config.root_margin);
        options.set_threshold(&JsValue::from_f64(config.threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
                .map_err(js_error)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for ObserverBackend {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

impl VisibilityBackend<DomCard> for ObserverBackend {
    fn observe(&mut self, card: &DomCard) {
        self.observer.observe(card.element());
    }

    fn unobserve(&mut self, card: &DomCard) {
        self.observer.unobserve(card.element());
    }
}
