//! DOM-backed grid surface and cards.
//!
//! Cards are absolutely positioned `div.video-card` elements inside the grid
//! surface. Each carries `data-path` and `data-generation` so observer and
//! media callbacks can be routed back to the exact card instance.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AddEventListenerOptions, Document, Event, HtmlElement, HtmlSourceElement, HtmlVideoElement,
};

use crate::config::{classes, css_vars, labels};
use crate::core::error::{GridError, MediaError};
use crate::core::host::{
    CardFlag, CardHandle, Generation, Geometry, GridSurface, MediaDiagnostics, StyleProbe,
};
use crate::core::LayoutMetrics;
use crate::utils::dom::{self, js_error};

/// Attribute holding the record key.
pub const DATA_PATH: &str = "data-path";
/// Attribute holding the card generation.
pub const DATA_GENERATION: &str = "data-generation";
/// Attribute on the thumbnail holding the preview URL.
pub const DATA_VIDEO_URL: &str = "data-video-url";

const VIDEO_STYLE: &str = "position: absolute; top: 0; left: 0; width: 100%; height: 100%; \
     object-fit: cover; opacity: 0; z-index: 2; transition: opacity 0.3s ease; pointer-events: none;";

// ============================================================================
// Media events
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum MediaEventKind {
    /// First frame decoded (`loadeddata`).
    Ready,
    /// `error` fired; detail is the element's `MediaError`, if any.
    Failed(Option<MediaError>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MediaEvent {
    pub key: String,
    pub generation: Generation,
    pub kind: MediaEventKind,
}

/// Receives media events from every card.
pub type MediaSink = Rc<dyn Fn(MediaEvent)>;

// ============================================================================
// DomCard
// ============================================================================

/// A `<video>` attached to a card and the listeners routing its events.
struct VideoBinding {
    video: HtmlVideoElement,
    url: String,
    on_ready: Closure<dyn FnMut(Event)>,
    on_error: Closure<dyn FnMut(Event)>,
}

impl VideoBinding {
    fn detach_listeners(&self) {
        let _ = self
            .video
            .remove_event_listener_with_callback("loadeddata", self.on_ready.as_ref().unchecked_ref());
        let _ = self
            .video
            .remove_event_listener_with_callback("error", self.on_error.as_ref().unchecked_ref());
    }
}

impl Drop for VideoBinding {
    fn drop(&mut self) {
        // listeners must go before their closures are freed
        self.detach_listeners();
    }
}

pub struct DomCard {
    element: HtmlElement,
    key: String,
    generation: Generation,
    sink: MediaSink,
    video: RefCell<Option<VideoBinding>>,
}

impl DomCard {
    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    fn thumbnail(&self) -> Option<HtmlElement> {
        self.element
            .query_selector(&format!(".{}", classes::THUMBNAIL))
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn placeholder(&self) -> Option<HtmlElement> {
        self.element
            .query_selector(&format!(".{}", classes::THUMBNAIL_IMAGE))
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    /// Keep the cart button's text and pressed state in step with the flag.
    fn sync_cart_toggle(&self, in_cart: bool) {
        let Some(button) = self
            .element
            .query_selector(&format!(".{}", classes::CART_TOGGLE))
            .ok()
            .flatten()
        else {
            return;
        };
        let _ = button.set_attribute("aria-pressed", if in_cart { "true" } else { "false" });
        button.set_text_content(Some(labels::cart_toggle(in_cart)));
    }

    fn set_media_opacity(&self, video: &str, placeholder: &str) {
        if let Some(binding) = self.video.borrow().as_ref() {
            let _ = binding.video.style().set_property("opacity", video);
        }
        if let Some(img) = self.placeholder() {
            let _ = img.style().set_property("opacity", placeholder);
        }
    }

    fn create_video(&self, document: &Document, url: &str) -> Result<HtmlVideoElement, GridError> {
        let video: HtmlVideoElement = document
            .create_element("video")
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| GridError::ElementCreation("video"))?;
        video.set_loop(true);
        video.set_muted(true);
        video.set_preload("auto");
        video.set_class_name(classes::LAZY_VIDEO);
        video.set_attribute("muted", "").map_err(js_error)?;
        video.set_attribute("playsinline", "").map_err(js_error)?;
        video.style().set_css_text(VIDEO_STYLE);

        let source: HtmlSourceElement = document
            .create_element("source")
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| GridError::ElementCreation("source"))?;
        source.set_src(url);
        source.set_type("video/mp4");
        video.append_child(&source).map_err(js_error)?;
        Ok(video)
    }

    fn listen(&self, video: &HtmlVideoElement, url: &str) -> Result<VideoBinding, GridError> {
        let on_ready = {
            let (sink, key, generation) = (self.sink.clone(), self.key.clone(), self.generation);
            Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                sink(MediaEvent {
                    key: key.clone(),
                    generation,
                    kind: MediaEventKind::Ready,
                })
            })
        };
        let on_error = {
            let (sink, key, generation) = (self.sink.clone(), self.key.clone(), self.generation);
            let target = video.clone();
            Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                let detail = target.error().map(|e| MediaError::new(e.code(), e.message()));
                sink(MediaEvent {
                    key: key.clone(),
                    generation,
                    kind: MediaEventKind::Failed(detail),
                })
            })
        };

        let options = AddEventListenerOptions::new();
        options.set_once(true);
        video
            .add_event_listener_with_callback_and_add_event_listener_options(
                "loadeddata",
                on_ready.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(js_error)?;
        video
            .add_event_listener_with_callback_and_add_event_listener_options(
                "error",
                on_error.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(js_error)?;

        Ok(VideoBinding {
            video: video.clone(),
            url: url.to_string(),
            on_ready,
            on_error,
        })
    }
}

impl CardHandle for DomCard {
    fn set_position(&self, left: f64, top: f64) {
        let style = self.element.style();
        let _ = style.set_property("left", &format!("{left}px"));
        let _ = style.set_property("top", &format!("{top}px"));
    }

    fn set_flag(&self, flag: CardFlag, on: bool) {
        let class = match flag {
            CardFlag::Selected => classes::SELECTED,
            CardFlag::InCart => {
                self.sync_cart_toggle(on);
                classes::IN_CART
            }
        };
        let _ = self.element.class_list().toggle_with_force(class, on);
    }

    fn is_connected(&self) -> bool {
        self.element.is_connected()
    }

    fn begin_load(&self) -> Result<(), GridError> {
        if self.video.borrow().is_some() {
            return Ok(());
        }
        let thumbnail = self.thumbnail().ok_or(GridError::MissingMediaSource)?;
        let url = thumbnail
            .get_attribute(DATA_VIDEO_URL)
            .filter(|url| !url.is_empty())
            .ok_or(GridError::MissingMediaSource)?;
        let document = self
            .element
            .owner_document()
            .ok_or(GridError::Unavailable("document"))?;

        let video = self.create_video(&document, &url)?;
        let binding = self.listen(&video, &url)?;
        thumbnail
            .insert_before(&video, thumbnail.first_child().as_ref())
            .map_err(js_error)?;
        *self.video.borrow_mut() = Some(binding);
        video.load();
        Ok(())
    }

    fn reveal(&self) {
        self.set_media_opacity("1", "0");
    }

    fn conceal(&self) {
        self.set_media_opacity("0", "1");
    }

    fn play(&self) {
        let Some(binding) = self.video.borrow().as_ref().map(|b| b.video.clone()) else {
            return;
        };
        // autoplay policy rejections are expected
        if let Ok(promise) = binding.play() {
            wasm_bindgen_futures::spawn_local(async move {
                let _ = JsFuture::from(promise).await;
            });
        }
    }

    fn pause(&self) {
        if let Some(binding) = self.video.borrow().as_ref() {
            let _ = binding.video.pause();
        }
    }

    fn is_paused(&self) -> bool {
        self.video
            .borrow()
            .as_ref()
            .is_none_or(|binding| binding.video.paused())
    }

    fn release(&self) {
        let Some(binding) = self.video.borrow_mut().take() else {
            return;
        };
        binding.detach_listeners();
        let video = &binding.video;
        let _ = video.pause();
        let _ = video.remove_attribute("src");
        while let Some(child) = video.first_child() {
            let _ = video.remove_child(&child);
        }
        // resets the element and drops buffered data
        video.load();
    }

    fn diagnostics(&self) -> MediaDiagnostics {
        match self.video.borrow().as_ref() {
            Some(binding) => MediaDiagnostics {
                url: Some(binding.url.clone()),
                ready_state: binding.video.ready_state(),
                network_state: binding.video.network_state(),
            },
            None => MediaDiagnostics::default(),
        }
    }
}

// ============================================================================
// DomSurface
// ============================================================================

pub struct DomSurface {
    grid: HtmlElement,
    container: HtmlElement,
    document: Document,
    probe: Option<HtmlElement>,
    padding: Option<String>,
    sink: MediaSink,
}

impl DomSurface {
    /// `grid` is the positioned surface; `container` is its scrolling parent.
    pub fn new(grid: HtmlElement, container: HtmlElement, sink: MediaSink) -> Result<Self, GridError> {
        let document = grid
            .owner_document()
            .ok_or(GridError::Unavailable("document"))?;
        Ok(Self {
            grid,
            container,
            document,
            probe: None,
            padding: None,
            sink,
        })
    }

    /// Hidden element whose computed size resolves the grid's CSS variables.
    fn probe(&mut self) -> Option<&HtmlElement> {
        if self.probe.is_none() {
            let body = self.document.body()?;
            let probe = dom::create_html_element(&self.document, "div").ok()?;
            probe.style().set_css_text(&format!(
                "position: absolute; visibility: hidden; top: -9999px; left: -9999px; \
                 width: var({}); height: var({}); margin: var({});",
                css_vars::MIN_CARD_WIDTH,
                css_vars::CARD_HEIGHT,
                css_vars::GAP
            ));
            body.append_child(&probe).ok()?;
            self.probe = Some(probe);
        }
        self.probe.as_ref()
    }
}

impl Drop for DomSurface {
    fn drop(&mut self) {
        if let Some(probe) = self.probe.take() {
            probe.remove();
        }
    }
}

impl GridSurface for DomSurface {
    type Card = DomCard;

    fn geometry(&self) -> Geometry {
        Geometry {
            width: self.grid.client_width() as f64,
            viewport_height: self.container.client_height() as f64,
            scroll_top: self.container.scroll_top() as f64,
        }
    }

    fn probe_style(&mut self) -> StyleProbe {
        match self.probe() {
            Some(probe) => StyleProbe {
                min_card_width: dom::computed_property(probe, "width"),
                card_height: dom::computed_property(probe, "height"),
                gap: dom::computed_property(probe, "margin-top"),
            },
            None => StyleProbe::default(),
        }
    }

    fn publish_layout(&mut self, metrics: &LayoutMetrics) {
        dom::set_root_property(css_vars::CARD_WIDTH, &format!("{}px", metrics.card_width));
        dom::set_root_property(css_vars::COLUMNS, &metrics.columns.to_string());
    }

    fn sync_padding(&mut self) {
        let padding = dom::root_property(css_vars::CONTENT_PADDING);
        if self.padding.as_deref() != Some(padding.as_str()) {
            dom::set_root_property(css_vars::GRID_PADDING, &padding);
            self.padding = Some(padding);
        }
    }

    fn set_content_height(&mut self, px: f64) {
        let _ = self.grid.style().set_property("height", &format!("{px}px"));
    }

    fn create_card(
        &mut self,
        key: &str,
        generation: Generation,
        markup: &str,
    ) -> Result<DomCard, GridError> {
        let element = dom::create_html_element(&self.document, "div")?;
        element.set_class_name(classes::CARD);
        element.set_attribute(DATA_PATH, key).map_err(js_error)?;
        element
            .set_attribute(DATA_GENERATION, &generation.to_string())
            .map_err(js_error)?;
        element.set_inner_html(markup);

        let style = element.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("width", &format!("var({})", css_vars::CARD_WIDTH));
        let _ = style.set_property("height", &format!("var({})", css_vars::CARD_HEIGHT));

        Ok(DomCard {
            element,
            key: key.to_string(),
            generation,
            sink: self.sink.clone(),
            video: RefCell::new(None),
        })
    }

    fn insert_cards(&mut self, cards: &[&DomCard]) -> Result<(), GridError> {
        let fragment = self.document.create_document_fragment();
        for card in cards {
            fragment.append_child(&card.element).map_err(js_error)?;
        }
        self.grid.append_child(&fragment).map_err(js_error)?;
        Ok(())
    }

    fn remove_card(&mut self, card: &DomCard) {
        card.element.remove();
    }
}
