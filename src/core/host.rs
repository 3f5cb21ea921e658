//! Seams between the grid core and its environment.
//!
//! The core never touches the DOM directly. It drives a [`GridSurface`]
//! (container measurement, card insertion/removal), per-card [`CardHandle`]s
//! (position, flags, preview media) and one [`VisibilityBackend`]. Record
//! markup comes from a [`CardTemplate`], and selection/cart membership is read
//! through [`Membership`] views owned elsewhere.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use super::error::GridError;
use super::layout::LayoutMetrics;

/// Identifies one materialization of a record. A record that leaves the
/// window and comes back gets a new generation.
pub type Generation = u64;

/// A record the grid can place. Only the key is interpreted.
pub trait GridItem {
    fn key(&self) -> &str;
}

/// Read-only view of an externally owned identity set.
pub trait Membership {
    fn contains(&self, key: &str) -> bool;
}

impl Membership for HashSet<String> {
    fn contains(&self, key: &str) -> bool {
        HashSet::contains(self, key)
    }
}

impl<M: Membership + ?Sized> Membership for RefCell<M> {
    fn contains(&self, key: &str) -> bool {
        self.borrow().contains(key)
    }
}

impl<M: Membership + ?Sized> Membership for Rc<M> {
    fn contains(&self, key: &str) -> bool {
        (**self).contains(key)
    }
}

/// Produces the inner markup of a card. The core does not interpret it.
pub trait CardTemplate<R> {
    /// Build the card body. `format_tags` renders the record's meta tags.
    fn build_card(
        &self,
        record: &R,
        format_tags: &dyn Fn(&R) -> String,
        cart: &dyn Membership,
    ) -> String;

    /// Meta tag markup for a record.
    fn format_tags(&self, record: &R) -> String;
}

/// Live container measurements taken at render time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Geometry {
    /// Content width of the grid surface.
    pub width: f64,
    /// Visible height of the scroll container.
    pub viewport_height: f64,
    /// Current scroll offset of the scroll container.
    pub scroll_top: f64,
}

/// Raw computed style values for the three grid minimums.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleProbe {
    pub min_card_width: String,
    pub card_height: String,
    pub gap: String,
}

/// Visual flags mirrored from selection/cart membership.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardFlag {
    Selected,
    InCart,
}

/// Element state captured for media error logs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaDiagnostics {
    pub url: Option<String>,
    pub ready_state: u16,
    pub network_state: u16,
}

/// The scrollable container cards are placed into.
pub trait GridSurface {
    type Card: CardHandle;

    fn geometry(&self) -> Geometry;

    /// Read the style-declared minimums as computed strings.
    fn probe_style(&mut self) -> StyleProbe;

    /// Publish computed metrics so surrounding UI can match the grid.
    fn publish_layout(&mut self, metrics: &LayoutMetrics);

    /// Mirror the page padding for the grid. Called on every render;
    /// implementations write only when the value changed.
    fn sync_padding(&mut self);

    /// Size the surface so the scrollbar reflects the whole list.
    fn set_content_height(&mut self, px: f64);

    /// Create a detached card for `key` with the given inner markup.
    fn create_card(
        &mut self,
        key: &str,
        generation: Generation,
        markup: &str,
    ) -> Result<Self::Card, GridError>;

    /// Attach freshly created cards in one batch.
    fn insert_cards(&mut self, cards: &[&Self::Card]) -> Result<(), GridError>;

    fn remove_card(&mut self, card: &Self::Card);
}

/// One materialized card and its preview media.
pub trait CardHandle {
    fn set_position(&self, left: f64, top: f64);

    fn set_flag(&self, flag: CardFlag, on: bool);

    /// Whether the card is still attached to the document.
    fn is_connected(&self) -> bool;

    /// Create the muted, looping, inline media element and start loading it.
    fn begin_load(&self) -> Result<(), GridError>;

    /// Crossfade the media over the placeholder image.
    fn reveal(&self);

    /// Show the placeholder image again after a failure.
    fn conceal(&self);

    /// Start playback. Rejections are swallowed by the implementation.
    fn play(&self);

    fn pause(&self);

    fn is_paused(&self) -> bool;

    /// Intentional teardown: pause, detach the source and drop buffered data.
    fn release(&self);

    fn diagnostics(&self) -> MediaDiagnostics;
}

/// Shared visibility tracking for all materialized cards.
pub trait VisibilityBackend<C> {
    fn observe(&mut self, card: &C);
    fn unobserve(&mut self, card: &C);
}
