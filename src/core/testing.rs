//! In-memory host used by the core tests.
//!
//! Every DOM write is counted so tests can assert that a pass performed no
//! mutations at all.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use super::error::GridError;
use super::host::{
    CardFlag, CardHandle, CardTemplate, Generation, Geometry, GridItem, GridSurface,
    MediaDiagnostics, Membership, StyleProbe, VisibilityBackend,
};
use super::layout::LayoutMetrics;

// ============================================================================
// Records
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Item(String);

impl Item {
    pub fn new(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl GridItem for Item {
    fn key(&self) -> &str {
        &self.0
    }
}

/// `n` items keyed `ds/0`, `ds/1`, ...
pub fn items(n: usize) -> Vec<Item> {
    (0..n).map(|i| Item(format!("ds/{i}"))).collect()
}

pub struct PlainTemplate;

impl CardTemplate<Item> for PlainTemplate {
    fn build_card(
        &self,
        record: &Item,
        format_tags: &dyn Fn(&Item) -> String,
        cart: &dyn Membership,
    ) -> String {
        let badge = if cart.contains(record.key()) { "*" } else { "" };
        format!("<span>{}{badge}</span>{}", record.key(), format_tags(record))
    }

    fn format_tags(&self, _record: &Item) -> String {
        String::new()
    }
}

// ============================================================================
// Cards
// ============================================================================

#[derive(Debug)]
pub struct CardState {
    key: String,
    position: Cell<Option<(f64, f64)>>,
    flags: RefCell<HashSet<CardFlag>>,
    connected: Cell<bool>,
    loads: Cell<usize>,
    fail_load: Cell<bool>,
    revealed: Cell<bool>,
    concealed: Cell<bool>,
    playing: Cell<bool>,
    released: Cell<bool>,
    mutations: Rc<Cell<usize>>,
}

#[derive(Clone, Debug)]
pub struct MockCard(Rc<CardState>);

impl MockCard {
    fn touch(&self) {
        self.0.mutations.set(self.0.mutations.get() + 1);
    }

    pub fn key(&self) -> &str {
        &self.0.key
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        self.0.position.get()
    }

    pub fn has_flag(&self, flag: CardFlag) -> bool {
        self.0.flags.borrow().contains(&flag)
    }

    pub fn same_card(&self, other: &MockCard) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn loads(&self) -> usize {
        self.0.loads.get()
    }

    pub fn is_playing(&self) -> bool {
        self.0.playing.get()
    }

    pub fn is_revealed(&self) -> bool {
        self.0.revealed.get()
    }

    pub fn is_concealed(&self) -> bool {
        self.0.concealed.get()
    }

    pub fn is_released(&self) -> bool {
        self.0.released.get()
    }

    pub fn fail_next_load(&self) {
        self.0.fail_load.set(true);
    }
}

impl CardHandle for MockCard {
    fn set_position(&self, left: f64, top: f64) {
        self.touch();
        self.0.position.set(Some((left, top)));
    }

    fn set_flag(&self, flag: CardFlag, on: bool) {
        self.touch();
        let mut flags = self.0.flags.borrow_mut();
        if on {
            flags.insert(flag);
        } else {
            flags.remove(&flag);
        }
    }

    fn is_connected(&self) -> bool {
        self.0.connected.get()
    }

    fn begin_load(&self) -> Result<(), GridError> {
        self.0.loads.set(self.0.loads.get() + 1);
        if self.0.fail_load.replace(false) {
            return Err(GridError::MissingMediaSource);
        }
        self.touch();
        Ok(())
    }

    fn reveal(&self) {
        self.touch();
        self.0.revealed.set(true);
        self.0.concealed.set(false);
    }

    fn conceal(&self) {
        self.touch();
        self.0.concealed.set(true);
    }

    fn play(&self) {
        self.0.playing.set(true);
    }

    fn pause(&self) {
        self.0.playing.set(false);
    }

    fn is_paused(&self) -> bool {
        !self.0.playing.get()
    }

    fn release(&self) {
        self.touch();
        self.0.playing.set(false);
        self.0.released.set(true);
    }

    fn diagnostics(&self) -> MediaDiagnostics {
        MediaDiagnostics {
            url: Some(format!("{}.mp4", self.0.key)),
            ready_state: 0,
            network_state: 0,
        }
    }
}

// ============================================================================
// Surface
// ============================================================================

pub struct MockSurface {
    geometry: Geometry,
    probe: StyleProbe,
    attached: Vec<MockCard>,
    content_height: Option<f64>,
    published: Option<LayoutMetrics>,
    created: usize,
    insert_batches: usize,
    padding_syncs: usize,
    mutations: Rc<Cell<usize>>,
}

impl MockSurface {
    pub fn new(width: f64, viewport_height: f64, min_width: &str, height: &str, gap: &str) -> Self {
        Self {
            geometry: Geometry {
                width,
                viewport_height,
                scroll_top: 0.0,
            },
            probe: StyleProbe {
                min_card_width: min_width.into(),
                card_height: height.into(),
                gap: gap.into(),
            },
            attached: Vec::new(),
            content_height: None,
            published: None,
            created: 0,
            insert_batches: 0,
            padding_syncs: 0,
            mutations: Rc::new(Cell::new(0)),
        }
    }

    fn touch(&self) {
        self.mutations.set(self.mutations.get() + 1);
    }

    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        self.geometry.scroll_top = scroll_top;
    }

    pub fn set_width(&mut self, width: f64) {
        self.geometry.width = width;
    }

    pub fn set_probe(&mut self, min_width: &str, height: &str, gap: &str) {
        self.probe = StyleProbe {
            min_card_width: min_width.into(),
            card_height: height.into(),
            gap: gap.into(),
        };
    }

    /// Total DOM writes performed by the surface and its cards.
    pub fn mutations(&self) -> usize {
        self.mutations.get()
    }

    pub fn created(&self) -> usize {
        self.created
    }

    pub fn insert_batches(&self) -> usize {
        self.insert_batches
    }

    pub fn padding_syncs(&self) -> usize {
        self.padding_syncs
    }

    pub fn content_height(&self) -> Option<f64> {
        self.content_height
    }

    pub fn published_columns(&self) -> Option<usize> {
        self.published.map(|layout| layout.columns)
    }

    pub fn attached_keys(&self) -> HashSet<String> {
        self.attached.iter().map(|card| card.key().to_owned()).collect()
    }
}

impl GridSurface for MockSurface {
    type Card = MockCard;

    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn probe_style(&mut self) -> StyleProbe {
        self.probe.clone()
    }

    fn publish_layout(&mut self, metrics: &LayoutMetrics) {
        self.touch();
        self.published = Some(*metrics);
    }

    fn sync_padding(&mut self) {
        self.padding_syncs += 1;
    }

    fn set_content_height(&mut self, px: f64) {
        self.touch();
        self.content_height = Some(px);
    }

    fn create_card(
        &mut self,
        key: &str,
        _generation: Generation,
        _markup: &str,
    ) -> Result<MockCard, GridError> {
        self.created += 1;
        Ok(MockCard(Rc::new(CardState {
            key: key.to_string(),
            position: Cell::new(None),
            flags: RefCell::new(HashSet::new()),
            connected: Cell::new(false),
            loads: Cell::new(0),
            fail_load: Cell::new(false),
            revealed: Cell::new(false),
            concealed: Cell::new(false),
            playing: Cell::new(false),
            released: Cell::new(false),
            mutations: self.mutations.clone(),
        })))
    }

    fn insert_cards(&mut self, cards: &[&MockCard]) -> Result<(), GridError> {
        self.touch();
        self.insert_batches += 1;
        for card in cards {
            card.0.connected.set(true);
            self.attached.push((*card).clone());
        }
        Ok(())
    }

    fn remove_card(&mut self, card: &MockCard) {
        self.touch();
        card.0.connected.set(false);
        self.attached.retain(|c| !c.same_card(card));
    }
}

// ============================================================================
// Visibility
// ============================================================================

#[derive(Default)]
pub struct MockObserver {
    observed: HashSet<String>,
}

impl MockObserver {
    pub fn observed_keys(&self) -> HashSet<String> {
        self.observed.clone()
    }
}

impl VisibilityBackend<MockCard> for MockObserver {
    fn observe(&mut self, card: &MockCard) {
        assert!(self.observed.insert(card.key().to_owned()), "observed twice");
    }

    fn unobserve(&mut self, card: &MockCard) {
        self.observed.remove(card.key());
    }
}
