//! Virtualized grid reconciler.
//!
//! [`VideoGrid::render`] measures the surface, computes the layout and the
//! viewport window, then reconciles the cached cards against that window:
//! cards that left are torn down (media released, element removed), missing
//! ones are created and inserted in one batch, and survivors are moved and
//! recolored only where something actually changed. A second render with the
//! same inputs touches nothing.
//!
//! Media and visibility callbacks are routed back in through
//! [`VideoGrid::on_visibility`], [`VideoGrid::on_media_ready`] and
//! [`VideoGrid::on_media_error`], keyed by record key and [`Generation`] so a
//! callback from a removed card can never reach its replacement.

use std::collections::HashSet;
use std::rc::Rc;

use super::cache::ElementCache;
use super::error::{GridError, MediaError};
use super::host::{
    CardFlag, CardHandle, CardTemplate, Generation, GridItem, GridSurface, Membership,
    VisibilityBackend,
};
use super::layout::{compute_layout, LayoutMetrics, StyleMetrics};
use super::media::{MediaCommand, MediaFailure, MediaLifecycle, MediaState};
use super::visibility::VisibilityHub;
use super::window::{compute_window, content_height, ViewportWindow, WindowInput};
use crate::config::GridConfig;

// ============================================================================
// Materialized card
// ============================================================================

/// A live card plus the state last written to it.
pub struct Materialized<C> {
    card: C,
    generation: Generation,
    media: MediaLifecycle,
    position: Option<(f64, f64)>,
    selected: bool,
    in_cart: bool,
}

impl<C: CardHandle> Materialized<C> {
    fn new(card: C, generation: Generation) -> Self {
        Self {
            card,
            generation,
            media: MediaLifecycle::new(),
            position: None,
            selected: false,
            in_cart: false,
        }
    }

    fn place(&mut self, position: (f64, f64)) {
        if self.position != Some(position) {
            self.card.set_position(position.0, position.1);
            self.position = Some(position);
        }
    }

    /// Returns `true` if any flag changed.
    fn apply_flags(&mut self, selected: bool, in_cart: bool) -> bool {
        let mut changed = false;
        if self.selected != selected {
            self.card.set_flag(CardFlag::Selected, selected);
            self.selected = selected;
            changed = true;
        }
        if self.in_cart != in_cart {
            self.card.set_flag(CardFlag::InCart, in_cart);
            self.in_cart = in_cart;
            changed = true;
        }
        changed
    }

    fn run(&mut self, command: MediaCommand) {
        match command {
            MediaCommand::BeginLoad => {
                if let Err(e) = self.card.begin_load() {
                    log::debug!("preview not loaded: {e}");
                    self.media.abandon();
                }
            }
            MediaCommand::Reveal { play } => {
                self.card.reveal();
                if play {
                    self.card.play();
                }
            }
            MediaCommand::Pause => self.card.pause(),
            MediaCommand::Resume => {
                if self.card.is_paused() {
                    self.card.reveal();
                    self.card.play();
                }
            }
            MediaCommand::Release => self.card.release(),
        }
    }
}

// ============================================================================
// Render report
// ============================================================================

/// Summary of one render pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderReport {
    pub window: ViewportWindow,
    pub layout: LayoutMetrics,
    pub content_height: f64,
    pub created: usize,
    pub removed: usize,
}

// ============================================================================
// VideoGrid
// ============================================================================

/// Windowed grid of preview cards over a caller-owned list.
pub struct VideoGrid<R, S: GridSurface, B> {
    surface: S,
    visibility: VisibilityHub<S::Card, B>,
    cache: ElementCache<Materialized<S::Card>>,
    template: Box<dyn CardTemplate<R>>,
    selection: Rc<dyn Membership>,
    cart: Rc<dyn Membership>,
    config: GridConfig,
    fallback: StyleMetrics,
    layout: Option<LayoutMetrics>,
    content_height: Option<f64>,
    window: ViewportWindow,
    next_generation: Generation,
    on_materialized: Option<Box<dyn FnMut(&[String])>>,
}

impl<R, S, B> VideoGrid<R, S, B>
where
    R: GridItem,
    S: GridSurface,
    B: VisibilityBackend<S::Card>,
{
    /// `selection` and `cart` are read-only views; the grid never mutates them
    /// and re-reads them on every pass.
    pub fn new(
        surface: S,
        visibility: B,
        template: Box<dyn CardTemplate<R>>,
        selection: Rc<dyn Membership>,
        cart: Rc<dyn Membership>,
        config: GridConfig,
    ) -> Self {
        Self {
            surface,
            visibility: VisibilityHub::new(visibility),
            cache: ElementCache::new(),
            template,
            selection,
            cart,
            fallback: StyleMetrics::from_config(&config),
            config,
            layout: None,
            content_height: None,
            window: ViewportWindow::default(),
            next_generation: 0,
            on_materialized: None,
        }
    }

    /// Called after each render that created cards, with their keys, so
    /// action buttons inside them can be bound.
    pub fn set_materialized_listener(&mut self, listener: impl FnMut(&[String]) + 'static) {
        self.on_materialized = Some(Box::new(listener));
    }

    /// Render `items` into the surface at the current scroll position.
    pub fn render(&mut self, items: &[R]) -> Result<RenderReport, GridError> {
        let geometry = self.surface.geometry();
        let probe = self.surface.probe_style();
        let style = StyleMetrics::resolve(&probe, &self.fallback);

        let layout = compute_layout(geometry.width, &style);
        if self.layout != Some(layout) {
            self.surface.publish_layout(&layout);
            self.layout = Some(layout);
        }
        self.surface.sync_padding();

        let window = compute_window(&WindowInput {
            total: items.len(),
            columns: layout.columns,
            row_height: layout.row_height(),
            scroll_top: geometry.scroll_top,
            viewport_height: geometry.viewport_height,
            buffer_rows: self.config.buffer_rows,
        });

        let height = content_height(items.len(), layout.columns, layout.row_height());
        if self.content_height != Some(height) {
            self.surface.set_content_height(height);
            self.content_height = Some(height);
        }

        let (created, removed) = self.reconcile(&items[window.range()], window.start, &layout)?;
        self.window = window;

        if !created.is_empty()
            && let Some(listener) = self.on_materialized.as_mut()
        {
            listener(&created);
        }

        Ok(RenderReport {
            window,
            layout,
            content_height: height,
            created: created.len(),
            removed,
        })
    }

    fn reconcile(
        &mut self,
        records: &[R],
        start: usize,
        layout: &LayoutMetrics,
    ) -> Result<(Vec<String>, usize), GridError> {
        let visible: HashSet<&str> = records.iter().map(GridItem::key).collect();
        let stale: Vec<String> = self
            .cache
            .keys()
            .filter(|key| !visible.contains(key))
            .map(str::to_owned)
            .collect();
        for key in &stale {
            self.teardown(key);
        }

        let mut created = Vec::new();
        for (offset, record) in records.iter().enumerate() {
            let key = record.key();
            if !self.cache.contains(key) {
                let template = &self.template;
                let markup = template.build_card(
                    record,
                    &|r: &R| template.format_tags(r),
                    &*self.cart,
                );
                let generation = self.next_generation;
                match self.surface.create_card(key, generation, &markup) {
                    Ok(card) => {
                        self.next_generation += 1;
                        self.cache.set(key, Materialized::new(card, generation));
                        created.push(key.to_owned());
                    }
                    Err(e) => {
                        log::warn!("failed to materialize {key}: {e}");
                        continue;
                    }
                }
            }

            if let Some(entry) = self.cache.get_mut(key) {
                entry.place(layout.position(start + offset));
                entry.apply_flags(self.selection.contains(key), self.cart.contains(key));
            }
        }

        if !created.is_empty() {
            let cards: Vec<&S::Card> = created
                .iter()
                .filter_map(|key| self.cache.get(key))
                .map(|entry| &entry.card)
                .collect();
            if let Err(e) = self.surface.insert_cards(&cards) {
                for key in &created {
                    self.teardown(key);
                }
                return Err(e);
            }
        }

        for (key, entry) in self.cache.iter() {
            self.visibility.subscribe(key, &entry.card);
        }

        Ok((created, stale.len()))
    }

    /// The only path that removes a card. Cancels any in-flight load.
    fn teardown(&mut self, key: &str) {
        let Some(mut entry) = self.cache.delete(key) else {
            return;
        };
        self.visibility.unsubscribe(key, &entry.card);
        if let Some(command) = entry.media.teardown() {
            entry.run(command);
        }
        self.surface.remove_card(&entry.card);
        log::trace!("tore down {key}#{}", entry.generation);
    }

    /// Tear down every card. The next render starts from scratch.
    pub fn clear(&mut self) {
        let keys: Vec<String> = self.cache.keys().map(str::to_string).collect();
        for key in &keys {
            self.teardown(key);
        }
        self.window = ViewportWindow::default();
        self.layout = None;
        self.content_height = None;
    }

    /// Re-apply selection/cart flags to every materialized card without
    /// recomputing the window. Returns the number of cards that changed.
    pub fn refresh_flags(&mut self) -> usize {
        let mut changed = 0;
        for (key, entry) in self.cache.iter_mut() {
            if entry.apply_flags(self.selection.contains(key), self.cart.contains(key)) {
                changed += 1;
            }
        }
        changed
    }

    // ------------------------------------------------------------------------
    // Callbacks
    // ------------------------------------------------------------------------

    fn live_mut(&mut self, key: &str, generation: Generation) -> Option<&mut Materialized<S::Card>> {
        self.cache
            .get_mut(key)
            .filter(|entry| entry.generation == generation)
    }

    pub fn on_visibility(&mut self, key: &str, generation: Generation, intersecting: bool) {
        let Some(entry) = self.live_mut(key, generation) else {
            log::trace!("visibility change for removed card {key}#{generation}");
            return;
        };
        if let Some(command) = entry.media.on_visibility(intersecting) {
            entry.run(command);
        }
    }

    pub fn on_media_ready(&mut self, key: &str, generation: Generation) {
        let Some(entry) = self.live_mut(key, generation) else {
            log::debug!("media ready for removed card {key}#{generation}, ignoring");
            return;
        };
        if !entry.card.is_connected() {
            log::debug!("media ready for detached card {key}, ignoring");
            return;
        }
        if let Some(command) = entry.media.on_ready() {
            entry.run(command);
        }
    }

    /// Classify and log a media error. Hard failures leave the placeholder up.
    pub fn on_media_error(
        &mut self,
        key: &str,
        generation: Generation,
        detail: Option<MediaError>,
    ) -> MediaFailure {
        let Some(entry) = self.live_mut(key, generation) else {
            log::debug!("soft video error after cleanup for {key}#{generation}, ignoring");
            return MediaFailure::AfterTeardown;
        };

        let was_playing = entry.media.is_playing();
        let failure = entry.media.on_error(detail);
        // Failed cards get no further visibility commands
        if was_playing {
            entry.run(MediaCommand::Pause);
        }
        let diag = entry.card.diagnostics();
        match &failure {
            MediaFailure::Hard(err) => {
                log::error!(
                    "video load error (hard failure) for {key}: {err} ({}); url={:?} ready_state={} network_state={}",
                    err.kind(),
                    diag.url,
                    diag.ready_state,
                    diag.network_state
                );
                entry.card.conceal();
            }
            MediaFailure::NoDetail | MediaFailure::AfterTeardown => {
                log::debug!(
                    "soft video error (no detail) for {key}, ignoring; url={:?} ready_state={} network_state={}",
                    diag.url,
                    diag.ready_state,
                    diag.network_state
                );
            }
        }
        failure
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    /// Window of the last render.
    #[inline]
    pub fn window(&self) -> ViewportWindow {
        self.window
    }

    /// Layout of the last render.
    #[inline]
    pub fn layout(&self) -> Option<LayoutMetrics> {
        self.layout
    }

    /// Number of materialized cards.
    #[inline]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn is_materialized(&self, key: &str) -> bool {
        self.cache.contains(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cache.keys()
    }

    pub fn card(&self, key: &str) -> Option<&S::Card> {
        self.cache.get(key).map(|entry| &entry.card)
    }

    pub fn generation(&self, key: &str) -> Option<Generation> {
        self.cache.get(key).map(|entry| entry.generation)
    }

    pub fn media_state(&self, key: &str) -> Option<MediaState> {
        self.cache.get(key).map(|entry| entry.media.state())
    }

    pub fn is_subscribed(&self, key: &str) -> bool {
        self.visibility.is_subscribed(key)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn visibility_backend(&self) -> &B {
        self.visibility.backend()
    }
}
