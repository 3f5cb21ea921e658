//! Browser-side owner of the grid.
//!
//! [`GridController`] wires a [`VideoGrid`] to the DOM surface and the shared
//! observer, serializes render passes, and batches flag refreshes onto
//! animation frames. Callbacks reach it through weak references only, so
//! dropping the controller tears the whole grid down.

use std::cell::RefCell;
use std::rc::Rc;

use web_sys::HtmlElement;

use super::dom::{DomSurface, MediaEvent, MediaEventKind, MediaSink};
use super::frame::request_animation_frame;
use super::observer::{ObserverBackend, VisibilityEvent, VisibilitySink};
use crate::config::GridConfig;
use crate::core::error::GridError;
use crate::core::host::{CardTemplate, Membership};
use crate::core::{Backlog, FlagBatch, RenderQueue, VideoGrid};
use crate::models::Dataset;

pub type DomGrid = VideoGrid<Dataset, DomSurface, ObserverBackend>;

/// What asked for a render. Only used for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderTrigger {
    Filter,
    Scroll,
    Resize,
}

/// A browser callback bound for the grid.
#[derive(Clone, Debug, PartialEq)]
enum GridEvent {
    Visibility(VisibilityEvent),
    Media(MediaEvent),
}

impl GridEvent {
    fn key(&self) -> &str {
        match self {
            Self::Visibility(event) => &event.key,
            Self::Media(event) => &event.key,
        }
    }
}

pub struct GridController {
    grid: RefCell<Option<DomGrid>>,
    items: RefCell<Rc<Vec<Dataset>>>,
    queue: RefCell<RenderQueue<RenderTrigger>>,
    flags: RefCell<FlagBatch>,
    deferred: RefCell<Backlog<GridEvent>>,
}

impl GridController {
    /// Build the grid inside `grid` (the positioned surface) scrolled by
    /// `container`. Nothing renders until [`set_items`](Self::set_items).
    pub fn mount(
        grid: HtmlElement,
        container: HtmlElement,
        config: GridConfig,
        template: Box<dyn CardTemplate<Dataset>>,
        selection: Rc<dyn Membership>,
        cart: Rc<dyn Membership>,
    ) -> Result<Rc<Self>, GridError> {
        let controller = Rc::new(Self {
            grid: RefCell::new(None),
            items: RefCell::new(Rc::new(Vec::new())),
            queue: RefCell::new(RenderQueue::new()),
            flags: RefCell::new(FlagBatch::new()),
            deferred: RefCell::new(Backlog::new()),
        });

        let weak = Rc::downgrade(&controller);
        let media_sink: MediaSink = {
            let weak = weak.clone();
            Rc::new(move |event: MediaEvent| {
                if let Some(controller) = weak.upgrade() {
                    controller.dispatch(GridEvent::Media(event));
                }
            })
        };
        let visibility_sink: VisibilitySink = Rc::new(move |event: VisibilityEvent| {
            if let Some(controller) = weak.upgrade() {
                controller.dispatch(GridEvent::Visibility(event));
            }
        });

        let surface = DomSurface::new(grid, container, media_sink)?;
        let observer = ObserverBackend::new(&config, visibility_sink)?;
        *controller.grid.borrow_mut() = Some(VideoGrid::new(
            surface, observer, template, selection, cart, config,
        ));
        log::debug!("video grid mounted");
        Ok(controller)
    }

    pub fn set_materialized_listener(&self, listener: impl FnMut(&[String]) + 'static) {
        if let Some(grid) = self.grid.borrow_mut().as_mut() {
            grid.set_materialized_listener(listener);
        }
    }

    /// Replace the rendered list and render it.
    pub fn set_items(&self, items: Vec<Dataset>) {
        *self.items.borrow_mut() = Rc::new(items);
        self.request_render(RenderTrigger::Filter);
    }

    /// Run a render pass, or park the request if one is already running.
    pub fn request_render(&self, trigger: RenderTrigger) {
        let Some(mut trigger) = self.queue.borrow_mut().submit(trigger) else {
            return;
        };
        loop {
            let items = self.items.borrow().clone();
            if let Some(grid) = self.grid.borrow_mut().as_mut() {
                match grid.render(&items) {
                    Ok(report) => log::trace!(
                        "{trigger:?} render: rows {:?}, +{} -{}",
                        report.window.range(),
                        report.created,
                        report.removed
                    ),
                    Err(e) => log::warn!("{trigger:?} render failed: {e}"),
                }
            }
            match self.queue.borrow_mut().complete() {
                Some(next) => trigger = next,
                None => break,
            }
        }
        self.replay_deferred();
    }

    /// Recolor selection/cart flags on the next animation frame.
    pub fn request_flag_refresh(self: &Rc<Self>) {
        if !self.flags.borrow_mut().request() {
            return;
        }
        let weak = Rc::downgrade(self);
        let scheduled = request_animation_frame(move || {
            let Some(controller) = weak.upgrade() else {
                return;
            };
            controller.flags.borrow_mut().begin_pass();
            controller.refresh_flags();
        });
        if let Err(e) = scheduled {
            self.flags.borrow_mut().begin_pass();
            log::warn!("could not schedule flag refresh: {e}");
        }
    }

    /// Recolor selection/cart flags now. Returns the number of changed cards.
    pub fn refresh_flags(&self) -> usize {
        let changed = self
            .grid
            .borrow_mut()
            .as_mut()
            .map_or(0, DomGrid::refresh_flags);
        log::trace!("flag refresh updated {changed} cards");
        self.replay_deferred();
        changed
    }

    /// Tear down every card.
    pub fn clear(&self) {
        if let Some(grid) = self.grid.borrow_mut().as_mut() {
            grid.clear();
        }
        self.replay_deferred();
    }

    /// Number of materialized cards.
    pub fn materialized(&self) -> usize {
        self.grid.borrow().as_ref().map_or(0, DomGrid::len)
    }

    /// Route a callback into the grid, or park it while a pass holds the grid.
    fn dispatch(&self, event: GridEvent) {
        {
            let Ok(mut grid) = self.grid.try_borrow_mut() else {
                log::debug!("deferring event for {} until the current pass ends", event.key());
                self.deferred.borrow_mut().push(event);
                return;
            };
            let Some(grid) = grid.as_mut() else {
                return;
            };
            match event {
                GridEvent::Visibility(event) => {
                    grid.on_visibility(&event.key, event.generation, event.intersecting)
                }
                GridEvent::Media(MediaEvent {
                    key,
                    generation,
                    kind,
                }) => match kind {
                    MediaEventKind::Ready => grid.on_media_ready(&key, generation),
                    MediaEventKind::Failed(detail) => {
                        grid.on_media_error(&key, generation, detail);
                    }
                },
            }
        }
        if !self.deferred.borrow().is_empty() {
            self.replay_deferred();
        }
    }

    /// Deliver events parked during the pass that just ended. Stale
    /// generations are dropped by the grid itself.
    fn replay_deferred(&self) {
        loop {
            let events = self.deferred.borrow_mut().take();
            if events.is_empty() {
                break;
            }
            for event in events {
                self.dispatch(event);
            }
        }
    }
}
