//! Render serialization and flag batching.
//!
//! Render passes never overlap: a request that arrives while a pass is
//! running is parked, and only the latest parked request runs afterwards.
//! Selection/cart recoloring is batched to at most one pass per frame.
//! Host events that arrive while a pass holds the grid wait in a
//! [`Backlog`] and are replayed in arrival order afterwards.

/// Latest-wins queue for render requests.
#[derive(Debug)]
pub struct RenderQueue<T> {
    running: bool,
    pending: Option<T>,
}

impl<T> RenderQueue<T> {
    pub fn new() -> Self {
        Self {
            running: false,
            pending: None,
        }
    }

    /// Submit a request. Returns it back if the caller should run it now;
    /// otherwise it replaces any parked request.
    pub fn submit(&mut self, request: T) -> Option<T> {
        if self.running {
            if self.pending.replace(request).is_some() {
                log::trace!("coalesced parked render request");
            }
            None
        } else {
            self.running = true;
            Some(request)
        }
    }

    /// Finish the current pass. Returns the parked request to run next, if any.
    pub fn complete(&mut self) -> Option<T> {
        let next = self.pending.take();
        if next.is_none() {
            self.running = false;
        }
        next
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl<T> Default for RenderQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Coalesces flag refresh requests into one pass per animation frame.
#[derive(Debug, Default)]
pub struct FlagBatch {
    scheduled: bool,
}

impl FlagBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the caller must schedule a frame; `false` if one is
    /// already pending.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.scheduled, true)
    }

    /// Called from the frame callback before the pass runs.
    pub fn begin_pass(&mut self) {
        self.scheduled = false;
    }

    #[inline]
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }
}

/// Events parked while the grid is busy.
#[derive(Debug)]
pub struct Backlog<T> {
    events: Vec<T>,
}

impl<T> Backlog<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: T) {
        self.events.push(event);
    }

    /// Remove and return everything parked so far, oldest first.
    pub fn take(&mut self) -> Vec<T> {
        std::mem::take(&mut self.events)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<T> Default for Backlog<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_queue_runs_immediately_when_idle() {
        let mut queue = RenderQueue::new();
        assert_eq!(queue.submit(1), Some(1));
        assert!(queue.is_running());
        assert_eq!(queue.complete(), None);
        assert!(!queue.is_running());
    }

    #[test]
    fn test_render_queue_latest_wins() {
        let mut queue = RenderQueue::new();
        assert_eq!(queue.submit("filter"), Some("filter"));
        assert_eq!(queue.submit("scroll"), None);
        assert_eq!(queue.submit("resize"), None);

        assert_eq!(queue.complete(), Some("resize"));
        assert!(queue.is_running());
        assert_eq!(queue.complete(), None);
        assert!(!queue.is_running());
    }

    #[test]
    fn test_flag_batch_coalesces() {
        let mut batch = FlagBatch::new();
        assert!(batch.request());
        assert!(!batch.request());
        assert!(!batch.request());
        assert!(batch.is_scheduled());

        batch.begin_pass();
        assert!(batch.request());
    }

    #[test]
    fn test_backlog_replays_in_arrival_order() {
        let mut backlog = Backlog::new();
        assert!(backlog.take().is_empty());

        backlog.push(("ds/1", true));
        backlog.push(("ds/2", false));
        backlog.push(("ds/1", false));
        assert_eq!(backlog.len(), 3);

        assert_eq!(backlog.take(), vec![("ds/1", true), ("ds/2", false), ("ds/1", false)]);
        assert!(backlog.is_empty());
    }
}
