//! Lazy preview-media state machine.
//!
//! Each card starts [`MediaState::Idle`] and only begins fetching its video
//! once the visibility observer reports it intersecting:
//!
//! ```text
//! Idle --visible--> Loading --ready--> Loaded { playing }
//!                      |                  |  hidden: pause
//!                      |                  |  visible: resume
//!                      +--error--> Failed
//! any --teardown--> TornDown (terminal)
//! ```
//!
//! Transitions return a [`MediaCommand`] for the caller to apply to the card;
//! the machine itself performs no I/O.

use super::error::MediaError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaState {
    /// No media element yet.
    Idle,
    /// Media element attached, waiting for the first frame.
    Loading,
    /// First frame available; `playing` tracks the last play/pause issued.
    Loaded { playing: bool },
    /// Load failed; the placeholder image stays up and nothing is retried.
    Failed,
    /// Removed by the reconciler. Never leaves this state.
    TornDown,
}

/// Side effect requested by a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaCommand {
    /// Create and attach the media element and start loading.
    BeginLoad,
    /// Crossfade over the placeholder, then play if `play`.
    Reveal { play: bool },
    Pause,
    /// Play again if the element is paused.
    Resume,
    /// Pause, detach the source and drop buffered data.
    Release,
}

/// How a media error notification was classified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaFailure {
    /// The card was torn down or replaced before the notification arrived.
    AfterTeardown,
    /// The element reported an error without any error detail.
    NoDetail,
    /// A live card failed with a specific error code.
    Hard(MediaError),
}

impl MediaFailure {
    /// Benign failures are logged at debug level and otherwise ignored.
    pub fn is_benign(&self) -> bool {
        !matches!(self, Self::Hard(_))
    }
}

/// Per-card media lifecycle.
#[derive(Clone, Debug)]
pub struct MediaLifecycle {
    state: MediaState,
    intersecting: bool,
}

impl MediaLifecycle {
    pub fn new() -> Self {
        Self {
            state: MediaState::Idle,
            intersecting: false,
        }
    }

    #[inline]
    pub fn state(&self) -> MediaState {
        self.state
    }

    /// Last visibility reported by the observer.
    #[inline]
    pub fn is_intersecting(&self) -> bool {
        self.intersecting
    }

    #[inline]
    pub fn is_torn_down(&self) -> bool {
        self.state == MediaState::TornDown
    }

    /// Whether the card should currently have media playing.
    pub fn is_playing(&self) -> bool {
        matches!(self.state, MediaState::Loaded { playing: true })
    }

    pub fn on_visibility(&mut self, intersecting: bool) -> Option<MediaCommand> {
        if self.is_torn_down() {
            return None;
        }
        self.intersecting = intersecting;

        match (self.state, intersecting) {
            (MediaState::Idle, true) => {
                self.state = MediaState::Loading;
                Some(MediaCommand::BeginLoad)
            }
            (MediaState::Loaded { playing: true }, false) => {
                self.state = MediaState::Loaded { playing: false };
                Some(MediaCommand::Pause)
            }
            (MediaState::Loaded { playing: false }, true) => {
                self.state = MediaState::Loaded { playing: true };
                Some(MediaCommand::Resume)
            }
            _ => None,
        }
    }

    /// First frame is available. Playback only starts if the card is still
    /// intersecting; otherwise it waits for the next visibility report.
    pub fn on_ready(&mut self) -> Option<MediaCommand> {
        if self.state != MediaState::Loading {
            return None;
        }
        let play = self.intersecting;
        self.state = MediaState::Loaded { playing: play };
        Some(MediaCommand::Reveal { play })
    }

    /// The media element reported an error.
    pub fn on_error(&mut self, detail: Option<MediaError>) -> MediaFailure {
        if self.is_torn_down() {
            return MediaFailure::AfterTeardown;
        }
        self.state = MediaState::Failed;
        match detail {
            Some(err) => MediaFailure::Hard(err),
            None => MediaFailure::NoDetail,
        }
    }

    /// Loading could not be started at all.
    pub fn abandon(&mut self) {
        if !self.is_torn_down() {
            self.state = MediaState::Failed;
        }
    }

    /// Intentional teardown by the reconciler. Cancels any in-flight load.
    pub fn teardown(&mut self) -> Option<MediaCommand> {
        if self.is_torn_down() {
            return None;
        }
        self.state = MediaState::TornDown;
        Some(MediaCommand::Release)
    }
}

impl Default for MediaLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_only_when_visible() {
        let mut media = MediaLifecycle::new();
        assert_eq!(media.on_visibility(false), None);
        assert_eq!(media.state(), MediaState::Idle);

        assert_eq!(media.on_visibility(true), Some(MediaCommand::BeginLoad));
        assert_eq!(media.state(), MediaState::Loading);

        // a second report while loading does not start another load
        assert_eq!(media.on_visibility(true), None);
    }

    #[test]
    fn test_ready_plays_when_visible() {
        let mut media = MediaLifecycle::new();
        media.on_visibility(true);
        assert_eq!(media.on_ready(), Some(MediaCommand::Reveal { play: true }));
        assert!(media.is_playing());
    }

    #[test]
    fn test_ready_after_scrolling_away_stays_paused() {
        let mut media = MediaLifecycle::new();
        media.on_visibility(true);
        media.on_visibility(false);
        assert_eq!(media.on_ready(), Some(MediaCommand::Reveal { play: false }));
        assert!(!media.is_playing());

        assert_eq!(media.on_visibility(true), Some(MediaCommand::Resume));
        assert!(media.is_playing());
    }

    #[test]
    fn test_pause_and_resume() {
        let mut media = MediaLifecycle::new();
        media.on_visibility(true);
        media.on_ready();

        assert_eq!(media.on_visibility(false), Some(MediaCommand::Pause));
        assert_eq!(media.state(), MediaState::Loaded { playing: false });
        assert_eq!(media.on_visibility(false), None);

        assert_eq!(media.on_visibility(true), Some(MediaCommand::Resume));
        assert_eq!(media.on_visibility(true), None);
    }

    #[test]
    fn test_teardown_is_terminal() {
        let mut media = MediaLifecycle::new();
        media.on_visibility(true);
        assert_eq!(media.teardown(), Some(MediaCommand::Release));
        assert_eq!(media.teardown(), None);

        assert_eq!(media.on_ready(), None);
        assert_eq!(media.on_visibility(true), None);
        assert_eq!(media.state(), MediaState::TornDown);
    }

    #[test]
    fn test_error_classification() {
        let mut media = MediaLifecycle::new();
        media.on_visibility(true);
        let failure = media.on_error(Some(MediaError::new(2, "net")));
        assert_eq!(failure, MediaFailure::Hard(MediaError::new(2, "net")));
        assert!(!failure.is_benign());
        assert_eq!(media.state(), MediaState::Failed);

        // failed cards are not retried
        assert_eq!(media.on_visibility(false), None);
        assert_eq!(media.on_visibility(true), None);

        let mut media = MediaLifecycle::new();
        media.on_visibility(true);
        assert_eq!(media.on_error(None), MediaFailure::NoDetail);

        let mut media = MediaLifecycle::new();
        media.on_visibility(true);
        media.teardown();
        let failure = media.on_error(Some(MediaError::new(1, "aborted")));
        assert_eq!(failure, MediaFailure::AfterTeardown);
        assert!(failure.is_benign());
        assert!(media.is_torn_down());
    }
}
