//! Window fetch controller.
//!
//! Tracks which window the view currently wants and which fetch, if any,
//! is in flight. Every fetch is tagged with a generation number taken when
//! it begins; a completion whose generation is no longer current belongs
//! to a superseded navigation and must be discarded (last-window-wins).
//! Stale results never overwrite a newer window's data.

use calview_core::TimeWindow;

/// Whether a window fetch is in progress.
///
/// Exposed to the presentation layer as its loading signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchPhase {
    /// No fetch in flight.
    #[default]
    Idle,
    /// A fetch for the requested window is in flight.
    Fetching,
}

/// A tag identifying one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTag(u64);

/// State machine for navigation-driven window fetches.
#[derive(Debug, Default)]
pub struct WindowController {
    generation: u64,
    requested: Option<TimeWindow>,
    phase: FetchPhase,
}

impl WindowController {
    /// Creates an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a navigation and returns the tag for its fetch.
    ///
    /// Any earlier in-flight fetch is implicitly superseded: its tag stops
    /// being current the moment this returns.
    pub fn begin_fetch(&mut self, window: TimeWindow) -> FetchTag {
        self.generation += 1;
        self.requested = Some(window);
        self.phase = FetchPhase::Fetching;
        FetchTag(self.generation)
    }

    /// Returns true if `tag` identifies the most recent fetch.
    pub fn is_current(&self, tag: FetchTag) -> bool {
        tag.0 == self.generation
    }

    /// Marks the current fetch finished (success or failure) and returns
    /// to idle. Stale completions must not call this; callers check
    /// [`Self::is_current`] first.
    pub fn finish(&mut self, tag: FetchTag) {
        debug_assert!(self.is_current(tag), "finish called with a stale tag");
        if self.is_current(tag) {
            self.phase = FetchPhase::Idle;
        }
    }

    /// The window most recently requested by navigation.
    pub fn requested(&self) -> Option<&TimeWindow> {
        self.requested.as_ref()
    }

    /// The current fetch phase.
    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    /// Resets to the initial state (sign-out). Bumps the generation so any
    /// in-flight fetch is discarded on completion.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.requested = None;
        self.phase = FetchPhase::Idle;
    }
}
