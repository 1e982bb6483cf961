/// Crawl run state definitions
///
/// A run moves `Idle → Running → Draining → Done`. `Running` may also jump
/// straight to `Done` when the frontier drains with nothing in flight or a
/// fatal error stops the run.
use std::fmt;

/// Represents the lifecycle state of one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Seed URL not yet enqueued
    Idle,

    /// Dequeuing and fetching pages
    Running,

    /// No new fetches are issued; in-flight fetches are completing
    Draining,

    /// Terminal; the page records are ready for output
    Done,
}

impl CrawlState {
    /// Returns true if `to` is a legal next state
    pub fn can_transition_to(&self, to: CrawlState) -> bool {
        matches!(
            (self, to),
            (Self::Idle, Self::Running)
                | (Self::Idle, Self::Done)
                | (Self::Running, Self::Draining)
                | (Self::Running, Self::Done)
                | (Self::Draining, Self::Done)
        )
    }

    /// Returns true if the run may still start new fetches
    pub fn accepts_fetches(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
