use std::fmt;

/// What kicked off a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleKind {
    /// The immediate cycle performed by `start()`.
    Initial,
    /// A scheduled repeat while polling.
    Tick,
    /// A user-initiated full reload.
    Reload,
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::Tick => write!(f, "tick"),
            Self::Reload => write!(f, "reload"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed,
    /// Another cycle was still in flight.
    Skipped,
    /// The snapshot could not be fetched; nothing changed.
    FetchFailed,
    /// The watcher was stopped while the snapshot was being fetched.
    Discarded,
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Skipped => write!(f, "skipped"),
            Self::FetchFailed => write!(f, "fetch_failed"),
            Self::Discarded => write!(f, "discarded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Polling,
}

/// Stats from one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub kind: CycleKind,
    pub outcome: CycleOutcome,
    pub posts: usize,
    /// Records derived from the snapshot before de-duplication.
    pub derived: usize,
    /// Records handed to the sink.
    pub emitted: usize,
}

impl CycleReport {
    pub fn new(kind: CycleKind, outcome: CycleOutcome) -> Self {
        Self {
            kind,
            outcome,
            posts: 0,
            derived: 0,
            emitted: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.outcome == CycleOutcome::Completed
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "kind={} outcome={} posts={} derived={} emitted={}",
            self.kind, self.outcome, self.posts, self.derived, self.emitted,
        )
    }
}
