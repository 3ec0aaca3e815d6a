use crate::{BatchSnapshot, TimestampMs};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A status snapshot arrived from the active status source.
    SnapshotReceived {
        snapshot: BatchSnapshot,
        at: TimestampMs,
    },
    /// A status fetch failed; counts as "no update this round".
    SnapshotFetchFailed { error: String },
    /// The poll timer fired.
    PollDue,
    /// User asked for one tailored resume document.
    DownloadOneRequested { index: usize },
    /// User asked for every completed resume document.
    DownloadAllRequested,
    /// The engine finished one download attempt.
    DownloadFinished {
        index: usize,
        outcome: DownloadOutcome,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}

/// Result of a single download attempt, as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved { path: String },
    Failed { message: String },
}
