use std::fmt;

use tailor_core::BatchSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub kind: ApiFailureKind,
    pub message: String,
}

impl ApiFailure {
    pub(crate) fn new(kind: ApiFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// The response body did not match the expected shape.
    Decode,
    TooLarge {
        max_bytes: u64,
        actual: Option<u64>,
    },
    Io,
}

impl fmt::Display for ApiFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailureKind::InvalidUrl => write!(f, "invalid url"),
            ApiFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiFailureKind::Timeout => write!(f, "timeout"),
            ApiFailureKind::Network => write!(f, "network error"),
            ApiFailureKind::Decode => write!(f, "unexpected response body"),
            ApiFailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            ApiFailureKind::Io => write!(f, "io error"),
        }
    }
}

/// One document written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub path: String,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Result of one status fetch against the active status source.
    SnapshotFetched {
        result: Result<BatchSnapshot, ApiFailure>,
    },
    /// The armed poll timer elapsed.
    PollDue,
    /// One download attempt finished, successfully or not.
    DownloadFinished {
        index: usize,
        result: Result<SavedFile, ApiFailure>,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub(crate) struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub(crate) fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}
