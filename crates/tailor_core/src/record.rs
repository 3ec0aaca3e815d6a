use crate::JobPosting;

/// Milliseconds since the Unix epoch, supplied by the shell.
///
/// The core never reads a clock; every message that needs a timestamp
/// carries one.
pub type TimestampMs = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl RecordStatus {
    /// Completed and Failed are terminal; no further transitions expected.
    pub fn is_terminal(self) -> bool {
        matches!(self, RecordStatus::Completed | RecordStatus::Failed)
    }
}

/// Client-side tracked state of one job's tailoring progress.
///
/// Invariants: `result_url` is set only while `status` is `Completed`;
/// `completed_at` is set once the record first reaches a terminal status;
/// `started_at` is set once the record first leaves `Pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailoringRecord {
    pub posting: JobPosting,
    pub status: RecordStatus,
    pub result_url: Option<String>,
    pub error_message: Option<String>,
    pub progress_message: Option<String>,
    pub started_at: Option<TimestampMs>,
    pub completed_at: Option<TimestampMs>,
}

impl TailoringRecord {
    pub(crate) fn new(posting: JobPosting) -> Self {
        Self {
            posting,
            status: RecordStatus::Pending,
            result_url: None,
            error_message: None,
            progress_message: None,
            started_at: None,
            completed_at: None,
        }
    }
}
