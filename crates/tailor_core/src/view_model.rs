use crate::{DownloadNotice, OverallStatus, RecordStatus, TimestampMs};

/// Read-only projection of the tracker for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerViewModel {
    pub records: Vec<RecordRowView>,
    /// Count of records currently in `Completed`, derived locally.
    pub completed_count: usize,
    /// Completed-jobs count as last reported by the service.
    pub reported_completed: u32,
    /// True while the batch has not reached a terminal overall status.
    pub still_processing: bool,
    /// True when the batch is driven by the simulated status source.
    pub simulated: bool,
    pub overall: OverallStatus,
    pub batch_error: Option<String>,
    /// Transport notice from the most recent failed poll round, cleared by
    /// the next successful one.
    pub last_poll_error: Option<String>,
    pub download_notice: Option<DownloadNotice>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRowView {
    pub index: usize,
    pub title: String,
    pub company: String,
    pub status: RecordStatus,
    pub result_url: Option<String>,
    pub error_message: Option<String>,
    pub progress_message: Option<String>,
    pub started_at: Option<TimestampMs>,
    pub completed_at: Option<TimestampMs>,
}
