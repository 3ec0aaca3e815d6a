#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch one status snapshot from the active status source.
    FetchSnapshot,
    /// Arm the poll timer; a `Msg::PollDue` is expected after the delay.
    SchedulePoll { delay_ms: u64 },
    /// Fetch and save a single tailored resume document.
    DownloadResume { item: DownloadItem },
    /// Fetch and save the listed documents strictly in order, spaced
    /// apart; one failure must not abort the rest.
    DownloadBatch { items: Vec<DownloadItem> },
}

/// One document the engine should fetch and save. `url` may be relative
/// to the backend origin; `company` and `title` feed the saved filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadItem {
    pub index: usize,
    pub url: String,
    pub company: String,
    pub title: String,
}
