use crate::{
    BatchSnapshot, DownloadItem, DownloadOutcome, Effect, JobPosting, OverallStatus, RecordStatus,
    TailoringRecord, TimestampMs, TrackerViewModel,
};
use crate::view_model::RecordRowView;

/// Fixed delay between status polls.
pub const POLL_INTERVAL_MS: u64 = 2_000;

/// Where a batch's status snapshots come from.
///
/// Simulated batches follow the same polling protocol against a
/// synthetic status source; the shell selects them explicitly and they
/// produce no real documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchMode {
    Remote { task_id: String },
    Simulated,
}

/// Outcome summary for the most recent download request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadNotice {
    /// Download-all was requested with no completed record; nothing was
    /// fetched.
    NothingToDownload,
    AllSaved { count: usize },
    SomeFailed { failed: usize, attempted: usize },
}

/// Bookkeeping for an in-flight download run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BulkDownload {
    outstanding: usize,
    attempted: usize,
    failed: usize,
}

/// Owner of one tailoring batch: an ordered record list reconciled
/// against status snapshots until the batch reaches a terminal state.
/// Mutated only through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerState {
    mode: BatchMode,
    records: Vec<TailoringRecord>,
    overall: OverallStatus,
    reported_completed: u32,
    batch_error: Option<String>,
    last_poll_error: Option<String>,
    bulk: Option<BulkDownload>,
    download_notice: Option<DownloadNotice>,
    dirty: bool,
}

impl TrackerState {
    /// Creates a tracker with one pending record per posting and requests
    /// the first status fetch immediately. Pure state construction; this
    /// step cannot fail.
    pub fn new(postings: Vec<JobPosting>, mode: BatchMode) -> (Self, Vec<Effect>) {
        let records = postings.into_iter().map(TailoringRecord::new).collect();
        let state = Self {
            mode,
            records,
            overall: OverallStatus::InProgress,
            reported_completed: 0,
            batch_error: None,
            last_poll_error: None,
            bulk: None,
            download_notice: None,
            dirty: true,
        };
        (state, vec![Effect::FetchSnapshot])
    }

    pub fn view(&self) -> TrackerViewModel {
        TrackerViewModel {
            records: self
                .records
                .iter()
                .enumerate()
                .map(|(index, record)| RecordRowView {
                    index,
                    title: record.posting.title.clone(),
                    company: record.posting.company.clone(),
                    status: record.status,
                    result_url: record.result_url.clone(),
                    error_message: record.error_message.clone(),
                    progress_message: record.progress_message.clone(),
                    started_at: record.started_at,
                    completed_at: record.completed_at,
                })
                .collect(),
            completed_count: self.completed_count(),
            reported_completed: self.reported_completed,
            still_processing: !self.overall.is_terminal(),
            simulated: matches!(self.mode, BatchMode::Simulated),
            overall: self.overall,
            batch_error: self.batch_error.clone(),
            last_poll_error: self.last_poll_error.clone(),
            download_notice: self.download_notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns the dirty flag and clears it. The shell re-renders only
    /// when this reports true.
    pub fn consume_dirty(&mut self) -> bool {
        let was = self.dirty;
        self.dirty = false;
        was
    }

    pub fn records(&self) -> &[TailoringRecord] {
        &self.records
    }

    pub fn overall(&self) -> OverallStatus {
        self.overall
    }

    pub fn completed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.status == RecordStatus::Completed)
            .count()
    }

    /// True once the batch has reached a terminal overall status; polling
    /// must never resume afterwards.
    pub fn is_settled(&self) -> bool {
        self.overall.is_terminal()
    }

    pub(crate) fn bulk_idle(&self) -> bool {
        self.bulk.is_none()
    }

    /// Positional merge of one snapshot into the batch.
    ///
    /// Status is overwritten with whatever the snapshot says (the merge is
    /// deliberately not monotonic-enforcing), while already-populated
    /// result/error/progress fields are kept when the snapshot omits them.
    /// Snapshot rows beyond the local batch are ignored.
    pub(crate) fn apply_snapshot(&mut self, snapshot: BatchSnapshot, at: TimestampMs) {
        for (incoming, record) in snapshot.jobs.iter().zip(self.records.iter_mut()) {
            if let Some(status) = incoming.status {
                if record.started_at.is_none() && status != RecordStatus::Pending {
                    record.started_at = Some(at);
                }
                if status.is_terminal() && record.completed_at.is_none() {
                    record.completed_at = Some(at);
                }
                record.status = status;
            }
            if record.status == RecordStatus::Completed {
                if let Some(link) = incoming
                    .download_links
                    .as_ref()
                    .and_then(|links| links.preferred())
                {
                    record.result_url = Some(link.to_string());
                }
            }
            if let Some(message) = &incoming.error_message {
                record.error_message = Some(message.clone());
            }
            if let Some(message) = &incoming.progress_message {
                record.progress_message = Some(message.clone());
            }
        }
        self.overall = snapshot.overall_status;
        self.reported_completed = snapshot.completed_jobs;
        if let Some(message) = snapshot.error_message {
            self.batch_error = Some(message);
        }
        // A snapshot that arrived at all supersedes any transport notice.
        self.last_poll_error = None;
        self.dirty = true;
    }

    /// Records a failed poll round. No record transitions; the round is
    /// simply skipped and retried at the next interval.
    pub(crate) fn note_poll_failure(&mut self, error: String) {
        self.last_poll_error = Some(error);
        self.dirty = true;
    }

    /// The download item for one record, if its result is available.
    pub(crate) fn download_item(&self, index: usize) -> Option<DownloadItem> {
        let record = self.records.get(index)?;
        if record.status != RecordStatus::Completed {
            return None;
        }
        let url = record.result_url.as_ref().filter(|url| !url.is_empty())?;
        Some(DownloadItem {
            index,
            url: url.clone(),
            company: record.posting.company.clone(),
            title: record.posting.title.clone(),
        })
    }

    /// Every downloadable record, in batch order.
    pub(crate) fn completed_download_items(&self) -> Vec<DownloadItem> {
        (0..self.records.len())
            .filter_map(|index| self.download_item(index))
            .collect()
    }

    pub(crate) fn begin_bulk(&mut self, expected: usize) {
        self.bulk = Some(BulkDownload {
            outstanding: expected,
            attempted: expected,
            failed: 0,
        });
        self.download_notice = None;
        self.dirty = true;
    }

    pub(crate) fn note_nothing_to_download(&mut self) {
        self.download_notice = Some(DownloadNotice::NothingToDownload);
        self.dirty = true;
    }

    /// Applies one download outcome to the in-flight run. Records are not
    /// mutated by download results; a failure is surfaced through the
    /// summary notice once every item has reported.
    pub(crate) fn apply_download_outcome(&mut self, outcome: DownloadOutcome) {
        let Some(mut bulk) = self.bulk else {
            // Stray completion after the run was torn down; drop it.
            return;
        };
        if let DownloadOutcome::Failed { .. } = outcome {
            bulk.failed += 1;
        }
        bulk.outstanding = bulk.outstanding.saturating_sub(1);
        if bulk.outstanding == 0 {
            self.download_notice = Some(if bulk.failed == 0 {
                DownloadNotice::AllSaved {
                    count: bulk.attempted,
                }
            } else {
                DownloadNotice::SomeFailed {
                    failed: bulk.failed,
                    attempted: bulk.attempted,
                }
            });
            self.bulk = None;
        } else {
            self.bulk = Some(bulk);
        }
        self.dirty = true;
    }
}
