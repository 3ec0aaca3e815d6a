//! Tailor core: pure tracker state machine and view-model helpers.
mod effect;
mod job;
mod msg;
mod record;
mod search;
mod snapshot;
mod state;
mod update;
mod view_model;

pub use effect::{DownloadItem, Effect};
pub use job::JobPosting;
pub use msg::{DownloadOutcome, Msg};
pub use record::{RecordStatus, TailoringRecord, TimestampMs};
pub use search::{SearchForm, SearchFormError, SearchParams, SEARCH_LIMIT_MAX};
pub use snapshot::{BatchSnapshot, DownloadLinks, OverallStatus, RecordSnapshot};
pub use state::{BatchMode, DownloadNotice, TrackerState, POLL_INTERVAL_MS};
pub use update::update;
pub use view_model::{RecordRowView, TrackerViewModel};
