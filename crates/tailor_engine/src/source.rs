use std::sync::atomic::{AtomicUsize, Ordering};

use tailor_core::{
    BatchSnapshot, DownloadLinks, OverallStatus, RecordSnapshot, RecordStatus,
};

use crate::api::ApiClient;
use crate::types::ApiFailure;

/// Where one batch's status snapshots come from. The tracker core runs
/// the same polling protocol against either implementation.
#[async_trait::async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<BatchSnapshot, ApiFailure>;
}

/// Polls the backend's per-task status endpoint.
pub struct RemoteStatusSource {
    api: ApiClient,
    task_id: String,
}

impl RemoteStatusSource {
    pub fn new(api: ApiClient, task_id: impl Into<String>) -> Self {
        Self {
            api,
            task_id: task_id.into(),
        }
    }
}

#[async_trait::async_trait]
impl StatusSource for RemoteStatusSource {
    async fn fetch_snapshot(&self) -> Result<BatchSnapshot, ApiFailure> {
        self.api.tailoring_status(&self.task_id).await
    }
}

/// Demonstration-only source: synthesizes snapshots locally, advancing
/// one record one step per fetch (pending, then processing, then
/// completed with a synthetic link). Never touches the network and must
/// be selected explicitly by the shell.
pub struct SimulatedStatusSource {
    count: usize,
    step: AtomicUsize,
}

impl SimulatedStatusSource {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            step: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl StatusSource for SimulatedStatusSource {
    async fn fetch_snapshot(&self) -> Result<BatchSnapshot, ApiFailure> {
        let step = self.step.fetch_add(1, Ordering::SeqCst) + 1;
        let mut jobs = Vec::with_capacity(self.count);
        let mut completed = 0u32;
        for index in 0..self.count {
            // Record `index` starts on fetch 2*index+1 and finishes one
            // fetch later.
            let starts_at = 2 * index + 1;
            let finishes_at = starts_at + 1;
            let job = if step >= finishes_at {
                completed += 1;
                RecordSnapshot {
                    status: Some(RecordStatus::Completed),
                    download_links: Some(DownloadLinks {
                        pdf: Some(format!("/api/download/simulated_{index}.pdf")),
                        json: None,
                    }),
                    progress_message: Some("Resume tailored successfully!".to_string()),
                    error_message: None,
                }
            } else if step >= starts_at {
                RecordSnapshot {
                    status: Some(RecordStatus::Processing),
                    progress_message: Some("Tailoring resume with AI...".to_string()),
                    ..RecordSnapshot::default()
                }
            } else {
                RecordSnapshot {
                    status: Some(RecordStatus::Pending),
                    ..RecordSnapshot::default()
                }
            };
            jobs.push(job);
        }
        let overall = if completed as usize == self.count {
            OverallStatus::Completed
        } else {
            OverallStatus::InProgress
        };
        Ok(BatchSnapshot {
            overall_status: overall,
            completed_jobs: completed,
            jobs,
            error_message: None,
        })
    }
}
