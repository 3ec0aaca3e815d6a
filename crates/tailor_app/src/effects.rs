use chrono::Utc;
use client_logging::{client_debug, client_info, client_warn};
use tailor_core::{DownloadOutcome, Effect, Msg};
use tailor_engine::{EngineEvent, EngineHandle};

/// Bridges the pure tracker and the engine: effects out, messages in.
/// Dropping the runner shuts the engine down, which clears the pending
/// poll timer and discards in-flight results.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchSnapshot => {
                    client_debug!("Requesting status snapshot");
                    self.engine.fetch_snapshot();
                }
                Effect::SchedulePoll { delay_ms } => {
                    self.engine.schedule_poll(delay_ms);
                }
                Effect::DownloadResume { item } => {
                    client_info!("Downloading document for record {}", item.index);
                    self.engine.download(item);
                }
                Effect::DownloadBatch { items } => {
                    client_info!("Downloading {} document(s) sequentially", items.len());
                    self.engine.download_batch(items);
                }
            }
        }
    }

    /// Next engine event translated into a tracker message, stamped with
    /// the wall clock.
    pub fn poll_msg(&self) -> Option<Msg> {
        self.engine.try_recv().map(|event| match event {
            EngineEvent::SnapshotFetched { result } => match result {
                Ok(snapshot) => Msg::SnapshotReceived {
                    snapshot,
                    at: Utc::now().timestamp_millis(),
                },
                Err(failure) => {
                    client_warn!("Status fetch failed: {}", failure);
                    Msg::SnapshotFetchFailed {
                        error: failure.to_string(),
                    }
                }
            },
            EngineEvent::PollDue => Msg::PollDue,
            EngineEvent::DownloadFinished { index, result } => Msg::DownloadFinished {
                index,
                outcome: match result {
                    Ok(saved) => DownloadOutcome::Saved { path: saved.path },
                    Err(failure) => DownloadOutcome::Failed {
                        message: failure.to_string(),
                    },
                },
            },
        })
    }
}
