use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tailor_core::DownloadItem;
use tokio_util::sync::CancellationToken;

use crate::download::Downloader;
use crate::source::StatusSource;
use crate::types::{ChannelEventSink, EngineEvent};

enum EngineCommand {
    FetchSnapshot,
    SchedulePoll { delay_ms: u64 },
    Download { item: DownloadItem },
    DownloadBatch { items: Vec<DownloadItem> },
}

/// Async executor for tracker effects: owns a tokio runtime on a
/// background thread, takes commands in and hands events back over
/// channels. Shutting the handle down (or dropping it) cancels the
/// armed poll timer and discards in-flight results, so nothing keeps
/// polling for a torn-down tracker.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(source: Arc<dyn StatusSource>, downloader: Downloader) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                if token.is_cancelled() {
                    break;
                }
                let source = source.clone();
                let downloader = downloader.clone();
                let event_tx = event_tx.clone();
                let token = token.clone();
                runtime.spawn(async move {
                    handle_command(source.as_ref(), &downloader, command, event_tx, token).await;
                });
            }
            // Dropping the runtime here aborts anything still in flight.
        });

        Self {
            cmd_tx,
            event_rx,
            cancel,
        }
    }

    pub fn fetch_snapshot(&self) {
        let _ = self.cmd_tx.send(EngineCommand::FetchSnapshot);
    }

    pub fn schedule_poll(&self, delay_ms: u64) {
        let _ = self.cmd_tx.send(EngineCommand::SchedulePoll { delay_ms });
    }

    pub fn download(&self, item: DownloadItem) {
        let _ = self.cmd_tx.send(EngineCommand::Download { item });
    }

    pub fn download_batch(&self, items: Vec<DownloadItem>) {
        let _ = self.cmd_tx.send(EngineCommand::DownloadBatch { items });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Stops the engine: the pending poll timer is cleared and results
    /// of in-flight work are ignored.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn handle_command(
    source: &dyn StatusSource,
    downloader: &Downloader,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
    token: CancellationToken,
) {
    match command {
        EngineCommand::FetchSnapshot => {
            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = source.fetch_snapshot() => result,
            };
            let _ = event_tx.send(EngineEvent::SnapshotFetched { result });
        }
        EngineCommand::SchedulePoll { delay_ms } => {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(Duration::from_millis(delay_ms)) => {}
            }
            let _ = event_tx.send(EngineEvent::PollDue);
        }
        EngineCommand::Download { item } => {
            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = downloader.download_one(&item) => result,
            };
            let _ = event_tx.send(EngineEvent::DownloadFinished {
                index: item.index,
                result,
            });
        }
        EngineCommand::DownloadBatch { items } => {
            let sink = ChannelEventSink::new(event_tx);
            tokio::select! {
                _ = token.cancelled() => {}
                _ = downloader.download_batch(&items, &sink) => {}
            }
        }
    }
}
