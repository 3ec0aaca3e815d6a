use crate::{Effect, Msg, TrackerState, POLL_INTERVAL_MS};

/// Pure update function: applies a message to the tracker and returns any
/// effects for the shell to execute.
pub fn update(mut state: TrackerState, msg: Msg) -> (TrackerState, Vec<Effect>) {
    let effects = match msg {
        Msg::SnapshotReceived { snapshot, at } => {
            // Once terminal, the batch is settled for good: a late or
            // out-of-order snapshot must not reopen polling.
            if state.is_settled() {
                return (state, Vec::new());
            }
            state.apply_snapshot(snapshot, at);
            if state.is_settled() {
                Vec::new()
            } else {
                vec![Effect::SchedulePoll {
                    delay_ms: POLL_INTERVAL_MS,
                }]
            }
        }
        Msg::SnapshotFetchFailed { error } => {
            if state.is_settled() {
                return (state, Vec::new());
            }
            state.note_poll_failure(error);
            vec![Effect::SchedulePoll {
                delay_ms: POLL_INTERVAL_MS,
            }]
        }
        Msg::PollDue => {
            if state.is_settled() {
                Vec::new()
            } else {
                vec![Effect::FetchSnapshot]
            }
        }
        Msg::DownloadOneRequested { index } => match state.download_item(index) {
            Some(item) if state.bulk_idle() => {
                state.begin_bulk(1);
                vec![Effect::DownloadResume { item }]
            }
            _ => Vec::new(),
        },
        Msg::DownloadAllRequested => {
            if !state.bulk_idle() {
                return (state, Vec::new());
            }
            let items = state.completed_download_items();
            if items.is_empty() {
                state.note_nothing_to_download();
                Vec::new()
            } else {
                state.begin_bulk(items.len());
                vec![Effect::DownloadBatch { items }]
            }
        }
        Msg::DownloadFinished { outcome, .. } => {
            state.apply_download_outcome(outcome);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
