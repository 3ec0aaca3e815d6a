use tailor_core::{OverallStatus, RecordStatus};
use tailor_engine::{SimulatedStatusSource, StatusSource};

#[tokio::test]
async fn simulated_batch_advances_one_record_at_a_time() {
    let source = SimulatedStatusSource::new(2);

    let first = source.fetch_snapshot().await.expect("snapshot");
    assert_eq!(first.overall_status, OverallStatus::InProgress);
    assert_eq!(first.jobs[0].status, Some(RecordStatus::Processing));
    assert_eq!(first.jobs[1].status, Some(RecordStatus::Pending));

    let second = source.fetch_snapshot().await.expect("snapshot");
    assert_eq!(second.jobs[0].status, Some(RecordStatus::Completed));
    assert_eq!(second.jobs[1].status, Some(RecordStatus::Pending));
    assert_eq!(second.completed_jobs, 1);
    assert_eq!(second.overall_status, OverallStatus::InProgress);

    let third = source.fetch_snapshot().await.expect("snapshot");
    assert_eq!(third.jobs[1].status, Some(RecordStatus::Processing));

    let fourth = source.fetch_snapshot().await.expect("snapshot");
    assert_eq!(fourth.overall_status, OverallStatus::Completed);
    assert_eq!(fourth.completed_jobs, 2);

    // Completed records carry distinct synthetic links.
    let links: Vec<_> = fourth
        .jobs
        .iter()
        .map(|job| {
            job.download_links
                .as_ref()
                .and_then(|links| links.preferred())
                .expect("completed record has a link")
                .to_string()
        })
        .collect();
    assert_eq!(links.len(), 2);
    assert_ne!(links[0], links[1]);
}

#[tokio::test]
async fn simulated_batch_stays_terminal_once_done() {
    let source = SimulatedStatusSource::new(1);

    let _ = source.fetch_snapshot().await.expect("snapshot");
    let done = source.fetch_snapshot().await.expect("snapshot");
    assert_eq!(done.overall_status, OverallStatus::Completed);

    let after = source.fetch_snapshot().await.expect("snapshot");
    assert_eq!(after.overall_status, OverallStatus::Completed);
    assert_eq!(after.jobs[0].status, Some(RecordStatus::Completed));
}

#[tokio::test]
async fn empty_simulated_batch_is_terminal_immediately() {
    let source = SimulatedStatusSource::new(0);

    let snapshot = source.fetch_snapshot().await.expect("snapshot");
    assert_eq!(snapshot.overall_status, OverallStatus::Completed);
    assert!(snapshot.jobs.is_empty());
}
