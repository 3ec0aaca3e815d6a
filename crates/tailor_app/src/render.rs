//! Text projection of tracker and search state for the terminal.

use tailor_core::{
    DownloadNotice, JobPosting, OverallStatus, RecordRowView, RecordStatus, TrackerViewModel,
};

pub fn render_tracker(view: &TrackerViewModel) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.records.len() + 3);
    let demo_tag = if view.simulated { " [demo]" } else { "" };
    lines.push(format!(
        "Tailoring {} job(s) - {} completed{}",
        view.records.len(),
        view.completed_count,
        demo_tag
    ));
    for row in &view.records {
        lines.push(render_record_row(row));
    }
    if let Some(error) = &view.last_poll_error {
        lines.push(format!("  status fetch failed; retrying: {error}"));
    }
    if view.overall == OverallStatus::Failed {
        let detail = view.batch_error.as_deref().unwrap_or("no detail given");
        lines.push(format!("Tailoring failed: {detail}"));
    }
    if let Some(notice) = &view.download_notice {
        lines.push(render_download_notice(notice));
    }
    lines
}

fn render_record_row(row: &RecordRowView) -> String {
    let mut line = format!(
        "{:>3}. [{}] {} - {}",
        row.index + 1,
        status_label(row.status),
        row.title,
        row.company
    );
    match row.status {
        RecordStatus::Completed => {
            if let Some(url) = &row.result_url {
                line.push_str(&format!("  -> {url}"));
            }
        }
        RecordStatus::Failed => {
            let detail = row.error_message.as_deref().unwrap_or("unknown error");
            line.push_str(&format!("  !! {detail}"));
        }
        RecordStatus::Processing => {
            if let Some(progress) = &row.progress_message {
                line.push_str(&format!("  ({progress})"));
            }
        }
        RecordStatus::Pending => {}
    }
    line
}

fn status_label(status: RecordStatus) -> &'static str {
    match status {
        RecordStatus::Pending => "  pending ",
        RecordStatus::Processing => "processing",
        RecordStatus::Completed => "completed ",
        RecordStatus::Failed => "  failed  ",
    }
}

fn render_download_notice(notice: &DownloadNotice) -> String {
    match notice {
        DownloadNotice::NothingToDownload => "No completed documents to download.".to_string(),
        DownloadNotice::AllSaved { count } => format!("Saved {count} document(s)."),
        DownloadNotice::SomeFailed { failed, attempted } => format!(
            "Some downloads may have failed: {failed} of {attempted} attempt(s) failed."
        ),
    }
}

pub fn render_postings(postings: &[JobPosting]) -> Vec<String> {
    let mut lines = Vec::with_capacity(postings.len() + 1);
    lines.push(format!("{} posting(s) found", postings.len()));
    for (position, posting) in postings.iter().enumerate() {
        let mut line = format!(
            "{:>3}. {} - {} ({})",
            position + 1,
            posting.title,
            posting.company,
            posting.location
        );
        if let Some(salary) = &posting.salary {
            line.push_str(&format!("  {salary}"));
        }
        if !posting.posting_url.is_empty() {
            line.push_str(&format!("  {}", posting.posting_url));
        }
        lines.push(line);
    }
    lines
}
