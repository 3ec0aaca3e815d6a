//! Session driver: wires the CLI commands to the API client and runs the
//! tracker loop for tailoring batches.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use client_logging::{client_debug, client_info, client_warn};
use tailor_core::{
    update, BatchMode, DownloadNotice, JobPosting, Msg, OverallStatus, SearchForm, SearchParams,
    TrackerState,
};
use tailor_engine::{
    ensure_output_dir, ApiClient, ClientSettings, DownloadSettings, Downloader, EngineHandle,
    ExtractionState, RemoteStatusSource, SimulatedStatusSource, StatusSource,
};
use tokio::runtime::Runtime;

use crate::cli::{Cli, Command};
use crate::config::{self, Resolved};
use crate::effects::EffectRunner;
use crate::render;

const EXTRACTION_POLL: Duration = Duration::from_secs(2);
const EXTRACTION_MAX_ROUNDS: u32 = 90;
/// Idle pause of the tracker loop between event sweeps.
const LOOP_IDLE: Duration = Duration::from_millis(50);
/// Consecutive failed poll rounds the CLI tolerates before giving up.
/// The tracker itself never turns transport errors into a terminal
/// state; walking away is a shell decision.
const POLL_FAILURE_LIMIT: u32 = 30;

pub fn run(cli: Cli) -> Result<()> {
    let resolved = config::resolve(cli.api_url, cli.output_dir);
    let runtime = Runtime::new().context("failed to start the async runtime")?;
    let api = ApiClient::new(&resolved.api_url, ClientSettings::default())
        .map_err(|failure| anyhow!("invalid backend URL {:?}: {failure}", resolved.api_url))?;

    match cli.command {
        Command::Search {
            query,
            location,
            limit,
            proxy,
        } => {
            let params = validated_params(query, location, limit, proxy.or(resolved.proxy))?;
            let postings = runtime
                .block_on(api.search_jobs(&params))
                .map_err(|failure| anyhow!("job search failed: {failure}"))?;
            for line in render::render_postings(&postings) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Upload { file } => {
            let resume_id = run_upload(&runtime, &api, &file)?;
            println!("Resume id: {resume_id}");
            Ok(())
        }
        Command::Tailor {
            resume_id,
            query,
            location,
            limit,
            proxy,
            select,
            demo,
        } => {
            let params = validated_params(query, location, limit, proxy.or(resolved.proxy.clone()))?;
            run_tailor(&runtime, &api, &resolved, &resume_id, &params, &select, demo)
        }
        Command::UpdateResume { resume_id, file } => {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let data: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", file.display()))?;
            runtime
                .block_on(api.update_resume(&resume_id, &data))
                .map_err(|failure| anyhow!("resume update failed: {failure}"))?;
            println!("Resume data updated.");
            Ok(())
        }
    }
}

/// Builds validated search parameters or reports the first problem,
/// before any network call is made.
fn validated_params(
    query: String,
    location: String,
    limit: u32,
    proxy: Option<String>,
) -> Result<SearchParams> {
    let form = SearchForm {
        query,
        location,
        limit,
        use_proxy: proxy.is_some(),
        proxy_url: proxy.unwrap_or_default(),
    };
    form.validate().map_err(|err| anyhow!("{err}"))
}

fn run_upload(runtime: &Runtime, api: &ApiClient, file: &Path) -> Result<String> {
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("{} has no file name", file.display()))?;
    let content =
        fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;

    let receipt = runtime
        .block_on(api.upload_resume(&filename, content))
        .map_err(|failure| anyhow!("upload failed: {failure}"))?;
    println!("Uploaded {} as resume {}", receipt.filename, receipt.resume_id);

    runtime
        .block_on(api.start_extraction(&receipt.resume_id))
        .map_err(|failure| anyhow!("extraction failed to start: {failure}"))?;
    println!("Extracting resume data...");

    let data = wait_for_extraction(runtime, api, &receipt.resume_id)?;
    if let Some(name) = data.get("name").and_then(|value| value.as_str()) {
        println!("Extraction complete for {name}.");
    } else {
        println!("Extraction complete.");
    }
    Ok(receipt.resume_id)
}

/// Polls the extraction status until it settles. Transport errors skip
/// the round; an explicit failure from the backend is terminal.
fn wait_for_extraction(
    runtime: &Runtime,
    api: &ApiClient,
    resume_id: &str,
) -> Result<serde_json::Value> {
    for _round in 0..EXTRACTION_MAX_ROUNDS {
        thread::sleep(EXTRACTION_POLL);
        match runtime.block_on(api.extraction_status(resume_id)) {
            Ok(status) => match status.state {
                ExtractionState::Completed => {
                    return Ok(status.extracted_data.unwrap_or(serde_json::Value::Null));
                }
                ExtractionState::Failed => {
                    let detail = status
                        .error_message
                        .unwrap_or_else(|| "unknown error".to_string());
                    bail!("extraction failed: {detail}");
                }
                ExtractionState::Processing => {
                    client_debug!("Extraction still processing for {}", resume_id);
                }
            },
            Err(failure) => {
                client_warn!("Extraction status fetch failed; retrying: {}", failure);
            }
        }
    }
    bail!("extraction did not finish within {EXTRACTION_MAX_ROUNDS} rounds")
}

fn run_tailor(
    runtime: &Runtime,
    api: &ApiClient,
    resolved: &Resolved,
    resume_id: &str,
    params: &SearchParams,
    select: &[usize],
    demo: bool,
) -> Result<()> {
    let postings = runtime
        .block_on(api.search_jobs(params))
        .map_err(|failure| anyhow!("job search failed: {failure}"))?;
    if postings.is_empty() {
        bail!("no jobs found for this search");
    }
    let selected = select_postings(postings, select)?;
    println!("Tailoring against {} posting(s):", selected.len());
    for line in render::render_postings(&selected).into_iter().skip(1) {
        println!("{line}");
    }
    if !demo {
        ensure_output_dir(&resolved.output_dir)
            .map_err(|err| anyhow!("output directory unusable: {err}"))?;
    }

    let mode = if demo {
        BatchMode::Simulated
    } else {
        let task_id = runtime
            .block_on(api.start_tailoring(resume_id, &selected))
            .map_err(|failure| anyhow!("tailoring failed to start: {failure}"))?;
        client_info!("Tailoring task {} accepted", task_id);
        BatchMode::Remote { task_id }
    };

    let source: Arc<dyn StatusSource> = match &mode {
        BatchMode::Remote { task_id } => {
            Arc::new(RemoteStatusSource::new(api.clone(), task_id.clone()))
        }
        BatchMode::Simulated => Arc::new(SimulatedStatusSource::new(selected.len())),
    };
    let downloader = Downloader::new(
        api.clone(),
        DownloadSettings::new(resolved.output_dir.clone()),
    );
    let runner = EffectRunner::new(EngineHandle::new(source, downloader));

    let (mut state, effects) = TrackerState::new(selected, mode);
    runner.run(effects);

    // Drive the tracker until the batch settles, re-rendering on change.
    let mut failed_rounds = 0u32;
    loop {
        let mut progressed = false;
        while let Some(msg) = runner.poll_msg() {
            match &msg {
                Msg::SnapshotFetchFailed { .. } => failed_rounds += 1,
                Msg::SnapshotReceived { .. } => failed_rounds = 0,
                _ => {}
            }
            let (next, effects) = update(state, msg);
            state = next;
            runner.run(effects);
            progressed = true;
        }
        if state.consume_dirty() {
            for line in render::render_tracker(&state.view()) {
                println!("{line}");
            }
        }
        if state.is_settled() {
            break;
        }
        if failed_rounds >= POLL_FAILURE_LIMIT {
            bail!("status polling kept failing; gave up after {POLL_FAILURE_LIMIT} rounds");
        }
        if !progressed {
            thread::sleep(LOOP_IDLE);
        }
    }

    let view = state.view();
    if view.simulated {
        println!("Demo batch finished; no documents were produced.");
        return Ok(());
    }
    if view.overall == OverallStatus::Failed {
        let detail = view.batch_error.as_deref().unwrap_or("no detail given");
        bail!("tailoring failed: {detail}");
    }

    // Bulk download of everything that completed, strictly in order.
    let (next, effects) = update(state, Msg::DownloadAllRequested);
    state = next;
    let downloads_running = !effects.is_empty();
    runner.run(effects);

    if downloads_running {
        while state.view().download_notice.is_none() {
            let mut progressed = false;
            while let Some(msg) = runner.poll_msg() {
                let (next, effects) = update(state, msg);
                state = next;
                runner.run(effects);
                progressed = true;
            }
            if !progressed {
                thread::sleep(LOOP_IDLE);
            }
        }
    }

    match state.view().download_notice {
        Some(DownloadNotice::AllSaved { count }) => {
            println!(
                "Saved {count} document(s) to {}",
                resolved.output_dir.display()
            );
        }
        Some(DownloadNotice::SomeFailed { failed, attempted }) => {
            eprintln!(
                "Some downloads may have failed: {failed} of {attempted} attempt(s) failed. \
                 See {} for what was saved.",
                resolved.output_dir.display()
            );
        }
        Some(DownloadNotice::NothingToDownload) => {
            println!("No completed documents to download.");
        }
        None => {}
    }
    Ok(())
}

/// Maps 1-based `--select` positions onto the search results; an empty
/// selection takes every result.
fn select_postings(postings: Vec<JobPosting>, select: &[usize]) -> Result<Vec<JobPosting>> {
    if select.is_empty() {
        return Ok(postings);
    }
    let mut chosen = Vec::with_capacity(select.len());
    for &position in select {
        if position == 0 || position > postings.len() {
            bail!(
                "selection {position} is out of range (1..={})",
                postings.len()
            );
        }
        chosen.push(postings[position - 1].clone());
    }
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(title: &str) -> JobPosting {
        JobPosting {
            title: title.to_string(),
            company: "Acme".to_string(),
            ..JobPosting::default()
        }
    }

    #[test]
    fn empty_selection_takes_every_posting() {
        let postings = vec![posting("A"), posting("B")];
        let chosen = select_postings(postings.clone(), &[]).expect("selection ok");
        assert_eq!(chosen, postings);
    }

    #[test]
    fn selection_is_one_based_and_ordered_by_the_user() {
        let postings = vec![posting("A"), posting("B"), posting("C")];
        let chosen = select_postings(postings, &[3, 1]).expect("selection ok");
        let titles: Vec<_> = chosen.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A"]);
    }

    #[test]
    fn out_of_range_selection_is_rejected() {
        let postings = vec![posting("A")];
        assert!(select_postings(postings.clone(), &[0]).is_err());
        assert!(select_postings(postings, &[2]).is_err());
    }

    #[test]
    fn invalid_search_input_is_rejected_before_any_network_call() {
        assert!(validated_params(String::new(), "Berlin".into(), 20, None).is_err());
        assert!(validated_params("Rust".into(), "Berlin".into(), 0, None).is_err());
        assert!(
            validated_params("Rust".into(), "Berlin".into(), 20, Some("not a url".into()))
                .is_err()
        );
        assert!(validated_params("Rust".into(), "Berlin".into(), 20, None).is_ok());
    }
}
