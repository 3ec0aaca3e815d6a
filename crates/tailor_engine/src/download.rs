use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use client_logging::{client_info, client_warn};
use tailor_core::DownloadItem;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::api::ApiClient;
use crate::filename::tailored_filename;
use crate::types::{ApiFailure, ApiFailureKind, EngineEvent, EventSink, SavedFile};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct DownloadSettings {
    pub output_dir: PathBuf,
    /// Pause between items of a bulk run, to stay friendly to whatever
    /// is watching the output directory.
    pub spacing: Duration,
}

impl DownloadSettings {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            spacing: Duration::from_millis(500),
        }
    }
}

/// Fetches tailored resume documents and persists them atomically under
/// the output directory.
#[derive(Debug, Clone)]
pub struct Downloader {
    api: ApiClient,
    settings: DownloadSettings,
}

impl Downloader {
    pub fn new(api: ApiClient, settings: DownloadSettings) -> Self {
        Self { api, settings }
    }

    pub async fn download_one(&self, item: &DownloadItem) -> Result<SavedFile, ApiFailure> {
        let content = self.api.fetch_document(&item.url).await?;
        let filename = tailored_filename(&item.company, &item.title);
        let path = write_atomic(&self.settings.output_dir, &filename, &content)
            .map_err(|err| ApiFailure::new(ApiFailureKind::Io, err.to_string()))?;
        client_info!(
            "Saved {} ({} bytes) for record {}",
            path.display(),
            content.len(),
            item.index
        );
        Ok(SavedFile {
            path: path.display().to_string(),
            bytes: content.len() as u64,
        })
    }

    /// Walks the items strictly in order, one completion event per item.
    /// A failed item is reported and the run continues; only the caller
    /// decides what a partial result means.
    pub async fn download_batch(&self, items: &[DownloadItem], sink: &dyn EventSink) {
        for (position, item) in items.iter().enumerate() {
            if position > 0 {
                tokio::time::sleep(self.settings.spacing).await;
            }
            let result = self.download_one(item).await;
            if let Err(failure) = &result {
                client_warn!("Download for record {} failed: {}", item.index, failure);
            }
            sink.emit(EngineEvent::DownloadFinished {
                index: item.index,
                result,
            });
        }
    }
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file
/// then renaming.
fn write_atomic(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
    ensure_output_dir(dir)?;

    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    // Replace an existing file if present to keep re-runs deterministic.
    if target.exists() {
        fs::remove_file(&target)?;
    }
    tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
    Ok(target)
}
