use std::time::Duration;

use futures_util::StreamExt;
use reqwest::multipart;
use tailor_core::{BatchSnapshot, JobPosting, SearchParams};
use url::Url;

use crate::types::{ApiFailure, ApiFailureKind};
use crate::wire::{
    self, ExtractionStatusWire, SearchResponseWire, TailorStartWire, TailorStatusWire, UploadWire,
};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Cap on a downloaded document body.
    pub max_document_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_document_bytes: 20 * 1024 * 1024,
        }
    }
}

/// Receipt for an accepted resume upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub resume_id: String,
    pub filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionState {
    Processing,
    Completed,
    Failed,
}

/// Current state of a resume extraction, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionStatus {
    pub state: ExtractionState,
    pub extracted_data: Option<serde_json::Value>,
    pub error_message: Option<String>,
}

/// HTTP client for the tailoring backend. All heavy lifting (scraping,
/// AI rewriting, PDF rendering) happens behind these endpoints; the
/// client only moves requests and status snapshots across the wire.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    client: reqwest::Client,
    max_document_bytes: u64,
}

impl ApiClient {
    pub fn new(base_url: &str, settings: ClientSettings) -> Result<Self, ApiFailure> {
        let base = Url::parse(base_url)
            .map_err(|err| ApiFailure::new(ApiFailureKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiFailure::new(ApiFailureKind::Network, err.to_string()))?;
        Ok(Self {
            base,
            client,
            max_document_bytes: settings.max_document_bytes,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiFailure> {
        self.base
            .join(path)
            .map_err(|err| ApiFailure::new(ApiFailureKind::InvalidUrl, err.to_string()))
    }

    pub async fn upload_resume(
        &self,
        filename: &str,
        content: Vec<u8>,
    ) -> Result<UploadReceipt, ApiFailure> {
        let part = multipart::Part::bytes(content).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(self.endpoint("/api/upload")?)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let wire: UploadWire = decode_json(require_success(response)?).await?;
        Ok(UploadReceipt {
            resume_id: wire.resume_id,
            filename: wire.filename.unwrap_or_else(|| filename.to_string()),
        })
    }

    /// Kicks off extraction for an uploaded resume; the backend responds
    /// with the initial status.
    pub async fn start_extraction(&self, resume_id: &str) -> Result<ExtractionStatus, ApiFailure> {
        let response = self
            .client
            .post(self.endpoint(&format!("/api/extract/{resume_id}"))?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let wire: ExtractionStatusWire = decode_json(require_success(response)?).await?;
        Ok(extraction_status(wire))
    }

    pub async fn extraction_status(&self, resume_id: &str) -> Result<ExtractionStatus, ApiFailure> {
        let response = self
            .client
            .get(self.endpoint(&format!("/api/extract/{resume_id}/status"))?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let wire: ExtractionStatusWire = decode_json(require_success(response)?).await?;
        Ok(extraction_status(wire))
    }

    pub async fn search_jobs(&self, params: &SearchParams) -> Result<Vec<JobPosting>, ApiFailure> {
        let mut url = self.endpoint("/api/search")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", &params.query);
            pairs.append_pair("location", &params.location);
            pairs.append_pair("limit", &params.limit.to_string());
            if let Some(proxy) = &params.proxy {
                pairs.append_pair("proxy", proxy);
            }
        }
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let wire: SearchResponseWire = decode_json(require_success(response)?).await?;
        Ok(wire
            .jobs
            .iter()
            .enumerate()
            .map(|(index, row)| wire::posting_from_row(row, index))
            .collect())
    }

    /// Submits a batch of postings for tailoring and returns the
    /// server-issued task id tracking it.
    pub async fn start_tailoring(
        &self,
        resume_id: &str,
        postings: &[JobPosting],
    ) -> Result<String, ApiFailure> {
        let job_descriptions: Vec<_> = postings
            .iter()
            .map(|posting| {
                serde_json::json!({
                    "title": posting.title,
                    "company": posting.company,
                    "location": posting.location,
                    "description": posting.description,
                })
            })
            .collect();
        let body = serde_json::json!({
            "resume_id": resume_id,
            "job_descriptions": job_descriptions,
        });
        let response = self
            .client
            .post(self.endpoint("/api/tailor")?)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let wire: TailorStartWire = decode_json(require_success(response)?).await?;
        Ok(wire.task_id)
    }

    pub async fn tailoring_status(&self, task_id: &str) -> Result<BatchSnapshot, ApiFailure> {
        let response = self
            .client
            .get(self.endpoint(&format!("/api/tailor/{task_id}/status"))?)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let wire: TailorStatusWire = decode_json(require_success(response)?).await?;
        Ok(wire.into_snapshot())
    }

    /// Persists user corrections to the extracted resume data.
    pub async fn update_resume(
        &self,
        resume_id: &str,
        data: &serde_json::Value,
    ) -> Result<(), ApiFailure> {
        let response = self
            .client
            .put(self.endpoint(&format!("/api/resume/{resume_id}"))?)
            .json(data)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        require_success(response)?;
        Ok(())
    }

    /// Fetches a binary document. Absolute links are used verbatim;
    /// relative ones resolve against the backend origin.
    pub async fn fetch_document(&self, link: &str) -> Result<Vec<u8>, ApiFailure> {
        let url = match Url::parse(link) {
            Ok(absolute) => absolute,
            Err(_) => self.endpoint(link)?,
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = require_success(response)?;

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_document_bytes {
                return Err(ApiFailure::new(
                    ApiFailureKind::TooLarge {
                        max_bytes: self.max_document_bytes,
                        actual: Some(content_len),
                    },
                    "document too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_document_bytes {
                return Err(ApiFailure::new(
                    ApiFailureKind::TooLarge {
                        max_bytes: self.max_document_bytes,
                        actual: Some(next_len),
                    },
                    "document too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

fn extraction_status(wire: ExtractionStatusWire) -> ExtractionStatus {
    let state = match wire.status.as_str() {
        "completed" => ExtractionState::Completed,
        "failed" => ExtractionState::Failed,
        _ => ExtractionState::Processing,
    };
    ExtractionStatus {
        state,
        extracted_data: wire.extracted_data,
        error_message: wire.error_message,
    }
}

fn require_success(response: reqwest::Response) -> Result<reqwest::Response, ApiFailure> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiFailure::new(
            ApiFailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

async fn decode_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiFailure> {
    response
        .json()
        .await
        .map_err(|err| ApiFailure::new(ApiFailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiFailure {
    if err.is_timeout() {
        return ApiFailure::new(ApiFailureKind::Timeout, err.to_string());
    }
    ApiFailure::new(ApiFailureKind::Network, err.to_string())
}
