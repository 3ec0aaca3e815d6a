//! Serde shapes for the backend API, plus their conversions into core
//! types. Search results come from a scraping pipeline and are parsed
//! leniently: field names are tolerated under several aliases and a row
//! missing optional fields still yields a posting.

use client_logging::client_warn;
use serde::Deserialize;
use serde_json::Value;
use tailor_core::{
    BatchSnapshot, DownloadLinks, JobPosting, OverallStatus, RecordSnapshot, RecordStatus,
};

#[derive(Debug, Deserialize)]
pub(crate) struct UploadWire {
    pub resume_id: String,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExtractionStatusWire {
    pub status: String,
    #[serde(default)]
    pub extracted_data: Option<Value>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TailorStartWire {
    pub task_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TailorStatusWire {
    pub overall_status: String,
    #[serde(default)]
    pub completed_jobs: u32,
    #[serde(default)]
    pub individual_jobs: Vec<IndividualJobWire>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndividualJobWire {
    pub status: String,
    #[serde(default)]
    pub download_links: Option<DownloadLinksWire>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub progress_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DownloadLinksWire {
    #[serde(default)]
    pub pdf: Option<String>,
    #[serde(default)]
    pub json: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponseWire {
    #[serde(default)]
    pub jobs: Vec<Value>,
}

impl TailorStatusWire {
    pub(crate) fn into_snapshot(self) -> BatchSnapshot {
        BatchSnapshot {
            overall_status: parse_overall_status(&self.overall_status),
            completed_jobs: self.completed_jobs,
            jobs: self
                .individual_jobs
                .into_iter()
                .map(IndividualJobWire::into_record_snapshot)
                .collect(),
            error_message: self.error_message,
        }
    }
}

impl IndividualJobWire {
    fn into_record_snapshot(self) -> RecordSnapshot {
        RecordSnapshot {
            status: parse_record_status(&self.status),
            download_links: self.download_links.map(|links| DownloadLinks {
                pdf: links.pdf,
                json: links.json,
            }),
            error_message: self.error_message,
            progress_message: self.progress_message,
        }
    }
}

fn parse_record_status(raw: &str) -> Option<RecordStatus> {
    match raw {
        "pending" => Some(RecordStatus::Pending),
        "processing" => Some(RecordStatus::Processing),
        "completed" => Some(RecordStatus::Completed),
        "failed" => Some(RecordStatus::Failed),
        other => {
            client_warn!("Unrecognized per-job status {other:?}; leaving record as-is");
            None
        }
    }
}

fn parse_overall_status(raw: &str) -> OverallStatus {
    match raw {
        "completed" => OverallStatus::Completed,
        "failed" => OverallStatus::Failed,
        "pending" | "processing" | "in_progress" => OverallStatus::InProgress,
        other => {
            client_warn!("Unrecognized overall status {other:?}; treating as in progress");
            OverallStatus::InProgress
        }
    }
}

/// Builds a posting from one lenient search row. `fallback_id` keeps rows
/// addressable when the scraper supplies no identifier.
pub(crate) fn posting_from_row(row: &Value, fallback_id: usize) -> JobPosting {
    JobPosting {
        id: string_field(row, &["id", "job_id", "ID"])
            .unwrap_or_else(|| format!("job-{fallback_id}")),
        title: string_field(row, &["title", "Title"]).unwrap_or_default(),
        company: string_field(row, &["company", "Company", "company_name"]).unwrap_or_default(),
        location: string_field(row, &["location", "Location"]).unwrap_or_default(),
        posted_date: string_field(row, &["posted_date", "date_posted", "postedDate"]),
        description: string_field(row, &["description", "Description"]).unwrap_or_default(),
        employment_type: string_field(row, &["employment_type", "job_type", "employmentType"]),
        experience_level: string_field(row, &["experience_level", "job_level", "experienceLevel"]),
        salary: string_field(row, &["salary", "Salary"]).or_else(|| salary_from_amounts(row)),
        posting_url: string_field(row, &["posting_url", "job_url", "postingUrl", "url"])
            .unwrap_or_default(),
        logo_url: string_field(row, &["logo_url", "company_logo", "logoUrl"]),
        applicant_count: integer_field(row, &["applicant_count", "num_applicants"]),
    }
}

/// First non-empty value among the aliases, stringified. Scraper output
/// mixes strings, numbers and nulls for the same column.
fn string_field(row: &Value, aliases: &[&str]) -> Option<String> {
    for key in aliases {
        match row.get(key) {
            Some(Value::String(text)) if !text.trim().is_empty() => {
                return Some(text.trim().to_string());
            }
            Some(Value::Number(number)) => return Some(number.to_string()),
            _ => {}
        }
    }
    None
}

fn integer_field(row: &Value, aliases: &[&str]) -> Option<u64> {
    for key in aliases {
        match row.get(key) {
            Some(Value::Number(number)) => return number.as_u64(),
            Some(Value::String(text)) => {
                if let Ok(parsed) = text.trim().parse() {
                    return Some(parsed);
                }
            }
            _ => {}
        }
    }
    None
}

/// Composes a salary string from the scraper's min/max/currency columns
/// when no preformatted salary is present.
fn salary_from_amounts(row: &Value) -> Option<String> {
    let min = number_field(row, "min_amount");
    let max = number_field(row, "max_amount");
    let currency = string_field(row, &["currency"]).unwrap_or_default();
    let range = match (min, max) {
        (Some(min), Some(max)) => format!("{min:.0}-{max:.0}"),
        (Some(min), None) => format!("from {min:.0}"),
        (None, Some(max)) => format!("up to {max:.0}"),
        (None, None) => return None,
    };
    if currency.is_empty() {
        Some(range)
    } else {
        Some(format!("{range} {currency}"))
    }
}

fn number_field(row: &Value, key: &str) -> Option<f64> {
    match row.get(key) {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    }
}
