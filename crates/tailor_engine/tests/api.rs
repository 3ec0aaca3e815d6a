use pretty_assertions::assert_eq;
use serde_json::json;
use tailor_core::{OverallStatus, RecordStatus, SearchParams};
use tailor_engine::{ApiClient, ApiFailureKind, ClientSettings, ExtractionState};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), ClientSettings::default()).expect("client builds")
}

fn search_params() -> SearchParams {
    SearchParams {
        query: "Rust Engineer".to_string(),
        location: "Berlin".to_string(),
        limit: 20,
        proxy: None,
    }
}

#[tokio::test]
async fn search_tolerates_field_aliases() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("query", "Rust Engineer"))
        .and(query_param("location", "Berlin"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobs": [
                {
                    "id": "li-100",
                    "Title": "Rust Engineer",
                    "company": "Acme",
                    "Location": "Berlin",
                    "job_url": "https://jobs.example.com/li-100",
                    "description": "Build backend services",
                    "job_type": "fulltime",
                    "min_amount": 90000.0,
                    "max_amount": 120000.0,
                    "currency": "EUR",
                    "company_logo": "https://jobs.example.com/logo.png",
                    "num_applicants": 17
                },
                {
                    "title": "Analyst",
                    "Company": "Globex",
                    "location": "NYC",
                    "posting_url": "https://jobs.example.com/2",
                    "Description": "Crunch numbers",
                    "salary": "100k"
                }
            ],
            "total_count": 2,
            "search_term": "Rust Engineer",
            "location": "Berlin"
        })))
        .mount(&server)
        .await;

    let postings = client(&server)
        .search_jobs(&search_params())
        .await
        .expect("search ok");

    assert_eq!(postings.len(), 2);
    let first = &postings[0];
    assert_eq!(first.id, "li-100");
    assert_eq!(first.title, "Rust Engineer");
    assert_eq!(first.company, "Acme");
    assert_eq!(first.location, "Berlin");
    assert_eq!(first.posting_url, "https://jobs.example.com/li-100");
    assert_eq!(first.employment_type.as_deref(), Some("fulltime"));
    assert_eq!(first.salary.as_deref(), Some("90000-120000 EUR"));
    assert_eq!(
        first.logo_url.as_deref(),
        Some("https://jobs.example.com/logo.png")
    );
    assert_eq!(first.applicant_count, Some(17));

    let second = &postings[1];
    // Rows without an id stay addressable by position.
    assert_eq!(second.id, "job-1");
    assert_eq!(second.company, "Globex");
    assert_eq!(second.salary.as_deref(), Some("100k"));
}

#[tokio::test]
async fn search_passes_the_proxy_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("proxy", "http://gate.proxy.example:10001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jobs": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let params = SearchParams {
        proxy: Some("http://gate.proxy.example:10001".to_string()),
        ..search_params()
    };
    let postings = client(&server).search_jobs(&params).await.expect("search ok");
    assert!(postings.is_empty());
}

#[tokio::test]
async fn search_maps_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server)
        .search_jobs(&search_params())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiFailureKind::HttpStatus(500));
}

#[tokio::test]
async fn upload_returns_the_receipt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resume_id": "r-42",
            "filename": "cv.pdf",
            "message": "Resume uploaded successfully"
        })))
        .mount(&server)
        .await;

    let receipt = client(&server)
        .upload_resume("cv.pdf", b"%PDF-1.7 fake".to_vec())
        .await
        .expect("upload ok");
    assert_eq!(receipt.resume_id, "r-42");
    assert_eq!(receipt.filename, "cv.pdf");
}

#[tokio::test]
async fn extraction_round_trip_maps_states() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/extract/r-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resume_id": "r-42",
            "status": "processing"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/extract/r-42/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resume_id": "r-42",
            "status": "completed",
            "extracted_data": { "name": "Ada Lovelace" }
        })))
        .mount(&server)
        .await;

    let api = client(&server);
    let started = api.start_extraction("r-42").await.expect("start ok");
    assert_eq!(started.state, ExtractionState::Processing);

    let status = api.extraction_status("r-42").await.expect("status ok");
    assert_eq!(status.state, ExtractionState::Completed);
    assert_eq!(
        status.extracted_data,
        Some(json!({ "name": "Ada Lovelace" }))
    );
}

#[tokio::test]
async fn start_tailoring_submits_descriptions_and_returns_the_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tailor"))
        .and(body_partial_json(json!({
            "resume_id": "r-42",
            "job_descriptions": [
                { "company": "Acme", "title": "Rust Engineer" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "t-7",
            "message": "Resume tailoring started",
            "status": "processing"
        })))
        .mount(&server)
        .await;

    let posting = tailor_core::JobPosting {
        id: "li-100".to_string(),
        title: "Rust Engineer".to_string(),
        company: "Acme".to_string(),
        location: "Berlin".to_string(),
        description: "Build backend services".to_string(),
        posting_url: "https://jobs.example.com/li-100".to_string(),
        ..tailor_core::JobPosting::default()
    };
    let task_id = client(&server)
        .start_tailoring("r-42", &[posting])
        .await
        .expect("tailoring starts");
    assert_eq!(task_id, "t-7");
}

#[tokio::test]
async fn tailoring_status_parses_the_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tailor/t-7/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "t-7",
            "overall_status": "in_progress",
            "total_jobs": 3,
            "completed_jobs": 1,
            "failed_jobs": 0,
            "individual_jobs": [
                {
                    "job_index": 0,
                    "status": "completed",
                    "download_links": { "pdf": "/api/download/a.pdf", "json": "/api/download/a.json" },
                    "progress_message": "Resume tailored successfully!"
                },
                {
                    "job_index": 1,
                    "status": "processing",
                    "progress_message": "Tailoring resume with AI..."
                },
                {
                    "job_index": 2,
                    "status": "queued"
                }
            ]
        })))
        .mount(&server)
        .await;

    let snapshot = client(&server)
        .tailoring_status("t-7")
        .await
        .expect("status ok");

    assert_eq!(snapshot.overall_status, OverallStatus::InProgress);
    assert_eq!(snapshot.completed_jobs, 1);
    assert_eq!(snapshot.jobs.len(), 3);
    assert_eq!(snapshot.jobs[0].status, Some(RecordStatus::Completed));
    assert_eq!(
        snapshot.jobs[0]
            .download_links
            .as_ref()
            .and_then(|links| links.preferred()),
        Some("/api/download/a.pdf")
    );
    assert_eq!(snapshot.jobs[1].status, Some(RecordStatus::Processing));
    // Statuses the client does not recognize surface as `None`.
    assert_eq!(snapshot.jobs[2].status, None);
}

#[tokio::test]
async fn update_resume_puts_the_corrected_data() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/resume/r-42"))
        .and(body_partial_json(json!({ "name": "Ada Lovelace" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Resume data updated successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .update_resume("r-42", &json!({ "name": "Ada Lovelace" }))
        .await
        .expect("update ok");
}

#[tokio::test]
async fn fetch_document_resolves_relative_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/a.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF binary".to_vec()))
        .mount(&server)
        .await;

    let bytes = client(&server)
        .fetch_document("/api/download/a.pdf")
        .await
        .expect("document ok");
    assert_eq!(bytes, b"%PDF binary");
}

#[tokio::test]
async fn fetch_document_rejects_oversized_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/huge.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 32]))
        .mount(&server)
        .await;

    let settings = ClientSettings {
        max_document_bytes: 16,
        ..ClientSettings::default()
    };
    let api = ApiClient::new(&server.uri(), settings).expect("client builds");
    let err = api.fetch_document("/api/download/huge.pdf").await.unwrap_err();
    assert!(matches!(err.kind, ApiFailureKind::TooLarge { .. }));
}
