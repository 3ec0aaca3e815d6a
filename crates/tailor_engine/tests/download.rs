use std::sync::{Arc, Mutex};
use std::time::Instant;

use tailor_core::DownloadItem;
use tailor_engine::{
    tailored_filename, ApiClient, ApiFailureKind, ClientSettings, DownloadSettings, Downloader,
    EngineEvent, EventSink,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn downloader(server: &MockServer, output_dir: std::path::PathBuf) -> Downloader {
    let api = ApiClient::new(&server.uri(), ClientSettings::default()).expect("client builds");
    Downloader::new(api, DownloadSettings::new(output_dir))
}

fn item(index: usize, url: &str, company: &str, title: &str) -> DownloadItem {
    DownloadItem {
        index,
        url: url.to_string(),
        company: company.to_string(),
        title: title.to_string(),
    }
}

#[test]
fn filenames_are_derived_from_company_and_title() {
    assert_eq!(
        tailored_filename("Acme Corp.", "Sr Engineer"),
        "Resume_Acme_Corp_Sr_Engineer.pdf"
    );
    // Forbidden characters are dropped, whitespace runs collapse.
    assert_eq!(
        tailored_filename("Initech / GmbH", "ML\tResearcher  II"),
        "Resume_Initech_GmbH_ML_Researcher_II.pdf"
    );
    assert_eq!(tailored_filename("", ""), "Resume_Unknown_Unknown.pdf");
}

#[tokio::test]
async fn single_download_saves_under_the_derived_filename() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/a.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7 tailored".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let downloader = downloader(&server, dir.path().to_path_buf());

    let saved = downloader
        .download_one(&item(0, "/api/download/a.pdf", "Acme", "Rust Engineer"))
        .await
        .expect("download ok");

    let expected = dir.path().join("Resume_Acme_Rust_Engineer.pdf");
    assert_eq!(saved.path, expected.display().to_string());
    assert_eq!(saved.bytes, 17);
    assert_eq!(
        std::fs::read(expected).expect("file exists"),
        b"%PDF-1.7 tailored"
    );
}

#[tokio::test]
async fn failed_download_saves_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let downloader = downloader(&server, dir.path().to_path_buf());

    let err = downloader
        .download_one(&item(0, "/api/download/missing.pdf", "Acme", "Engineer"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiFailureKind::HttpStatus(404));
    assert!(!dir.path().join("Resume_Acme_Engineer.pdf").exists());
}

#[tokio::test]
async fn batch_keeps_going_past_a_failed_item_with_spacing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/a.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"doc a".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/download/b.pdf"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/download/c.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"doc c".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let downloader = downloader(&server, dir.path().to_path_buf());
    let items = vec![
        item(0, "/api/download/a.pdf", "Acme", "Engineer"),
        item(1, "/api/download/b.pdf", "Globex", "Analyst"),
        item(2, "/api/download/c.pdf", "Initech", "Designer"),
    ];

    let sink = TestSink::new();
    let started = Instant::now();
    downloader.download_batch(&items, &sink).await;
    let elapsed = started.elapsed();

    // Two inter-item pauses of 500ms each.
    assert!(
        elapsed.as_millis() >= 1_000,
        "batch finished too quickly: {elapsed:?}"
    );

    let events = sink.take();
    let indices: Vec<_> = events
        .iter()
        .map(|event| match event {
            EngineEvent::DownloadFinished { index, .. } => *index,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(indices, vec![0, 1, 2]);

    let outcomes: Vec<_> = events
        .iter()
        .map(|event| match event {
            EngineEvent::DownloadFinished { result, .. } => result.is_ok(),
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(outcomes, vec![true, false, true]);

    assert!(dir.path().join("Resume_Acme_Engineer.pdf").exists());
    assert!(!dir.path().join("Resume_Globex_Analyst.pdf").exists());
    assert!(dir.path().join("Resume_Initech_Designer.pdf").exists());
}

#[tokio::test]
async fn redownload_replaces_the_existing_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download/a.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"second version".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("Resume_Acme_Engineer.pdf");
    std::fs::write(&target, b"first version").expect("seed file");

    let downloader = downloader(&server, dir.path().to_path_buf());
    downloader
        .download_one(&item(0, "/api/download/a.pdf", "Acme", "Engineer"))
        .await
        .expect("download ok");

    assert_eq!(std::fs::read(target).expect("file exists"), b"second version");
}
