//! Tailor engine: backend API client and effect execution.
mod api;
mod download;
mod engine;
mod filename;
mod source;
mod types;
mod wire;

pub use api::{ApiClient, ClientSettings, ExtractionState, ExtractionStatus, UploadReceipt};
pub use download::{ensure_output_dir, DownloadSettings, Downloader, PersistError};
pub use engine::EngineHandle;
pub use filename::tailored_filename;
pub use source::{RemoteStatusSource, SimulatedStatusSource, StatusSource};
pub use types::{ApiFailure, ApiFailureKind, EngineEvent, EventSink, SavedFile};
