use std::fs;
use std::path::{Path, PathBuf};

use client_logging::{client_info, client_warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILENAME: &str = "tailor.ron";

/// Persisted client configuration, read from `./tailor.ron`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_url: String,
    pub output_dir: PathBuf,
    /// Default proxy for search scraping; a `--proxy` flag wins over it.
    #[serde(default)]
    pub proxy: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".to_string(),
            output_dir: PathBuf::from("tailored_resumes"),
            proxy: None,
        }
    }
}

/// Effective configuration after CLI overrides.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub api_url: String,
    pub output_dir: PathBuf,
    pub proxy: Option<String>,
}

pub fn resolve(api_url: Option<String>, output_dir: Option<PathBuf>) -> Resolved {
    let file = load_from(Path::new("."));
    Resolved {
        api_url: api_url.unwrap_or(file.api_url),
        output_dir: output_dir.unwrap_or(file.output_dir),
        proxy: file.proxy,
    }
}

/// Loads the config from `dir`, writing defaults on first run. A broken
/// file is reported and replaced by defaults in memory, never on disk.
fn load_from(dir: &Path) -> AppConfig {
    let path = dir.join(CONFIG_FILENAME);
    match fs::read_to_string(&path) {
        Ok(content) => match ron::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                client_warn!("Failed to parse config {:?}: {}", path, err);
                AppConfig::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let config = AppConfig::default();
            save_defaults(&path, &config);
            config
        }
        Err(err) => {
            client_warn!("Failed to read config {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}

fn save_defaults(path: &Path, config: &AppConfig) {
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(config, pretty) {
        Ok(text) => text,
        Err(err) => {
            client_warn!("Failed to serialize default config: {}", err);
            return;
        }
    };
    match fs::write(path, content) {
        Ok(()) => client_info!("Wrote default config to {:?}", path),
        Err(err) => client_warn!("Failed to write default config to {:?}: {}", path, err),
    }
}
