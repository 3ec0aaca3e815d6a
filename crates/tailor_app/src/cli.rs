use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "tailor",
    about = "Terminal client for the resume tailoring backend"
)]
pub struct Cli {
    /// Backend base URL; overrides the config file.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory for saved resume documents; overrides the config file.
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, global = true, value_enum, default_value_t = LogDest::File)]
    pub log: LogDest,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogDest {
    File,
    Terminal,
    Both,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search job postings.
    Search {
        #[arg(long)]
        query: String,
        #[arg(long)]
        location: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        /// Proxy URL for the scraping backend; falls back to the config
        /// file.
        #[arg(long)]
        proxy: Option<String>,
    },
    /// Upload a resume and drive its extraction to completion.
    Upload {
        /// Resume file (PDF or DOCX).
        file: PathBuf,
    },
    /// Search, tailor the resume against selected postings, track the
    /// batch to completion and download the documents.
    Tailor {
        /// Resume id from a previous `upload`.
        #[arg(long)]
        resume_id: String,
        #[arg(long)]
        query: String,
        #[arg(long)]
        location: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long)]
        proxy: Option<String>,
        /// 1-based positions of the search results to tailor against;
        /// every result when omitted.
        #[arg(long, value_delimiter = ',')]
        select: Vec<usize>,
        /// Run a simulated batch instead of contacting the tailoring
        /// service. Demonstration only; produces no documents.
        #[arg(long)]
        demo: bool,
    },
    /// Push corrected extracted resume data back to the backend.
    UpdateResume {
        #[arg(long)]
        resume_id: String,
        /// JSON file with the corrected data.
        file: PathBuf,
    },
}
