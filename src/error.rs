//! # Error Handling
//!
//! This module defines the centralized error type for the `repo-editor`
//! library. It uses `thiserror` to build a single `Error` enum that covers
//! every anticipated failure mode, each variant carrying enough context
//! (offending path, request URL, missing group ids) to be reported in a log
//! line without further lookups.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum for all library failures.
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Not every variant is fatal. `Classification` errors exclude one asset,
//! `Remote` and `Http` errors fail one file write, and only `Discovery`
//! aborts a run. Callers decide; this module only describes.

use thiserror::Error;

/// Main error type for repo-editor operations
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file could not be parsed.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The configuration parsed but holds contradictory or missing values.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A local file does not fit the asset directory layout.
    #[error("Cannot classify asset {path}: {message}")]
    Classification { path: String, message: String },

    /// Not every configured group could be found on the remote host.
    #[error("Group discovery failed: found {found} of {expected} configured groups (missing: {})", format_ids(missing))]
    Discovery {
        expected: usize,
        found: usize,
        missing: Vec<u64>,
    },

    /// The remote host answered with a non-success status.
    #[error("Remote request failed for {url}{}: {message}", status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Remote {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// A transport-level failure, wrapped from `reqwest::Error`.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON decoding error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A failure while walking glob matches, wrapped from `glob::GlobError`.
    #[error("Glob iteration error: {0}")]
    GlobIteration(#[from] glob::GlobError),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

fn format_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
