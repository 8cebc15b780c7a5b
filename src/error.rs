//! Error types shared across the finder.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Settings that cannot be turned into a usable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("HTTP client could not be built: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// A page could not be fetched from the search endpoint.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Search endpoint returned status {status} for {url}")]
    Status { url: String, status: reqwest::StatusCode },

    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Non-transport failure while processing a single company.
#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Search endpoint '{endpoint}' is not a valid URL: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read input file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse CSV input {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("No company names found in {0}")]
    Empty(PathBuf),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize results to JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write CSV results: {0}")]
    Csv(#[from] csv::Error),
}
