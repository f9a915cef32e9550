//! Error types for lfs-fetch operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for lfs-fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching an LFS object.
///
/// Every variant is fatal to the invocation; nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// No repository given on the command line or in the environment
    #[error("Repository not specified. Use --repo owner/repo or set GITHUB_REPO.")]
    MissingRepo,

    /// Repository identifier is not `owner/repo`
    #[error("Invalid repo format. Use owner/repo (got {0:?})")]
    InvalidRepo(String),

    /// No token given on the command line or in the environment
    #[error("Missing GITHUB_TOKEN. Set env GITHUB_TOKEN or pass --token.")]
    MissingToken,

    /// Pointer file could not be read
    #[error("failed to read pointer file {}: {source}", .path.display())]
    ReadPointer {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid LFS pointer format
    #[error("{0}")]
    InvalidPointer(String),

    /// OID parsing error
    #[error("invalid OID: {0}")]
    InvalidOid(String),

    /// Batch endpoint answered with a non-2xx status
    #[error("LFS batch request failed {status} {reason}: {body}")]
    BatchFailed {
        status: u16,
        reason: String,
        body: String,
    },

    /// Batch response object carried an error instead of actions
    #[error("LFS server rejected object: {message} (code: {code})")]
    ObjectError { code: u16, message: String },

    /// Batch response had no usable download action
    #[error("No download action available for object (maybe unauthorized or object missing).")]
    NoDownloadAction,

    /// Download endpoint answered with a non-2xx status
    #[error("Download failed {status} {reason}: {body}")]
    DownloadFailed {
        status: u16,
        reason: String,
        body: String,
    },

    /// Downloaded content did not match the pointer
    #[error("downloaded object does not match pointer: expected {expected}, got {actual}")]
    VerificationFailed { expected: String, actual: String },

    /// Transport-level HTTP failure (DNS, TLS, connection reset)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl From<ureq::Transport> for Error {
    fn from(err: ureq::Transport) -> Self {
        Error::Http(err.to_string())
    }
}
