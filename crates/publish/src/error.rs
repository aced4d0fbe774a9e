//! Publish error types.

use siteship_manifest::ManifestError;

/// Errors produced during a publish run.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("backend init failed: {0}")]
    AdapterInit(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("backend does not support {0}")]
    Unsupported(&'static str),

    #[error("cancelled")]
    Cancelled,
}
