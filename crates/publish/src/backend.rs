//! Backend adapter trait.
//!
//! One hosting platform = one `Backend` implementation. The trait keeps the
//! orchestrator decoupled from transport details and testable with mocks.

use std::future::Future;
use std::pin::Pin;

use siteship_manifest::Manifest;

use crate::error::PublishError;

/// Outcome of probing a deployment target.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub reachable: bool,
    pub detail: String,
}

/// Outcome of a single upload (or remove) call.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub ok: bool,
    pub status_detail: String,
}

impl UploadOutcome {
    pub fn success(detail: impl Into<String>) -> Self {
        Self {
            ok: true,
            status_detail: detail.into(),
        }
    }

    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            status_detail: detail.into(),
        }
    }
}

/// Abstract deployment target.
///
/// `rel_path` arguments are manifest keys: forward slashes with a single
/// leading `/`. Uploads must be idempotent — re-sending identical content
/// for the same path is a remote no-op.
pub trait Backend: Send + Sync {
    /// Short name for log fields (`"netlify"`, `"dir"`, ...).
    fn name(&self) -> &str;

    /// Lightweight reachability/credential check. Never required before a
    /// publish; drives the standalone "test this target" action.
    fn probe(&self) -> Pin<Box<dyn Future<Output = Result<ProbeReport, PublishError>> + Send + '_>>;

    /// Transfers one file's full content to the remote location keyed by
    /// `rel_path`.
    fn upload(
        &self,
        rel_path: &str,
        content: &[u8],
    ) -> Pin<Box<dyn Future<Output = Result<UploadOutcome, PublishError>> + Send + '_>>;

    /// Lists the remote target as a manifest, if the platform can report
    /// per-file content fingerprints. `Ok(None)` means the capability is
    /// absent and the orchestrator uploads everything.
    fn list_remote_manifest(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Manifest>, PublishError>> + Send + '_>> {
        Box::pin(async { Ok(None) })
    }

    /// Removes one remote file. Optional capability for callers that prune;
    /// the publish loop never calls it.
    fn remove(
        &self,
        rel_path: &str,
    ) -> Pin<Box<dyn Future<Output = Result<UploadOutcome, PublishError>> + Send + '_>> {
        let _ = rel_path;
        Box::pin(async { Err(PublishError::Unsupported("remove")) })
    }
}
