//! Local directory backend.
//!
//! Publishes into a directory on local storage — a staging target, an
//! rsync/NFS mount, or a web root served directly. Supports the full
//! capability set: listing re-fingerprints the target tree, so republishing
//! an unchanged build uploads nothing.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use siteship_manifest::{Manifest, build_manifest};
use siteship_publish::{Backend, ProbeReport, PublishError, UploadOutcome};
use tracing::debug;

use crate::paths::site_relative;

/// Backend rooted at a local target directory.
pub struct DirBackend {
    root: PathBuf,
}

impl DirBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Backend for DirBackend {
    fn name(&self) -> &str {
        "dir"
    }

    fn probe(&self) -> Pin<Box<dyn Future<Output = Result<ProbeReport, PublishError>> + Send + '_>> {
        Box::pin(async {
            match tokio::fs::metadata(&self.root).await {
                Ok(meta) if meta.is_dir() => Ok(ProbeReport {
                    reachable: true,
                    detail: format!("target directory {}", self.root.display()),
                }),
                Ok(_) => Ok(ProbeReport {
                    reachable: false,
                    detail: format!("{} is not a directory", self.root.display()),
                }),
                Err(e) => Ok(ProbeReport {
                    reachable: false,
                    detail: e.to_string(),
                }),
            }
        })
    }

    fn upload(
        &self,
        rel_path: &str,
        content: &[u8],
    ) -> Pin<Box<dyn Future<Output = Result<UploadOutcome, PublishError>> + Send + '_>> {
        let key = rel_path.to_string();
        let content = content.to_vec();
        Box::pin(async move {
            let rel = site_relative(&key)?;
            let full = self.root.join(rel);

            if let Some(parent) = full.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&full, &content).await?;

            debug!(path = %key, bytes = content.len(), "wrote file");
            Ok(UploadOutcome::success(format!("wrote {}", full.display())))
        })
    }

    fn list_remote_manifest(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Manifest>, PublishError>> + Send + '_>> {
        let root = self.root.clone();
        Box::pin(async move {
            let manifest = tokio::task::spawn_blocking(move || {
                if !root.exists() {
                    // Nothing published yet.
                    return Ok(Manifest::new());
                }
                build_manifest(&root)
            })
            .await
            .map_err(|e| PublishError::Backend(format!("task join error: {e}")))??;

            Ok(Some(manifest))
        })
    }

    fn remove(
        &self,
        rel_path: &str,
    ) -> Pin<Box<dyn Future<Output = Result<UploadOutcome, PublishError>> + Send + '_>> {
        let key = rel_path.to_string();
        Box::pin(async move {
            let rel = site_relative(&key)?;
            match tokio::fs::remove_file(self.root.join(rel)).await {
                Ok(()) => Ok(UploadOutcome::success("removed")),
                Err(e) => Ok(UploadOutcome::failure(e.to_string())),
            }
        })
    }
}
