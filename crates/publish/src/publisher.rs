//! Publish orchestrator.
//!
//! Drives one publish run: manifest build, remote diff, per-file upload
//! with bounded retry, and aggregation into a single [`PublishResult`].
//! Supports cooperative cancellation and progress events.

use std::collections::BTreeSet;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use siteship_manifest::{build_manifest, upload_set};
use tokio::sync::{OnceCell, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::backend::{Backend, ProbeReport};
use crate::error::PublishError;
use crate::types::{PublishEvent, PublishResult, UploadTask};

/// Constructs the backend for a run. Called at most once per `Publisher`;
/// the result is memoized (single-flight) for the publisher's lifetime.
pub type BackendFactory = Box<
    dyn Fn() -> Pin<Box<dyn Future<Output = Result<Box<dyn Backend>, PublishError>> + Send>>
        + Send
        + Sync,
>;

/// Orchestrates publishing a build directory to one deployment target.
pub struct Publisher {
    build_dir: PathBuf,
    factory: BackendFactory,
    backend: OnceCell<Box<dyn Backend>>,
    cancel: CancellationToken,
    events_tx: mpsc::Sender<PublishEvent>,
    events_rx: Option<mpsc::Receiver<PublishEvent>>,
}

impl Publisher {
    /// Creates a publisher for `build_dir`. The backend is constructed
    /// lazily on first use via `factory`.
    pub fn new(build_dir: impl Into<PathBuf>, factory: BackendFactory) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            build_dir: build_dir.into(),
            factory,
            backend: OnceCell::new(),
            cancel: CancellationToken::new(),
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Creates a publisher with an already-constructed backend.
    pub fn with_backend(build_dir: impl Into<PathBuf>, backend: Box<dyn Backend>) -> Self {
        let mut publisher = Self::new(
            build_dir,
            Box::new(|| {
                Box::pin(async {
                    Err(PublishError::AdapterInit("backend already provided".into()))
                })
            }),
        );
        publisher.backend = OnceCell::new_with(Some(backend));
        publisher
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<PublishEvent>> {
        self.events_rx.take()
    }

    /// Returns a cancellation token for this publisher.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Probes the deployment target without publishing anything.
    pub async fn probe(&self) -> Result<ProbeReport, PublishError> {
        let backend = self.backend().await?;
        backend.probe().await
    }

    /// Runs one publish and returns the aggregated result.
    ///
    /// Fatal problems (unreadable build directory, backend init failure)
    /// surface in `message` with `success == false`; per-file upload
    /// failures are collected in `failed_paths` while the run continues.
    pub async fn publish(&self) -> PublishResult {
        match self.run().await {
            Ok(result) => {
                if result.success {
                    let _ = self.events_tx.send(PublishEvent::Completed).await;
                } else {
                    let _ = self
                        .events_tx
                        .send(PublishEvent::Failed {
                            error: result.message.clone(),
                        })
                        .await;
                }
                result
            }
            Err(e) => {
                error!(error = %e, "publish aborted");
                let message = format!("publish aborted: {e}");
                let _ = self
                    .events_tx
                    .send(PublishEvent::Failed {
                        error: message.clone(),
                    })
                    .await;
                PublishResult::failed(message, BTreeSet::new())
            }
        }
    }

    async fn run(&self) -> Result<PublishResult, PublishError> {
        self.emit(0.0, "Scanning build directory...").await;
        self.check_cancelled()?;

        let root = self.build_dir.clone();
        let local = tokio::task::spawn_blocking(move || build_manifest(&root))
            .await
            .map_err(|e| PublishError::Backend(format!("task join error: {e}")))??;

        info!(files = local.len(), "local manifest built");

        let backend = self.backend().await?;

        self.emit(0.1, "Comparing with remote...").await;
        self.check_cancelled()?;

        let remote = match backend.list_remote_manifest().await {
            Ok(remote) => remote,
            Err(e) => {
                warn!(
                    backend = backend.name(),
                    error = %e,
                    "remote manifest unavailable, uploading everything"
                );
                None
            }
        };

        let pending = upload_set(&local, remote.as_ref());
        let total = pending.len();
        let unchanged = local.len() - total;
        debug!(
            backend = backend.name(),
            pending = total,
            unchanged,
            "upload set computed"
        );

        let mut failed_paths = BTreeSet::new();
        let mut uploaded = 0usize;

        for (idx, key) in pending.iter().enumerate() {
            if self.cancel.is_cancelled() {
                // Stop issuing uploads; everything not completed is failed.
                failed_paths.extend(pending[idx..].iter().cloned());
                warn!(remaining = total - idx, "publish cancelled");
                return Ok(PublishResult::failed(
                    format!("publish cancelled after {uploaded} of {total} uploads"),
                    failed_paths,
                ));
            }

            if self.upload_with_retry(backend, key).await {
                uploaded += 1;
            } else {
                failed_paths.insert(key.clone());
            }

            let progress = 0.1 + ((idx + 1) as f64 / total.max(1) as f64) * 0.85;
            self.emit(progress, &format!("Uploading: {key}")).await;
        }

        if failed_paths.is_empty() {
            self.emit(1.0, "Publish complete").await;
            info!(uploaded, unchanged, "publish completed");
            Ok(PublishResult::completed(format!(
                "sync complete: {uploaded} uploaded, {unchanged} unchanged"
            )))
        } else {
            self.emit(1.0, "Upload pass finished").await;
            warn!(failed = failed_paths.len(), total, "publish finished with failures");
            Ok(PublishResult::failed(
                format!("{} of {total} uploads failed", failed_paths.len()),
                failed_paths,
            ))
        }
    }

    /// Attempts one upload, retrying exactly once. Returns whether the
    /// path ended up on the remote.
    async fn upload_with_retry(&self, backend: &dyn Backend, key: &str) -> bool {
        let full_path = self.build_dir.join(key.trim_start_matches('/'));
        let content = match tokio::fs::read(&full_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %key, error = %e, "file unreadable at upload time");
                return false;
            }
        };

        let mut task = UploadTask::new(key);
        loop {
            match backend.upload(key, &content).await {
                Ok(outcome) if outcome.ok => {
                    debug!(path = %key, attempt = task.attempt, "uploaded");
                    return true;
                }
                Ok(outcome) => {
                    warn!(
                        path = %key,
                        attempt = task.attempt,
                        detail = %outcome.status_detail,
                        "upload rejected"
                    );
                }
                Err(e) => {
                    warn!(path = %key, attempt = task.attempt, error = %e, "upload failed");
                }
            }

            match task.retry() {
                Some(retry) => task = retry,
                None => return false,
            }
        }
    }

    /// Backend handle, constructed on first use. Concurrent first-use
    /// callers observe a single instance.
    async fn backend(&self) -> Result<&dyn Backend, PublishError> {
        let backend = self
            .backend
            .get_or_try_init(|| (self.factory)())
            .await?;
        Ok(backend.as_ref())
    }

    fn check_cancelled(&self) -> Result<(), PublishError> {
        if self.cancel.is_cancelled() {
            Err(PublishError::Cancelled)
        } else {
            Ok(())
        }
    }

    async fn emit(&self, progress: f64, status: &str) {
        let _ = self
            .events_tx
            .send(PublishEvent::Progress {
                progress,
                status: status.to_string(),
            })
            .await;
    }
}
