//! In-memory backend.
//!
//! Reference implementation of the full capability set: stores uploads in
//! a shared map and reports them back as a manifest. Useful for dry runs
//! and for exercising the orchestrator in tests.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use siteship_manifest::{Manifest, fingerprint_bytes};
use siteship_publish::{Backend, ProbeReport, PublishError, UploadOutcome};

use crate::paths::site_relative;

#[derive(Default)]
struct Inner {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    upload_calls: AtomicUsize,
}

/// Backend that keeps uploads in memory. Clones share the same store.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored content for a manifest key.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.objects.lock().unwrap().get(key).cloned()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.inner.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total `upload` calls observed, including rejected ones.
    pub fn upload_count(&self) -> usize {
        self.inner.upload_calls.load(Ordering::SeqCst)
    }

    /// Manifest of everything stored.
    pub fn manifest(&self) -> Manifest {
        self.inner
            .objects
            .lock()
            .unwrap()
            .iter()
            .map(|(key, content)| (key.clone(), fingerprint_bytes(content)))
            .collect()
    }
}

impl Backend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn probe(&self) -> Pin<Box<dyn Future<Output = Result<ProbeReport, PublishError>> + Send + '_>> {
        Box::pin(async {
            Ok(ProbeReport {
                reachable: true,
                detail: "in-memory target".into(),
            })
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
            self.inner.upload_calls.fetch_add(1, Ordering::SeqCst);
            site_relative(&key)?;
            self.inner.objects.lock().unwrap().insert(key, content);
            Ok(UploadOutcome::success("stored"))
        })
    }

    fn list_remote_manifest(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Manifest>, PublishError>> + Send + '_>> {
        Box::pin(async { Ok(Some(self.manifest())) })
    }

    fn remove(
        &self,
        rel_path: &str,
    ) -> Pin<Box<dyn Future<Output = Result<UploadOutcome, PublishError>> + Send + '_>> {
        let key = rel_path.to_string();
        Box::pin(async move {
            if self.inner.objects.lock().unwrap().remove(&key).is_some() {
                Ok(UploadOutcome::success("removed"))
            } else {
                Ok(UploadOutcome::failure(format!("no such object: {key}")))
            }
        })
    }
}
