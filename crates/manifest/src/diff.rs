//! Manifest diffing.

use crate::Manifest;

/// Paths that must be uploaded: local entries whose fingerprint is absent
/// from or differs in the remote manifest. Without a remote manifest the
/// whole local manifest is the upload set.
pub fn upload_set(local: &Manifest, remote: Option<&Manifest>) -> Vec<String> {
    match remote {
        None => local.keys().cloned().collect(),
        Some(remote) => local
            .iter()
            .filter(|(key, fingerprint)| remote.get(*key) != Some(*fingerprint))
            .map(|(key, _)| key.clone())
            .collect(),
    }
}

/// Remote paths with no local counterpart. Callers that prune the remote
/// target use this; the publish loop itself never deletes.
pub fn stale_set(local: &Manifest, remote: &Manifest) -> Vec<String> {
    remote
        .keys()
        .filter(|key| !local.contains_key(*key))
        .cloned()
        .collect()
}
