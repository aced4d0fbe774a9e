//! Manifest construction: scanner output fed through the fingerprinter.

use std::path::Path;

use crate::scanner::scan_files;
use crate::{Manifest, ManifestError, fingerprint::fingerprint_file};

/// Builds the manifest for a build directory.
///
/// A fingerprint failure aborts the whole build: a file silently missing
/// from the manifest would never get published.
pub fn build_manifest(root: &Path) -> Result<Manifest, ManifestError> {
    let mut manifest = Manifest::new();
    for rel in scan_files(root)? {
        let digest = fingerprint_file(&root.join(&rel))?;
        manifest.insert(manifest_key(&rel), digest);
    }
    Ok(manifest)
}

/// Normalizes a scanner-relative path into a manifest key: single leading
/// `/`, forward slashes, duplicate slashes collapsed.
pub fn manifest_key(rel: &str) -> String {
    let mut key = String::with_capacity(rel.len() + 1);
    key.push('/');
    let mut prev_slash = true;
    for ch in rel.chars() {
        if ch == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        key.push(ch);
    }
    key
}
