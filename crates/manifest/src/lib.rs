//! Build directory manifests: scan, fingerprint, diff.
//!
//! A manifest maps every publishable file in a build directory to the
//! SHA-1 digest of its content. Two manifests (local build vs. remote
//! target) diff into the set of paths that actually need uploading.

pub mod builder;
pub mod diff;
pub mod fingerprint;
pub mod scanner;

pub use builder::{build_manifest, manifest_key};
pub use diff::{stale_set, upload_set};
pub use fingerprint::{fingerprint_bytes, fingerprint_file};
pub use scanner::scan_files;

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Mapping from site-relative path (leading `/`, forward slashes) to the
/// hex SHA-1 fingerprint of the file content. Sorted iteration gives a
/// deterministic upload order.
pub type Manifest = BTreeMap<String, String>;

/// Errors produced while building a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("cannot scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot fingerprint {path}: {source}")]
    Fingerprint {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
