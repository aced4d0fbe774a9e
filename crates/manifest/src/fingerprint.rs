//! Content fingerprinting.
//!
//! A fingerprint is the lowercase hex SHA-1 of a file's bytes. It depends
//! on content only — never on mtime or permissions — so an unchanged build
//! republishes to an identical manifest.

use std::io::Read;
use std::path::Path;

use sha1::{Digest, Sha1};

use crate::ManifestError;

/// Computes the SHA-1 fingerprint of an in-memory byte slice.
pub fn fingerprint_bytes(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Computes the SHA-1 fingerprint of a file, streaming in 8 KiB reads.
pub fn fingerprint_file(path: &Path) -> Result<String, ManifestError> {
    let err = |source| ManifestError::Fingerprint {
        path: path.to_path_buf(),
        source,
    };

    let mut file = std::fs::File::open(path).map_err(err)?;
    let mut hasher = Sha1::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(err)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
