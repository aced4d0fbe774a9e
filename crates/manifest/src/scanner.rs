//! Build directory scanning.
//!
//! Walks a directory tree and produces the relative paths of every file
//! that should be published, with dotfile exclusion and forward-slash
//! normalization.

use std::path::Path;

use crate::ManifestError;

/// Hidden entries that hosting platforms still need served.
const PRESERVED_DOTFILES: [&str; 2] = [".htaccess", "_redirects"];

/// Scans `root` and returns the sorted relative paths of all publishable
/// files.
///
/// Entries whose name starts with `.` are skipped (files and whole
/// directories alike), except `.htaccess` and `_redirects`. Paths use `/`
/// as separator even on Windows. The walk keeps an explicit worklist, so
/// tree depth never grows the call stack.
pub fn scan_files(root: &Path) -> Result<Vec<String>, ManifestError> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = std::fs::read_dir(&dir).map_err(|e| ManifestError::Scan {
            path: dir.clone(),
            source: e,
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| ManifestError::Scan {
                path: dir.clone(),
                source: e,
            })?;

            let name = entry.file_name();
            if is_excluded(&name.to_string_lossy()) {
                continue;
            }

            let path = entry.path();
            let metadata = entry.metadata().map_err(|e| ManifestError::Scan {
                path: path.clone(),
                source: e,
            })?;

            if metadata.is_dir() {
                pending.push(path);
            } else if metadata.is_file() {
                let rel = path
                    .strip_prefix(root)
                    .map_err(std::io::Error::other)
                    .map_err(|e| ManifestError::Scan {
                        path: path.clone(),
                        source: e,
                    })?;
                files.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }
    }

    files.sort();
    Ok(files)
}

fn is_excluded(name: &str) -> bool {
    name.starts_with('.') && !PRESERVED_DOTFILES.contains(&name)
}
