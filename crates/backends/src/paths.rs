//! Upload path helpers shared by backends.

use std::path::{Component, Path};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use siteship_publish::PublishError;

const URL_ESCAPE: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'%').add(b'?');

/// Strips the manifest key's leading slash and validates that the rest
/// stays inside the target: non-empty, no `..`, no root/prefix components.
pub(crate) fn site_relative(key: &str) -> Result<&str, PublishError> {
    let rel = key.trim_start_matches('/');
    if rel.is_empty() {
        return Err(PublishError::Backend(format!("empty upload path: {key:?}")));
    }

    for component in Path::new(rel).components() {
        match component {
            Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                return Err(PublishError::Backend(format!("invalid upload path: {key}")));
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }

    Ok(rel)
}

/// Percent-encodes a path for use inside an API URL.
pub(crate) fn url_path(path: &str) -> String {
    utf8_percent_encode(path, URL_ESCAPE).to_string()
}
