//! End-to-end publish flow tests across the workspace crates.
//!
//! The fixture here builds a realistic static site tree, including the
//! hosting special files and the junk a real build directory accumulates.

use std::path::Path;

/// Writes a small static site under `root`.
///
/// Publishable files: `index.html`, `about.html`, `css/site.css`,
/// `post/hello/index.html`, `.htaccess`, `_redirects`.
/// Junk that must never publish: `.DS_Store`, a `.git/` subtree.
pub fn write_site(root: &Path) {
    let write = |rel: &str, content: &[u8]| {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    };

    write("index.html", b"<html>home</html>");
    write("about.html", b"<html>about</html>");
    write("css/site.css", b"body { margin: 0 }");
    write("post/hello/index.html", b"<html>hello</html>");
    write(".htaccess", b"RewriteEngine On");
    write("_redirects", b"/old /new 301");

    write(".DS_Store", b"finder junk");
    write(".git/HEAD", b"ref: refs/heads/master");
    write(".git/objects/aa/bb", b"blob");
}

/// The manifest keys `write_site` should publish.
pub const PUBLISHED_KEYS: [&str; 6] = [
    "/.htaccess",
    "/_redirects",
    "/about.html",
    "/css/site.css",
    "/index.html",
    "/post/hello/index.html",
];
