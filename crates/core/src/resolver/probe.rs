//! Filesystem probing with extension and index inference.
//!
//! All paths here are root-relative strings (`/lib/a.js`); nothing may climb
//! above the root it is probed in.

use proscenium_api::Root;
use std::path::PathBuf;

/// Extensions tried, in priority order, when a path has no exact match.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    ".js", ".mjs", ".ts", ".jsx", ".tsx", ".css", ".js.map", ".mjs.map", ".ts.map", ".jsx.map",
    ".tsx.map", ".css.map",
];

/// Lexically normalize a root-relative path.
///
/// Returns `None` when `..` would climb above the root.
pub fn normalize(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(format!("/{}", parts.join("/")))
}

/// Directory part of a root-relative file path.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}

/// Join a relative specifier onto a root-relative directory.
pub fn join(dir: &str, rel: &str) -> Option<String> {
    normalize(&format!("{dir}/{rel}"))
}

/// On-disk location of a root-relative path.
pub fn on_disk(root: &Root, path: &str) -> PathBuf {
    root.dir.join(path.trim_start_matches('/'))
}

pub fn is_file(root: &Root, path: &str) -> bool {
    on_disk(root, path).is_file()
}

/// Find the file `path` names inside `root`: the exact file, then
/// `path + ext`, then `path/index + ext`.
pub fn probe(root: &Root, path: &str) -> Option<String> {
    let path = normalize(path)?;

    if path != "/" && is_file(root, &path) {
        return Some(path);
    }

    if path != "/" {
        for ext in SUPPORTED_EXTENSIONS {
            let candidate = format!("{path}{ext}");
            if is_file(root, &candidate) {
                return Some(candidate);
            }
        }
    }

    let base = path.trim_end_matches('/');
    for ext in SUPPORTED_EXTENSIONS {
        let candidate = format!("{base}/index{ext}");
        if is_file(root, &candidate) {
            return Some(candidate);
        }
    }

    None
}
