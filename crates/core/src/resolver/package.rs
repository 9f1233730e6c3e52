//! Package entry discovery and workspace-link indirection.

use super::probe::{self, on_disk};
use crate::roots::RootSet;
use proscenium_api::Root;
use serde_json::Value;
use std::fs;
use tracing::debug;

/// Split a bare specifier into package name and optional subpath.
///
/// `@scope/pkg/a/b` -> (`@scope/pkg`, `a/b`), `pkg` -> (`pkg`, None).
pub fn split_package(specifier: &str) -> Option<(&str, Option<&str>)> {
    let split_at = if specifier.starts_with('@') {
        let first = specifier.find('/')?;
        specifier[first + 1..].find('/').map(|i| first + 1 + i)
    } else {
        specifier.find('/')
    };

    let (name, sub) = match split_at {
        Some(idx) => (&specifier[..idx], Some(&specifier[idx + 1..])),
        None => (specifier, None),
    };
    if name.is_empty() || name.ends_with('/') {
        return None;
    }
    Some((name, sub.filter(|s| !s.is_empty())))
}

/// Where a package really lives.
///
/// A package directory that is a symlink (a workspace link to a sibling
/// package) is followed to its real location and mapped into whichever root
/// owns it. Otherwise the package stays under the package store.
pub fn locate_package<'a>(roots: &'a RootSet, store: &'a Root, package: &str) -> (&'a Root, String) {
    let link_base = format!("/{package}");
    let link = on_disk(store, &link_base);

    let is_link = fs::symlink_metadata(&link)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    if !is_link {
        return (store, link_base);
    }

    let followed = fs::canonicalize(&link)
        .ok()
        .and_then(|real| roots.owning_root(&real));
    match followed {
        Some((root, base)) => {
            debug!(package, root = %root.name, base = %base, "followed workspace link");
            (root, base)
        }
        None => (store, link_base),
    }
}

/// Resolve the entry file of the package rooted at `base`.
///
/// Tries `exports` (string, `"."` string, or `"."` with `import`/`default`),
/// then `module`, then `main`, then index inference.
pub fn package_entry(root: &Root, base: &str) -> Option<String> {
    for candidate in manifest_entries(root, base) {
        if let Some(found) = probe::join(base, &candidate).and_then(|p| probe::probe(root, &p)) {
            return Some(found);
        }
    }
    probe::probe(root, base)
}

fn manifest_entries(root: &Root, base: &str) -> Vec<String> {
    let manifest = on_disk(root, base).join("package.json");
    let Ok(content) = fs::read_to_string(&manifest) else {
        return Vec::new();
    };
    let Ok(json) = serde_json::from_str::<Value>(&content) else {
        debug!(path = %manifest.display(), "ignoring malformed package.json");
        return Vec::new();
    };

    let mut entries = Vec::new();
    if let Some(export) = json.get("exports").and_then(root_export) {
        entries.push(export);
    }
    for field in ["module", "main"] {
        if let Some(value) = json.get(field).and_then(Value::as_str) {
            entries.push(value.to_string());
        }
    }
    entries
}

fn root_export(exports: &Value) -> Option<String> {
    let target = match exports {
        Value::String(_) => exports,
        Value::Object(map) => map.get(".").unwrap_or(exports),
        _ => return None,
    };
    match target {
        Value::String(s) => Some(s.clone()),
        Value::Object(conditions) => ["import", "default"]
            .iter()
            .find_map(|c| conditions.get(*c).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_package() {
        assert_eq!(split_package("react"), Some(("react", None)));
        assert_eq!(split_package("react/jsx-runtime"), Some(("react", Some("jsx-runtime"))));
        assert_eq!(split_package("@scope/pkg"), Some(("@scope/pkg", None)));
        assert_eq!(split_package("@scope/pkg/a/b"), Some(("@scope/pkg", Some("a/b"))));
        assert_eq!(split_package("@scope"), None);
        assert_eq!(split_package(""), None);
    }

    #[test]
    fn test_root_export_shapes() {
        let json: Value = serde_json::from_str(r#""./dist/a.js""#).unwrap();
        assert_eq!(root_export(&json).as_deref(), Some("./dist/a.js"));

        let json: Value = serde_json::from_str(r#"{ ".": "./dist/b.js" }"#).unwrap();
        assert_eq!(root_export(&json).as_deref(), Some("./dist/b.js"));

        let json: Value =
            serde_json::from_str(r#"{ ".": { "require": "./c.cjs", "import": "./c.mjs" } }"#)
                .unwrap();
        assert_eq!(root_export(&json).as_deref(), Some("./c.mjs"));

        let json: Value = serde_json::from_str(r#"{ "default": "./d.js" }"#).unwrap();
        assert_eq!(root_export(&json).as_deref(), Some("./d.js"));
    }

    #[test]
    fn test_package_entry_order() {
        let temp = TempDir::new().unwrap();
        let store = Root::package_store(temp.path());
        let pkg = temp.path().join("pkg");
        fs::create_dir_all(pkg.join("dist")).unwrap();
        fs::write(
            pkg.join("package.json"),
            r#"{ "module": "./dist/esm", "main": "./dist/cjs.js" }"#,
        )
        .unwrap();
        fs::write(pkg.join("dist/esm.js"), "").unwrap();
        fs::write(pkg.join("dist/cjs.js"), "").unwrap();

        assert_eq!(package_entry(&store, "/pkg").as_deref(), Some("/pkg/dist/esm.js"));
    }

    #[test]
    fn test_package_entry_falls_back_to_index() {
        let temp = TempDir::new().unwrap();
        let store = Root::package_store(temp.path());
        let pkg = temp.path().join("bare");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("index.js"), "").unwrap();

        assert_eq!(package_entry(&store, "/bare").as_deref(), Some("/bare/index.js"));
    }
}
