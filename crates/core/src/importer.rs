//! Per-render registry of side-loaded assets.
//!
//! One `Importer` belongs to one render: "already emitted on this page" is
//! render-scoped, so the registry is owned by the render and never shared
//! between concurrent requests.

use crate::resolver::Resolver;
use indexmap::IndexMap;
use proscenium_api::{AssetKind, ResolveError, ResolvedPath, SideLoadEntry};
use tracing::debug;

/// Sibling assets probed for a rendered component, in emission order.
pub const SIDELOAD_SUFFIXES: &[&str] = &[".js", ".ts", ".css", ".module.css"];

#[derive(Debug, Default, Clone)]
pub struct Importer {
    entries: IndexMap<ResolvedPath, SideLoadEntry>,
}

impl Importer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path`; returns whether it was newly added. A repeated import
    /// keeps the original entry at its original position.
    pub fn import(&mut self, path: ResolvedPath, kind: AssetKind) -> bool {
        if self.entries.contains_key(&path) {
            return false;
        }
        let index = self.entries.len();
        debug!(path = %path, kind = kind.as_str(), index, "side-loading asset");
        self.entries.insert(
            path.clone(),
            SideLoadEntry { path, kind, index },
        );
        true
    }

    /// Imported assets in discovery order.
    pub fn imported(&self) -> impl Iterator<Item = (&ResolvedPath, AssetKind)> {
        self.entries.iter().map(|(path, entry)| (path, entry.kind))
    }

    pub fn entries(&self) -> impl Iterator<Item = &SideLoadEntry> {
        self.entries.values()
    }

    pub fn contains(&self, path: &ResolvedPath) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Side-load the sibling assets of a rendered component.
    ///
    /// For `dir/name.ext` this probes `./name.js`, `./name.ts`, `./name.css`
    /// and `./name.module.css` next to it and imports whichever exist.
    /// Returns how many entries were newly added.
    pub fn sideload(
        &mut self,
        resolver: &Resolver,
        component: &ResolvedPath,
    ) -> Result<usize, ResolveError> {
        let stem = component_stem(component.file_name());
        if stem.is_empty() {
            return Ok(0);
        }

        let mut added = 0;
        for suffix in SIDELOAD_SUFFIXES {
            let candidate = format!("./{stem}{suffix}");
            let path = match resolver.resolve(&candidate, Some(component)) {
                Ok(path) => path,
                Err(ResolveError::PathResolutionFailed(_)) => continue,
                Err(err) => return Err(err),
            };
            // Extension inference may land on `name.js.map` for `name.js`.
            if !path.file_name().ends_with(suffix) {
                continue;
            }
            let kind = AssetKind::from_path(path.path());
            if self.import(path, kind) {
                added += 1;
            }
        }
        Ok(added)
    }
}

/// `button_component.html.erb` -> `button_component`
fn component_stem(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proscenium_api::Root;

    fn path(p: &str) -> ResolvedPath {
        ResolvedPath::local(&Root::application("app", "/srv/app"), p)
    }

    #[test]
    fn test_import_dedupes() {
        let mut importer = Importer::new();
        assert!(importer.import(path("/lib/a.js"), AssetKind::Script));
        assert!(importer.import(path("/lib/b.css"), AssetKind::Stylesheet));
        assert!(!importer.import(path("/lib/a.js"), AssetKind::Script));
        assert_eq!(importer.len(), 2);

        let indices: Vec<_> = importer.entries().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_component_stem() {
        assert_eq!(component_stem("button_component.html.erb"), "button_component");
        assert_eq!(component_stem("card.rb"), "card");
        assert_eq!(component_stem("noext"), "noext");
    }
}
