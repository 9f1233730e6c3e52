//! Ordered set of resolution roots.
//!
//! Precedence is fixed: the application root, then each gem/engine root in
//! registration order, then the package store.

use crate::config::Config;
use proscenium_api::{Root, RootKind};
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

#[derive(Debug, Clone)]
pub struct RootSet {
    roots: Vec<Root>,
    identity: u64,
}

impl RootSet {
    pub fn new(application: Root) -> Self {
        let mut set = Self {
            roots: vec![application],
            identity: 0,
        };
        set.identity = set.compute_identity();
        set
    }

    pub fn from_config(config: &Config) -> Self {
        let mut set = Self::new(Root::application(
            config.application_name.clone(),
            config.application_root.clone(),
        ));
        for engine in &config.engines {
            set.register(Root::gem(engine.name.clone(), engine.path.clone()));
        }
        set.register(Root::package_store(config.package_store_dir()));
        set
    }

    /// Register a root. Returns false when the root was refused.
    ///
    /// A root with an existing name and kind replaces it in place; a name
    /// already taken by a root of another kind is refused, so the application
    /// root can never be displaced. Gems go after the last gem (before the
    /// package store); a package store always goes last.
    pub fn register(&mut self, root: Root) -> bool {
        if let Some(existing) = self.roots.iter_mut().find(|r| r.name == root.name) {
            if existing.kind != root.kind {
                tracing::warn!(
                    name = %root.name,
                    existing = ?existing.kind,
                    refused = ?root.kind,
                    "root name already registered with another kind"
                );
                return false;
            }
            *existing = root;
        } else if root.kind == RootKind::Application {
            tracing::warn!(name = %root.name, "an application root is already registered");
            return false;
        } else {
            match root.kind {
                RootKind::PackageStore => {
                    self.roots.retain(|r| r.kind != RootKind::PackageStore);
                    self.roots.push(root);
                }
                RootKind::Gem | RootKind::Application => {
                    let at = self
                        .roots
                        .iter()
                        .position(|r| r.kind == RootKind::PackageStore)
                        .unwrap_or(self.roots.len());
                    self.roots.insert(at, root);
                }
            }
        }
        self.identity = self.compute_identity();
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Root> {
        self.roots.iter()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn application(&self) -> &Root {
        &self.roots[0]
    }

    pub fn package_store(&self) -> Option<&Root> {
        self.roots.iter().find(|r| r.kind == RootKind::PackageStore)
    }

    pub fn gem(&self, name: &str) -> Option<&Root> {
        self.roots
            .iter()
            .find(|r| r.kind == RootKind::Gem && r.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Root> {
        self.roots.iter().find(|r| r.name == name)
    }

    /// Hash of names, kinds and directories; changes whenever a root does.
    pub fn identity(&self) -> u64 {
        self.identity
    }

    pub fn to_vec(&self) -> Vec<Root> {
        self.roots.clone()
    }

    /// Find the root containing an on-disk path, preferring the deepest
    /// root directory. Returns the root and the root-relative path.
    pub fn owning_root(&self, real: &Path) -> Option<(&Root, String)> {
        self.roots
            .iter()
            .filter_map(|root| {
                let dir = root.dir.canonicalize().unwrap_or_else(|_| root.dir.clone());
                let rel = real.strip_prefix(&dir).ok()?;
                Some((root, dir.components().count(), to_root_relative(rel)))
            })
            .max_by_key(|(_, depth, _)| *depth)
            .map(|(root, _, rel)| (root, rel))
    }

    /// The root that really holds `path` as probed inside `root`.
    ///
    /// Roots may nest (the package store under the application, a vendored
    /// gem); a file under a nested root belongs to the deepest one.
    pub fn owner_of<'a>(&'a self, root: &'a Root, path: &str) -> (&'a Root, String) {
        let on_disk = root.dir.join(path.trim_start_matches('/'));
        let real = on_disk.canonicalize().unwrap_or(on_disk);
        match self.owning_root(&real) {
            Some((owner, rel)) if owner.name != root.name => (owner, rel),
            _ => (root, path.to_string()),
        }
    }

    /// Directories worth watching for changes (everything but the package store).
    pub fn source_dirs(&self) -> Vec<PathBuf> {
        self.roots
            .iter()
            .filter(|r| r.kind != RootKind::PackageStore)
            .map(|r| r.dir.clone())
            .collect()
    }

    fn compute_identity(&self) -> u64 {
        let mut key = String::new();
        for root in &self.roots {
            key.push_str(&root.name);
            key.push('\0');
            key.push_str(root.kind.as_str());
            key.push('\0');
            key.push_str(&root.dir.to_string_lossy());
            key.push('\n');
        }
        xxh3_64(key.as_bytes())
    }
}

fn to_root_relative(rel: &Path) -> String {
    let mut out = String::new();
    for component in rel.components() {
        out.push('/');
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}
