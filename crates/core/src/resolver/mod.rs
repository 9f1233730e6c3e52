//! Import specifier resolution across the application, gem and package roots.
//!
//! A specifier is first stripped of its bundling directive, then handed to an
//! ordered chain of strategies (see [`strategy`]). Successful results are
//! memoized per `(specifier, requesting file, root set)`; concurrent callers
//! asking for the same key wait for a single computation.

pub mod package;
pub mod probe;
pub mod strategy;

use crate::config::{Config, DEFAULT_ENVIRONMENT};
use crate::error::Result;
use crate::import_map::ImportMap;
use crate::roots::RootSet;
use crate::watch::Invalidate;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use proscenium_api::{BundleMode, ImportSpecifier, ResolveError, ResolvedPath, Root};
use std::path::PathBuf;
use std::sync::Arc;
use strategy::{ResolveContext, ResolveStrategy, build_resolution_chain};
use tracing::debug;

/// Import-map targets may map onto other bare specifiers; cap the chain.
pub const MAX_MAPPING_DEPTH: usize = 8;

/// A resolved path together with the directive its specifier carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: ResolvedPath,
    pub bundle: BundleMode,
}

type CacheKey = (String, Option<ResolvedPath>, u64);

pub struct Resolver {
    roots: RootSet,
    import_map: ImportMap,
    environment: String,
    chain: Box<dyn ResolveStrategy>,
    cache: DashMap<CacheKey, Arc<OnceCell<ResolvedPath>>>,
}

impl Resolver {
    pub fn new(roots: RootSet) -> Self {
        Self {
            roots,
            import_map: ImportMap::new(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            chain: Box::new(build_resolution_chain()),
            cache: DashMap::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let import_map = match config.import_map_path() {
            Some(path) => ImportMap::load(&path)?,
            None => ImportMap::new(),
        };
        Ok(Self::new(RootSet::from_config(config))
            .with_import_map(import_map)
            .with_environment(config.environment.clone()))
    }

    pub fn with_import_map(mut self, import_map: ImportMap) -> Self {
        self.import_map = import_map;
        self.cache.clear();
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self.cache.clear();
        self
    }

    pub fn roots(&self) -> &RootSet {
        &self.roots
    }

    pub fn import_map(&self) -> &ImportMap {
        &self.import_map
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Register a gem/engine (or package store) root. Returns false when a
    /// root of another kind already holds the name.
    pub fn register_root(&mut self, root: Root) -> bool {
        let registered = self.roots.register(root);
        if registered {
            self.cache.clear();
        }
        registered
    }

    /// Resolve `specifier` as requested from `from` (if any).
    pub fn resolve(
        &self,
        specifier: &str,
        from: Option<&ResolvedPath>,
    ) -> std::result::Result<ResolvedPath, ResolveError> {
        self.resolve_full(specifier, from).map(|r| r.path)
    }

    /// Resolve and also report the bundling directive the specifier carried.
    pub fn resolve_full(
        &self,
        specifier: &str,
        from: Option<&ResolvedPath>,
    ) -> std::result::Result<Resolution, ResolveError> {
        let spec = ImportSpecifier::parse(specifier);
        let key: CacheKey = (specifier.to_string(), from.cloned(), self.roots.identity());

        let cell = self.cache.entry(key.clone()).or_default().clone();
        if let Some(path) = cell.get() {
            debug!(specifier, "resolution cache hit");
            return Ok(Resolution {
                path: path.clone(),
                bundle: spec.bundle(),
            });
        }

        match cell.get_or_try_init(|| self.run_chain(&spec, from, 0)) {
            Ok(path) => {
                debug!(specifier, resolved = %path, "resolved");
                Ok(Resolution {
                    path: path.clone(),
                    bundle: spec.bundle(),
                })
            }
            Err(err) => {
                self.cache
                    .remove_if(&key, |_, cached| Arc::ptr_eq(cached, &cell) && cached.get().is_none());
                Err(err)
            }
        }
    }

    /// Resolve an import-map target. Targets are taken literally; no
    /// directive stripping and no memoization.
    pub(crate) fn resolve_mapped(
        &self,
        target: &str,
        from: Option<&ResolvedPath>,
        depth: usize,
    ) -> std::result::Result<ResolvedPath, ResolveError> {
        if depth > MAX_MAPPING_DEPTH {
            return Err(ResolveError::PathResolutionFailed(target.to_string()));
        }
        self.run_chain(&ImportSpecifier::verbatim(target), from, depth)
    }

    fn run_chain(
        &self,
        spec: &ImportSpecifier,
        from: Option<&ResolvedPath>,
        depth: usize,
    ) -> std::result::Result<ResolvedPath, ResolveError> {
        let ctx = ResolveContext {
            roots: &self.roots,
            import_map: &self.import_map,
            environment: &self.environment,
            from,
            resolver: self,
            depth,
        };
        self.chain
            .resolve(spec, &ctx)?
            .ok_or_else(|| ResolveError::PathResolutionFailed(spec.raw().to_string()))
    }

    /// On-disk location of a local path.
    pub fn locate(&self, path: &ResolvedPath) -> Option<PathBuf> {
        match path {
            ResolvedPath::Local { root, path, .. } => {
                let root = self.roots.get(root)?;
                Some(probe::on_disk(root, path))
            }
            ResolvedPath::External(_) => None,
        }
    }

    /// Whether a resolved path currently exists on disk.
    pub fn exists(&self, path: &ResolvedPath) -> bool {
        self.locate(path).is_some_and(|p| p.is_file())
    }

    /// Number of memo entries. Failed resolutions never leave one behind.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Forget every memoized resolution.
    pub fn reset(&self) {
        self.cache.clear();
    }
}

impl Invalidate for Resolver {
    fn invalidate(&self) {
        debug!("invalidating resolution cache");
        self.reset();
    }
}
