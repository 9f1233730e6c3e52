//! Process-wide pipeline and per-render scopes.
//!
//! A [`Pipeline`] owns the shared caches (resolver and builder). Each render
//! gets its own [`RenderScope`], which owns the render's [`Importer`].

use crate::builder::{BuildOutput, Builder, EnvForwarding};
use crate::config::Config;
use crate::css_module::{CssModuleTransformer, stylesheet_path};
use crate::error::Result;
use crate::importer::Importer;
use crate::logging::init_logging;
use crate::resolver::Resolver;
use crate::watch::{CacheWatcher, Invalidate};
use proscenium_api::{
    AssetKind, BuildError, BundleEngine, ClassNameToken, CssModuleError, ResolveError,
    ResolvedPath,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_appender::non_blocking::WorkerGuard;

pub struct Pipeline {
    resolver: Arc<Resolver>,
    builder: Arc<Builder>,
    debounce: Duration,
    _log_guard: Option<WorkerGuard>,
}

impl Pipeline {
    pub fn new(resolver: Resolver, engine: Arc<dyn BundleEngine>) -> Self {
        let resolver = Arc::new(resolver);
        let builder = Arc::new(Builder::new(resolver.clone(), engine));
        Self {
            resolver,
            builder,
            debounce: Config::default().watch_debounce(),
            _log_guard: None,
        }
    }

    /// Build a pipeline from host settings, installing the global subscriber
    /// first when `config.log` asks for it.
    pub fn from_config(config: &Config, engine: Arc<dyn BundleEngine>) -> Result<Self> {
        let log_guard = if config.log.enabled {
            match init_logging(&config.log) {
                Ok(guard) => Some(guard),
                Err(err) => {
                    tracing::warn!("logging not installed: {}", err);
                    None
                }
            }
        } else {
            None
        };

        let resolver = Arc::new(Resolver::from_config(config)?);
        let builder =
            Builder::new(resolver.clone(), engine).with_env(EnvForwarding::from_config(config));
        Ok(Self {
            resolver,
            builder: Arc::new(builder),
            debounce: config.watch_debounce(),
            _log_guard: log_guard,
        })
    }

    pub fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }

    pub fn builder(&self) -> &Arc<Builder> {
        &self.builder
    }

    /// Start a render with an empty side-load registry.
    pub fn render(&self) -> RenderScope<'_> {
        RenderScope::new(&self.resolver)
    }

    pub async fn build(&self, entry: &str) -> std::result::Result<BuildOutput, BuildError> {
        self.builder.build(entry).await
    }

    pub fn reset(&self) {
        self.resolver.reset();
        self.builder.reset();
    }

    /// Invalidate both caches whenever a source root changes.
    pub fn watch(&self, cancel_token: CancellationToken) -> Result<JoinHandle<()>> {
        let targets: Vec<Arc<dyn Invalidate>> =
            vec![self.resolver.clone() as Arc<dyn Invalidate>, self.builder.clone()];
        let handle = CacheWatcher::spawn(
            self.resolver.roots().source_dirs(),
            targets,
            self.debounce,
            cancel_token,
        )?;
        Ok(handle)
    }
}

pub struct RenderScope<'p> {
    resolver: &'p Resolver,
    importer: Importer,
}

impl<'p> RenderScope<'p> {
    pub fn new(resolver: &'p Resolver) -> Self {
        Self {
            resolver,
            importer: Importer::new(),
        }
    }

    /// Resolve `specifier` and side-load it, inferring the asset kind.
    /// Returns whether it was newly added to this render.
    pub fn side_load(
        &mut self,
        specifier: &str,
        from: Option<&ResolvedPath>,
    ) -> std::result::Result<bool, ResolveError> {
        let path = self.resolver.resolve(specifier, from)?;
        let kind = AssetKind::from_path(path.path());
        Ok(self.importer.import(path, kind))
    }

    pub fn side_load_as(
        &mut self,
        specifier: &str,
        from: Option<&ResolvedPath>,
        kind: AssetKind,
    ) -> std::result::Result<bool, ResolveError> {
        let path = self.resolver.resolve(specifier, from)?;
        Ok(self.importer.import(path, kind))
    }

    pub fn sideload_component(
        &mut self,
        component: &ResolvedPath,
    ) -> std::result::Result<usize, ResolveError> {
        self.importer.sideload(self.resolver, component)
    }

    /// Transform class-name tokens against `stylesheet`. When a token is
    /// scoped to it and the stylesheet exists, it is side-loaded as well.
    pub fn class_names<I, T>(
        &mut self,
        stylesheet: &str,
        tokens: I,
    ) -> std::result::Result<Vec<String>, CssModuleError>
    where
        I: IntoIterator<Item = T>,
        T: Into<ClassNameToken>,
    {
        let tokens: Vec<ClassNameToken> = tokens.into_iter().map(Into::into).collect();
        let names = CssModuleTransformer::new(self.resolver)
            .class_names(stylesheet, tokens.iter().cloned())?;

        if tokens.iter().any(|t| matches!(t, ClassNameToken::ScopedLocal(_))) {
            if let Ok(path) = self.resolver.resolve(&stylesheet_path(stylesheet), None) {
                if self.resolver.exists(&path) {
                    self.importer.import(path, AssetKind::Stylesheet);
                }
            }
        }
        Ok(names)
    }

    pub fn imported(&self) -> impl Iterator<Item = (&ResolvedPath, AssetKind)> {
        self.importer.imported()
    }

    pub fn importer(&self) -> &Importer {
        &self.importer
    }

    pub fn into_importer(self) -> Importer {
        self.importer
    }
}
