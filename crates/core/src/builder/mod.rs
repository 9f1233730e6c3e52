//! Compilation of resolved entry points through the external bundling engine.
//!
//! Outputs are cached per [`BuildFingerprint`] for the process lifetime.
//! At most one engine invocation runs per fingerprint: concurrent callers
//! await the same shared future. The invocation itself runs on a spawned
//! task, so it completes even if every caller stops waiting.

mod command;

pub use command::CommandEngine;

use crate::config::Config;
use crate::resolver::Resolver;
use crate::watch::Invalidate;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use proscenium_api::{BuildError, BuildFingerprint, BundleEngine, CompileRequest};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

pub type BuildOutput = Arc<[u8]>;
type PendingBuild = Shared<BoxFuture<'static, Result<BuildOutput, BuildError>>>;

enum Slot {
    Ready(BuildOutput),
    Pending(PendingBuild),
}

/// Environment variables forwarded to the engine and folded into fingerprints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvForwarding {
    names: Vec<String>,
    overrides: BTreeMap<String, String>,
}

impl EnvForwarding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            names: config.forwarded_env.clone(),
            overrides: config.env.clone(),
        }
    }

    /// Capture `name` from the process environment at build time.
    pub fn forward(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Forward a fixed value.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }

    /// Current values; unset variables are left out.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        let mut env: BTreeMap<String, String> = self
            .names
            .iter()
            .filter_map(|name| std::env::var(name).ok().map(|v| (name.clone(), v)))
            .collect();
        env.extend(self.overrides.clone());
        env
    }
}

pub struct Builder {
    resolver: Arc<Resolver>,
    engine: Arc<dyn BundleEngine>,
    env: EnvForwarding,
    cache: DashMap<BuildFingerprint, Slot>,
    invocations: AtomicUsize,
}

impl Builder {
    pub fn new(resolver: Arc<Resolver>, engine: Arc<dyn BundleEngine>) -> Self {
        Self {
            resolver,
            engine,
            env: EnvForwarding::new(),
            cache: DashMap::new(),
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn with_env(mut self, env: EnvForwarding) -> Self {
        self.env = env;
        self
    }

    pub fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }

    /// Resolve `entry` and compute the fingerprint a build would use.
    pub fn fingerprint(&self, entry: &str) -> Result<BuildFingerprint, BuildError> {
        let resolution = self.resolver.resolve_full(entry, None)?;
        Ok(BuildFingerprint::new(
            resolution.path,
            self.env.snapshot(),
            resolution.bundle,
        ))
    }

    /// Compile `entry`, reusing a cached or in-flight result when possible.
    pub async fn build(&self, entry: &str) -> Result<BuildOutput, BuildError> {
        let fingerprint = self.fingerprint(entry)?;

        let pending = match self.cache.entry(fingerprint.clone()) {
            Entry::Occupied(slot) => match slot.get() {
                Slot::Ready(output) => {
                    debug!(entry, "build cache hit");
                    return Ok(output.clone());
                }
                Slot::Pending(pending) => {
                    debug!(entry, "joining in-flight build");
                    pending.clone()
                }
            },
            Entry::Vacant(slot) => {
                let pending = self.dispatch(&fingerprint);
                slot.insert(Slot::Pending(pending.clone()));
                pending
            }
        };

        let outcome = pending.clone().await;
        self.settle(&fingerprint, &pending, &outcome);
        outcome
    }

    pub async fn build_to_string(&self, entry: &str) -> Result<String, BuildError> {
        let output = self.build(entry).await?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    /// Number of engine invocations dispatched so far.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Number of cached (completed) outputs.
    pub fn cached_len(&self) -> usize {
        self.cache
            .iter()
            .filter(|slot| matches!(slot.value(), Slot::Ready(_)))
            .count()
    }

    /// Drop every cached output. In-flight builds still finish for their
    /// waiters but are not cached.
    pub fn reset(&self) {
        self.cache.clear();
    }

    fn dispatch(&self, fingerprint: &BuildFingerprint) -> PendingBuild {
        let request = CompileRequest {
            entry: fingerprint.entry.clone(),
            location: self.resolver.locate(&fingerprint.entry),
            roots: self.resolver.roots().to_vec(),
            env: fingerprint.env.clone(),
            bundle: fingerprint.bundle,
        };
        let label = fingerprint.entry.canonical();
        let engine = self.engine.clone();

        self.invocations.fetch_add(1, Ordering::SeqCst);
        info!(
            entry = %label,
            engine = engine.name(),
            bundle = fingerprint.bundle.as_str(),
            "dispatching build"
        );

        let task = tokio::spawn(async move { engine.compile(request).await });
        async move {
            match task.await {
                Ok(Ok(bytes)) => {
                    info!(entry = %label, bytes = bytes.len(), "build finished");
                    Ok(BuildOutput::from(bytes))
                }
                Ok(Err(diagnostic)) => Err(BuildError::Compile {
                    entry: label,
                    diagnostic,
                }),
                Err(err) => Err(BuildError::Compile {
                    entry: label,
                    diagnostic: format!("engine task failed: {err}"),
                }),
            }
        }
        .boxed()
        .shared()
    }

    /// Promote a finished build to `Ready`, or drop it on failure. Only
    /// touches the slot if it still holds this very build (a reset may have
    /// replaced it meanwhile).
    fn settle(
        &self,
        fingerprint: &BuildFingerprint,
        pending: &PendingBuild,
        outcome: &Result<BuildOutput, BuildError>,
    ) {
        match outcome {
            Ok(output) => {
                if let Some(mut slot) = self.cache.get_mut(fingerprint) {
                    if matches!(&*slot, Slot::Pending(p) if p.ptr_eq(pending)) {
                        *slot = Slot::Ready(output.clone());
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "build failed");
                self.cache.remove_if(fingerprint, |_, slot| {
                    matches!(slot, Slot::Pending(p) if p.ptr_eq(pending))
                });
            }
        }
    }
}

impl Invalidate for Builder {
    fn invalidate(&self) {
        debug!("invalidating build cache");
        self.reset();
    }
}
