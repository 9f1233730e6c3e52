//! Cache invalidation on source changes.

use crate::resolver::probe::SUPPORTED_EXTENSIONS;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Something holding memoized state derived from files on disk.
pub trait Invalidate: Send + Sync {
    fn invalidate(&self);
}

/// Whether a change to `path` can affect resolution or build output.
pub fn is_relevant_path(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    // `.json` covers package manifests and the import map.
    name.ends_with(".json") || SUPPORTED_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

struct FsWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
}

impl FsWatcher {
    fn new(dirs: &[PathBuf]) -> notify::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;
        for dir in dirs {
            watcher.watch(dir, RecursiveMode::Recursive)?;
        }
        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    async fn next_event_async(&mut self) -> Option<Event> {
        loop {
            match self.rx.recv().await {
                Some(Ok(event)) => return Some(event),
                Some(Err(err)) => tracing::warn!("watch error: {}", err),
                None => return None,
            }
        }
    }
}

pub struct CacheWatcher;

impl CacheWatcher {
    /// Watch `dirs` recursively and invalidate every target once a burst of
    /// relevant changes has settled for `debounce`.
    ///
    /// The task ends when `cancel_token` is cancelled.
    pub fn spawn(
        dirs: Vec<PathBuf>,
        targets: Vec<Arc<dyn Invalidate>>,
        debounce: Duration,
        cancel_token: CancellationToken,
    ) -> notify::Result<JoinHandle<()>> {
        let mut watcher = FsWatcher::new(&dirs)?;

        Ok(tokio::spawn(async move {
            tracing::info!("Started watching {} directories", dirs.len());
            let mut pending_events: Vec<Event> = Vec::new();

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        break;
                    }
                    event = watcher.next_event_async() => {
                        match event {
                            Some(e) => pending_events.push(e),
                            None => break,
                        }
                    }
                    _ = tokio::time::sleep(debounce), if !pending_events.is_empty() => {
                        let changed = pending_events
                            .drain(..)
                            .flat_map(|event| event.paths)
                            .filter(|path| is_relevant_path(path))
                            .collect::<HashSet<PathBuf>>()
                            .len();

                        if changed > 0 {
                            tracing::info!("Detected changes in {} files. Invalidating caches...", changed);
                            for target in &targets {
                                target.invalidate();
                            }
                        }
                    }
                }
            }
            tracing::info!("Cache watcher task ended");
        }))
    }
}
