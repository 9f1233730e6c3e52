//! Process-wide tracing setup for hosts that let the pipeline own logging.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const DEFAULT_LOG_COMPONENT: &str = "proscenium";

/// Where and how much the pipeline logs.
///
/// Disabled by default: a host that installs its own subscriber keeps it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub enabled: bool,
    /// File name prefix; files roll daily as `<component>.YYYY-MM-DD`.
    pub component: String,
    /// Defaults to [`default_log_dir`].
    pub dir: Option<PathBuf>,
    /// Mirror events to stderr.
    pub stderr: bool,
    /// `EnvFilter` directives. Falls back to `RUST_LOG`, then `info`.
    pub filter: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            component: DEFAULT_LOG_COMPONENT.to_string(),
            dir: None,
            stderr: false,
            filter: None,
        }
    }
}

impl LogSettings {
    pub fn log_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(default_log_dir)
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        match &self.filter {
            Some(directives) => Ok(EnvFilter::try_new(directives)?),
            None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))),
        }
    }
}

/// Default log directory: `$HOME/.proscenium/logs`.
pub fn default_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".proscenium/logs")
}

/// Install the global subscriber. Keep the returned guard alive for as long
/// as logs should be flushed.
///
/// Fails if the filter does not parse or a global subscriber is already set.
pub fn init_logging(settings: &LogSettings) -> Result<WorkerGuard> {
    let filter = settings.env_filter()?;
    let log_dir = settings.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, &settings.component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let stderr_layer = settings.stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(guard)
}
