use proscenium_api::{BuildError, CssModuleError, ResolveError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProsceniumError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
    #[error("invalid log filter: {0}")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),
    #[error("logging already initialized: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    CssModule(#[from] CssModuleError),
    #[error(transparent)]
    Build(#[from] BuildError),
}

pub type Result<T> = std::result::Result<T, ProsceniumError>;
