use thiserror::Error;

/// Failures raised while mapping a specifier onto a concrete file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("could not resolve `{0}`")]
    PathResolutionFailed(String),
    #[error("gem `{0}` is not registered as a resolution root")]
    GemNotRegistered(String),
}

/// Failures raised while hashing CSS module class names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CssModuleError {
    #[error("stylesheet not found: {0}")]
    StylesheetNotFound(String),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Failures raised while compiling an entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("failed to compile `{entry}`: {diagnostic}")]
    Compile { entry: String, diagnostic: String },
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl BuildError {
    /// Engine diagnostic text, if the engine was reached at all.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            BuildError::Compile { diagnostic, .. } => Some(diagnostic),
            BuildError::Resolve(_) => None,
        }
    }
}
