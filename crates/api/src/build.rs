use crate::models::{BundleMode, ResolvedPath, Root};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Everything the external bundling engine needs to compile one entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub entry: ResolvedPath,
    /// On-disk location of `entry`; `None` for external URLs.
    pub location: Option<PathBuf>,
    pub roots: Vec<Root>,
    pub env: BTreeMap<String, String>,
    pub bundle: BundleMode,
}

/// The external bundling engine.
///
/// Implementations turn a resolved entry into output bytes. A failure is
/// reported as the engine's verbatim diagnostic text.
#[async_trait]
pub trait BundleEngine: Send + Sync {
    async fn compile(&self, request: CompileRequest) -> Result<Vec<u8>, String>;

    /// Engine name (for logging/debugging)
    fn name(&self) -> &str {
        "bundler"
    }
}
