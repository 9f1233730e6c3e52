use super::path::ResolvedPath;
use super::specifier::BundleMode;
use std::collections::BTreeMap;

/// Identifies one cacheable compiled artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildFingerprint {
    pub entry: ResolvedPath,
    pub env: BTreeMap<String, String>,
    pub bundle: BundleMode,
}

impl BuildFingerprint {
    pub fn new(entry: ResolvedPath, env: BTreeMap<String, String>, bundle: BundleMode) -> Self {
        Self { entry, env, bundle }
    }
}
