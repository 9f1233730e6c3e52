//! Environment-scoped mapping from bare specifiers to concrete targets.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportTable {
    #[serde(default)]
    pub imports: BTreeMap<String, String>,
}

/// Loaded once, immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportMap {
    #[serde(default)]
    imports: BTreeMap<String, String>,
    #[serde(default)]
    environments: BTreeMap<String, ImportTable>,
}

impl ImportMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Add a mapping shared by every environment.
    pub fn insert(&mut self, specifier: impl Into<String>, target: impl Into<String>) {
        self.imports.insert(specifier.into(), target.into());
    }

    /// Add a mapping for one environment only.
    pub fn insert_for(
        &mut self,
        environment: impl Into<String>,
        specifier: impl Into<String>,
        target: impl Into<String>,
    ) {
        self.environments
            .entry(environment.into())
            .or_default()
            .imports
            .insert(specifier.into(), target.into());
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.environments.values().all(|t| t.imports.is_empty())
    }

    /// Look up `specifier` for `environment`: the environment table first,
    /// then the shared table. `./` targets are anchored at the application root.
    pub fn lookup(&self, environment: &str, specifier: &str) -> Option<String> {
        self.environments
            .get(environment)
            .and_then(|table| lookup_table(&table.imports, specifier))
            .or_else(|| lookup_table(&self.imports, specifier))
            .map(|target| anchor(&target))
    }
}

/// Exact key first, then the longest `/`-terminated key prefixing `specifier`.
fn lookup_table(table: &BTreeMap<String, String>, specifier: &str) -> Option<String> {
    if let Some(target) = table.get(specifier) {
        return Some(target.clone());
    }

    table
        .iter()
        .filter(|(key, _)| key.ends_with('/') && specifier.starts_with(key.as_str()))
        .max_by_key(|(key, _)| key.len())
        .map(|(key, target)| format!("{}{}", target, &specifier[key.len()..]))
}

fn anchor(target: &str) -> String {
    match target.strip_prefix("./") {
        Some(rest) => format!("/{rest}"),
        None => target.to_string(),
    }
}
