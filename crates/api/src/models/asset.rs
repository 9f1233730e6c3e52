use super::path::ResolvedPath;
use serde::{Deserialize, Serialize};

/// Kind of tag the page shell emits for a side-loaded asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Script,
    Stylesheet,
}

impl AssetKind {
    /// Infer the kind from a file name; anything that is not CSS is a script.
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(".css") {
            AssetKind::Stylesheet
        } else {
            AssetKind::Script
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Script => "script",
            AssetKind::Stylesheet => "stylesheet",
        }
    }
}

/// One asset pulled in by a render, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideLoadEntry {
    pub path: ResolvedPath,
    pub kind: AssetKind,
    pub index: usize,
}
