use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Canonical prefix for files owned by the package store.
pub const PACKAGE_STORE_PREFIX: &str = "/node_modules";
/// Canonical prefix for files owned by a registered gem/engine root.
pub const GEM_STORE_PREFIX: &str = "/node_modules/@rubygems/";

/// Role of a root in the resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootKind {
    Application,
    Gem,
    PackageStore,
}

impl RootKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RootKind::Application => "application",
            RootKind::Gem => "gem",
            RootKind::PackageStore => "package_store",
        }
    }
}

/// A named filesystem subtree participating in resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Root {
    pub name: String,
    pub kind: RootKind,
    pub dir: PathBuf,
}

impl Root {
    pub fn new(name: impl Into<String>, kind: RootKind, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind,
            dir: dir.into(),
        }
    }

    pub fn application(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self::new(name, RootKind::Application, dir)
    }

    pub fn gem(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self::new(name, RootKind::Gem, dir)
    }

    pub fn package_store(dir: impl Into<PathBuf>) -> Self {
        Self::new("node_modules", RootKind::PackageStore, dir)
    }
}

/// The canonical identity of a resolved asset.
///
/// Local paths are root-relative, `/`-separated and start with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedPath {
    Local {
        root: String,
        kind: RootKind,
        path: String,
    },
    External(String),
}

impl ResolvedPath {
    pub fn local(root: &Root, path: impl Into<String>) -> Self {
        ResolvedPath::Local {
            root: root.name.clone(),
            kind: root.kind,
            path: path.into(),
        }
    }

    pub fn external(url: impl Into<String>) -> Self {
        ResolvedPath::External(url.into())
    }

    /// Machine-independent string form, stable across checkouts.
    pub fn canonical(&self) -> String {
        match self {
            ResolvedPath::Local {
                kind: RootKind::Application,
                path,
                ..
            } => path.clone(),
            ResolvedPath::Local {
                kind: RootKind::Gem,
                root,
                path,
            } => format!("{GEM_STORE_PREFIX}{root}{path}"),
            ResolvedPath::Local {
                kind: RootKind::PackageStore,
                path,
                ..
            } => format!("{PACKAGE_STORE_PREFIX}{path}"),
            ResolvedPath::External(url) => url.clone(),
        }
    }

    /// Root-relative path, or the URL for external assets.
    pub fn path(&self) -> &str {
        match self {
            ResolvedPath::Local { path, .. } => path,
            ResolvedPath::External(url) => url,
        }
    }

    pub fn root_name(&self) -> Option<&str> {
        match self {
            ResolvedPath::Local { root, .. } => Some(root),
            ResolvedPath::External(_) => None,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, ResolvedPath::External(_))
    }

    /// Last path segment, query and fragment excluded.
    pub fn file_name(&self) -> &str {
        let path = self.path();
        let path = path.split(['?', '#']).next().unwrap_or(path);
        path.rsplit('/').next().unwrap_or(path)
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}
