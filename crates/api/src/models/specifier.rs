use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

pub const BUNDLE_PREFIX: &str = "bundle:";
pub const UNBUNDLE_PREFIX: &str = "unbundle:";
pub const BUNDLE_SUFFIX: &str = "?bundle";
pub const GEM_SCOPE: &str = "@rubygems/";

/// Bundling directive carried by a specifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleMode {
    #[default]
    Default,
    Bundle,
    Unbundle,
}

impl BundleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleMode::Default => "default",
            BundleMode::Bundle => "bundle",
            BundleMode::Unbundle => "unbundle",
        }
    }
}

/// Syntactic class of a specifier body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecifierKind {
    Url,
    Absolute,
    Relative,
    GemScoped { gem: String, rest: String },
    Bare,
}

/// An import specifier as authored, with its bundling directive split off.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportSpecifier {
    raw: String,
    body: String,
    bundle: BundleMode,
}

impl ImportSpecifier {
    /// Parse a raw specifier, stripping at most one bundling directive.
    ///
    /// `bundle:`/`unbundle:` prefixes are recognised before URL detection
    /// since they would otherwise read as URL schemes. The `?bundle` suffix
    /// is only honoured on non-URL specifiers.
    pub fn parse(raw: &str) -> Self {
        let (body, bundle) = if let Some(rest) = raw.strip_prefix(UNBUNDLE_PREFIX) {
            (rest, BundleMode::Unbundle)
        } else if let Some(rest) = raw.strip_prefix(BUNDLE_PREFIX) {
            (rest, BundleMode::Bundle)
        } else if is_url(raw) {
            (raw, BundleMode::Default)
        } else if let Some(rest) = raw.strip_suffix(BUNDLE_SUFFIX) {
            (rest, BundleMode::Bundle)
        } else {
            (raw, BundleMode::Default)
        };

        Self {
            raw: raw.to_string(),
            body: body.to_string(),
            bundle,
        }
    }

    /// Take a specifier literally, without looking for directives.
    pub fn verbatim(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            body: raw.to_string(),
            bundle: BundleMode::Default,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn bundle(&self) -> BundleMode {
        self.bundle
    }

    pub fn kind(&self) -> SpecifierKind {
        let body = self.body.as_str();
        if is_url(body) {
            SpecifierKind::Url
        } else if body.starts_with("./")
            || body.starts_with("../")
            || body == "."
            || body == ".."
        {
            SpecifierKind::Relative
        } else if body.starts_with('/') {
            SpecifierKind::Absolute
        } else if let Some(scoped) = body.strip_prefix(GEM_SCOPE) {
            let (gem, rest) = scoped.split_once('/').unwrap_or((scoped, ""));
            SpecifierKind::GemScoped {
                gem: gem.to_string(),
                rest: rest.to_string(),
            }
        } else {
            SpecifierKind::Bare
        }
    }
}

impl fmt::Display for ImportSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// True when `s` carries a URL scheme.
///
/// Single-letter schemes are rejected so Windows drive letters never pass.
pub fn is_url(s: &str) -> bool {
    matches!(Url::parse(s), Ok(url) if url.scheme().len() > 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_prefixes() {
        let spec = ImportSpecifier::parse("bundle:lodash");
        assert_eq!(spec.body(), "lodash");
        assert_eq!(spec.bundle(), BundleMode::Bundle);

        let spec = ImportSpecifier::parse("unbundle:/lib/foo.js");
        assert_eq!(spec.body(), "/lib/foo.js");
        assert_eq!(spec.bundle(), BundleMode::Unbundle);
        assert_eq!(spec.raw(), "unbundle:/lib/foo.js");
    }

    #[test]
    fn test_bundle_suffix() {
        let spec = ImportSpecifier::parse("/lib/foo.js?bundle");
        assert_eq!(spec.body(), "/lib/foo.js");
        assert_eq!(spec.bundle(), BundleMode::Bundle);
    }

    #[test]
    fn test_url_keeps_query() {
        let spec = ImportSpecifier::parse("https://esm.sh/react?bundle");
        assert_eq!(spec.body(), "https://esm.sh/react?bundle");
        assert_eq!(spec.bundle(), BundleMode::Default);
        assert_eq!(spec.kind(), SpecifierKind::Url);
    }

    #[test]
    fn test_bundle_prefix_on_url() {
        let spec = ImportSpecifier::parse("bundle:https://esm.sh/react");
        assert_eq!(spec.kind(), SpecifierKind::Url);
        assert_eq!(spec.bundle(), BundleMode::Bundle);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(ImportSpecifier::parse("/a.js").kind(), SpecifierKind::Absolute);
        assert_eq!(ImportSpecifier::parse("./a").kind(), SpecifierKind::Relative);
        assert_eq!(ImportSpecifier::parse("../a").kind(), SpecifierKind::Relative);
        assert_eq!(ImportSpecifier::parse("lodash").kind(), SpecifierKind::Bare);
        assert_eq!(ImportSpecifier::parse("@scope/pkg").kind(), SpecifierKind::Bare);
        assert_eq!(
            ImportSpecifier::parse("@rubygems/ui/lib/button").kind(),
            SpecifierKind::GemScoped {
                gem: "ui".to_string(),
                rest: "lib/button".to_string()
            }
        );
        assert_eq!(
            ImportSpecifier::parse("@rubygems/ui").kind(),
            SpecifierKind::GemScoped {
                gem: "ui".to_string(),
                rest: String::new()
            }
        );
    }

    #[test]
    fn test_verbatim_keeps_directive() {
        let spec = ImportSpecifier::verbatim("bundle:x");
        assert_eq!(spec.body(), "bundle:x");
        assert_eq!(spec.bundle(), BundleMode::Default);
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/a.js"));
        assert!(is_url("data:text/javascript,1"));
        assert!(!is_url("C:/app/a.js"));
        assert!(!is_url("/lib/a.js"));
        assert!(!is_url("lodash"));
    }
}
