//! Scoped CSS class names.
//!
//! A scoped class name is the authored name followed by the first eight hex
//! characters of the SHA-1 of the stylesheet's canonical, root-relative path.
//! The digest only depends on that path, so server-rendered markup and the
//! client-loaded stylesheet agree without sharing a build step.

use crate::resolver::Resolver;
use proscenium_api::{ClassNameToken, CssModuleError, HashedClassName, ResolveError, ResolvedPath};
use sha1::{Digest, Sha1};
use std::borrow::Cow;

pub const MODULE_SUFFIX: &str = ".module.css";

/// First eight hex characters of SHA-1 over `canonical_path`.
pub fn css_module_digest(canonical_path: &str) -> String {
    let mut digest = format!("{:x}", Sha1::digest(canonical_path.as_bytes()));
    digest.truncate(HashedClassName::DIGEST_LEN);
    digest
}

/// `/lib/card` -> `/lib/card.module.css`; already-suffixed paths are kept.
pub fn stylesheet_path(path: &str) -> Cow<'_, str> {
    if path.ends_with(MODULE_SUFFIX) {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("{path}{MODULE_SUFFIX}"))
    }
}

pub struct CssModuleTransformer<'r> {
    resolver: &'r Resolver,
}

impl<'r> CssModuleTransformer<'r> {
    pub fn new(resolver: &'r Resolver) -> Self {
        Self { resolver }
    }

    /// Transform each token in order; one output per input.
    pub fn class_names<I, T>(
        &self,
        stylesheet: &str,
        tokens: I,
    ) -> Result<Vec<String>, CssModuleError>
    where
        I: IntoIterator<Item = T>,
        T: Into<ClassNameToken>,
    {
        tokens
            .into_iter()
            .map(|token| self.class_name(stylesheet, &token.into()))
            .collect()
    }

    /// Transform a single token in the context of `stylesheet`.
    pub fn class_name(
        &self,
        stylesheet: &str,
        token: &ClassNameToken,
    ) -> Result<String, CssModuleError> {
        match token {
            ClassNameToken::Plain(name) => Ok(name.clone()),
            ClassNameToken::ScopedLocal(name) => Ok(self.local(stylesheet, name).to_string()),
            ClassNameToken::ScopedRemote { path, name } => {
                let target = self.resolve_stylesheet(stylesheet, path)?;
                Ok(hash(&target.canonical(), name).to_string())
            }
        }
    }

    /// Hash `name` against the stylesheet being rendered.
    ///
    /// The stylesheet is hashed under its canonical path, so a gem stylesheet
    /// named as `@rubygems/ui/styles/card` hashes the same as a remote
    /// reference to it. A stylesheet that does not resolve is hashed under
    /// its root-relative name as written.
    pub fn local(&self, stylesheet: &str, name: &str) -> HashedClassName {
        let path = stylesheet_path(stylesheet);
        match self.resolver.resolve(&path, None) {
            Ok(resolved) => hash(&resolved.canonical(), name),
            Err(_) if path.starts_with('/') => hash(&path, name),
            Err(_) => hash(&format!("/{path}"), name),
        }
    }

    /// Resolve a cross-file reference; relative paths are taken from the
    /// context stylesheet.
    fn resolve_stylesheet(
        &self,
        context: &str,
        path: &str,
    ) -> Result<ResolvedPath, CssModuleError> {
        let target = stylesheet_path(path);
        let from = if target.starts_with('.') {
            self.resolver.resolve(&stylesheet_path(context), None).ok()
        } else {
            None
        };

        match self.resolver.resolve(&target, from.as_ref()) {
            Ok(resolved) if self.resolver.exists(&resolved) => Ok(resolved),
            Ok(_) | Err(ResolveError::PathResolutionFailed(_)) => {
                Err(CssModuleError::StylesheetNotFound(path.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn hash(canonical_path: &str, name: &str) -> HashedClassName {
    HashedClassName::new(name, &css_module_digest(canonical_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_of_canonical_path() {
        assert_eq!(css_module_digest("/lib/css_modules/basic.module.css"), "c3f452b4");
        assert_eq!(css_module_digest("/lib/css_modules/basic2.module.css"), "6fd80271");
    }

    #[test]
    fn test_stylesheet_path_suffix() {
        assert_eq!(stylesheet_path("/lib/card"), "/lib/card.module.css");
        assert_eq!(stylesheet_path("/lib/card.module.css"), "/lib/card.module.css");
    }
}
