use super::{ResolveContext, ResolveStrategy, StrategyResult};
use crate::resolver::package::{locate_package, package_entry, split_package};
use crate::resolver::probe::{join, on_disk, probe};
use proscenium_api::{ImportSpecifier, ResolveError, ResolvedPath, SpecifierKind};
use tracing::debug;

/// Bare package specifiers: the import map first, then the package store.
pub struct BareModule;

impl ResolveStrategy for BareModule {
    fn resolve(&self, spec: &ImportSpecifier, ctx: &ResolveContext<'_>) -> StrategyResult {
        if spec.kind() != SpecifierKind::Bare {
            return Ok(None);
        }
        let body = spec.body();

        if let Some(target) = ctx.import_map.lookup(ctx.environment, body) {
            debug!(specifier = body, target = %target, "import map hit");
            return match ctx.resolver.resolve_mapped(&target, ctx.from, ctx.depth + 1) {
                Ok(found) => Ok(Some(found)),
                // Report the failure against the authored specifier.
                Err(ResolveError::PathResolutionFailed(_)) => Ok(None),
                Err(err) => Err(err),
            };
        }

        let Some(store) = ctx.roots.package_store() else {
            return Ok(None);
        };
        let Some((package, subpath)) = split_package(body) else {
            return Ok(None);
        };
        if !on_disk(store, &format!("/{package}")).exists() {
            return Ok(None);
        }

        let (root, base) = locate_package(ctx.roots, store, package);
        let found = match subpath {
            Some(sub) => join(&base, sub).and_then(|target| probe(root, &target)),
            None => package_entry(root, &base),
        };
        Ok(found.map(|path| ResolvedPath::local(root, path)))
    }
}
