use super::{ResolveContext, ResolveStrategy, StrategyResult};
use crate::resolver::probe::probe;
use proscenium_api::{
    GEM_STORE_PREFIX, ImportSpecifier, PACKAGE_STORE_PREFIX, ResolvedPath, SpecifierKind,
};

/// `/path` specifiers, searched across every root in precedence order.
///
/// Canonical gem (`/node_modules/@rubygems/<gem>/...`) and package-store
/// (`/node_modules/...`) forms are routed to their owning root first, so a
/// canonical path always resolves back to itself.
pub struct AbsolutePath;

impl ResolveStrategy for AbsolutePath {
    fn resolve(&self, spec: &ImportSpecifier, ctx: &ResolveContext<'_>) -> StrategyResult {
        if spec.kind() != SpecifierKind::Absolute {
            return Ok(None);
        }
        let body = spec.body();

        if let Some(scoped) = body.strip_prefix(GEM_STORE_PREFIX) {
            let (gem, rest) = scoped.split_once('/').unwrap_or((scoped, ""));
            if let Some(root) = ctx.roots.gem(gem) {
                if let Some(found) = probe(root, &format!("/{rest}")) {
                    return Ok(Some(ResolvedPath::local(root, found)));
                }
            }
        }

        if let (Some(store), Some(rest)) = (
            ctx.roots.package_store(),
            body.strip_prefix(PACKAGE_STORE_PREFIX)
                .filter(|rest| rest.starts_with('/')),
        ) {
            if let Some(found) = probe(store, rest) {
                return Ok(Some(ResolvedPath::local(store, found)));
            }
        }

        for root in ctx.roots.iter() {
            if let Some(found) = probe(root, body) {
                let (owner, path) = ctx.roots.owner_of(root, &found);
                return Ok(Some(ResolvedPath::local(owner, path)));
            }
        }

        Ok(None)
    }
}
