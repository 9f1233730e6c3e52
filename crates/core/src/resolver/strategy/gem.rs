use super::{ResolveContext, ResolveStrategy, StrategyResult};
use crate::resolver::package::package_entry;
use crate::resolver::probe::probe;
use proscenium_api::{ImportSpecifier, ResolveError, ResolvedPath, SpecifierKind};

/// `@rubygems/<gem>/<path>` specifiers, resolved inside the gem's own root.
pub struct GemScoped;

impl ResolveStrategy for GemScoped {
    fn resolve(&self, spec: &ImportSpecifier, ctx: &ResolveContext<'_>) -> StrategyResult {
        let SpecifierKind::GemScoped { gem, rest } = spec.kind() else {
            return Ok(None);
        };
        let root = ctx
            .roots
            .gem(&gem)
            .ok_or(ResolveError::GemNotRegistered(gem))?;

        let found = if rest.is_empty() {
            package_entry(root, "/")
        } else {
            probe(root, &format!("/{rest}"))
        };
        Ok(found.map(|path| ResolvedPath::local(root, path)))
    }
}
