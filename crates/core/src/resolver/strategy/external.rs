use super::{ResolveContext, ResolveStrategy, StrategyResult};
use proscenium_api::{ImportSpecifier, ResolvedPath, SpecifierKind};

/// Specifiers with a scheme are external; the filesystem is never consulted.
pub struct UrlPassthrough;

impl ResolveStrategy for UrlPassthrough {
    fn resolve(&self, spec: &ImportSpecifier, _ctx: &ResolveContext<'_>) -> StrategyResult {
        if spec.kind() != SpecifierKind::Url {
            return Ok(None);
        }
        Ok(Some(ResolvedPath::external(spec.body())))
    }
}
