use super::{ResolveContext, ResolveStrategy, StrategyResult};
use crate::resolver::probe::{join, parent, probe};
use proscenium_api::{ImportSpecifier, ResolvedPath, SpecifierKind};
use url::Url;

/// `./` and `../` specifiers, resolved against the requesting file.
///
/// Resolution stays inside the requesting file's root: climbing above it,
/// or descending into a root nested within it, abstains instead of reaching
/// into another root.
pub struct RelativePath;

impl ResolveStrategy for RelativePath {
    fn resolve(&self, spec: &ImportSpecifier, ctx: &ResolveContext<'_>) -> StrategyResult {
        if spec.kind() != SpecifierKind::Relative {
            return Ok(None);
        }

        match ctx.from {
            None => Ok(None),
            Some(ResolvedPath::External(base)) => Ok(Url::parse(base)
                .and_then(|base| base.join(spec.body()))
                .ok()
                .map(|joined| ResolvedPath::external(joined.as_str()))),
            Some(ResolvedPath::Local { root, path, .. }) => {
                let Some(root) = ctx.roots.get(root) else {
                    return Ok(None);
                };
                let Some(found) =
                    join(parent(path), spec.body()).and_then(|target| probe(root, &target))
                else {
                    return Ok(None);
                };
                // Landing inside a nested root is leaving this one.
                let (owner, _) = ctx.roots.owner_of(root, &found);
                if owner.name != root.name {
                    return Ok(None);
                }
                Ok(Some(ResolvedPath::local(root, found)))
            }
        }
    }
}
