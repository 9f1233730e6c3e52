//! Resolution strategies using combinator pattern.
//!
//! Each strategy implements [`ResolveStrategy`] and either produces a match
//! or abstains; `or_else()` chains them so the first match wins.

mod absolute;
mod bare;
mod combinator;
mod external;
mod gem;
mod relative;

pub use absolute::AbsolutePath;
pub use bare::BareModule;
pub use combinator::OrElse;
pub use external::UrlPassthrough;
pub use gem::GemScoped;
pub use relative::RelativePath;

use super::Resolver;
use crate::import_map::ImportMap;
use crate::roots::RootSet;
use proscenium_api::{ImportSpecifier, ResolveError, ResolvedPath};

/// `Ok(None)` abstains; `Err` stops the whole chain.
pub type StrategyResult = Result<Option<ResolvedPath>, ResolveError>;

/// Inputs shared by every strategy for one resolution.
pub struct ResolveContext<'a> {
    pub roots: &'a RootSet,
    pub import_map: &'a ImportMap,
    pub environment: &'a str,
    pub from: Option<&'a ResolvedPath>,
    pub(crate) resolver: &'a Resolver,
    pub(crate) depth: usize,
}

/// A single way of turning a specifier into a resolved path.
pub trait ResolveStrategy: Send + Sync {
    fn resolve(&self, spec: &ImportSpecifier, ctx: &ResolveContext<'_>) -> StrategyResult;

    /// Combine with another strategy using "or" logic.
    ///
    /// If `self` abstains, try `other`.
    fn or_else<S: ResolveStrategy>(self, other: S) -> OrElse<Self, S>
    where
        Self: Sized,
    {
        OrElse::new(self, other)
    }
}

/// Build the default resolution chain, in precedence order.
pub fn build_resolution_chain() -> impl ResolveStrategy {
    UrlPassthrough
        .or_else(AbsolutePath)
        .or_else(RelativePath)
        .or_else(GemScoped)
        .or_else(BareModule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proscenium_api::Root;

    struct Abstain;
    impl ResolveStrategy for Abstain {
        fn resolve(&self, _: &ImportSpecifier, _: &ResolveContext<'_>) -> StrategyResult {
            Ok(None)
        }
    }

    struct Always(&'static str);
    impl ResolveStrategy for Always {
        fn resolve(&self, _: &ImportSpecifier, _: &ResolveContext<'_>) -> StrategyResult {
            Ok(Some(ResolvedPath::external(self.0)))
        }
    }

    struct Fail;
    impl ResolveStrategy for Fail {
        fn resolve(&self, spec: &ImportSpecifier, _: &ResolveContext<'_>) -> StrategyResult {
            Err(ResolveError::GemNotRegistered(spec.body().to_string()))
        }
    }

    fn with_ctx<T>(f: impl FnOnce(&ResolveContext<'_>) -> T) -> T {
        let resolver = Resolver::new(RootSet::new(Root::application("app", "/nonexistent")));
        let ctx = ResolveContext {
            roots: resolver.roots(),
            import_map: resolver.import_map(),
            environment: resolver.environment(),
            from: None,
            resolver: &resolver,
            depth: 0,
        };
        f(&ctx)
    }

    #[test]
    fn test_or_else_first_match_wins() {
        let spec = ImportSpecifier::parse("x");
        let found = with_ctx(|ctx| Always("first").or_else(Always("second")).resolve(&spec, ctx));
        assert_eq!(found, Ok(Some(ResolvedPath::external("first"))));
    }

    #[test]
    fn test_or_else_fallback() {
        let spec = ImportSpecifier::parse("x");
        let found = with_ctx(|ctx| Abstain.or_else(Always("second")).resolve(&spec, ctx));
        assert_eq!(found, Ok(Some(ResolvedPath::external("second"))));

        let found = with_ctx(|ctx| Abstain.or_else(Abstain).resolve(&spec, ctx));
        assert_eq!(found, Ok(None));
    }

    #[test]
    fn test_or_else_error_short_circuits() {
        let spec = ImportSpecifier::parse("x");
        let found = with_ctx(|ctx| Fail.or_else(Always("never")).resolve(&spec, ctx));
        assert_eq!(found, Err(ResolveError::GemNotRegistered("x".to_string())));
    }
}
