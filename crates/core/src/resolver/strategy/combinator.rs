//! Combinator implementations for ResolveStrategy.

use super::{ResolveContext, ResolveStrategy, StrategyResult};
use proscenium_api::ImportSpecifier;

/// Or-else combinator: try first, then second if first abstains.
pub struct OrElse<A, B> {
    first: A,
    second: B,
}

impl<A, B> OrElse<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: ResolveStrategy, B: ResolveStrategy> ResolveStrategy for OrElse<A, B> {
    fn resolve(&self, spec: &ImportSpecifier, ctx: &ResolveContext<'_>) -> StrategyResult {
        match self.first.resolve(spec, ctx)? {
            Some(found) => Ok(Some(found)),
            None => self.second.resolve(spec, ctx),
        }
    }
}
