//! Route prefix convention.

use crate::error::ConflictError;
use crate::routing::group::EndpointGroup;
use crate::routing::matcher::MatchSet;
use crate::routing::prefix::{PrefixOutcome, PrefixStrategy, RoutePrefixEngine, SelectorPredicate};
use crate::routing::template::{CombineSide, Template};
use crate::types::TypeSystem;

/// Registration options for a route prefix convention.
#[derive(Clone)]
pub struct RoutePrefixOptions {
    pub prefixes: Vec<String>,
    pub strategy: PrefixStrategy,
    pub side: CombineSide,
    pub predicate: Option<SelectorPredicate>,
    pub inherit: bool,
}

impl RoutePrefixOptions {
    /// Combine `prefix` on the left of every matched template.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_prefixes([prefix])
    }

    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            strategy: PrefixStrategy::default(),
            side: CombineSide::default(),
            predicate: None,
            inherit: true,
        }
    }

    pub fn strategy(mut self, strategy: PrefixStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn side(mut self, side: CombineSide) -> Self {
        self.side = side;
        self
    }

    pub fn predicate(mut self, predicate: SelectorPredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn inherit(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }
}

/// Applies a [`RoutePrefixEngine`] to every matched group.
#[derive(Debug, Clone)]
pub struct RoutePrefixConvention {
    match_set: MatchSet,
    engine: RoutePrefixEngine,
}

impl RoutePrefixConvention {
    pub fn new(match_set: MatchSet, options: RoutePrefixOptions) -> Self {
        let prefixes = options.prefixes.into_iter().map(Template::new).collect();
        let mut engine = RoutePrefixEngine::new(prefixes, options.strategy, options.side);
        if let Some(predicate) = options.predicate {
            engine = engine.with_predicate(predicate);
        }
        Self { match_set, engine }
    }

    pub fn match_set(&self) -> &MatchSet {
        &self.match_set
    }

    pub fn engine(&self) -> &RoutePrefixEngine {
        &self.engine
    }

    /// Returns `None` when the group is not targeted.
    pub fn apply(
        &self,
        group: &mut EndpointGroup,
        types: &dyn TypeSystem,
    ) -> Result<Option<PrefixOutcome>, ConflictError> {
        if !self.match_set.matches(group, types) {
            return Ok(None);
        }
        tracing::debug!(
            group = %group.id,
            strategy = %self.engine.strategy(),
            prefixes = ?self.engine.prefixes().iter().map(Template::as_str).collect::<Vec<_>>(),
            "Applying route prefix convention"
        );
        self.engine.apply(group).map(Some)
    }
}
