//! Convention registration and the convention pass.
//!
//! # Responsibilities
//! - Validate convention targets when they are registered
//! - Keep conventions in registration order
//! - Run every convention over every discovered group
//!
//! # Design Decisions
//! - Registration fails immediately on a target the host does not confirm
//!   as an endpoint group
//! - The pass is synchronous and single-threaded; it runs once at startup
//!   before any route is live
//! - The first error stops the pass; earlier mutations stay applied

use std::sync::Arc;

use crate::conventions::{
    AccessConvention, AccessOptions, Convention, DisableConvention, HideConvention, PassReport,
    RoutePrefixConvention, RoutePrefixOptions,
};
use crate::error::{ConfigurationError, ConventionError, Result};
use crate::observability::metrics;
use crate::routing::group::EndpointGroup;
use crate::routing::matcher::{MatchSet, TargetSelection};
use crate::types::TypeSystem;

/// Ordered list of conventions bound to a host type system.
#[derive(Debug, Clone)]
pub struct ConventionRegistry {
    types: Arc<dyn TypeSystem>,
    conventions: Vec<Convention>,
}

impl ConventionRegistry {
    pub fn new(types: Arc<dyn TypeSystem>) -> Self {
        Self {
            types,
            conventions: Vec::new(),
        }
    }

    pub fn types(&self) -> &dyn TypeSystem {
        self.types.as_ref()
    }

    pub fn conventions(&self) -> &[Convention] {
        &self.conventions
    }

    pub fn len(&self) -> usize {
        self.conventions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conventions.is_empty()
    }

    /// Register a route prefix convention.
    pub fn add_route_prefix(
        &mut self,
        target: impl Into<TargetSelection>,
        options: RoutePrefixOptions,
    ) -> Result<&mut Self> {
        if options.prefixes.is_empty() {
            return Err(ConfigurationError::EmptyPrefixes.into());
        }
        let match_set = self.resolve(target.into(), options.inherit)?;
        Ok(self.push(Convention::RoutePrefix(RoutePrefixConvention::new(match_set, options))))
    }

    /// Register an access convention.
    pub fn add_access(&mut self, target: impl Into<TargetSelection>, options: AccessOptions) -> Result<&mut Self> {
        let match_set = self.resolve(target.into(), options.inherit)?;
        Ok(self.push(Convention::Access(AccessConvention::new(match_set, options))))
    }

    /// Register a disable convention.
    pub fn add_disable(&mut self, target: impl Into<TargetSelection>, inherit: bool) -> Result<&mut Self> {
        let match_set = self.resolve(target.into(), inherit)?;
        Ok(self.push(Convention::Disable(DisableConvention::new(match_set))))
    }

    /// Register a hide-from-exploration convention.
    pub fn add_hide(&mut self, target: impl Into<TargetSelection>, inherit: bool) -> Result<&mut Self> {
        let match_set = self.resolve(target.into(), inherit)?;
        Ok(self.push(Convention::Hide(HideConvention::new(match_set))))
    }

    /// Append an already-built convention.
    pub fn push(&mut self, convention: Convention) -> &mut Self {
        tracing::debug!(
            kind = %convention.kind(),
            targets = ?convention.match_set().targets(),
            inherit = convention.match_set().inherit(),
            position = self.conventions.len(),
            "Convention registered"
        );
        self.conventions.push(convention);
        self
    }

    fn resolve(&self, target: TargetSelection, inherit: bool) -> Result<MatchSet> {
        let targets = target.resolve(self.types.as_ref()).map_err(|e| {
            tracing::error!(error = %e, "Convention registration rejected");
            ConventionError::from(e)
        })?;
        Ok(MatchSet::new(targets, inherit))
    }

    /// Run every convention over `groups`, mutating them in place.
    pub fn apply(&self, groups: &mut [EndpointGroup]) -> Result<PassReport> {
        let mut report = PassReport {
            groups: groups.len(),
            ..PassReport::default()
        };

        for (position, convention) in self.conventions.iter().enumerate() {
            let kind = convention.kind();
            let span = tracing::debug_span!("convention", %kind, position);
            let _guard = span.enter();

            for group in groups.iter_mut() {
                match convention.apply(group, self.types.as_ref()) {
                    Ok(Some(outcome)) => {
                        metrics::record_convention_applied(kind.as_str());
                        metrics::record_selectors_changed(
                            kind.as_str(),
                            outcome.added + outcome.removed + outcome.rewritten,
                        );
                        report.record(&outcome);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        metrics::record_conflict(kind.as_str());
                        return Err(e);
                    }
                }
            }
            report.conventions += 1;
        }

        tracing::info!(
            conventions = report.conventions,
            groups = report.groups,
            matched = report.matched,
            added = report.selectors_added,
            removed = report.selectors_removed,
            rewritten = report.selectors_rewritten,
            "Convention pass complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::prefix::PrefixStrategy;
    use crate::routing::template::CombineSide;
    use crate::types::{TypeCatalog, TypeEntry};

    fn registry() -> ConventionRegistry {
        ConventionRegistry::new(Arc::new(TypeCatalog::from_entries([
            TypeEntry::group("Base"),
            TypeEntry::group("Derived").with_parent("Base"),
            TypeEntry::plain("NotAGroup"),
        ])))
    }

    #[test]
    fn test_registration_rejects_non_group() {
        let mut registry = registry();
        let err = registry.add_hide("NotAGroup", true).unwrap_err();
        assert_eq!(
            err,
            ConventionError::Configuration(ConfigurationError::NotEndpointGroup("NotAGroup".into()))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registration_rejects_empty_prefixes() {
        let mut registry = registry();
        let options = RoutePrefixOptions::with_prefixes(Vec::<String>::new());
        assert_eq!(
            registry.add_route_prefix("Base", options).unwrap_err(),
            ConventionError::Configuration(ConfigurationError::EmptyPrefixes)
        );
    }

    #[test]
    fn test_order_is_significant() {
        let mut registry = registry();
        registry
            .add_route_prefix("Base", RoutePrefixOptions::new("api"))
            .unwrap()
            .add_route_prefix(
                "Base",
                RoutePrefixOptions::new("api/items").strategy(PrefixStrategy::Remove),
            )
            .unwrap();

        let mut groups = vec![EndpointGroup::new("Derived").with_route("items")];
        let report = registry.apply(&mut groups).unwrap();

        assert!(groups[0].selectors.is_empty());
        assert_eq!(report.conventions, 2);
        assert_eq!(report.matched, 2);
        assert_eq!(report.selectors_rewritten, 1);
        assert_eq!(report.selectors_removed, 1);
    }

    #[test]
    fn test_pass_stops_on_first_conflict() {
        let mut registry = registry();
        registry
            .add_route_prefix("Base", RoutePrefixOptions::new("api").side(CombineSide::Right))
            .unwrap()
            .add_hide("Base", true)
            .unwrap();

        let mut groups = vec![EndpointGroup::new("Base").with_route("x").with_route("X")];
        let err = registry.apply(&mut groups).unwrap_err();

        assert!(matches!(err, ConventionError::Conflict(ref c) if c.templates == vec!["x/api".to_string()]));
        assert!(groups[0].visible, "later conventions must not run");
    }
}
