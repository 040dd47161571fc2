//! Disable convention.

use crate::routing::group::EndpointGroup;
use crate::routing::matcher::MatchSet;
use crate::types::TypeSystem;

/// Neuters matched groups: hidden, disabled, and stripped of selectors,
/// requirements, actions and properties. The group itself stays registered
/// so its identity still resolves.
#[derive(Debug, Clone)]
pub struct DisableConvention {
    match_set: MatchSet,
}

impl DisableConvention {
    pub fn new(match_set: MatchSet) -> Self {
        Self { match_set }
    }

    pub fn match_set(&self) -> &MatchSet {
        &self.match_set
    }

    /// Returns the number of selectors dropped, or `None` if not targeted.
    pub fn apply(&self, group: &mut EndpointGroup, types: &dyn TypeSystem) -> Option<usize> {
        if !self.match_set.matches(group, types) {
            return None;
        }
        let dropped = group.selectors.len();
        tracing::debug!(group = %group.id, selectors = dropped, "Disabling group");

        group.visible = false;
        group.enabled = false;
        group.selectors.clear();
        group.access_requirements.clear();
        group.actions.clear();
        group.properties.clear();
        Some(dropped)
    }
}
