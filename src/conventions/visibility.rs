//! Hide-from-exploration convention.

use crate::routing::group::EndpointGroup;
use crate::routing::matcher::MatchSet;
use crate::types::TypeSystem;

/// Marks matched groups as invisible to API exploration. Routes stay live.
#[derive(Debug, Clone)]
pub struct HideConvention {
    match_set: MatchSet,
}

impl HideConvention {
    pub fn new(match_set: MatchSet) -> Self {
        Self { match_set }
    }

    pub fn match_set(&self) -> &MatchSet {
        &self.match_set
    }

    pub fn apply(&self, group: &mut EndpointGroup, types: &dyn TypeSystem) -> bool {
        if !self.match_set.matches(group, types) {
            return false;
        }
        tracing::debug!(group = %group.id, "Hiding group from exploration");
        group.visible = false;
        true
    }
}
