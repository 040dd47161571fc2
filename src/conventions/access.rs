//! Access requirement convention.

use std::fmt;
use std::sync::Arc;

use crate::routing::group::{AccessRequirement, EndpointGroup};
use crate::routing::matcher::MatchSet;
use crate::types::TypeSystem;

/// Per-group filter deciding whether a convention touches a group.
pub type GroupPredicate = Arc<dyn Fn(&EndpointGroup) -> bool + Send + Sync>;

/// Registration options for an access convention.
///
/// Scheme and role lists are comma-delimited.
#[derive(Clone)]
pub struct AccessOptions {
    pub policy: Option<String>,
    pub authentication_schemes: Option<String>,
    pub roles: Option<String>,
    pub predicate: Option<GroupPredicate>,
    pub inherit: bool,
}

impl Default for AccessOptions {
    fn default() -> Self {
        Self {
            policy: None,
            authentication_schemes: None,
            roles: None,
            predicate: None,
            inherit: true,
        }
    }
}

impl AccessOptions {
    pub fn policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = Some(policy.into());
        self
    }

    pub fn authentication_schemes(mut self, schemes: impl Into<String>) -> Self {
        self.authentication_schemes = Some(schemes.into());
        self
    }

    pub fn roles(mut self, roles: impl Into<String>) -> Self {
        self.roles = Some(roles.into());
        self
    }

    pub fn predicate(mut self, predicate: GroupPredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn inherit(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }
}

/// Attaches one [`AccessRequirement`] to every matched group.
#[derive(Clone)]
pub struct AccessConvention {
    match_set: MatchSet,
    requirement: AccessRequirement,
    predicate: Option<GroupPredicate>,
}

impl fmt::Debug for AccessConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessConvention")
            .field("match_set", &self.match_set)
            .field("requirement", &self.requirement)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

impl AccessConvention {
    pub fn new(match_set: MatchSet, options: AccessOptions) -> Self {
        let requirement = AccessRequirement::from_delimited(
            options.policy.as_deref(),
            options.authentication_schemes.as_deref(),
            options.roles.as_deref(),
        );
        Self {
            match_set,
            requirement,
            predicate: options.predicate,
        }
    }

    pub fn match_set(&self) -> &MatchSet {
        &self.match_set
    }

    pub fn requirement(&self) -> &AccessRequirement {
        &self.requirement
    }

    /// Returns true if a requirement was attached.
    pub fn apply(&self, group: &mut EndpointGroup, types: &dyn TypeSystem) -> bool {
        if !self.match_set.matches(group, types) {
            return false;
        }
        if let Some(predicate) = &self.predicate {
            if !predicate(group) {
                return false;
            }
        }
        tracing::debug!(group = %group.id, policy = ?self.requirement.policy, "Attaching access requirement");
        group.access_requirements.push(self.requirement.clone());
        true
    }
}
