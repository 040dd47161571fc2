//! Endpoint groups and their access requirements.
//!
//! # Responsibilities
//! - Represent one discovered endpoint group (a controller)
//! - Own its selectors, flags and requirements
//!
//! # Design Decisions
//! - Groups are never removed from the discovery list; disabling empties them
//! - Identity is a type name resolved through the host type system

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::routing::selector::Selector;

/// Identity of a host type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TypeName(pub String);

impl TypeName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// An authorization requirement attached to a group.
///
/// Requirements on one group are additive; the host composes them at request
/// time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccessRequirement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_schemes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

impl AccessRequirement {
    /// Build a requirement from comma-delimited scheme and role lists.
    pub fn from_delimited(policy: Option<&str>, schemes: Option<&str>, roles: Option<&str>) -> Self {
        Self {
            policy: policy.map(str::to_string),
            authentication_schemes: schemes.map(split_delimited),
            roles: roles.map(split_delimited),
        }
    }
}

/// Split a comma-delimited list, trimming entries and dropping empty ones.
pub fn split_delimited(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// A discovered endpoint group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointGroup {
    /// Type identity used for matching.
    pub id: TypeName,
    /// Route selectors in declaration order.
    pub selectors: Vec<Selector>,
    /// Whether API exploration tooling lists this group.
    pub visible: bool,
    /// Whether the group can serve requests at all.
    pub enabled: bool,
    /// Attached authorization requirements.
    pub access_requirements: Vec<AccessRequirement>,
    /// Action names exposed by the group.
    pub actions: Vec<String>,
    /// Free-form host properties.
    pub properties: BTreeMap<String, String>,
}

impl EndpointGroup {
    /// Create a visible, enabled group with no selectors.
    pub fn new(id: impl Into<TypeName>) -> Self {
        Self {
            id: id.into(),
            selectors: Vec::new(),
            visible: true,
            enabled: true,
            access_requirements: Vec::new(),
            actions: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Add a selector.
    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selectors.push(selector);
        self
    }

    /// Add a selector carrying `template`.
    pub fn with_route(self, template: &str) -> Self {
        self.with_selector(Selector::new(template))
    }

    /// Raw templates of all templated selectors, in order.
    pub fn templates(&self) -> Vec<&str> {
        self.selectors
            .iter()
            .filter_map(|s| s.template.as_ref().map(|t| t.as_str()))
            .collect()
    }
}
