//! Route selectors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::routing::template::Template;

/// One route entry on an endpoint group.
///
/// A selector without a template stands for "no explicit route" and is left
/// alone by prefix removal and combination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Selector {
    /// Route template, if the host declared one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,

    /// Host-defined metadata (HTTP methods, names, constraints).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Selector {
    /// Create a selector carrying a template.
    pub fn new(template: impl Into<Template>) -> Self {
        Self {
            template: Some(template.into()),
            metadata: BTreeMap::new(),
        }
    }

    /// Create a selector with no template.
    pub fn untemplated() -> Self {
        Self::default()
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Normalized key of the template, if any.
    pub fn key(&self) -> Option<&str> {
        self.template.as_ref().map(Template::key)
    }
}
