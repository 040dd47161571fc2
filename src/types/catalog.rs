//! In-memory type catalog.
//!
//! # Responsibilities
//! - Record declared types with their parent and package
//! - Answer ancestry questions by walking parent links
//!
//! # Design Decisions
//! - Declaration order is preserved for package expansion
//! - Parent walks are bounded by the catalog size, so a cycle cannot hang

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::routing::group::TypeName;
use crate::types::TypeSystem;

/// One declared host type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TypeEntry {
    pub name: TypeName,
    #[serde(default)]
    pub parent: Option<TypeName>,
    #[serde(default)]
    pub package: Option<String>,
    /// Whether the host marks this type as an endpoint group.
    #[serde(default = "default_endpoint_group")]
    pub endpoint_group: bool,
}

fn default_endpoint_group() -> bool {
    true
}

impl TypeEntry {
    /// An endpoint-group type with no parent or package.
    pub fn group(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            package: None,
            endpoint_group: true,
        }
    }

    /// A type the host does not treat as an endpoint group.
    pub fn plain(name: impl Into<TypeName>) -> Self {
        Self {
            endpoint_group: false,
            ..Self::group(name)
        }
    }

    pub fn with_parent(mut self, parent: impl Into<TypeName>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn in_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }
}

/// A [`TypeSystem`] backed by a list of declared types.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    entries: Vec<TypeEntry>,
    index: HashMap<TypeName, usize>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from entries. A later entry with a repeated name
    /// replaces the earlier one.
    pub fn from_entries(entries: impl IntoIterator<Item = TypeEntry>) -> Self {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.insert(entry);
        }
        catalog
    }

    pub fn insert(&mut self, entry: TypeEntry) {
        match self.index.get(&entry.name) {
            Some(&pos) => self.entries[pos] = entry,
            None => {
                self.index.insert(entry.name.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, name: &TypeName) -> Option<&TypeEntry> {
        self.index.get(name).map(|&pos| &self.entries[pos])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TypeSystem for TypeCatalog {
    fn derives_from(&self, candidate: &TypeName, ancestor: &TypeName) -> bool {
        let mut current = self.get(candidate).and_then(|e| e.parent.as_ref());
        let mut steps = 0;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.entries.len() {
                tracing::warn!(ty = %candidate, "Parent chain does not terminate");
                return false;
            }
            current = self.get(parent).and_then(|e| e.parent.as_ref());
        }
        false
    }

    fn is_endpoint_group(&self, ty: &TypeName) -> bool {
        self.get(ty).map(|e| e.endpoint_group).unwrap_or(false)
    }

    fn contains(&self, ty: &TypeName) -> bool {
        self.index.contains_key(ty)
    }

    fn types_in_package(&self, package: &str) -> Vec<TypeName> {
        self.entries
            .iter()
            .filter(|e| e.endpoint_group && e.package.as_deref() == Some(package))
            .map(|e| e.name.clone())
            .collect()
    }
}
