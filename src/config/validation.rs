//! Manifest validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (parents and groups reference declared types)
//! - Detect parent cycles and duplicate declarations
//! - Check convention entries are well formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Manifest → Result<(), Vec<ValidationError>>
//! - Whether a target is an endpoint group is left to registration

use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::config::schema::{ConventionConfig, Manifest};
use crate::routing::group::TypeName;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// One semantic problem found in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("type '{0}' is declared more than once")]
    DuplicateType(TypeName),

    #[error("type '{ty}' has unknown parent '{parent}'")]
    UnknownParent { ty: TypeName, parent: TypeName },

    #[error("type '{0}' is part of a parent cycle")]
    ParentCycle(TypeName),

    #[error("group references unknown type '{0}'")]
    UnknownGroupType(TypeName),

    #[error("group type '{0}' is not marked as an endpoint group")]
    GroupNotEndpoint(TypeName),

    #[error("group '{0}' is declared more than once")]
    DuplicateGroup(TypeName),

    #[error("convention #{index}: {reason}")]
    InvalidTarget { index: usize, reason: String },

    #[error("convention #{index}: at least one prefix is required")]
    EmptyPrefixes { index: usize },

    #[error("unknown log level '{0}'")]
    InvalidLogLevel(String),
}

/// Check a log level name, case-insensitively.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidLogLevel(level.to_string()))
    }
}

/// Validate a manifest, returning every problem found.
pub fn validate_manifest(manifest: &Manifest) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_log_level(&manifest.observability.log_level) {
        errors.push(e);
    }

    let mut parents: HashMap<&TypeName, Option<&TypeName>> = HashMap::new();
    let mut endpoint: HashMap<&TypeName, bool> = HashMap::new();
    for entry in &manifest.types {
        if parents.insert(&entry.name, entry.parent.as_ref()).is_some() {
            errors.push(ValidationError::DuplicateType(entry.name.clone()));
        }
        endpoint.insert(&entry.name, entry.endpoint_group);
    }

    for entry in &manifest.types {
        if let Some(parent) = &entry.parent {
            if !parents.contains_key(parent) {
                errors.push(ValidationError::UnknownParent {
                    ty: entry.name.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    let mut reported_cycle = HashSet::new();
    for entry in &manifest.types {
        if reported_cycle.contains(&entry.name) {
            continue;
        }
        let mut visited = HashSet::new();
        let mut current = Some(&entry.name);
        while let Some(ty) = current {
            if !visited.insert(ty) {
                if ty == &entry.name {
                    errors.push(ValidationError::ParentCycle(entry.name.clone()));
                    reported_cycle.extend(visited.iter().map(|t| (*t).clone()));
                }
                break;
            }
            current = parents.get(ty).copied().flatten();
        }
    }

    let mut seen_groups = HashSet::new();
    for group in &manifest.groups {
        match endpoint.get(&group.type_name) {
            None => errors.push(ValidationError::UnknownGroupType(group.type_name.clone())),
            Some(false) => errors.push(ValidationError::GroupNotEndpoint(group.type_name.clone())),
            Some(true) => {}
        }
        if !seen_groups.insert(&group.type_name) {
            errors.push(ValidationError::DuplicateGroup(group.type_name.clone()));
        }
    }

    for (index, convention) in manifest.conventions.iter().enumerate() {
        if let Err(e) = convention.target().selection() {
            errors.push(ValidationError::InvalidTarget {
                index,
                reason: e.to_string(),
            });
        }
        if let ConventionConfig::RoutePrefix { prefixes, .. } = convention {
            if prefixes.is_empty() {
                errors.push(ValidationError::EmptyPrefixes { index });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
