//! Manifest loading from disk.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::config::schema::{ConventionConfig, Manifest};
use crate::config::validation::{validate_manifest, ValidationError};
use crate::conventions::{AccessOptions, ConventionRegistry, RoutePrefixOptions};
use crate::error::ConventionError;
use crate::routing::group::EndpointGroup;
use crate::types::TypeCatalog;

/// Error type for manifest loading.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Convention(#[from] ConventionError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate a manifest from a TOML file.
pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let content = fs::read_to_string(path)?;
    parse_manifest(&content)
}

/// Parse and validate manifest text.
pub fn parse_manifest(content: &str) -> Result<Manifest, ManifestError> {
    let manifest: Manifest = toml::from_str(content)?;
    validate_manifest(&manifest).map_err(ManifestError::Validation)?;
    Ok(manifest)
}

impl Manifest {
    /// Build the type catalog, the discovered groups and the registry.
    ///
    /// Conventions are registered in manifest order, so a target the host does
    /// not confirm as an endpoint group fails here, before any pass runs.
    pub fn build(&self) -> Result<(Arc<TypeCatalog>, Vec<EndpointGroup>, ConventionRegistry), ManifestError> {
        let types = Arc::new(TypeCatalog::from_entries(self.types.iter().cloned()));
        let groups: Vec<EndpointGroup> = self.groups.iter().map(|g| g.to_group()).collect();
        let mut registry = ConventionRegistry::new(types.clone());

        for convention in &self.conventions {
            let target = convention
                .target()
                .selection()
                .map_err(ConventionError::from)?;

            match convention {
                ConventionConfig::RoutePrefix {
                    prefixes,
                    strategy,
                    side,
                    inherit,
                    filter,
                    ..
                } => {
                    let mut options = RoutePrefixOptions::with_prefixes(prefixes.iter().cloned())
                        .strategy(*strategy)
                        .side(*side)
                        .inherit(*inherit);
                    if let Some(filter) = filter {
                        options = options.predicate(filter.clone().into_predicate());
                    }
                    registry.add_route_prefix(target, options)?;
                }
                ConventionConfig::Access {
                    policy,
                    authentication_schemes,
                    roles,
                    inherit,
                    group_filter,
                    ..
                } => {
                    let options = AccessOptions {
                        policy: policy.clone(),
                        authentication_schemes: authentication_schemes.clone(),
                        roles: roles.clone(),
                        predicate: group_filter.clone().map(|f| f.into_predicate()),
                        inherit: *inherit,
                    };
                    registry.add_access(target, options)?;
                }
                ConventionConfig::Disable { inherit, .. } => {
                    registry.add_disable(target, *inherit)?;
                }
                ConventionConfig::Hide { inherit, .. } => {
                    registry.add_hide(target, *inherit)?;
                }
            }
        }

        tracing::info!(
            types = types.len(),
            groups = groups.len(),
            conventions = registry.len(),
            "Manifest loaded"
        );
        Ok((types, groups, registry))
    }
}
