//! Convention error types.

use thiserror::Error;

use crate::routing::group::TypeName;

/// Raised at registration time, before any convention runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The host does not know the type at all.
    #[error("Unknown type: {0}")]
    UnknownType(TypeName),

    /// The type exists but is not an endpoint group.
    #[error("{0} is not an endpoint group type")]
    NotEndpointGroup(TypeName),

    /// One or more types of a list target are not endpoint groups.
    #[error("One or more types are not endpoint group types: {}", join(.0))]
    NotEndpointGroups(Vec<TypeName>),

    /// A type or list target named no types.
    #[error("Convention target names no types")]
    EmptyTargets,

    /// A route prefix convention was given no prefixes.
    #[error("Route prefix convention requires at least one prefix")]
    EmptyPrefixes,

    /// A declared target does not name exactly one selection form.
    #[error("Invalid convention target: {0}")]
    InvalidTarget(String),
}

/// Two or more selectors of one group resolve to the same template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Conflicting route(s) were detected on {group}: {}.", .templates.join(", "))]
pub struct ConflictError {
    /// Group the conflict was detected on.
    pub group: TypeName,
    /// Normalized templates that occur more than once, in detection order.
    pub templates: Vec<String>,
}

/// Any failure of registration or of the convention pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConventionError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),
}

/// Result type for convention operations.
pub type Result<T> = std::result::Result<T, ConventionError>;

fn join(types: &[TypeName]) -> String {
    types.iter().map(TypeName::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_lists_templates() {
        let err = ConflictError {
            group: "Samples".into(),
            templates: vec!["api/a".to_string(), "api/b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Conflicting route(s) were detected on Samples: api/a, api/b."
        );
    }

    #[test]
    fn test_configuration_message_lists_types() {
        let err = ConventionError::from(ConfigurationError::NotEndpointGroups(vec![
            "A".into(),
            "B".into(),
        ]));
        assert_eq!(
            err.to_string(),
            "Configuration error: One or more types are not endpoint group types: A, B"
        );
    }
}
