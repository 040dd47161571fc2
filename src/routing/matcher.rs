//! Group matching logic.
//!
//! # Responsibilities
//! - Decide which endpoint groups a convention applies to
//! - Resolve declared targets into a concrete type set at registration
//!
//! # Design Decisions
//! - A group matches when it is a target, or when inheritance is on and any
//!   target is one of its ancestors
//! - Matching is a pure function of the target set, the flag and the ancestry
//!   oracle; it never mutates anything
//! - Target order is kept for diagnostics, membership uses a set

use std::collections::HashSet;

use crate::error::ConfigurationError;
use crate::routing::group::{EndpointGroup, TypeName};
use crate::types::TypeSystem;

/// How a convention names the types it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelection {
    /// A single type.
    Type(TypeName),
    /// An explicit list of types.
    Types(Vec<TypeName>),
    /// Every endpoint-group type declared in a package.
    Package(String),
}

impl TargetSelection {
    pub fn of(ty: impl Into<TypeName>) -> Self {
        Self::Type(ty.into())
    }

    pub fn list<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        Self::Types(types.into_iter().map(Into::into).collect())
    }

    pub fn package(name: impl Into<String>) -> Self {
        Self::Package(name.into())
    }

    /// Validate the selection against the host and expand it to a type list.
    ///
    /// Single and list targets must name known endpoint-group types. A package
    /// target only ever yields endpoint-group types and may be empty.
    pub fn resolve(&self, types: &dyn TypeSystem) -> Result<Vec<TypeName>, ConfigurationError> {
        match self {
            Self::Type(ty) => {
                if !types.contains(ty) {
                    return Err(ConfigurationError::UnknownType(ty.clone()));
                }
                if !types.is_endpoint_group(ty) {
                    return Err(ConfigurationError::NotEndpointGroup(ty.clone()));
                }
                Ok(vec![ty.clone()])
            }
            Self::Types(list) => {
                if list.is_empty() {
                    return Err(ConfigurationError::EmptyTargets);
                }
                if let Some(unknown) = list.iter().find(|ty| !types.contains(ty)) {
                    return Err(ConfigurationError::UnknownType(unknown.clone()));
                }
                let rejected: Vec<TypeName> = list
                    .iter()
                    .filter(|ty| !types.is_endpoint_group(ty))
                    .cloned()
                    .collect();
                if !rejected.is_empty() {
                    return Err(ConfigurationError::NotEndpointGroups(rejected));
                }
                Ok(list.clone())
            }
            Self::Package(name) => {
                let resolved = types.types_in_package(name);
                if resolved.is_empty() {
                    tracing::warn!(package = %name, "Package target resolved to no endpoint groups");
                }
                Ok(resolved)
            }
        }
    }
}

impl From<TypeName> for TargetSelection {
    fn from(ty: TypeName) -> Self {
        Self::Type(ty)
    }
}

impl From<&str> for TargetSelection {
    fn from(ty: &str) -> Self {
        Self::Type(ty.into())
    }
}

/// Resolved target set of one convention.
#[derive(Debug, Clone)]
pub struct MatchSet {
    targets: Vec<TypeName>,
    members: HashSet<TypeName>,
    inherit: bool,
}

impl MatchSet {
    pub fn new(targets: Vec<TypeName>, inherit: bool) -> Self {
        let members = targets.iter().cloned().collect();
        Self {
            targets,
            members,
            inherit,
        }
    }

    pub fn targets(&self) -> &[TypeName] {
        &self.targets
    }

    pub fn inherit(&self) -> bool {
        self.inherit
    }

    /// True if the convention applies to a group with identity `id`.
    pub fn matches_type(&self, id: &TypeName, types: &dyn TypeSystem) -> bool {
        if self.members.contains(id) {
            return true;
        }
        self.inherit && self.targets.iter().any(|target| types.derives_from(id, target))
    }

    /// True if the convention applies to `group`.
    pub fn matches(&self, group: &EndpointGroup, types: &dyn TypeSystem) -> bool {
        self.matches_type(&group.id, types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TypeCatalog, TypeEntry};

    fn catalog() -> TypeCatalog {
        TypeCatalog::from_entries([
            TypeEntry::group("Base"),
            TypeEntry::group("Derived").with_parent("Base").in_package("app"),
            TypeEntry::group("Unrelated").in_package("app"),
            TypeEntry::plain("Helper").in_package("app"),
        ])
    }

    #[test]
    fn test_inherit_matches_descendants() {
        let types = catalog();
        let derived = EndpointGroup::new("Derived");

        assert!(MatchSet::new(vec!["Base".into()], true).matches(&derived, &types));
        assert!(!MatchSet::new(vec!["Base".into()], false).matches(&derived, &types));
    }

    #[test]
    fn test_exact_member_matches_regardless_of_inherit() {
        let types = catalog();
        let group = EndpointGroup::new("Unrelated");
        for inherit in [true, false] {
            assert!(MatchSet::new(vec!["Unrelated".into()], inherit).matches(&group, &types));
        }
    }

    #[test]
    fn test_any_ancestor_is_enough() {
        let types = catalog();
        let derived = EndpointGroup::new("Derived");
        let set = MatchSet::new(vec!["Unrelated".into(), "Base".into()], true);
        assert!(set.matches(&derived, &types));
        assert!(!set.matches(&EndpointGroup::new("Elsewhere"), &types));
    }

    #[test]
    fn test_resolve_rejects_non_groups() {
        let types = catalog();
        assert_eq!(
            TargetSelection::of("Helper").resolve(&types),
            Err(ConfigurationError::NotEndpointGroup("Helper".into()))
        );
        assert_eq!(
            TargetSelection::of("Ghost").resolve(&types),
            Err(ConfigurationError::UnknownType("Ghost".into()))
        );
        assert_eq!(
            TargetSelection::list(["Base", "Helper"]).resolve(&types),
            Err(ConfigurationError::NotEndpointGroups(vec!["Helper".into()]))
        );
        assert_eq!(
            TargetSelection::list(Vec::<TypeName>::new()).resolve(&types),
            Err(ConfigurationError::EmptyTargets)
        );
    }

    #[test]
    fn test_resolve_package_filters_groups() {
        let types = catalog();
        let resolved = TargetSelection::package("app").resolve(&types).unwrap();
        assert_eq!(resolved, vec![TypeName::from("Derived"), TypeName::from("Unrelated")]);
        assert!(TargetSelection::package("nowhere").resolve(&types).unwrap().is_empty());
    }
}
