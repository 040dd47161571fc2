//! Manifest schema definitions.
//!
//! A manifest describes a host application: its types, the endpoint groups
//! discovered from it, and the conventions to run over them. All types derive
//! Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::conventions::GroupPredicate;
use crate::error::ConfigurationError;
use crate::routing::group::{EndpointGroup, TypeName};
use crate::routing::matcher::TargetSelection;
use crate::routing::prefix::{PrefixStrategy, SelectorPredicate};
use crate::routing::selector::Selector;
use crate::routing::template::{normalize, CombineSide};
use crate::types::TypeEntry;

/// Root of a convention manifest.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Manifest {
    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Host types, used for ancestry and endpoint-group checks.
    pub types: Vec<TypeEntry>,

    /// Discovered endpoint groups, in discovery order.
    pub groups: Vec<GroupConfig>,

    /// Conventions, in registration order.
    pub conventions: Vec<ConventionConfig>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// One discovered endpoint group.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupConfig {
    /// Type identity of the group.
    #[serde(rename = "type")]
    pub type_name: TypeName,

    /// Declared selectors; an entry without `template` has no explicit route.
    #[serde(default)]
    pub selectors: Vec<Selector>,

    #[serde(default)]
    pub actions: Vec<String>,

    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl GroupConfig {
    pub fn to_group(&self) -> EndpointGroup {
        let mut group = EndpointGroup::new(self.type_name.clone());
        group.selectors = self.selectors.clone();
        group.actions = self.actions.clone();
        group.properties = self.properties.clone();
        group
    }
}

/// Convention target: exactly one of `type`, `types` or `package`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<TypeName>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<TypeName>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

impl TargetConfig {
    pub fn selection(&self) -> Result<TargetSelection, ConfigurationError> {
        match (&self.type_name, &self.types, &self.package) {
            (Some(ty), None, None) => Ok(TargetSelection::Type(ty.clone())),
            (None, Some(list), None) => Ok(TargetSelection::Types(list.clone())),
            (None, None, Some(package)) => Ok(TargetSelection::Package(package.clone())),
            (None, None, None) => Err(ConfigurationError::InvalidTarget(
                "one of `type`, `types` or `package` is required".to_string(),
            )),
            _ => Err(ConfigurationError::InvalidTarget(
                "only one of `type`, `types` or `package` may be set".to_string(),
            )),
        }
    }
}

fn default_inherit() -> bool {
    true
}

/// One convention entry, tagged by `kind`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConventionConfig {
    RoutePrefix {
        target: TargetConfig,
        prefixes: Vec<String>,
        #[serde(default)]
        strategy: PrefixStrategy,
        #[serde(default)]
        side: CombineSide,
        #[serde(default = "default_inherit")]
        inherit: bool,
        #[serde(default)]
        filter: Option<SelectorFilter>,
    },
    Access {
        target: TargetConfig,
        #[serde(default)]
        policy: Option<String>,
        #[serde(default)]
        authentication_schemes: Option<String>,
        #[serde(default)]
        roles: Option<String>,
        #[serde(default = "default_inherit")]
        inherit: bool,
        #[serde(default)]
        group_filter: Option<GroupFilter>,
    },
    Disable {
        target: TargetConfig,
        #[serde(default = "default_inherit")]
        inherit: bool,
    },
    Hide {
        target: TargetConfig,
        #[serde(default = "default_inherit")]
        inherit: bool,
    },
}

impl ConventionConfig {
    pub fn target(&self) -> &TargetConfig {
        match self {
            ConventionConfig::RoutePrefix { target, .. }
            | ConventionConfig::Access { target, .. }
            | ConventionConfig::Disable { target, .. }
            | ConventionConfig::Hide { target, .. } => target,
        }
    }
}

/// Declarative selector filter. Every configured condition must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectorFilter {
    /// Template must start with this text (case-insensitive).
    pub template_prefix: Option<String>,

    /// Template must contain this text (case-insensitive).
    pub template_contains: Option<String>,

    /// Selector metadata must carry these exact entries.
    pub metadata: BTreeMap<String, String>,
}

impl SelectorFilter {
    pub fn matches(&self, selector: &Selector) -> bool {
        let key = selector.key();
        if let Some(prefix) = &self.template_prefix {
            if !key.map(|k| k.starts_with(&normalize(prefix))).unwrap_or(false) {
                return false;
            }
        }
        if let Some(needle) = &self.template_contains {
            if !key.map(|k| k.contains(&normalize(needle))).unwrap_or(false) {
                return false;
            }
        }
        self.metadata
            .iter()
            .all(|(k, v)| selector.metadata.get(k) == Some(v))
    }

    pub fn into_predicate(self) -> SelectorPredicate {
        Arc::new(move |_: &EndpointGroup, selector: &Selector| self.matches(selector))
    }
}

/// Declarative group filter. Every configured condition must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroupFilter {
    /// Group must carry this property, with any value.
    pub has_property: Option<String>,

    /// Group properties must carry these exact entries.
    pub property: BTreeMap<String, String>,
}

impl GroupFilter {
    pub fn matches(&self, group: &EndpointGroup) -> bool {
        if let Some(name) = &self.has_property {
            if !group.properties.contains_key(name) {
                return false;
            }
        }
        self.property
            .iter()
            .all(|(k, v)| group.properties.get(k) == Some(v))
    }

    pub fn into_predicate(self) -> GroupPredicate {
        Arc::new(move |group: &EndpointGroup| self.matches(group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_manifest_defaults() {
        let manifest: Manifest = toml::from_str("").unwrap();
        assert_eq!(manifest.observability.log_level, "info");
        assert_eq!(manifest.observability.log_format, LogFormat::Pretty);
        assert!(manifest.conventions.is_empty());
    }

    #[test]
    fn test_convention_defaults() {
        let manifest: Manifest = toml::from_str(
            r#"
            [[conventions]]
            kind = "route_prefix"
            target = { type = "Samples" }
            prefixes = ["api"]
            "#,
        )
        .unwrap();

        match &manifest.conventions[0] {
            ConventionConfig::RoutePrefix { strategy, side, inherit, filter, .. } => {
                assert_eq!(*strategy, PrefixStrategy::Combine);
                assert_eq!(*side, CombineSide::Left);
                assert!(*inherit);
                assert!(filter.is_none());
            }
            other => panic!("unexpected convention: {other:?}"),
        }
    }

    #[test]
    fn test_target_selection_forms() {
        let single = TargetConfig { type_name: Some("A".into()), ..Default::default() };
        assert_eq!(single.selection().unwrap(), TargetSelection::of("A"));

        let package = TargetConfig { package: Some("ext".into()), ..Default::default() };
        assert_eq!(package.selection().unwrap(), TargetSelection::package("ext"));

        assert!(TargetConfig::default().selection().is_err());
        let both = TargetConfig {
            type_name: Some("A".into()),
            package: Some("ext".into()),
            ..Default::default()
        };
        assert!(both.selection().is_err());
    }

    #[test]
    fn test_selector_filter() {
        let filter = SelectorFilter {
            template_prefix: Some("V".into()),
            metadata: BTreeMap::from([("method".to_string(), "GET".to_string())]),
            ..Default::default()
        };
        assert!(filter.matches(&Selector::new("v2/items").with_metadata("method", "GET")));
        assert!(!filter.matches(&Selector::new("v2/items").with_metadata("method", "POST")));
        assert!(!filter.matches(&Selector::new("api/v2").with_metadata("method", "GET")));
        assert!(!filter.matches(&Selector::untemplated().with_metadata("method", "GET")));
        assert!(SelectorFilter::default().matches(&Selector::untemplated()));
    }

    #[test]
    fn test_group_filter() {
        let filter = GroupFilter {
            has_property: Some("owner".into()),
            ..Default::default()
        };
        let mut group = EndpointGroup::new("G");
        assert!(!filter.matches(&group));
        group.properties.insert("owner".into(), "team-a".into());
        assert!(filter.matches(&group));
    }

    #[test]
    fn test_group_selectors_parse() {
        let manifest: Manifest = toml::from_str(
            r#"
            [[groups]]
            type = "NoRoute"
            selectors = [{ template = "no-route" }, {}, { template = "v2", metadata = { method = "GET" } }]
            "#,
        )
        .unwrap();
        let group = manifest.groups[0].to_group();
        assert_eq!(group.templates(), vec!["no-route", "v2"]);
        assert!(group.selectors[1].template.is_none());
        assert_eq!(group.selectors[2].metadata["method"], "GET");
    }
}
