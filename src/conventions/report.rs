//! Pass summaries and route table snapshots.

use serde::Serialize;
use std::fmt;

use crate::routing::group::{AccessRequirement, EndpointGroup, TypeName};
use crate::routing::prefix::PrefixOutcome;

/// Totals of one convention pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Conventions applied.
    pub conventions: usize,
    /// Groups in the discovery input.
    pub groups: usize,
    /// (convention, group) pairs that matched.
    pub matched: usize,
    pub selectors_added: usize,
    pub selectors_removed: usize,
    pub selectors_rewritten: usize,
}

impl PassReport {
    pub(crate) fn record(&mut self, outcome: &PrefixOutcome) {
        self.matched += 1;
        self.selectors_added += outcome.added;
        self.selectors_removed += outcome.removed;
        self.selectors_rewritten += outcome.rewritten;
    }
}

/// Final routes of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRoutes {
    pub group: TypeName,
    pub visible: bool,
    pub enabled: bool,
    pub templates: Vec<String>,
    pub untemplated: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub access_requirements: Vec<AccessRequirement>,
}

/// Serializable snapshot of all groups after a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteTable {
    pub groups: Vec<GroupRoutes>,
}

impl RouteTable {
    pub fn from_groups(groups: &[EndpointGroup]) -> Self {
        let groups = groups
            .iter()
            .map(|group| GroupRoutes {
                group: group.id.clone(),
                visible: group.visible,
                enabled: group.enabled,
                templates: group.templates().into_iter().map(str::to_string).collect(),
                untemplated: group.selectors.iter().filter(|s| s.template.is_none()).count(),
                access_requirements: group.access_requirements.clone(),
            })
            .collect();
        Self { groups }
    }

    pub fn get(&self, group: &TypeName) -> Option<&GroupRoutes> {
        self.groups.iter().find(|g| &g.group == group)
    }

    /// Number of live templates across enabled groups.
    pub fn route_count(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| g.enabled)
            .map(|g| g.templates.len())
            .sum()
    }
}

impl fmt::Display for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.groups {
            let mut flags = Vec::new();
            if !group.enabled {
                flags.push("disabled");
            }
            if !group.visible {
                flags.push("hidden");
            }
            if flags.is_empty() {
                writeln!(f, "{}", group.group)?;
            } else {
                writeln!(f, "{} [{}]", group.group, flags.join(", "))?;
            }
            for template in &group.templates {
                writeln!(f, "  /{}", template.trim_start_matches('/'))?;
            }
            for req in &group.access_requirements {
                writeln!(
                    f,
                    "  requires policy={} schemes={} roles={}",
                    req.policy.as_deref().unwrap_or("-"),
                    req.authentication_schemes.as_ref().map(|s| s.join(",")).unwrap_or_else(|| "-".into()),
                    req.roles.as_ref().map(|r| r.join(",")).unwrap_or_else(|| "-".into()),
                )?;
            }
        }
        Ok(())
    }
}
