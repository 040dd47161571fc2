//! Route prefix strategies.
//!
//! # Responsibilities
//! - Add prefix selectors to a group
//! - Remove selectors whose template equals a prefix
//! - Combine a prefix with every existing template
//! - Detect selectors that resolve to the same template
//!
//! # Design Decisions
//! - Add checks the pre-existing selectors for duplicates before touching
//!   anything and fails immediately
//! - Add skips a prefix only when a pre-existing selector already carries it;
//!   prefixes added in the same call do not suppress each other
//! - Combine finishes the whole pass before reporting duplicates, and does
//!   not roll back what it already rewrote
//! - Selectors without a template are invisible to Remove, Combine and
//!   duplicate detection

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::ConflictError;
use crate::routing::group::EndpointGroup;
use crate::routing::selector::Selector;
use crate::routing::template::{combine, CombineSide, Template};

/// How prefixes are applied to a group's selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixStrategy {
    /// Append one new selector per prefix.
    Add,
    /// Drop selectors whose template is one of the prefixes.
    Remove,
    /// Join each prefix onto every existing template.
    #[default]
    Combine,
}

impl fmt::Display for PrefixStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrefixStrategy::Add => "add",
            PrefixStrategy::Remove => "remove",
            PrefixStrategy::Combine => "combine",
        };
        f.write_str(name)
    }
}

/// Per-selector filter deciding whether a strategy touches a selector.
pub type SelectorPredicate = Arc<dyn Fn(&EndpointGroup, &Selector) -> bool + Send + Sync>;

/// Selector counts changed by one application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrefixOutcome {
    pub added: usize,
    pub removed: usize,
    pub rewritten: usize,
}

/// Applies one prefix strategy to endpoint groups.
#[derive(Clone)]
pub struct RoutePrefixEngine {
    prefixes: Vec<Template>,
    strategy: PrefixStrategy,
    side: CombineSide,
    predicate: Option<SelectorPredicate>,
}

impl fmt::Debug for RoutePrefixEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutePrefixEngine")
            .field("prefixes", &self.prefixes)
            .field("strategy", &self.strategy)
            .field("side", &self.side)
            .field("predicate", &self.predicate.is_some())
            .finish()
    }
}

impl RoutePrefixEngine {
    pub fn new(prefixes: Vec<Template>, strategy: PrefixStrategy, side: CombineSide) -> Self {
        Self {
            prefixes,
            strategy,
            side,
            predicate: None,
        }
    }

    /// Restrict the strategy to selectors accepted by `predicate`.
    pub fn with_predicate(mut self, predicate: SelectorPredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn prefixes(&self) -> &[Template] {
        &self.prefixes
    }

    pub fn strategy(&self) -> PrefixStrategy {
        self.strategy
    }

    pub fn side(&self) -> CombineSide {
        self.side
    }

    /// Apply the configured strategy to `group`.
    pub fn apply(&self, group: &mut EndpointGroup) -> Result<PrefixOutcome, ConflictError> {
        match self.strategy {
            PrefixStrategy::Add => self.add(group).map(|added| PrefixOutcome {
                added,
                ..PrefixOutcome::default()
            }),
            PrefixStrategy::Remove => Ok(PrefixOutcome {
                removed: self.remove(group),
                ..PrefixOutcome::default()
            }),
            PrefixStrategy::Combine => self.combine(group).map(|rewritten| PrefixOutcome {
                rewritten,
                ..PrefixOutcome::default()
            }),
        }
    }

    fn should_apply(&self, group: &EndpointGroup, selector: &Selector) -> bool {
        self.predicate
            .as_ref()
            .map(|predicate| predicate(group, selector))
            .unwrap_or(true)
    }

    fn add(&self, group: &mut EndpointGroup) -> Result<usize, ConflictError> {
        let mut seen = HashSet::new();
        let mut duplicates = Duplicates::default();
        for key in group.selectors.iter().filter_map(Selector::key) {
            if !seen.insert(key.to_string()) {
                duplicates.record(key);
            }
        }
        duplicates.into_result(group)?;

        let mut added = 0;
        for prefix in &self.prefixes {
            if seen.contains(prefix.key()) {
                tracing::debug!(group = %group.id, template = %prefix, "Prefix already present, skipping");
                continue;
            }
            let candidate = Selector {
                template: Some(prefix.clone()),
                ..Selector::default()
            };
            if !self.should_apply(group, &candidate) {
                continue;
            }
            tracing::debug!(group = %group.id, template = %prefix, "Adding prefix selector");
            group.selectors.push(candidate);
            added += 1;
        }
        Ok(added)
    }

    fn remove(&self, group: &mut EndpointGroup) -> usize {
        let keys: HashSet<&str> = self.prefixes.iter().map(Template::key).collect();
        let mut removed = 0;

        for index in (0..group.selectors.len()).rev() {
            let listed = group.selectors[index]
                .key()
                .map(|key| keys.contains(key))
                .unwrap_or(false);
            if listed && self.should_apply(group, &group.selectors[index]) {
                let selector = group.selectors.remove(index);
                tracing::debug!(
                    group = %group.id,
                    template = ?selector.template.as_ref().map(Template::as_str),
                    "Removed prefix selector"
                );
                removed += 1;
            }
        }
        removed
    }

    fn combine(&self, group: &mut EndpointGroup) -> Result<usize, ConflictError> {
        let mut seen = HashSet::new();
        let mut duplicates = Duplicates::default();
        let mut rewritten = 0;

        for prefix in &self.prefixes {
            for index in 0..group.selectors.len() {
                let selector = &group.selectors[index];
                let Some(existing) = selector.template.as_ref() else {
                    continue;
                };
                if !self.should_apply(group, selector) {
                    continue;
                }

                let combined = combine(prefix, existing, self.side);
                if !seen.insert(combined.key().to_string()) {
                    duplicates.record(combined.key());
                }
                tracing::debug!(
                    group = %group.id,
                    from = %existing,
                    to = %combined,
                    "Combined route prefix"
                );
                group.selectors[index].template = Some(combined);
                rewritten += 1;
            }
        }

        duplicates.into_result(group)?;
        Ok(rewritten)
    }
}

/// Duplicated keys, each recorded once in detection order.
#[derive(Default)]
struct Duplicates {
    keys: Vec<String>,
}

impl Duplicates {
    fn record(&mut self, key: &str) {
        if !self.keys.iter().any(|k| k == key) {
            self.keys.push(key.to_string());
        }
    }

    fn into_result(self, group: &EndpointGroup) -> Result<(), ConflictError> {
        if self.keys.is_empty() {
            return Ok(());
        }
        tracing::error!(group = %group.id, templates = ?self.keys, "Conflicting routes detected");
        Err(ConflictError {
            group: group.id.clone(),
            templates: self.keys,
        })
    }
}
