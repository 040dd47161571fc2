//! Convention subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (registry.rs):
//!     TargetSelection + options
//!     → validate targets against TypeSystem
//!     → Convention pushed in registration order
//!
//! Pass (registry.rs):
//!     for each Convention (registration order):
//!         for each EndpointGroup (discovery order):
//!             → route_prefix.rs | access.rs | disable.rs | visibility.rs
//!     → PassReport, or the first error
//! ```
//!
//! # Design Decisions
//! - Closed set of convention kinds dispatched through an enum
//! - Later conventions see the selectors left by earlier ones
//! - Fail fast: the first error aborts the pass

pub mod access;
pub mod disable;
pub mod registry;
pub mod report;
pub mod route_prefix;
pub mod visibility;

pub use access::{AccessConvention, AccessOptions, GroupPredicate};
pub use disable::DisableConvention;
pub use registry::ConventionRegistry;
pub use report::{GroupRoutes, PassReport, RouteTable};
pub use route_prefix::{RoutePrefixConvention, RoutePrefixOptions};
pub use visibility::HideConvention;

use serde::Serialize;
use std::fmt;

use crate::error::Result;
use crate::routing::group::EndpointGroup;
use crate::routing::matcher::MatchSet;
use crate::routing::prefix::PrefixOutcome;
use crate::types::TypeSystem;

/// Kind tag used in logs, metrics and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConventionKind {
    RoutePrefix,
    Access,
    Disable,
    Hide,
}

impl ConventionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConventionKind::RoutePrefix => "route_prefix",
            ConventionKind::Access => "access",
            ConventionKind::Disable => "disable",
            ConventionKind::Hide => "hide",
        }
    }
}

impl fmt::Display for ConventionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered convention.
#[derive(Debug, Clone)]
pub enum Convention {
    RoutePrefix(RoutePrefixConvention),
    Access(AccessConvention),
    Disable(DisableConvention),
    Hide(HideConvention),
}

impl Convention {
    pub fn kind(&self) -> ConventionKind {
        match self {
            Convention::RoutePrefix(_) => ConventionKind::RoutePrefix,
            Convention::Access(_) => ConventionKind::Access,
            Convention::Disable(_) => ConventionKind::Disable,
            Convention::Hide(_) => ConventionKind::Hide,
        }
    }

    pub fn match_set(&self) -> &MatchSet {
        match self {
            Convention::RoutePrefix(c) => c.match_set(),
            Convention::Access(c) => c.match_set(),
            Convention::Disable(c) => c.match_set(),
            Convention::Hide(c) => c.match_set(),
        }
    }

    /// Apply to one group. `None` means the group was not affected.
    pub fn apply(&self, group: &mut EndpointGroup, types: &dyn TypeSystem) -> Result<Option<PrefixOutcome>> {
        let outcome = match self {
            Convention::RoutePrefix(c) => c.apply(group, types)?,
            Convention::Access(c) => c.apply(group, types).then(PrefixOutcome::default),
            Convention::Disable(c) => c.apply(group, types).map(|removed| PrefixOutcome {
                removed,
                ..PrefixOutcome::default()
            }),
            Convention::Hide(c) => c.apply(group, types).then(PrefixOutcome::default),
        };
        Ok(outcome)
    }
}
