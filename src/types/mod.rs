//! Host type system boundary.
//!
//! # Data Flow
//! ```text
//! Registration:
//!     TargetSelection → TypeSystem::is_endpoint_group (validate)
//!                     → TypeSystem::types_in_package (expand)
//!
//! Convention pass:
//!     MatchSet → TypeSystem::derives_from (ancestry oracle)
//! ```
//!
//! # Design Decisions
//! - The core never inspects types itself; the host answers every question
//! - Answers must be pure and stable for the duration of a pass

pub mod catalog;

pub use catalog::{TypeCatalog, TypeEntry};

use crate::routing::group::TypeName;

/// Questions the convention engine asks the host about its types.
pub trait TypeSystem: Send + Sync + std::fmt::Debug {
    /// True if `candidate` is a strict descendant of `ancestor`.
    fn derives_from(&self, candidate: &TypeName, ancestor: &TypeName) -> bool;

    /// True if the host knows `ty` and recognizes it as an endpoint group.
    fn is_endpoint_group(&self, ty: &TypeName) -> bool;

    /// True if the host knows `ty` at all.
    fn contains(&self, ty: &TypeName) -> bool;

    /// Endpoint-group types declared in the named package, in declaration order.
    fn types_in_package(&self, package: &str) -> Vec<TypeName>;
}
