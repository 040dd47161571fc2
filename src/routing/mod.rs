//! Routing model and prefix engine.
//!
//! # Data Flow
//! ```text
//! Discovered EndpointGroup (selectors from declared routes)
//!     → matcher.rs (does the convention target this group?)
//!     → prefix.rs (Add / Remove / Combine on selectors)
//!         → template.rs (normalize, combine)
//!     → Mutated EndpointGroup handed back to the host router
//! ```
//!
//! # Design Decisions
//! - Templates compare case-insensitively, never by raw text
//! - Selector templates of one group stay unique after every convention;
//!   a collision is an error, not a silent merge
//! - Groups are mutated in place, in discovery order

pub mod group;
pub mod matcher;
pub mod prefix;
pub mod selector;
pub mod template;

pub use group::{AccessRequirement, EndpointGroup, TypeName};
pub use matcher::{MatchSet, TargetSelection};
pub use prefix::{PrefixOutcome, PrefixStrategy, RoutePrefixEngine, SelectorPredicate};
pub use selector::Selector;
pub use template::{combine, normalize, CombineSide, Template};
