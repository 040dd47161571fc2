//! Route prefix and access-policy convention engine.
//!
//! Rewrites, adds, removes or combines route prefixes across discovered
//! endpoint groups, rejects resulting route collisions, and marks groups as
//! hidden, disabled or access-restricted. Runs once at startup, before routes
//! go live.

pub mod config;
pub mod conventions;
pub mod error;
pub mod observability;
pub mod routing;
pub mod types;

pub use config::Manifest;
pub use conventions::{ConventionRegistry, PassReport, RouteTable};
pub use error::{ConfigurationError, ConflictError, ConventionError, Result};
pub use routing::{CombineSide, EndpointGroup, PrefixStrategy, Selector, Template};
pub use types::{TypeCatalog, TypeSystem};
