//! Manifest subsystem.
//!
//! # Data Flow
//! ```text
//! manifest file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → Manifest::build
//!         → TypeCatalog (host type system)
//!         → Vec<EndpointGroup> (discovery input)
//!         → ConventionRegistry (registration-time target checks)
//!
//! On change (watch mode):
//!     watcher.rs detects change
//!     → loader.rs loads new manifest
//!     → validation.rs validates
//!     → new manifest sent to the pass runner
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal manifests
//! - Validation separates syntactic (serde) from semantic checks
//! - A failed reload keeps the last good manifest

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_manifest, parse_manifest, ManifestError};
pub use schema::{ConventionConfig, GroupFilter, LogFormat, Manifest, ObservabilityConfig, SelectorFilter};
pub use watcher::ManifestWatcher;
