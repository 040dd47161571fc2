//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registration and pass produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters by convention kind)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (group, convention, template) on every event
//! - Metrics are no-ops until a recorder exists

pub mod logging;
pub mod metrics;
