//! Convention pass metrics.
//!
//! # Metrics
//! - `conventions_applied_total` (counter): matched groups, by convention kind
//! - `convention_selectors_changed_total` (counter): selectors added, removed or rewritten
//! - `convention_conflicts_total` (counter): passes aborted by a route conflict
//!
//! # Design Decisions
//! - No exporter is installed here; the host decides where metrics go
//! - With no recorder installed every call is a no-op

pub fn record_convention_applied(kind: &'static str) {
    metrics::counter!("conventions_applied_total", "kind" => kind).increment(1);
}

pub fn record_selectors_changed(kind: &'static str, count: usize) {
    if count > 0 {
        metrics::counter!("convention_selectors_changed_total", "kind" => kind).increment(count as u64);
    }
}

pub fn record_conflict(kind: &'static str) {
    metrics::counter!("convention_conflicts_total", "kind" => kind).increment(1);
}
