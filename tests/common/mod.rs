//! Shared fixtures for integration tests.

use std::sync::Arc;

use route_conventions::routing::{EndpointGroup, Selector};
use route_conventions::types::{TypeCatalog, TypeEntry};
use route_conventions::ConventionRegistry;

/// Base → Derived hierarchy, a standalone sample group, two external groups
/// and one type that is not an endpoint group.
pub fn catalog() -> Arc<TypeCatalog> {
    Arc::new(TypeCatalog::from_entries([
        TypeEntry::group("Base").in_package("sample"),
        TypeEntry::group("Derived").with_parent("Base").in_package("sample"),
        TypeEntry::group("NoRouteController").in_package("sample"),
        TypeEntry::group("SamplesController").in_package("sample"),
        TypeEntry::group("SecretController").in_package("external"),
        TypeEntry::group("VerySecretController").in_package("external"),
        TypeEntry::plain("VersionChecker").in_package("sample"),
    ]))
}

pub fn registry() -> ConventionRegistry {
    ConventionRegistry::new(catalog())
}

/// A group with one templated selector per entry.
pub fn group(id: &str, templates: &[&str]) -> EndpointGroup {
    templates
        .iter()
        .fold(EndpointGroup::new(id), |group, template| group.with_route(template))
}

/// The groups of the sample application, in discovery order.
#[allow(dead_code)]
pub fn sample_groups() -> Vec<EndpointGroup> {
    vec![
        group("NoRouteController", &["no-route", "api/no-route/v2"]),
        group("SamplesController", &["api/[controller]"]).with_selector(Selector::untemplated()),
        group("SecretController", &["api/secret"]),
        group("VerySecretController", &["api/very-secret"]),
    ]
}

/// Normalized keys of a group's templated selectors, sorted.
#[allow(dead_code)]
pub fn keys(group: &EndpointGroup) -> Vec<String> {
    let mut keys: Vec<String> = group
        .selectors
        .iter()
        .filter_map(|s| s.key().map(str::to_string))
        .collect();
    keys.sort();
    keys
}
