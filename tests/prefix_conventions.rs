//! End-to-end behaviour of the convention pass.

use std::sync::Arc;

use route_conventions::conventions::{AccessOptions, RoutePrefixOptions};
use route_conventions::routing::{normalize, EndpointGroup, MatchSet, Selector};
use route_conventions::types::TypeSystem;
use route_conventions::{CombineSide, ConfigurationError, ConventionError, PrefixStrategy, RouteTable};

mod common;

#[test]
fn test_add_to_group_without_selectors() {
    let mut registry = common::registry();
    registry
        .add_route_prefix(
            "NoRouteController",
            RoutePrefixOptions::new("api/x").strategy(PrefixStrategy::Add),
        )
        .unwrap();

    let mut groups = vec![EndpointGroup::new("NoRouteController")];
    registry.apply(&mut groups).unwrap();

    assert_eq!(groups[0].templates(), vec!["api/x"]);
}

#[test]
fn test_add_never_deletes_and_unions_keys() {
    let original = common::group("Derived", &["Items", "items/{id}"]);
    let prefixes = ["ITEMS", "api/items", "v1"];

    let mut registry = common::registry();
    registry
        .add_route_prefix(
            "Base",
            RoutePrefixOptions::with_prefixes(prefixes).strategy(PrefixStrategy::Add),
        )
        .unwrap();

    let mut groups = vec![original.clone()];
    registry.apply(&mut groups).unwrap();

    for template in original.templates() {
        assert!(groups[0].templates().contains(&template));
    }

    let mut expected: Vec<String> = common::keys(&original);
    for prefix in prefixes {
        let key = normalize(prefix);
        if !expected.contains(&key) {
            expected.push(key);
        }
    }
    expected.sort();
    assert_eq!(common::keys(&groups[0]), expected);
}

#[test]
fn test_remove_single_selector() {
    let mut registry = common::registry();
    registry
        .add_route_prefix(
            "NoRouteController",
            RoutePrefixOptions::new("no-route").strategy(PrefixStrategy::Remove),
        )
        .unwrap();

    let mut groups = vec![common::group("NoRouteController", &["no-route"])];
    registry.apply(&mut groups).unwrap();

    assert!(groups[0].selectors.is_empty());
}

#[test]
fn test_remove_is_idempotent_and_spares_untemplated() {
    let mut registry = common::registry();
    registry
        .add_route_prefix(
            "SamplesController",
            RoutePrefixOptions::with_prefixes(["API/[Controller]", "missing"]).strategy(PrefixStrategy::Remove),
        )
        .unwrap();

    let mut once = common::sample_groups();
    registry.apply(&mut once).unwrap();
    let mut twice = once.clone();
    registry.apply(&mut twice).unwrap();

    let raw = |groups: &[EndpointGroup]| -> Vec<Vec<String>> {
        groups
            .iter()
            .map(|g| g.templates().into_iter().map(str::to_string).collect())
            .collect()
    };
    assert_eq!(raw(&once), raw(&twice));
    assert_eq!(once.len(), twice.len());
    for (a, b) in once.iter().zip(&twice) {
        assert_eq!(a.selectors.len(), b.selectors.len());
    }
    assert_eq!(once[1].selectors, vec![Selector::untemplated()]);
    assert_eq!(once[0].templates(), vec!["no-route", "api/no-route/v2"]);
}

#[test]
fn test_combine_sides() {
    for (side, expected) in [
        (CombineSide::Right, "v2/api/no-route"),
        (CombineSide::Left, "api/no-route/v2"),
    ] {
        let mut registry = common::registry();
        registry
            .add_route_prefix("NoRouteController", RoutePrefixOptions::new("api/no-route").side(side))
            .unwrap();

        let mut groups = vec![common::group("NoRouteController", &["v2"])];
        registry.apply(&mut groups).unwrap();
        assert_eq!(groups[0].templates(), vec![expected]);
    }
}

#[test]
fn test_combine_is_not_idempotent() {
    let mut registry = common::registry();
    registry
        .add_route_prefix("SamplesController", RoutePrefixOptions::new("api"))
        .unwrap();

    let mut groups = vec![common::group("SamplesController", &["samples"])];
    registry.apply(&mut groups).unwrap();
    assert_eq!(groups[0].templates(), vec!["api/samples"]);

    registry.apply(&mut groups).unwrap();
    assert_eq!(groups[0].templates(), vec!["api/api/samples"]);
}

#[test]
fn test_combine_conflict_lists_duplicate_once() {
    let mut registry = common::registry();
    registry
        .add_route_prefix("NoRouteController", RoutePrefixOptions::new("api").side(CombineSide::Right))
        .unwrap();

    let mut groups = vec![
        common::group("NoRouteController", &["v2", "V2", "other"]),
        common::group("SamplesController", &["v2"]),
    ];
    let err = registry.apply(&mut groups).unwrap_err();

    match err {
        ConventionError::Conflict(conflict) => {
            assert_eq!(conflict.group.as_str(), "NoRouteController");
            assert_eq!(conflict.templates, vec!["v2/api".to_string()]);
        }
        other => panic!("expected conflict, got {other:?}"),
    }
    // Rewritten selectors are kept.
    assert_eq!(groups[0].templates(), vec!["v2/api", "V2/api", "other/api"]);
}

#[test]
fn test_match_set_hierarchy() {
    let types = common::catalog();
    let derived = EndpointGroup::new("Derived");

    assert!(MatchSet::new(vec!["Base".into()], true).matches(&derived, types.as_ref()));
    assert!(!MatchSet::new(vec!["Base".into()], false).matches(&derived, types.as_ref()));
    for inherit in [true, false] {
        assert!(MatchSet::new(vec!["Derived".into()], inherit).matches(&derived, types.as_ref()));
    }
    assert!(types.derives_from(&"Derived".into(), &"Base".into()));
}

#[test]
fn test_registration_rejects_non_endpoint_types() {
    let mut registry = common::registry();

    assert_eq!(
        registry.add_disable("VersionChecker", true).unwrap_err(),
        ConventionError::Configuration(ConfigurationError::NotEndpointGroup("VersionChecker".into()))
    );
    assert_eq!(
        registry
            .add_access(
                route_conventions::routing::TargetSelection::list(["SecretController", "VersionChecker"]),
                AccessOptions::default().policy("admins"),
            )
            .unwrap_err(),
        ConventionError::Configuration(ConfigurationError::NotEndpointGroups(vec!["VersionChecker".into()]))
    );
    assert!(registry.is_empty());
}

#[test]
fn test_sample_application_pass() {
    let mut registry = common::registry();
    registry
        .add_hide(route_conventions::routing::TargetSelection::package("external"), true)
        .unwrap()
        .add_route_prefix(
            "NoRouteController",
            RoutePrefixOptions::new("api/no-route")
                .strategy(PrefixStrategy::Combine)
                .predicate(Arc::new(|_: &EndpointGroup, s: &Selector| s.key().map(|k| !k.starts_with("api/")).unwrap_or(false))),
        )
        .unwrap()
        .add_access(
            "SecretController",
            AccessOptions::default()
                .policy("admins")
                .authentication_schemes("Bearer, Cookies")
                .roles("admin"),
        )
        .unwrap()
        .add_disable("VerySecretController", false)
        .unwrap();

    let mut groups = common::sample_groups();
    let report = registry.apply(&mut groups).unwrap();

    assert_eq!(report.conventions, 4);
    assert_eq!(report.groups, 4);
    assert_eq!(report.selectors_rewritten, 1);
    assert_eq!(report.selectors_removed, 1);

    let table = RouteTable::from_groups(&groups);
    let no_route = table.get(&"NoRouteController".into()).unwrap();
    assert_eq!(no_route.templates, vec!["api/no-route/no-route", "api/no-route/v2"]);

    let secret = table.get(&"SecretController".into()).unwrap();
    assert!(!secret.visible && secret.enabled);
    assert_eq!(secret.access_requirements.len(), 1);
    assert_eq!(secret.access_requirements[0].roles, Some(vec!["admin".to_string()]));

    let very_secret = table.get(&"VerySecretController".into()).unwrap();
    assert!(!very_secret.enabled);
    assert!(very_secret.templates.is_empty());

    assert_eq!(table.route_count(), 4);
}
