//! End-to-end reporting scenarios over a synthetic dataspace.

use proptest::prelude::*;
use reportql_core::{catalog, prelude::*, registry::ReportingRegistry};
use std::collections::{BTreeMap, BTreeSet};

const ALICE: &str = "alice";

/// A dataspace with 200 licenses, two owners, a three-level component
/// hierarchy and one secured product.
fn build_store() -> Store {
    catalog::register_catalog();

    let mut store = Store::new();
    store.set_tag_labels(vec!["Approved".to_string()]);

    store.add_table("Owner", AccessPolicy::Open);
    store.insert(
        "Owner",
        Record::new(1)
            .with("name", Value::text("nexB"))
            .with("type", Value::text("organization")),
    );
    store.insert(
        "Owner",
        Record::new(2)
            .with("name", Value::text("Eclipse Foundation"))
            .with("type", Value::text("organization")),
    );

    store.add_table("LicenseTag", AccessPolicy::Open);
    store.insert(
        "LicenseTag",
        Record::new(5).with("label", Value::text("Network Redistribution")),
    );

    store.add_table("License", AccessPolicy::Open);
    for n in 0..200u64 {
        let category = if n % 2 == 0 { "permissive" } else { "copyleft" };
        let tags = if n % 10 == 0 {
            vec![Value::Ref(5)]
        } else {
            Vec::new()
        };

        store.insert(
            "License",
            Record::new(1000 + n)
                .with("key", Value::text(format!("license_{n}")))
                .with("name", Value::text(format!("License {n}")))
                .with("short_name", Value::text(format!("L{n}")))
                .with("is_active", Value::Bool(n % 3 != 0))
                .with("category", Value::text(category))
                .with("owner", Value::Ref(1 + n % 2))
                .with("tags", Value::List(tags)),
        );
    }
    store.insert(
        "License",
        Record::new(1500)
            .with("key", Value::text("gpl-2.0"))
            .with("name", Value::text("GNU General Public License 2.0"))
            .with("short_name", Value::text("GPL 2.0"))
            .with("is_active", Value::Bool(true))
            .with("category", Value::text("copyleft"))
            .with("owner", Value::Ref(1))
            .with("tags", Value::List(vec![Value::Ref(5)])),
    );

    store.add_table("Component", AccessPolicy::Open);
    store.insert(
        "Component",
        Record::new(10)
            .with("name", Value::text("platform"))
            .with("version", Value::text("1.0"))
            .with("owner", Value::Ref(2))
            .with("license_expression", Value::text("gpl-2.0"))
            .with("curation_level", Value::Int(50))
            .with("is_active", Value::Bool(true))
            .with("licenses", Value::List(vec![Value::Ref(1500)]))
            .with_tag("Approved", Value::Bool(true)),
    );
    store.insert(
        "Component",
        Record::new(11)
            .with("name", Value::text("runtime"))
            .with("version", Value::text("1.0"))
            .with("owner", Value::Ref(2))
            .with("license_expression", Value::text("license_2"))
            .with("curation_level", Value::Int(30))
            .with("is_active", Value::Bool(true))
            .with("licenses", Value::List(vec![Value::Ref(1002)])),
    );
    store.insert(
        "Component",
        Record::new(12)
            .with("name", Value::text("parser"))
            .with("version", Value::text("0.9"))
            .with("owner", Value::Null)
            .with("license_expression", Value::text("license_4"))
            .with("curation_level", Value::Int(10))
            .with("is_active", Value::Null)
            .with("licenses", Value::List(vec![Value::Ref(1004)])),
    );

    store.add_table("Subcomponent", AccessPolicy::Open);
    store.insert(
        "Subcomponent",
        Record::new(20)
            .with("parent", Value::Ref(10))
            .with("child", Value::Ref(11)),
    );
    store.insert(
        "Subcomponent",
        Record::new(21)
            .with("parent", Value::Ref(11))
            .with("child", Value::Ref(12)),
    );

    store.add_table("Package", AccessPolicy::Open);

    let mut assignments = BTreeMap::new();
    assignments.insert(ALICE.to_string(), BTreeSet::from([30]));
    store.add_table("Product", AccessPolicy::Secured(assignments));
    store.insert(
        "Product",
        Record::new(30)
            .with("name", Value::text("Atlas"))
            .with("version", Value::text("2.1")),
    );

    store.add_table(
        "ProductComponent",
        AccessPolicy::ProductSecured {
            via_field: "product",
            product_model: "Product",
        },
    );
    store.insert(
        "ProductComponent",
        Record::new(40)
            .with("product", Value::Ref(30))
            .with("component", Value::Ref(10))
            .with("license_expression", Value::text("gpl-2.0")),
    );

    store
}

#[test]
fn descending_order_over_two_hundred_rows() {
    let store = build_store();
    let query = Query::new("all", &catalog::LICENSE, AndOr::And)
        .with_filter(Filter::new("key", Lookup::StartsWith, "license_"))
        .with_order_field(OrderField::new("key", Sort::Descending, 1));

    let ids = query.get_qs(&store, &BTreeMap::new(), None).unwrap();
    assert_eq!(ids.len(), 200);
    // Lexicographic descending over unpadded names puts license_99 first
    // and license_0 last.
    assert_eq!(ids.first(), Some(&1099));
    assert_eq!(ids.last(), Some(&1000));
}

#[test]
fn gpl_report_end_to_end() {
    let store = build_store();
    let mut registry = ReportingRegistry::new("nexB");

    registry
        .add_query(
            Query::new("GPL", &catalog::LICENSE, AndOr::And)
                .with_filter(Filter::new("key", Lookup::Exact, "gpl-2.0")),
        )
        .unwrap();
    registry
        .add_column_template(
            ColumnTemplate::new("License columns", &catalog::LICENSE)
                .with_field(AssignedField::new("key", 1))
                .with_field(AssignedField::new("owner", 2))
                .with_field(AssignedField::new("tags__label", 3).display("Tags")),
            &store,
        )
        .unwrap();
    registry
        .add_report(Report::new("GPL usage", "GPL", "License columns"))
        .unwrap();

    let output = registry
        .report_output("GPL usage", &store, &BTreeMap::new(), None)
        .unwrap();

    assert_eq!(output.headers, vec!["key", "owner", "Tags"]);
    assert_eq!(
        output.rows,
        vec![vec![
            "gpl-2.0".to_string(),
            "nexB".to_string(),
            "Network Redistribution".to_string(),
        ]]
    );
}

#[test]
fn tags_isnull_partitions_the_table() {
    let store = build_store();

    let untagged = Query::new("untagged", &catalog::LICENSE, AndOr::And)
        .with_filter(Filter::new("tags", Lookup::IsNull, "True"));
    let tagged = Query::new("tagged", &catalog::LICENSE, AndOr::And)
        .with_filter(Filter::new("tags", Lookup::IsNull, "False"));

    let untagged_ids = untagged.get_qs(&store, &BTreeMap::new(), None).unwrap();
    let tagged_ids = tagged.get_qs(&store, &BTreeMap::new(), None).unwrap();

    // 20 of the 200 generated licenses carry a tag, plus gpl-2.0.
    assert_eq!(tagged_ids.len(), 21);
    assert_eq!(untagged_ids.len() + tagged_ids.len(), 201);
    assert!(tagged_ids.contains(&1500));
}

#[test]
fn runtime_parameters_flow_through_report_output() {
    let store = build_store();
    let mut registry = ReportingRegistry::new("nexB");

    registry
        .add_query(
            Query::new("By key", &catalog::LICENSE, AndOr::And)
                .with_filter(Filter::new("key", Lookup::Exact, "gpl-2.0").runtime()),
        )
        .unwrap();
    registry
        .add_column_template(
            ColumnTemplate::new("Key only", &catalog::LICENSE)
                .with_field(AssignedField::new("key", 1)),
            &store,
        )
        .unwrap();
    registry
        .add_report(Report::new("By key", "By key", "Key only"))
        .unwrap();

    let mut overrides = BTreeMap::new();
    overrides.insert(0, "license_7".to_string());

    let output = registry
        .report_output("By key", &store, &overrides, None)
        .unwrap();
    assert_eq!(output.rows, vec![vec!["license_7".to_string()]]);

    // The `ALL` sentinel disables the filter; with nothing left the
    // result is explicitly empty.
    let mut overrides = BTreeMap::new();
    overrides.insert(0, "ALL".to_string());
    let output = registry
        .report_output("By key", &store, &overrides, None)
        .unwrap();
    assert!(output.rows.is_empty());
}

#[test]
fn product_scoping_applies_across_the_report_surface() {
    let store = build_store();
    let query = Query::new("in-atlas", &catalog::COMPONENT, AndOr::And)
        .with_filter(Filter::new("id", Lookup::ProductDescendant, "Atlas:2.1"));

    let as_alice = query
        .get_qs(&store, &BTreeMap::new(), Some(ALICE))
        .unwrap();
    assert_eq!(as_alice, vec![10, 11, 12]);

    let anonymous = query.get_qs(&store, &BTreeMap::new(), None).unwrap();
    assert!(anonymous.is_empty());
}

#[test]
fn report_rejects_mismatched_query_and_template_models() {
    let store = build_store();
    let mut registry = ReportingRegistry::new("nexB");

    registry
        .add_query(Query::new("Licenses", &catalog::LICENSE, AndOr::And))
        .unwrap();
    registry
        .add_column_template(
            ColumnTemplate::new("Component columns", &catalog::COMPONENT)
                .with_field(AssignedField::new("name", 1)),
            &store,
        )
        .unwrap();

    let errors = registry
        .add_report(Report::new("Mismatch", "Licenses", "Component columns"))
        .unwrap_err();

    // Both references are flagged, plus one combined non-field error.
    assert!(errors.field_errors.iter().any(|(f, _)| *f == "query"));
    assert!(
        errors
            .field_errors
            .iter()
            .any(|(f, _)| *f == "column_template")
    );
    assert!(!errors.non_field_errors.is_empty());
}

#[test]
fn view_link_appends_a_details_column() {
    let store = build_store();
    let mut registry = ReportingRegistry::new("nexB");

    registry
        .add_query(
            Query::new("GPL", &catalog::LICENSE, AndOr::And)
                .with_filter(Filter::new("key", Lookup::Exact, "gpl-2.0")),
        )
        .unwrap();
    registry
        .add_column_template(
            ColumnTemplate::new("Key only", &catalog::LICENSE)
                .with_field(AssignedField::new("key", 1)),
            &store,
        )
        .unwrap();
    registry
        .add_report(Report::new("GPL usage", "GPL", "Key only"))
        .unwrap();

    let output = registry
        .report_output_with_view_link("GPL usage", &store, &BTreeMap::new(), None)
        .unwrap();

    assert_eq!(output.headers, vec!["key", "View"]);
    assert_eq!(
        output.rows,
        vec![vec![
            "gpl-2.0".to_string(),
            "/license_library/license/1500/".to_string(),
        ]]
    );
}

#[test]
fn dangling_report_references_error_cleanly() {
    let store = build_store();
    let registry = ReportingRegistry::new("nexB");

    let result = registry.report_output("missing", &store, &BTreeMap::new(), None);
    assert!(result.is_err());
}

proptest! {
    /// Negating a filter complements its match set within the table.
    #[test]
    fn negation_complements_the_match_set(n in 0..200u64) {
        let store = build_store();
        let key = format!("license_{n}");

        let positive = Query::new("p", &catalog::LICENSE, AndOr::And)
            .with_filter(Filter::new("key", Lookup::Exact, key.clone()));
        let negative = Query::new("n", &catalog::LICENSE, AndOr::And)
            .with_filter(Filter::new("key", Lookup::Exact, key).negated());

        let pos = positive.get_qs(&store, &BTreeMap::new(), None).unwrap();
        let neg = negative.get_qs(&store, &BTreeMap::new(), None).unwrap();

        prop_assert_eq!(pos.len(), 1);
        prop_assert_eq!(pos.len() + neg.len(), 201);
        prop_assert!(!neg.contains(&pos[0]));
    }

    /// `And` yields the intersection of its filters' match sets, `Or`
    /// their union.
    #[test]
    fn and_is_intersection_or_is_union(a in 0..200u64, b in 0..200u64) {
        let store = build_store();
        let lo = Filter::new("key", Lookup::Gte, format!("license_{a}"));
        let hi = Filter::new("key", Lookup::Lte, format!("license_{b}"));

        let ids = |query: Query| -> BTreeSet<u64> {
            query
                .get_qs(&store, &BTreeMap::new(), None)
                .unwrap()
                .into_iter()
                .collect()
        };

        let left = ids(Query::new("l", &catalog::LICENSE, AndOr::And).with_filter(lo.clone()));
        let right = ids(Query::new("r", &catalog::LICENSE, AndOr::And).with_filter(hi.clone()));
        let both = ids(
            Query::new("b", &catalog::LICENSE, AndOr::And)
                .with_filter(lo.clone())
                .with_filter(hi.clone()),
        );
        let either = ids(
            Query::new("e", &catalog::LICENSE, AndOr::Or)
                .with_filter(lo)
                .with_filter(hi),
        );

        prop_assert_eq!(both, left.intersection(&right).copied().collect::<BTreeSet<_>>());
        prop_assert_eq!(either, left.union(&right).copied().collect::<BTreeSet<_>>());
    }
}
