use crate::value::{
    Value, canonical_cmp, coerce_for_field, parse_bool, parse_literal_list, strict_order_cmp,
    symbolic_date_boundary, value_eq,
};
use proptest::prelude::*;
use reportql_schema::prelude::*;
use std::cmp::Ordering;
use time::{Duration, OffsetDateTime, macros::date};

static NAME: Field = Field::new("name", FieldKind::Scalar(Primitive::Text));
static KEY: Field = Field::new("key", FieldKind::Scalar(Primitive::Text)).slug();
static ACTIVE: Field = Field::new("is_active", FieldKind::Scalar(Primitive::Bool));
static LEVEL: Field = Field::new("curation_level", FieldKind::Scalar(Primitive::Int));
static RELEASED: Field = Field::new("release_date", FieldKind::Scalar(Primitive::Date));
static CATEGORY: Field = Field::new("category", FieldKind::Scalar(Primitive::Text))
    .choices(&[("permissive", "Permissive"), ("copyleft", "Copyleft")]);
static OWNER: Field = Field::new("owner", FieldKind::ForeignKey { model: "Owner" });

#[test]
fn bool_vocabulary_is_case_insensitive() {
    assert_eq!(parse_bool("True"), Some(true));
    assert_eq!(parse_bool("YES"), Some(true));
    assert_eq!(parse_bool("0"), Some(false));
    assert_eq!(parse_bool("no"), Some(false));
    assert_eq!(parse_bool("maybe"), None);
    assert_eq!(parse_bool(""), None);
}

#[test]
fn coerce_bool_rejects_out_of_vocabulary() {
    assert_eq!(coerce_for_field(&ACTIVE, "yes"), Ok(Value::Bool(true)));
    assert!(coerce_for_field(&ACTIVE, "truthy").is_err());
}

#[test]
fn coerce_int_and_date() {
    assert_eq!(coerce_for_field(&LEVEL, "40"), Ok(Value::Int(40)));
    assert!(coerce_for_field(&LEVEL, "forty").is_err());

    assert_eq!(
        coerce_for_field(&RELEASED, "2023-01-15"),
        Ok(Value::Date(date!(2023 - 01 - 15)))
    );
    assert!(coerce_for_field(&RELEASED, "15/01/2023").is_err());
}

#[test]
fn coerce_slug_enforces_character_set() {
    assert_eq!(coerce_for_field(&KEY, "gpl-2.0"), Ok(Value::text("gpl-2.0")));
    assert!(coerce_for_field(&KEY, "gpl 2.0").is_err());
}

#[test]
fn coerce_choices_membership() {
    assert_eq!(
        coerce_for_field(&CATEGORY, "permissive"),
        Ok(Value::text("permissive"))
    );
    assert!(coerce_for_field(&CATEGORY, "unknown-category").is_err());
}

#[test]
fn coerce_text_preserves_whitespace() {
    assert_eq!(coerce_for_field(&NAME, " httpd "), Ok(Value::text(" httpd ")));
}

#[test]
fn coerce_relation_to_pk_or_passthrough() {
    assert_eq!(coerce_for_field(&OWNER, "42"), Ok(Value::Ref(42)));
    assert_eq!(coerce_for_field(&OWNER, "nexB"), Ok(Value::text("nexB")));
}

#[test]
fn literal_list_accepts_restricted_grammar() {
    assert_eq!(
        parse_literal_list("['apache-2.0', 'gpl-2.0']"),
        vec![Value::text("apache-2.0"), Value::text("gpl-2.0")]
    );
    assert_eq!(
        parse_literal_list("[1, 2, True, None]"),
        vec![Value::Int(1), Value::Int(2), Value::Bool(true), Value::Null]
    );
    assert_eq!(parse_literal_list("[]"), Vec::<Value>::new());
}

#[test]
fn literal_list_syntax_errors_are_empty() {
    assert_eq!(parse_literal_list("not a list"), Vec::<Value>::new());
    assert_eq!(parse_literal_list("[unquoted]"), Vec::<Value>::new());
    assert_eq!(parse_literal_list("['open"), Vec::<Value>::new());
}

#[test]
fn symbolic_dates_expand_to_day_start_boundaries() {
    let today = symbolic_date_boundary("today").unwrap();
    assert_eq!(today.time(), time::Time::MIDNIGHT);
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    assert_eq!(today.date(), now.date());

    let week = symbolic_date_boundary("past_7_days").unwrap();
    assert_eq!(today - week, Duration::days(7));

    assert!(symbolic_date_boundary("yesterday").is_none());
}

#[test]
fn ref_and_int_compare_equal() {
    assert_eq!(value_eq(&Value::Ref(7), &Value::Int(7)), Some(true));
    assert_eq!(value_eq(&Value::Int(7), &Value::Ref(8)), Some(false));
    assert_eq!(
        strict_order_cmp(&Value::Int(7), &Value::Ref(9)),
        Some(Ordering::Less)
    );
}

#[test]
fn mismatched_variants_do_not_strictly_order() {
    assert_eq!(strict_order_cmp(&Value::text("a"), &Value::Int(1)), None);
    assert_eq!(strict_order_cmp(&Value::Null, &Value::text("")), None);
}

#[test]
fn date_rows_order_against_datetime_boundaries() {
    let boundary = Value::DateTime(date!(2023 - 01 - 10).midnight().assume_utc());
    assert_eq!(
        strict_order_cmp(&Value::Date(date!(2023 - 01 - 15)), &boundary),
        Some(Ordering::Greater)
    );
}

#[test]
fn nulls_sort_first_in_canonical_order() {
    let mut values = vec![Value::text("b"), Value::Null, Value::Int(3), Value::text("a")];
    values.sort_by(canonical_cmp);

    assert_eq!(
        values,
        vec![Value::Null, Value::Int(3), Value::text("a"), Value::text("b")]
    );
}

#[test]
fn display_vocabulary() {
    assert_eq!(Value::Null.to_string(), "None");
    assert_eq!(Value::Bool(true).to_string(), "True");
    assert_eq!(Value::Bool(false).to_string(), "False");
    assert_eq!(Value::Date(date!(2023 - 01 - 15)).to_string(), "2023-01-15");
}

#[test]
fn values_serialize_externally_tagged() {
    assert_eq!(
        serde_json::to_value(Value::Int(42)).unwrap(),
        serde_json::json!({ "Int": 42 })
    );
    assert_eq!(
        serde_json::to_value(Value::text("gpl-2.0")).unwrap(),
        serde_json::json!({ "Text": "gpl-2.0" })
    );
    assert_eq!(
        serde_json::to_value(Value::Null).unwrap(),
        serde_json::json!("Null")
    );
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<f64>().prop_map(Value::Float),
        any::<u32>().prop_map(|n| Value::Ref(u64::from(n))),
        "[a-z]{0,8}".prop_map(Value::Text),
    ]
}

proptest! {
    #[test]
    fn canonical_cmp_is_antisymmetric(a in value_strategy(), b in value_strategy()) {
        prop_assert_eq!(canonical_cmp(&a, &b), canonical_cmp(&b, &a).reverse());
    }

    #[test]
    fn canonical_cmp_is_reflexive(a in value_strategy()) {
        prop_assert_eq!(canonical_cmp(&a, &a), Ordering::Equal);
    }

    #[test]
    fn value_eq_is_symmetric(a in value_strategy(), b in value_strategy()) {
        prop_assert_eq!(value_eq(&a, &b), value_eq(&b, &a));
    }
}
