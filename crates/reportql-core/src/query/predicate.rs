//! Predicate AST and pure row evaluation.
//!
//! Evaluation is total: an invalid comparison (mismatched variants, a bad
//! regex, a dangling path) is a non-match, never an error. Validation
//! happens at save time; by evaluation time the only honest answer for a
//! comparison that no longer makes sense is "this row does not match".

use crate::{
    query::Lookup,
    store::{Record, RecordId, Store},
    value::{Value, strict_order_cmp, value_eq},
};
use regex::Regex;
use reportql_schema::{build::get_schema, prelude::*};
use std::{cmp::Ordering, collections::BTreeSet};

///
/// Predicate
///
/// Compiled form of a filter set. `Compare` carries the already-split
/// traversal path and the coerced comparison value; `IdIn` is the
/// materialized form of the hierarchy lookups.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    True,
    False,
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    Compare {
        path: Vec<String>,
        lookup: Lookup,
        value: Value,
    },
    IsNull {
        path: Vec<String>,
        value: bool,
    },
    IsEmpty {
        path: Vec<String>,
        value: bool,
    },
    IdIn(BTreeSet<RecordId>),
}

impl Predicate {
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }
}

/// Evaluate a predicate against one record. Relation hops fan out, and a
/// to-many hop matches when ANY reached leaf matches.
#[must_use]
pub fn eval(store: &Store, model: &'static Model, record: &Record, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::True => true,
        Predicate::False => false,

        Predicate::And(items) => items.iter().all(|p| eval(store, model, record, p)),
        Predicate::Or(items) => items.iter().any(|p| eval(store, model, record, p)),
        Predicate::Not(inner) => !eval(store, model, record, inner),

        Predicate::Compare {
            path,
            lookup,
            value,
        } => collect_leaf_values(store, model, record, path)
            .iter()
            .any(|leaf| compare_leaf(leaf, *lookup, value)),

        Predicate::IsNull { path, value } => {
            let leaves = collect_leaf_values(store, model, record, path);
            if *value {
                leaves.is_empty() || leaves.iter().any(Value::is_null)
            } else {
                leaves.iter().any(|leaf| !leaf.is_null())
            }
        }

        Predicate::IsEmpty { path, value } => {
            let leaves = collect_leaf_values(store, model, record, path);
            if *value {
                leaves.iter().any(is_empty_value)
            } else {
                // Translated to `> ""`, matching the stored-query quirk:
                // non-text leaves never satisfy it.
                let empty = Value::text("");
                leaves
                    .iter()
                    .any(|leaf| strict_order_cmp(leaf, &empty) == Some(Ordering::Greater))
            }
        }

        Predicate::IdIn(ids) => ids.contains(&record.id),
    }
}

/// Membership in `["", [], {}]`: the empty string, an empty list value,
/// and the textual encodings of an empty list or mapping.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Text(text) => text.is_empty() || text == "[]" || text == "{}",
        Value::List(items) => items.is_empty(),
        _ => false,
    }
}

/// Walk the traversal path from `record`, fanning out across relation
/// hops, and collect the reached leaf values. A relation as the final
/// segment yields one `Ref` per related row.
#[must_use]
pub fn collect_leaf_values(
    store: &Store,
    model: &'static Model,
    record: &Record,
    path: &[String],
) -> Vec<Value> {
    let Ok(schema) = get_schema() else {
        return Vec::new();
    };

    let mut frontier: Vec<(&'static Model, &Record)> = vec![(model, record)];
    let mut leaves = Vec::new();

    for (index, segment) in path.iter().enumerate() {
        let terminal = index == path.len() - 1;
        let mut next = Vec::new();

        for (hop_model, hop_record) in frontier {
            let Some(field) = hop_model.field(segment) else {
                continue;
            };

            if terminal {
                if field.kind.is_relation() {
                    let ids = store.related_ids(hop_model, hop_record, field);
                    if ids.is_empty() {
                        // Left-join semantics: an unset relation is null.
                        leaves.push(Value::Null);
                    }
                    leaves.extend(ids.into_iter().map(Value::Ref));
                } else {
                    leaves.push(
                        hop_record
                            .value(field.ident)
                            .cloned()
                            .unwrap_or(Value::Null),
                    );
                }
                continue;
            }

            let Some(target) = field.kind.related_model().and_then(|m| schema.get_model(m))
            else {
                continue;
            };
            for id in store.related_ids(hop_model, hop_record, field) {
                if let Some(related) = store.record(target.ident, id) {
                    next.push((target, related));
                }
            }
        }

        frontier = next;
        if terminal {
            break;
        }
    }

    leaves
}

fn compare_leaf(leaf: &Value, lookup: Lookup, value: &Value) -> bool {
    match lookup {
        Lookup::Exact => value_eq(leaf, value) == Some(true),

        Lookup::IExact => {
            leaf.to_string().to_lowercase() == value.to_string().to_lowercase()
        }

        Lookup::Contains => leaf.to_string().contains(&value.to_string()),
        Lookup::IContains => leaf
            .to_string()
            .to_lowercase()
            .contains(&value.to_string().to_lowercase()),

        Lookup::StartsWith => leaf.to_string().starts_with(&value.to_string()),
        Lookup::IStartsWith => leaf
            .to_string()
            .to_lowercase()
            .starts_with(&value.to_string().to_lowercase()),

        Lookup::EndsWith => leaf.to_string().ends_with(&value.to_string()),
        Lookup::IEndsWith => leaf
            .to_string()
            .to_lowercase()
            .ends_with(&value.to_string().to_lowercase()),

        Lookup::Gt => strict_order_cmp(leaf, value) == Some(Ordering::Greater),
        Lookup::Gte => matches!(
            strict_order_cmp(leaf, value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Lookup::Lt => strict_order_cmp(leaf, value) == Some(Ordering::Less),
        Lookup::Lte => matches!(
            strict_order_cmp(leaf, value),
            Some(Ordering::Less | Ordering::Equal)
        ),

        Lookup::In => match value {
            Value::List(items) => items.iter().any(|item| value_eq(leaf, item) == Some(true)),
            _ => false,
        },

        Lookup::Regex => match_regex(leaf, value, false),
        Lookup::IRegex => match_regex(leaf, value, true),

        Lookup::Year => leaf
            .year()
            .is_some_and(|year| value_eq(&Value::Int(year), value) == Some(true)),

        // Compiled away before evaluation.
        Lookup::IsNull
        | Lookup::IsEmpty
        | Lookup::Descendant
        | Lookup::ProductDescendant => false,
    }
}

fn match_regex(leaf: &Value, value: &Value, case_insensitive: bool) -> bool {
    let pattern = if case_insensitive {
        format!("(?i){value}")
    } else {
        value.to_string()
    };

    Regex::new(&pattern).is_ok_and(|re| re.is_match(&leaf.to_string()))
}
