//! In-memory record store the reporting runtime evaluates against.
//!
//! Tables are keyed by model ident and carry their own access policy;
//! every read that can leak a secured row goes through [`Store::scoped_ids`]
//! so scoping is applied in one place.

use crate::value::{Value, value_eq};
use reportql_schema::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Primary key of a stored record.
pub type RecordId = u64;

///
/// Record
///
/// One row: a pk plus named values. Tag values live in their own map,
/// keyed by tag label, because tags are per-dataspace annotations and
/// not schema fields.
///

#[derive(Clone, Debug, Default)]
pub struct Record {
    pub id: RecordId,
    pub values: BTreeMap<String, Value>,
    pub tags: BTreeMap<String, Value>,
}

impl Record {
    #[must_use]
    pub fn new(id: RecordId) -> Self {
        let mut values = BTreeMap::new();
        values.insert("id".to_string(), Value::Int(id as i64));

        Self {
            id,
            values,
            tags: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, label: impl Into<String>, value: Value) -> Self {
        self.tags.insert(label.into(), value);
        self
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

///
/// AccessPolicy
///
/// Open           → every user sees every row.
/// Secured        → per-user assignment lists; no user means no rows.
/// ProductSecured → rows inherit the scope of the product they hang off,
///                  resolved through `via_field`.
///

#[derive(Clone, Debug, Default)]
pub enum AccessPolicy {
    #[default]
    Open,
    Secured(BTreeMap<String, BTreeSet<RecordId>>),
    ProductSecured {
        via_field: &'static str,
        product_model: &'static str,
    },
}

impl AccessPolicy {
    /// True when rows of this table are user-assigned. Product-scoped
    /// tables are restricted too, but indirectly; the secured-foreign-key
    /// pass only cares about directly secured targets.
    #[must_use]
    pub const fn is_secured(&self) -> bool {
        matches!(self, Self::Secured(_))
    }
}

///
/// Table
///

#[derive(Clone, Debug, Default)]
pub struct Table {
    pub rows: BTreeMap<RecordId, Record>,
    pub policy: AccessPolicy,
}

impl Table {
    #[must_use]
    pub fn new(policy: AccessPolicy) -> Self {
        Self {
            rows: BTreeMap::new(),
            policy,
        }
    }

    pub fn insert(&mut self, record: Record) {
        self.rows.insert(record.id, record);
    }

    #[must_use]
    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.rows.get(&id)
    }

    #[must_use]
    pub fn ids(&self) -> BTreeSet<RecordId> {
        self.rows.keys().copied().collect()
    }
}

///
/// Store
///

#[derive(Clone, Debug, Default)]
pub struct Store {
    tables: BTreeMap<&'static str, Table>,
    tag_labels: Vec<String>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&mut self, model: &'static str, policy: AccessPolicy) {
        self.tables.insert(model, Table::new(policy));
    }

    #[must_use]
    pub fn table(&self, model: &str) -> Option<&Table> {
        self.tables.get(model)
    }

    pub fn table_mut(&mut self, model: &'static str) -> &mut Table {
        self.tables.entry(model).or_default()
    }

    pub fn insert(&mut self, model: &'static str, record: Record) {
        self.table_mut(model).insert(record);
    }

    #[must_use]
    pub fn record(&self, model: &str, id: RecordId) -> Option<&Record> {
        self.table(model)?.record(id)
    }

    pub fn set_tag_labels(&mut self, labels: Vec<String>) {
        self.tag_labels = labels;
    }

    #[must_use]
    pub fn tag_labels(&self) -> &[String] {
        &self.tag_labels
    }

    /// The set of row ids `user` may see on `model`, or `None` when the
    /// table is unrestricted. An anonymous user against a secured table
    /// gets the empty set, never the open one.
    #[must_use]
    pub fn scoped_ids(&self, model: &str, user: Option<&str>) -> Option<BTreeSet<RecordId>> {
        let table = self.table(model)?;

        match &table.policy {
            AccessPolicy::Open => None,

            AccessPolicy::Secured(assignments) => Some(
                user.and_then(|u| assignments.get(u))
                    .cloned()
                    .unwrap_or_default(),
            ),

            AccessPolicy::ProductSecured {
                via_field,
                product_model,
            } => {
                let product_scope = self.scoped_ids(product_model, user)?;
                let ids = table
                    .rows
                    .values()
                    .filter(|row| {
                        row.value(via_field)
                            .and_then(Value::as_ref_id)
                            .is_some_and(|pk| product_scope.contains(&pk))
                    })
                    .map(|row| row.id)
                    .collect();

                Some(ids)
            }
        }
    }

    /// True when `id` is visible to `user` on `model`.
    #[must_use]
    pub fn id_in_scope(&self, model: &str, id: RecordId, user: Option<&str>) -> bool {
        self.scoped_ids(model, user)
            .is_none_or(|scope| scope.contains(&id))
    }

    /// Resolve a relation field on `record` to the related row ids,
    /// without scoping. Unresolvable relations yield an empty set.
    #[must_use]
    pub fn related_ids(&self, model: &Model, record: &Record, field: &Field) -> Vec<RecordId> {
        match field.kind {
            FieldKind::Scalar(_) => Vec::new(),

            FieldKind::ForeignKey { .. } => record
                .value(field.ident)
                .and_then(Value::as_ref_id)
                .into_iter()
                .collect(),

            FieldKind::ManyToMany { .. } => match record.value(field.ident) {
                Some(Value::List(items)) => {
                    items.iter().filter_map(Value::as_ref_id).collect()
                }
                _ => Vec::new(),
            },

            // Reverse side of a m2m declared on the target model.
            FieldKind::RelatedManyToMany {
                model: target,
                accessor,
            } => self.scan(target, |row| match row.value(accessor) {
                Some(Value::List(items)) => items
                    .iter()
                    .filter_map(Value::as_ref_id)
                    .any(|pk| pk == record.id),
                _ => false,
            }),

            // Reverse side of a foreign key on the target model.
            FieldKind::Related {
                model: target,
                accessor,
            } => self.scan(target, |row| {
                row.value(accessor)
                    .and_then(Value::as_ref_id)
                    .is_some_and(|pk| pk == record.id)
            }),

            // Generic relations address the owner by (content type, pk).
            FieldKind::GenericRelation { model: target } => {
                let path = model.path();
                self.scan(target, |row| {
                    row.value("content_type")
                        .is_some_and(|ct| value_eq(ct, &Value::Text(path.clone())) == Some(true))
                        && row.value("object_id").is_some_and(|oid| {
                            value_eq(oid, &Value::Ref(record.id)) == Some(true)
                        })
                })
            }
        }
    }

    fn scan(&self, model: &str, matches: impl Fn(&Record) -> bool) -> Vec<RecordId> {
        self.table(model)
            .map(|table| {
                table
                    .rows
                    .values()
                    .filter(|row| matches(row))
                    .map(|row| row.id)
                    .collect()
            })
            .unwrap_or_default()
    }
}

///
/// TESTS
///
