//! Saved queries: filters, ordering, and materialization.

mod filter;
mod lookup;
mod order;
mod predicate;

pub use filter::Filter;
pub use lookup::Lookup;
pub use order::{OrderField, Sort};
pub use predicate::{Predicate, collect_leaf_values, eval};

use crate::{
    error::{ReportError, ValidationError},
    store::{Record, RecordId, Store},
    value::{Value, canonical_cmp},
};
use reportql_schema::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

///
/// AndOr
///
/// How a query's filters combine.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum AndOr {
    #[default]
    And,
    Or,
}

///
/// Query
///
/// A named, saved selection against one reportable model. Materialization
/// is pure: the same store, overrides and user always produce the same
/// ordered id list.
///

#[derive(Clone, Debug)]
pub struct Query {
    pub name: String,
    pub description: String,
    pub model: &'static Model,
    pub operator: AndOr,
    pub filters: Vec<Filter>,
    pub order_fields: Vec<OrderField>,
}

impl Query {
    #[must_use]
    pub fn new(name: impl Into<String>, model: &'static Model, operator: AndOr) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            model,
            operator,
            filters: Vec::new(),
            order_fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn with_order_field(mut self, order_field: OrderField) -> Self {
        self.order_fields.push(order_field);
        self
    }

    /// Save-time validation of every filter and order field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for filter in &self.filters {
            filter.validate(self.model)?;
        }
        for order_field in &self.order_fields {
            order_field.validate(self.model)?;
        }

        Ok(())
    }

    /// Materialize the ordered result ids.
    ///
    /// Runtime overrides are keyed by filter position. A query whose
    /// filters all compile away (empty values, `ALL` sentinels) yields an
    /// explicitly empty result, never the whole table.
    pub fn get_qs(
        &self,
        store: &Store,
        runtime_overrides: &BTreeMap<usize, String>,
        user: Option<&str>,
    ) -> Result<Vec<RecordId>, ReportError> {
        let mut predicates = Vec::new();
        for (index, filter) in self.filters.iter().enumerate() {
            let runtime_value = runtime_overrides.get(&index).map(String::as_str);
            if let Some(predicate) = filter.get_q(store, self.model, user, runtime_value)? {
                predicates.push(predicate);
            }
        }

        if predicates.is_empty() {
            return Ok(Vec::new());
        }

        let combined = match self.operator {
            AndOr::And => Predicate::And(predicates),
            AndOr::Or => Predicate::Or(predicates),
        };

        let Some(table) = store.table(self.model.ident) else {
            return Err(ReportError::UnknownModel(self.model.ident.to_string()));
        };
        let scope = store.scoped_ids(self.model.ident, user);

        let mut rows: Vec<&Record> = table
            .rows
            .values()
            .filter(|row| scope.as_ref().is_none_or(|scope| scope.contains(&row.id)))
            .filter(|row| self.secured_relations_visible(store, row, user))
            .filter(|row| eval(store, self.model, row, &combined))
            .collect();

        self.sort_rows(&mut rows);

        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    /// A saved query stays valid only while its paths still resolve;
    /// checked by materializing against the store.
    #[must_use]
    pub fn is_valid(&self, store: &Store) -> bool {
        self.get_qs(store, &BTreeMap::new(), None).is_ok()
    }

    /// Project the order fields onto a changelist's `list_display`
    /// columns as positional `o=` tokens. Order fields not displayed are
    /// silently dropped.
    #[must_use]
    pub fn order_list_for_url(&self, list_display: &[&str]) -> Vec<String> {
        let mut order_fields: Vec<&OrderField> = self.order_fields.iter().collect();
        order_fields.sort_by_key(|f| f.seq);

        order_fields
            .iter()
            .filter_map(|order_field| {
                let position = list_display
                    .iter()
                    .position(|column| *column == order_field.field_name)?;

                Some(match order_field.sort {
                    Sort::Ascending => position.to_string(),
                    Sort::Descending => format!("-{position}"),
                })
            })
            .collect()
    }

    /// Rows whose secured foreign keys point outside the user's scope are
    /// excluded wholesale; a null foreign key never hides a row.
    fn secured_relations_visible(&self, store: &Store, row: &Record, user: Option<&str>) -> bool {
        self.model.fields.iter().all(|field| {
            let FieldKind::ForeignKey { model: target } = field.kind else {
                return true;
            };
            let secured = store
                .table(target)
                .is_some_and(|table| table.policy.is_secured());
            if !secured {
                return true;
            }

            match row.value(field.ident).and_then(Value::as_ref_id) {
                Some(id) => store.id_in_scope(target, id, user),
                None => true,
            }
        })
    }

    fn sort_rows(&self, rows: &mut Vec<&Record>) {
        let mut order_fields: Vec<&OrderField> = self.order_fields.iter().collect();
        order_fields.sort_by_key(|f| f.seq);

        // BTreeMap iteration already yields pk order; the stable sort
        // keeps it as the final tiebreaker.
        rows.sort_by(|a, b| {
            for order_field in &order_fields {
                let left = a.value(&order_field.field_name).unwrap_or(&Value::Null);
                let right = b.value(&order_field.field_name).unwrap_or(&Value::Null);

                let mut cmp = canonical_cmp(left, right);
                if order_field.sort == Sort::Descending {
                    cmp = cmp.reverse();
                }
                if cmp != std::cmp::Ordering::Equal {
                    return cmp;
                }
            }

            std::cmp::Ordering::Equal
        });
    }
}

///
/// TESTS
///
