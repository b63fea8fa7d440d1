//! Column templates: named projections of instances into display rows.
//!
//! Projection never fails. A path that no longer resolves renders the
//! `Error` marker, a secured relation outside the viewing user's scope
//! renders blank, and a null leaf renders `None`, so one bad column never
//! takes down a whole report.

use crate::{
    ERROR_VALUE, MULTIVALUE_SEPARATOR, TAG_PREFIX, catalog,
    error::ValidationError,
    store::{Record, RecordId, Store},
    value::Value,
};
use reportql_schema::{
    build::get_schema,
    introspect::{split_path, validate_field_traversal_of_model_data},
    prelude::*,
};
use serde::Serialize;

///
/// AssignedField
///
/// One column of a template: a traversal path (or `tag: ` pseudo-path,
/// or model property name) plus an optional display override.
///

#[derive(Clone, Debug, Serialize)]
pub struct AssignedField {
    pub field_name: String,
    pub display_name: String,
    pub seq: u32,
}

impl AssignedField {
    #[must_use]
    pub fn new(field_name: impl Into<String>, seq: u32) -> Self {
        Self {
            field_name: field_name.into(),
            display_name: String::new(),
            seq,
        }
    }

    #[must_use]
    pub fn display(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// The column header: the display override when set, otherwise the
    /// raw path.
    #[must_use]
    pub fn header(&self) -> &str {
        if self.display_name.is_empty() {
            &self.field_name
        } else {
            &self.display_name
        }
    }

    /// A path is valid when it is a known tag pseudo-path, a property of
    /// the target model, or a resolvable field traversal. Everything else
    /// collapses to the generic message.
    pub fn validate(&self, model: &'static Model, store: &Store) -> Result<(), ValidationError> {
        if let Some(label) = self.field_name.strip_prefix(TAG_PREFIX) {
            return if store.tag_labels().iter().any(|l| l == label) {
                Ok(())
            } else {
                Err(ValidationError::InvalidFieldValue)
            };
        }

        let segments = split_path(&self.field_name);
        if segments.len() == 1 && model.has_property(segments[0]) {
            return Ok(());
        }

        validate_field_traversal_of_model_data(&segments, model, catalog::model_data_for_query())?;

        Ok(())
    }
}

///
/// ColumnTemplate
///

#[derive(Clone, Debug, Serialize)]
pub struct ColumnTemplate {
    pub name: String,
    pub description: String,
    #[serde(skip)]
    pub model: &'static Model,
    pub fields: Vec<AssignedField>,
}

impl ColumnTemplate {
    #[must_use]
    pub fn new(name: impl Into<String>, model: &'static Model) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            model,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: AssignedField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn validate(&self, store: &Store) -> Result<(), ValidationError> {
        for field in &self.fields {
            field.validate(self.model, store)?;
        }

        Ok(())
    }

    /// Column headers in `seq` order.
    #[must_use]
    pub fn headers(&self) -> Vec<&str> {
        let mut fields: Vec<&AssignedField> = self.fields.iter().collect();
        fields.sort_by_key(|f| f.seq);

        fields.into_iter().map(AssignedField::header).collect()
    }

    /// Project one instance into a display row, columns in `seq` order.
    #[must_use]
    pub fn row_for_instance(
        &self,
        store: &Store,
        record: &Record,
        user: Option<&str>,
    ) -> Vec<String> {
        let mut fields: Vec<&AssignedField> = self.fields.iter().collect();
        fields.sort_by_key(|f| f.seq);

        fields
            .into_iter()
            .map(|field| {
                get_value_for_instance(store, self.model, record, &field.field_name, user)
            })
            .collect()
    }

    /// Project an id list into display rows. Ids that vanished from the
    /// store since the query ran are skipped.
    #[must_use]
    pub fn get_output(
        &self,
        store: &Store,
        ids: &[RecordId],
        user: Option<&str>,
    ) -> Vec<Vec<String>> {
        ids.iter()
            .filter_map(|id| store.record(self.model.ident, *id))
            .map(|record| self.row_for_instance(store, record, user))
            .collect()
    }

    /// Like [`Self::get_output`], with a trailing cell holding the
    /// site-relative details path of each instance.
    #[must_use]
    pub fn get_output_with_view_link(
        &self,
        store: &Store,
        ids: &[RecordId],
        user: Option<&str>,
    ) -> Vec<Vec<String>> {
        ids.iter()
            .filter_map(|id| store.record(self.model.ident, *id))
            .map(|record| {
                let mut row = self.row_for_instance(store, record, user);
                row.push(details_path(self.model, record.id));
                row
            })
            .collect()
    }
}

fn details_path(model: &Model, id: RecordId) -> String {
    format!("/{}/{}/{id}/", model.app, model.ident.to_lowercase())
}

/// Resolve one column path on one instance to its display string.
///
/// Join rule: a single reached leaf renders its value (`None` when null);
/// a fan-out across a to-many hop drops null leaves and joins the rest
/// with the multivalue separator.
#[must_use]
pub fn get_value_for_instance(
    store: &Store,
    model: &'static Model,
    record: &Record,
    field_name: &str,
    user: Option<&str>,
) -> String {
    if let Some(label) = field_name.strip_prefix(TAG_PREFIX) {
        return match record.tags.get(label) {
            Some(value) => value.to_string(),
            None => Value::Null.to_string(),
        };
    }

    let leaves = collect_leaf_strings(store, model, record, field_name, user);

    match leaves.as_slice() {
        // An empty fan-out (no related rows reached) renders blank.
        [] => String::new(),
        [single] => single
            .clone()
            .unwrap_or_else(|| Value::Null.to_string()),
        many => many
            .iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join(MULTIVALUE_SEPARATOR),
    }
}

fn collect_leaf_strings(
    store: &Store,
    model: &'static Model,
    record: &Record,
    field_name: &str,
    user: Option<&str>,
) -> Vec<Option<String>> {
    let Ok(schema) = get_schema() else {
        return Vec::new();
    };

    let segments = split_path(field_name);
    let mut frontier: Vec<(&'static Model, &Record)> = vec![(model, record)];
    let mut leaves = Vec::new();

    for (index, segment) in segments.iter().enumerate() {
        let terminal = index == segments.len() - 1;
        let mut next = Vec::new();

        for (hop_model, hop_record) in frontier {
            if terminal && hop_model.has_property(segment) {
                leaves.push(catalog::property_value(
                    store, hop_model, hop_record, segment, user,
                ));
                continue;
            }

            let Some(field) = hop_model.field(segment) else {
                // Unresolvable attribute: recoverable display marker.
                leaves.push(Some(ERROR_VALUE.to_string()));
                continue;
            };

            if terminal {
                leaves.extend(terminal_values(store, hop_model, hop_record, field, user));
                continue;
            }

            let Some(target) = field.kind.related_model().and_then(|m| schema.get_model(m))
            else {
                leaves.push(Some(ERROR_VALUE.to_string()));
                continue;
            };
            for id in store.related_ids(hop_model, hop_record, field) {
                if !store.id_in_scope(target.ident, id, user) {
                    continue;
                }
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

fn terminal_values(
    store: &Store,
    model: &'static Model,
    record: &Record,
    field: &'static Field,
    user: Option<&str>,
) -> Vec<Option<String>> {
    let Some(target) = field.kind.related_model() else {
        // Scalar leaf: choice labels substitute unless disabled.
        let value = match record.value(field.ident) {
            None | Some(Value::Null) => return vec![None],
            Some(value) => value,
        };

        let rendered = value
            .as_text()
            .and_then(|raw| field.choice_label(raw))
            .map_or_else(|| value.to_string(), str::to_string);

        return vec![Some(rendered)];
    };

    let secured = store
        .table(target)
        .is_some_and(|table| table.policy.is_secured());
    let ids = store.related_ids(model, record, field);

    if matches!(field.kind, FieldKind::ForeignKey { .. }) {
        let Some(id) = ids.first() else {
            return vec![None];
        };
        // A secured relation outside the user's scope renders blank,
        // not an error: the row itself is visible, the target is not.
        if secured && !store.id_in_scope(target, *id, user) {
            return vec![Some(String::new())];
        }

        return vec![Some(catalog::instance_repr(store, target, *id))];
    }

    ids.into_iter()
        .filter(|id| !secured || store.id_in_scope(target, *id, user))
        .map(|id| Some(catalog::instance_repr(store, target, id)))
        .collect()
}

///
/// TESTS
///
