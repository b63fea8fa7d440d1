//! Model introspection: name maps, whitelist-closed model data, and dotted
//! field-path traversal.
//!
//! Every resolution failure surfaces as the single generic
//! `"Invalid field value"` error; callers get no finer-grained diagnostics
//! by design.

use crate::prelude::*;
use convert_case::{Case, Casing};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

/// Path segments are `__`-delimited, following the stored-text convention.
pub const PATH_SEPARATOR: &str = "__";

///
/// InvalidFieldValue
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
#[error("Invalid field value")]
pub struct InvalidFieldValue;

///
/// NameMapOptions
///
/// Which slices of a model's reportable surface to include in a name map.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NameMapOptions {
    pub get_fields: bool,
    pub get_m2m: bool,
    pub get_related_m2m: bool,
    pub get_related: bool,
    pub get_generic_relation: bool,
    pub omit_foreign_key_fields: bool,
    pub limit_to: Option<&'static [&'static str]>,
}

impl NameMapOptions {
    /// Full reportable surface, used for query filters and columns.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            get_fields: true,
            get_m2m: true,
            get_related_m2m: true,
            get_related: true,
            get_generic_relation: true,
            omit_foreign_key_fields: false,
            limit_to: None,
        }
    }

    /// Direct fields only, used for order-field validation.
    #[must_use]
    pub const fn direct_only() -> Self {
        Self {
            get_fields: true,
            get_m2m: false,
            get_related_m2m: false,
            get_related: false,
            get_generic_relation: false,
            omit_foreign_key_fields: true,
            limit_to: None,
        }
    }

    #[must_use]
    pub const fn limit_to(mut self, names: &'static [&'static str]) -> Self {
        self.limit_to = Some(names);
        self
    }
}

///
/// get_query_name_map
///
/// Mapping of field/relation name to the related model (`None` for scalar
/// fields) for one model, per the requested options.
///

#[must_use]
pub fn get_query_name_map(
    model: &'static Model,
    options: &NameMapOptions,
) -> BTreeMap<String, Option<&'static Model>> {
    let schema = schema_read();
    let mut map = BTreeMap::new();

    for field in model.fields.iter() {
        // Special case: volatile fields never enter the reportable surface.
        if model.volatile.contains(&field.ident) {
            continue;
        }

        let include = match field.kind {
            FieldKind::Scalar(_) => options.get_fields,
            FieldKind::ForeignKey { .. } => {
                options.get_fields && !options.omit_foreign_key_fields
            }
            FieldKind::ManyToMany { .. } => options.get_m2m,
            FieldKind::RelatedManyToMany { .. } => options.get_related_m2m,
            FieldKind::Related { .. } => options.get_related,
            FieldKind::GenericRelation { .. } => options.get_generic_relation,
        };
        if !include {
            continue;
        }

        if let Some(limit) = options.limit_to
            && !limit.contains(&field.ident)
        {
            continue;
        }

        let related = field
            .kind
            .related_model()
            .and_then(|ident| schema.get_model(ident));
        if field.kind.is_relation() && related.is_none() {
            // Unresolvable target; schema validation reports it elsewhere.
            continue;
        }

        map.insert(field.ident.to_string(), related);
    }

    map
}

///
/// GroupedField
///
/// One UI-facing grouped entry: a title-cased label, the stored field
/// value, and its group heading.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GroupedField {
    pub label: String,
    pub value: String,
    pub group: &'static str,
}

pub const GROUP_DIRECT: &str = "Direct Fields";
pub const GROUP_M2M: &str = "Many to Many Fields";
pub const GROUP_RELATED_M2M: &str = "Related Many to Many Fields";
pub const GROUP_RELATED: &str = "Related Fields";

///
/// ModelData
///
/// Introspected surface for one model: the sorted flat field list, the
/// grouped entries for UI pickers, and per-field relation metadata
/// (`Some(target ident)` for relation fields).
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct ModelData {
    pub fields: Vec<String>,
    pub grouped_fields: Vec<GroupedField>,
    pub meta: BTreeMap<String, Option<&'static str>>,
}

pub type ModelDataMap = BTreeMap<&'static str, ModelData>;

///
/// get_model_data
///
/// Build the introspected data map for a set of models, then close it over
/// the whitelist: non-whitelisted models are deleted, and any field whose
/// related model is not itself whitelisted is deleted with them.
///

#[must_use]
pub fn get_model_data(
    models: &[&'static Model],
    model_whitelist: &[&'static str],
    field_whitelist: &BTreeMap<&'static str, &'static [&'static str]>,
    options: &NameMapOptions,
) -> ModelDataMap {
    let mut data = ModelDataMap::new();

    for model in models {
        let mut options = *options;
        if let Some(limit) = field_whitelist.get(model.ident) {
            options.limit_to = Some(limit);
        }

        let name_map = get_query_name_map(model, &options);

        let mut fields: Vec<String> = name_map.keys().cloned().collect();
        fields.sort();

        let mut grouped_fields = Vec::new();
        let mut meta = BTreeMap::new();

        for (name, related) in &name_map {
            let field = model.field(name);
            let group = match field.map(|f| f.kind) {
                Some(FieldKind::ManyToMany { .. }) => GROUP_M2M,
                Some(FieldKind::RelatedManyToMany { .. }) => GROUP_RELATED_M2M,
                Some(FieldKind::Related { .. } | FieldKind::GenericRelation { .. }) => {
                    GROUP_RELATED
                }
                _ => GROUP_DIRECT,
            };
            grouped_fields.push(GroupedField {
                label: name.to_case(Case::Title),
                value: name.clone(),
                group,
            });
            meta.insert(name.clone(), related.map(|m| m.ident));
        }

        data.insert(
            model.ident,
            ModelData {
                fields,
                grouped_fields,
                meta,
            },
        );
    }

    apply_whitelist(&mut data, model_whitelist);

    data
}

// Close the data map over the whitelist.
fn apply_whitelist(data: &mut ModelDataMap, model_whitelist: &[&'static str]) {
    data.retain(|ident, _| model_whitelist.contains(ident));

    for model_data in data.values_mut() {
        let dropped: Vec<String> = model_data
            .meta
            .iter()
            .filter_map(|(name, related)| match related {
                Some(target) if !model_whitelist.contains(target) => Some(name.clone()),
                _ => None,
            })
            .collect();

        for name in &dropped {
            model_data.meta.remove(name);
            model_data.fields.retain(|f| f != name);
            model_data.grouped_fields.retain(|g| &g.value != name);
        }
    }
}

///
/// get_related_models
///
/// Transitive closure of all models reachable via relations from a seed
/// set. Used to widen the traversal-admissible model set, not the final
/// exposed whitelist.
///

#[must_use]
pub fn get_related_models(seed: &[&'static Model]) -> Vec<&'static Model> {
    let schema = schema_read();
    let mut found: BTreeMap<&'static str, &'static Model> =
        seed.iter().map(|m| (m.ident, *m)).collect();
    let mut queue: Vec<&'static Model> = seed.to_vec();

    while let Some(model) = queue.pop() {
        for field in model.fields.iter() {
            let Some(target) = field.kind.related_model() else {
                continue;
            };
            let Some(related) = schema.get_model(target) else {
                continue;
            };
            if !found.contains_key(related.ident) {
                found.insert(related.ident, related);
                queue.push(related);
            }
        }
    }

    found.into_values().collect()
}

///
/// Field-path traversal
///

/// Walk a dotted path, advancing the current model through relation
/// segments, and return the model applicable to the **last** segment.
///
/// A scalar segment mid-path terminates traversal (`None`). Traversing to
/// a second relational field past a consumed scalar boundary is not
/// supported; that limitation is deliberate and pinned by tests.
#[must_use]
pub fn get_model_via_field_traversal(
    segments: &[&str],
    starting_model: &'static Model,
    model_data: &ModelDataMap,
) -> Option<&'static Model> {
    let schema = schema_read();
    let mut current = starting_model;

    for segment in segments.iter().take(segments.len().saturating_sub(1)) {
        let data = model_data.get(current.ident)?;
        let related = data.meta.get(*segment)?;

        match related {
            Some(target) => {
                // Whitelist closure: the target must itself carry data.
                model_data.get(target)?;
                current = schema.get_model(target)?;
            }
            // Scalar mid-path: traversal fails.
            None => return None,
        }
    }

    Some(current)
}

/// Resolve a path and require the final segment to be an exposed field of
/// the terminal model.
pub fn validate_field_traversal_of_model_data(
    segments: &[&str],
    starting_model: &'static Model,
    model_data: &ModelDataMap,
) -> Result<&'static Model, InvalidFieldValue> {
    let model = get_model_via_field_traversal(segments, starting_model, model_data)
        .ok_or(InvalidFieldValue)?;

    let last = segments.last().ok_or(InvalidFieldValue)?;
    let data = model_data.get(model.ident).ok_or(InvalidFieldValue)?;
    if !data.fields.iter().any(|f| f == last) {
        return Err(InvalidFieldValue);
    }

    Ok(model)
}

/// Resolve a path to the terminal concrete field descriptor, or `None`
/// when the last segment is not a concrete field of the terminal model.
#[must_use]
pub fn get_field_via_field_traversal(
    segments: &[&str],
    starting_model: &'static Model,
    model_data: &ModelDataMap,
) -> Option<&'static Field> {
    let model = get_model_via_field_traversal(segments, starting_model, model_data)?;

    segments.last().and_then(|last| model.field(last))
}

/// Split a stored dotted path on the `__` separator.
#[must_use]
pub fn split_path(field_name: &str) -> Vec<&str> {
    field_name.split(PATH_SEPARATOR).collect()
}

///
/// TESTS
///
