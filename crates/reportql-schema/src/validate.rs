use crate::{node::Schema, prelude::*};
use std::collections::BTreeSet;

///
/// Schema validation
///
/// Structural checks over the registered model graph: unique field idents,
/// resolvable relation targets, and well-formed hierarchy declarations.
/// Failures aggregate into an [`ErrorTree`] keyed by node route.
///

pub fn validate_schema(schema: &Schema) -> Result<(), ErrorTree> {
    let mut errs = ErrorTree::new();

    for model in schema.models() {
        validate_model(schema, model, &mut errs);
    }

    errs.result()
}

fn validate_model(schema: &Schema, model: &'static Model, errs: &mut ErrorTree) {
    if model.ident.is_empty() || model.ident.len() > crate::MAX_MODEL_NAME_LEN {
        errs.add(model.ident, "model ident length out of bounds");
    }

    let mut seen = BTreeSet::new();

    for field in model.fields.iter() {
        let route = format!("{}.{}", model.ident, field.ident);

        if !seen.insert(field.ident) {
            errs.add(&route, "duplicate field ident");
        }

        if field.ident.is_empty() || field.ident.len() > crate::MAX_FIELD_NAME_LEN {
            errs.add(&route, "field ident length out of bounds");
        }

        if let Some(target) = field.kind.related_model()
            && schema.get_model(target).is_none()
        {
            errs.add(&route, format!("unknown relation target: '{target}'"));
        }
    }

    if model.fields.get(model.primary_key).is_none() {
        errs.add(model.ident, "primary key field missing");
    }

    for name in model.volatile {
        if model.fields.get(name).is_none() {
            errs.add(model.ident, format!("unknown volatile field: '{name}'"));
        }
    }

    if let Some(hierarchy) = &model.hierarchy {
        validate_hierarchy(schema, model, hierarchy, errs);
    }
}

// The join model must exist and both its endpoints must be foreign keys
// pointing back at the hierarchical model.
fn validate_hierarchy(
    schema: &Schema,
    model: &'static Model,
    hierarchy: &Hierarchy,
    errs: &mut ErrorTree,
) {
    let route = format!("{}.hierarchy", model.ident);

    let Some(through) = schema.get_model(hierarchy.through) else {
        errs.add(
            &route,
            format!("unknown through model: '{}'", hierarchy.through),
        );
        return;
    };

    for endpoint in [hierarchy.parent_field, hierarchy.child_field] {
        match through.field(endpoint).map(|f| f.kind) {
            Some(FieldKind::ForeignKey { model: target }) if target == model.ident => {}
            Some(_) => errs.add(
                &route,
                format!("'{}.{endpoint}' is not a foreign key to '{}'", through.ident, model.ident),
            ),
            None => errs.add(
                &route,
                format!("'{}.{endpoint}' does not exist", through.ident),
            ),
        }
    }
}
