//! The fixed catalog of reportable models.
//!
//! Static configuration, compiled in: the schema nodes, the reporting
//! whitelist, the per-model field whitelist, and the property function
//! table. The introspected model-data maps are memoized; the whitelist
//! never changes at runtime.

use crate::{
    MULTIVALUE_SEPARATOR,
    hierarchy,
    store::{Record, RecordId, Store},
    value::Value,
};
use reportql_schema::{
    build::schema_write,
    introspect::{ModelDataMap, NameMapOptions, get_model_data},
    prelude::*,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{LazyLock, Once},
};

///
/// Schema nodes
///

pub static OWNER: Model = Model::new(
    "organization",
    "Owner",
    &[
        Field::new("id", FieldKind::Scalar(Primitive::Int)),
        Field::new("name", FieldKind::Scalar(Primitive::Text)),
        Field::new("type", FieldKind::Scalar(Primitive::Text)).choices(&[
            ("organization", "Organization"),
            ("person", "Person"),
        ]),
        Field::new("alias", FieldKind::Scalar(Primitive::Text)).blank(),
        Field::new(
            "components",
            FieldKind::Related {
                model: "Component",
                accessor: "owner",
            },
        ),
        Field::new(
            "licenses",
            FieldKind::Related {
                model: "License",
                accessor: "owner",
            },
        ),
    ],
);

pub static LICENSE: Model = Model::new(
    "license_library",
    "License",
    &[
        Field::new("id", FieldKind::Scalar(Primitive::Int)),
        Field::new("key", FieldKind::Scalar(Primitive::Text)).slug(),
        Field::new("name", FieldKind::Scalar(Primitive::Text)),
        Field::new("short_name", FieldKind::Scalar(Primitive::Text)),
        Field::new("is_active", FieldKind::Scalar(Primitive::Bool)).nullable(),
        Field::new("category", FieldKind::Scalar(Primitive::Text))
            .blank()
            .choices(&[
                ("copyleft", "Copyleft"),
                ("copyleft_limited", "Copyleft Limited"),
                ("permissive", "Permissive"),
            ]),
        Field::new("owner", FieldKind::ForeignKey { model: "Owner" }),
        Field::new("tags", FieldKind::ManyToMany { model: "LicenseTag" }),
        Field::new(
            "components",
            FieldKind::RelatedManyToMany {
                model: "Component",
                accessor: "licenses",
            },
        ),
    ],
)
.repr(&["key"]);

pub static LICENSE_TAG: Model = Model::new(
    "license_library",
    "LicenseTag",
    &[
        Field::new("id", FieldKind::Scalar(Primitive::Int)),
        Field::new("label", FieldKind::Scalar(Primitive::Text)),
    ],
)
.repr(&["label"]);

pub static COMPONENT: Model = Model::new(
    "component_catalog",
    "Component",
    &[
        Field::new("id", FieldKind::Scalar(Primitive::Int)),
        Field::new("name", FieldKind::Scalar(Primitive::Text)),
        Field::new("version", FieldKind::Scalar(Primitive::Text)).blank(),
        Field::new("owner", FieldKind::ForeignKey { model: "Owner" }).nullable(),
        Field::new("license_expression", FieldKind::Scalar(Primitive::Text)).blank(),
        Field::new("notice_text", FieldKind::Scalar(Primitive::Text)).blank(),
        Field::new("release_date", FieldKind::Scalar(Primitive::Date)).nullable(),
        Field::new("created_date", FieldKind::Scalar(Primitive::DateTime)).nullable(),
        Field::new("is_active", FieldKind::Scalar(Primitive::Bool)).nullable(),
        Field::new("curation_level", FieldKind::Scalar(Primitive::Int)),
        Field::new("keywords", FieldKind::Scalar(Primitive::Json)).blank(),
        // Computed by an external scan service; excluded from the
        // reportable surface because its value is not stable data.
        Field::new("has_pending_scan", FieldKind::Scalar(Primitive::Bool)),
        Field::new("licenses", FieldKind::ManyToMany { model: "License" }),
        Field::new("packages", FieldKind::ManyToMany { model: "Package" }),
        Field::new(
            "related_children",
            FieldKind::Related {
                model: "Subcomponent",
                accessor: "parent",
            },
        ),
        Field::new(
            "related_parents",
            FieldKind::Related {
                model: "Subcomponent",
                accessor: "child",
            },
        ),
    ],
)
.repr(&["name", "version"])
.hierarchy(Hierarchy {
    through: "Subcomponent",
    parent_field: "parent",
    child_field: "child",
})
.properties(&["where_used", "primary_license"])
.volatile(&["has_pending_scan"]);

pub static SUBCOMPONENT: Model = Model::new(
    "component_catalog",
    "Subcomponent",
    &[
        Field::new("id", FieldKind::Scalar(Primitive::Int)),
        Field::new("parent", FieldKind::ForeignKey { model: "Component" }),
        Field::new("child", FieldKind::ForeignKey { model: "Component" }),
    ],
)
.repr(&["id"]);

pub static PACKAGE: Model = Model::new(
    "component_catalog",
    "Package",
    &[
        Field::new("id", FieldKind::Scalar(Primitive::Int)),
        Field::new("filename", FieldKind::Scalar(Primitive::Text)),
        Field::new("download_url", FieldKind::Scalar(Primitive::Text)).blank(),
        Field::new("license_expression", FieldKind::Scalar(Primitive::Text)).blank(),
        Field::new(
            "components",
            FieldKind::RelatedManyToMany {
                model: "Component",
                accessor: "packages",
            },
        ),
    ],
)
.repr(&["filename"]);

pub static PRODUCT: Model = Model::new(
    "product_portfolio",
    "Product",
    &[
        Field::new("id", FieldKind::Scalar(Primitive::Int)),
        Field::new("name", FieldKind::Scalar(Primitive::Text)),
        Field::new("version", FieldKind::Scalar(Primitive::Text)).blank(),
        Field::new(
            "productcomponents",
            FieldKind::Related {
                model: "ProductComponent",
                accessor: "product",
            },
        ),
    ],
)
.repr(&["name", "version"]);

pub static PRODUCT_COMPONENT: Model = Model::new(
    "product_portfolio",
    "ProductComponent",
    &[
        Field::new("id", FieldKind::Scalar(Primitive::Int)),
        Field::new("product", FieldKind::ForeignKey { model: "Product" }),
        Field::new("component", FieldKind::ForeignKey { model: "Component" }).nullable(),
        Field::new("license_expression", FieldKind::Scalar(Primitive::Text)).blank(),
    ],
)
.repr(&["id"]);

/// Models exposed to reporting. `Subcomponent` and `ProductComponent`
/// stay traversable as relation targets but are not query targets.
pub const REPORTING_WHITELIST: &[&str] = &[
    "Component",
    "License",
    "LicenseTag",
    "Owner",
    "Package",
    "Product",
    "ProductComponent",
    "Subcomponent",
];

const QUERY_TARGETS: &[&str] = &[
    "Component",
    "License",
    "Owner",
    "Package",
    "Product",
    "ProductComponent",
];

static ALL_MODELS: &[&Model] = &[
    &OWNER,
    &LICENSE,
    &LICENSE_TAG,
    &COMPONENT,
    &SUBCOMPONENT,
    &PACKAGE,
    &PRODUCT,
    &PRODUCT_COMPONENT,
];

/// Per-model exposed-field restrictions; `Owner.alias` is internal.
fn field_whitelist() -> BTreeMap<&'static str, &'static [&'static str]> {
    let mut map: BTreeMap<&'static str, &'static [&'static str]> = BTreeMap::new();
    map.insert(
        "Owner",
        &["id", "name", "type", "components", "licenses"] as &[&str],
    );

    map
}

static REGISTER: Once = Once::new();

/// Register the catalog models into the global schema. Idempotent.
pub fn register_catalog() {
    REGISTER.call_once(|| {
        let mut schema = schema_write();
        for model in ALL_MODELS {
            // The Once guard makes duplicates impossible here.
            schema.add_model(model).ok();
        }
    });
}

static MODEL_DATA_QUERY: LazyLock<ModelDataMap> = LazyLock::new(|| {
    register_catalog();
    get_model_data(
        ALL_MODELS,
        REPORTING_WHITELIST,
        &field_whitelist(),
        &NameMapOptions::full(),
    )
});

static MODEL_DATA_ORDER: LazyLock<ModelDataMap> = LazyLock::new(|| {
    register_catalog();
    get_model_data(
        ALL_MODELS,
        REPORTING_WHITELIST,
        &field_whitelist(),
        &NameMapOptions::direct_only(),
    )
});

/// Introspected surface used by filter and column validation.
pub fn model_data_for_query() -> &'static ModelDataMap {
    &MODEL_DATA_QUERY
}

/// Flat direct-field surface used by order-field validation.
pub fn model_data_for_order_field() -> &'static ModelDataMap {
    &MODEL_DATA_ORDER
}

/// Whether queries may target this model.
#[must_use]
pub fn is_reportable(model: &Model) -> bool {
    QUERY_TARGETS.contains(&model.ident)
}

/// Render one instance through its model's repr fields, blank-skipping.
#[must_use]
pub fn instance_repr(store: &Store, model_ident: &str, id: RecordId) -> String {
    let Ok(schema) = reportql_schema::build::get_schema() else {
        return String::new();
    };
    let Some(model) = schema.get_model(model_ident) else {
        return String::new();
    };
    let Some(record) = store.record(model_ident, id) else {
        return String::new();
    };

    model
        .repr
        .iter()
        .filter_map(|field| record.value(field))
        .map(ToString::to_string)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve one computed property on an instance. Returns `None` when the
/// property yields nothing to display.
#[must_use]
pub fn property_value(
    store: &Store,
    model: &Model,
    record: &Record,
    name: &str,
    user: Option<&str>,
) -> Option<String> {
    if !model.has_property(name) {
        return None;
    }

    match name {
        "where_used" => Some(where_used(store, record, user)),
        "primary_license" => primary_license(store, record),
        _ => None,
    }
}

/// The products using this component, restricted to the viewing user's
/// assignments. One `Product: <repr>` line per usage.
fn where_used(store: &Store, record: &Record, user: Option<&str>) -> String {
    let scope = store.scoped_ids("ProductComponent", user);

    let Some(table) = store.table("ProductComponent") else {
        return String::new();
    };

    table
        .rows
        .values()
        .filter(|row| scope.as_ref().is_none_or(|scope| scope.contains(&row.id)))
        .filter(|row| {
            row.value("component")
                .and_then(Value::as_ref_id)
                .is_some_and(|id| id == record.id)
        })
        .filter_map(|row| row.value("product").and_then(Value::as_ref_id))
        .map(|product| format!("Product: {}", instance_repr(store, "Product", product)))
        .collect::<Vec<_>>()
        .join(MULTIVALUE_SEPARATOR)
}

/// The key of the component's first assigned license.
fn primary_license(store: &Store, record: &Record) -> Option<String> {
    let Some(Value::List(items)) = record.value("licenses") else {
        return None;
    };

    items
        .iter()
        .filter_map(Value::as_ref_id)
        .next()
        .and_then(|id| store.record("License", id))
        .and_then(|license| license.value("key"))
        .map(ToString::to_string)
}

/// Resolve a product reference within the user's scope.
#[must_use]
pub fn resolve_product(store: &Store, raw: &str, user: Option<&str>) -> Option<RecordId> {
    let id = hierarchy::resolve_reference(store, &PRODUCT, raw)?;

    store.id_in_scope("Product", id, user).then_some(id)
}

/// The merged component set of a product: every component assigned to it
/// plus each one's descendant closure.
#[must_use]
pub fn merged_descendant_ids(
    store: &Store,
    product: RecordId,
    user: Option<&str>,
) -> BTreeSet<RecordId> {
    let scope = store.scoped_ids("ProductComponent", user);

    let Some(table) = store.table("ProductComponent") else {
        return BTreeSet::new();
    };

    let assigned: Vec<RecordId> = table
        .rows
        .values()
        .filter(|row| scope.as_ref().is_none_or(|scope| scope.contains(&row.id)))
        .filter(|row| {
            row.value("product")
                .and_then(Value::as_ref_id)
                .is_some_and(|id| id == product)
        })
        .filter_map(|row| row.value("component").and_then(Value::as_ref_id))
        .collect();

    let mut merged: BTreeSet<RecordId> = assigned.iter().copied().collect();
    for component in assigned {
        merged.extend(hierarchy::descendant_ids(store, &COMPONENT, component));
    }

    merged
}

///
/// TESTS
///
