use crate::prelude::*;
use convert_case::{Case, Casing};

///
/// Hierarchy
///
/// Marks a model as hierarchy-capable: a self-referential relation carried
/// by a join model (`through`) whose parent/child foreign keys both point
/// back at this model. Only hierarchy-capable models admit `descendant`
/// lookups.
///

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Hierarchy {
    pub through: &'static str,
    pub parent_field: &'static str,
    pub child_field: &'static str,
}

///
/// Model
///

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Model {
    pub app: &'static str,
    pub ident: &'static str,
    pub primary_key: &'static str,
    pub fields: FieldList,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<Hierarchy>,

    /// Computed pseudo-fields resolved through an explicit function table
    /// at projection time rather than instance storage.
    #[serde(default, skip_serializing_if = "<[_]>::is_empty")]
    pub properties: &'static [&'static str],

    /// Field idents excluded from the query name map. Reserved for the one
    /// volatile-boolean special case; not a general mechanism.
    #[serde(default, skip_serializing_if = "<[_]>::is_empty")]
    pub volatile: &'static [&'static str],

    /// Fields composing an instance's display representation.
    pub repr: &'static [&'static str],
}

impl Model {
    #[must_use]
    pub const fn new(app: &'static str, ident: &'static str, fields: &'static [Field]) -> Self {
        Self {
            app,
            ident,
            primary_key: "id",
            fields: FieldList { fields },
            hierarchy: None,
            properties: &[],
            volatile: &[],
            repr: &["name"],
        }
    }

    #[must_use]
    pub const fn repr(mut self, repr: &'static [&'static str]) -> Self {
        self.repr = repr;
        self
    }

    #[must_use]
    pub const fn hierarchy(mut self, hierarchy: Hierarchy) -> Self {
        self.hierarchy = Some(hierarchy);
        self
    }

    #[must_use]
    pub const fn properties(mut self, properties: &'static [&'static str]) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub const fn volatile(mut self, volatile: &'static [&'static str]) -> Self {
        self.volatile = volatile;
        self
    }

    #[must_use]
    pub fn field(&self, ident: &str) -> Option<&'static Field> {
        self.fields.get(ident)
    }

    /// Schema identity label, `"<app>:<model_name>"`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}:{}", self.app, self.ident.to_case(Case::Snake))
    }

    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains(&name)
    }

    #[must_use]
    pub const fn is_hierarchical(&self) -> bool {
        self.hierarchy.is_some()
    }
}
