use derive_more::{Display, FromStr};
use serde::Serialize;

///
/// Primitive
///
/// Scalar storage kinds a reportable field may carry. Slug-like text is
/// `Text` with the `slug` validation flag set on the field.
///

#[derive(Clone, Copy, Debug, Display, Eq, FromStr, PartialEq, Serialize)]
pub enum Primitive {
    Bool,
    Date,
    DateTime,
    Decimal,
    Float,
    Int,
    Json,
    Text,
}

impl Primitive {
    /// Whether values of this primitive admit a meaningful total ordering
    /// for `gt`/`gte`/`lt`/`lte` comparisons.
    #[must_use]
    pub const fn supports_ordering(self) -> bool {
        !matches!(self, Self::Json)
    }

    /// Whether `""`-style blank values exist for this primitive.
    /// `isempty` is only structurally valid on blankable kinds.
    #[must_use]
    pub const fn supports_blank(self) -> bool {
        matches!(self, Self::Text | Self::Json)
    }
}

///
/// FieldKind
///
/// The finite per-model field descriptor. Relation targets are referenced
/// by model identifier and resolved through the schema registry; reverse
/// relations carry the accessor used to reach them from an instance.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum FieldKind {
    Scalar(Primitive),
    ForeignKey {
        model: &'static str,
    },
    ManyToMany {
        model: &'static str,
    },
    RelatedManyToMany {
        model: &'static str,
        accessor: &'static str,
    },
    Related {
        model: &'static str,
        accessor: &'static str,
    },
    GenericRelation {
        model: &'static str,
    },
}

impl FieldKind {
    /// The identifier of the related model, if this kind is relational.
    #[must_use]
    pub const fn related_model(self) -> Option<&'static str> {
        match self {
            Self::Scalar(_) => None,
            Self::ForeignKey { model }
            | Self::ManyToMany { model }
            | Self::RelatedManyToMany { model, .. }
            | Self::Related { model, .. }
            | Self::GenericRelation { model } => Some(model),
        }
    }

    #[must_use]
    pub const fn is_relation(self) -> bool {
        !matches!(self, Self::Scalar(_))
    }

    /// Whether traversing this field fans out into multiple instances.
    #[must_use]
    pub const fn is_to_many(self) -> bool {
        matches!(
            self,
            Self::ManyToMany { .. }
                | Self::RelatedManyToMany { .. }
                | Self::Related { .. }
                | Self::GenericRelation { .. }
        )
    }

    /// The scalar primitive, when this is a direct value field.
    #[must_use]
    pub const fn primitive(self) -> Option<Primitive> {
        match self {
            Self::Scalar(primitive) => Some(primitive),
            _ => None,
        }
    }
}
