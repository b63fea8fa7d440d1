use crate::error::ValidationError;
use reportql_schema::prelude::*;
use serde::Serialize;
use std::{fmt, str::FromStr};

///
/// Lookup
///
/// The comparison operator of one filter. Stored lowercase, exactly as it
/// appears in saved query payloads.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Lookup {
    Exact,
    IExact,
    Contains,
    IContains,
    StartsWith,
    IStartsWith,
    EndsWith,
    IEndsWith,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    IsNull,
    IsEmpty,
    Regex,
    IRegex,
    Year,
    Descendant,
    ProductDescendant,
}

impl Lookup {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::IExact => "iexact",
            Self::Contains => "contains",
            Self::IContains => "icontains",
            Self::StartsWith => "startswith",
            Self::IStartsWith => "istartswith",
            Self::EndsWith => "endswith",
            Self::IEndsWith => "iendswith",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::In => "in",
            Self::IsNull => "isnull",
            Self::IsEmpty => "isempty",
            Self::Regex => "regex",
            Self::IRegex => "iregex",
            Self::Year => "year",
            Self::Descendant => "descendant",
            Self::ProductDescendant => "product_descendant",
        }
    }

    #[must_use]
    pub const fn is_case_insensitive(self) -> bool {
        matches!(
            self,
            Self::IExact | Self::IContains | Self::IStartsWith | Self::IEndsWith | Self::IRegex
        )
    }

    /// Structural compatibility of this operator with the field the
    /// filter path resolved to, on the given query target.
    pub fn check_compatibility(self, field: &Field, model: &Model) -> Result<(), ValidationError> {
        match self {
            _ if self.is_case_insensitive()
                && field.kind.primitive() == Some(Primitive::Bool) =>
            {
                Err(ValidationError::CaseInsensitiveBoolean)
            }

            Self::IsNull if !(field.nullable || field.kind.is_relation()) => {
                Err(ValidationError::IsNullNotSupported)
            }

            Self::IsEmpty if field.kind.is_relation() => Err(ValidationError::IsEmptyOnRelation),
            Self::IsEmpty if !field.blank => Err(ValidationError::IsEmptyNotBlank),

            Self::Year
                if !matches!(
                    field.kind.primitive(),
                    Some(Primitive::Date | Primitive::DateTime)
                ) =>
            {
                Err(ValidationError::YearOnNonDate)
            }

            Self::Descendant if !model.is_hierarchical() => Err(ValidationError::DescendantModel),
            Self::Descendant if field.ident != model.primary_key => {
                Err(ValidationError::DescendantField)
            }

            Self::ProductDescendant if !model.is_hierarchical() => {
                Err(ValidationError::ProductDescendantModel)
            }

            _ => Ok(()),
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lookup {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lookup = match s {
            "exact" => Self::Exact,
            "iexact" => Self::IExact,
            "contains" => Self::Contains,
            "icontains" => Self::IContains,
            "startswith" => Self::StartsWith,
            "istartswith" => Self::IStartsWith,
            "endswith" => Self::EndsWith,
            "iendswith" => Self::IEndsWith,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "in" => Self::In,
            "isnull" => Self::IsNull,
            "isempty" => Self::IsEmpty,
            "regex" => Self::Regex,
            "iregex" => Self::IRegex,
            "year" => Self::Year,
            "descendant" => Self::Descendant,
            "product_descendant" => Self::ProductDescendant,
            _ => return Err(ValidationError::UnknownLookup(s.to_string())),
        };

        Ok(lookup)
    }
}
