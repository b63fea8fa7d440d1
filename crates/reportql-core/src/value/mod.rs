mod coerce;
mod compare;

#[cfg(test)]
mod tests;

pub use coerce::{coerce_for_field, parse_bool, parse_literal_list, symbolic_date_boundary};
pub use compare::{canonical_cmp, strict_order_cmp, value_eq};

use crate::store::RecordId;
use serde::Serialize;
use std::fmt;
use time::{
    Date, OffsetDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};

///
/// Value
///
/// Typed runtime value as stored on records and carried by predicates.
///
/// Null → the field's value is absent (SQL NULL).
/// Ref  → the primary key of a related instance; compares equal to the
///        matching Int so foreign-key filters written against pks work.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Date(Date),
    DateTime(OffsetDateTime),
    Text(String),
    Ref(RecordId),
    List(Vec<Value>),
}

impl Value {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_text(&self) -> Option<&String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_ref_id(&self) -> Option<RecordId> {
        match self {
            Self::Ref(id) => Some(*id),
            _ => None,
        }
    }

    /// Canonical variant rank used by the total comparator. `Ref` shares
    /// the `Int` rank so pk comparisons order across both encodings.
    #[must_use]
    pub(crate) const fn canonical_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Ref(_) => 2,
            Self::Float(_) => 3,
            Self::Date(_) => 4,
            Self::DateTime(_) => 5,
            Self::Text(_) => 6,
            Self::List(_) => 7,
        }
    }

    /// The calendar year of a date-like value.
    #[must_use]
    pub const fn year(&self) -> Option<i64> {
        match self {
            Self::Date(date) => Some(date.year() as i64),
            Self::DateTime(dt) => Some(dt.year() as i64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "None"),
            // The stored-value vocabulary for booleans is capitalized.
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Date(date) => {
                let format = format_description!("[year]-[month]-[day]");
                match date.format(&format) {
                    Ok(s) => write!(f, "{s}"),
                    Err(_) => write!(f, "{date:?}"),
                }
            }
            Self::DateTime(dt) => match dt.format(&Rfc3339) {
                Ok(s) => write!(f, "{s}"),
                Err(_) => write!(f, "{dt:?}"),
            },
            Self::Text(text) => write!(f, "{text}"),
            Self::Ref(id) => write!(f, "{id}"),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}
