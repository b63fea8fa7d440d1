//! Reporting runtime: values and coercion, the record store with
//! security-scoped access policies, hierarchy closures, the query compiler,
//! the column projector, and report/card assembly over the static catalog.

pub mod card;
pub mod catalog;
pub mod column;
pub mod error;
pub mod hierarchy;
pub mod query;
pub mod registry;
pub mod report;
pub mod store;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Separator between fanned-out leaf values within one projected cell.
pub const MULTIVALUE_SEPARATOR: &str = "\n";

/// Reserved prefix (trailing space included) marking tag pseudo-paths.
pub const TAG_PREFIX: &str = "tag: ";

/// Marker rendered in place of an attribute that cannot be resolved on an
/// instance at projection time. A recoverable display value, never a panic.
pub const ERROR_VALUE: &str = "Error";

/// Sentinel filter value meaning "no constraint, omit this filter".
pub const ALL_VALUE: &str = "ALL";

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
///

pub mod prelude {
    pub use crate::{
        card::{Card, CardLayout},
        column::{AssignedField, ColumnTemplate},
        query::{AndOr, Filter, Lookup, OrderField, Query, Sort},
        report::Report,
        store::{AccessPolicy, Record, RecordId, Store},
        value::Value,
    };
}
