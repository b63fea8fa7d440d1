//! Typed metadata registry for the reporting engine: schema nodes, the
//! process-wide registry, and the field-path introspection surface.

pub mod build;
pub mod error;
pub mod introspect;
pub mod node;
pub mod types;
pub mod validate;

/// Maximum length for model schema identifiers.
pub const MAX_MODEL_NAME_LEN: usize = 64;

/// Maximum length for field schema identifiers.
pub const MAX_FIELD_NAME_LEN: usize = 64;

use crate::{build::BuildError, node::NodeError};
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub(crate) use crate::build::schema_read;
    pub use crate::{
        error::ErrorTree,
        node::*,
        types::{FieldKind, Primitive},
    };
    pub use serde::Serialize;
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    BuildError(#[from] BuildError),

    #[error(transparent)]
    NodeError(#[from] NodeError),
}
