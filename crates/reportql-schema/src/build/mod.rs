use crate::{Error, node::Schema, prelude::*, validate::validate_schema};
use std::sync::{LazyLock, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error as ThisError;

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("validation failed: {0}")]
    Validation(ErrorTree),
}

///
/// SCHEMA
/// process-wide model registry, populated once at startup
///

static SCHEMA: LazyLock<RwLock<Schema>> = LazyLock::new(|| RwLock::new(Schema::new()));

static SCHEMA_VALIDATED: OnceLock<bool> = OnceLock::new();

/// Acquire a write guard to the global schema during model registration.
pub fn schema_write() -> RwLockWriteGuard<'static, Schema> {
    SCHEMA.write().expect("model registry lock poisoned")
}

// Raw read access; skips the validation gate that get_schema applies.
pub(crate) fn schema_read() -> RwLockReadGuard<'static, Schema> {
    SCHEMA.read().expect("model registry lock poisoned")
}

/// Read the global schema, validating it exactly once per process.
///
/// The registry is static configuration: once validated it is read-only,
/// so staleness after a schema change requires a process restart.
pub fn get_schema() -> Result<RwLockReadGuard<'static, Schema>, Error> {
    let schema = schema_read();
    validate(&schema).map_err(BuildError::Validation)?;

    Ok(schema)
}

// Memoizes success only; a failing registry re-validates (and re-fails)
// on every read.
fn validate(schema: &Schema) -> Result<(), ErrorTree> {
    if SCHEMA_VALIDATED.get().is_some() {
        return Ok(());
    }

    validate_schema(schema)?;

    SCHEMA_VALIDATED.set(true).ok();

    Ok(())
}
