use crate::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// NodeError
///

#[derive(Debug, ThisError)]
pub enum NodeError {
    #[error("model not found in schema: '{0}'")]
    ModelNotFound(String),

    #[error("model already registered: '{0}'")]
    DuplicateModel(String),
}

///
/// Schema
///
/// The registry of reportable models, keyed by model identifier. Nodes are
/// `'static` constants; the schema only holds references.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct Schema {
    models: BTreeMap<&'static str, &'static Model>,
}

impl Schema {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            models: BTreeMap::new(),
        }
    }

    pub fn add_model(&mut self, model: &'static Model) -> Result<(), NodeError> {
        if self.models.contains_key(model.ident) {
            return Err(NodeError::DuplicateModel(model.ident.to_string()));
        }
        self.models.insert(model.ident, model);

        Ok(())
    }

    #[must_use]
    pub fn get_model(&self, ident: &str) -> Option<&'static Model> {
        self.models.get(ident).copied()
    }

    pub fn try_get_model(&self, ident: &str) -> Result<&'static Model, NodeError> {
        self.get_model(ident)
            .ok_or_else(|| NodeError::ModelNotFound(ident.to_string()))
    }

    pub fn models(&self) -> impl Iterator<Item = &'static Model> + '_ {
        self.models.values().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
