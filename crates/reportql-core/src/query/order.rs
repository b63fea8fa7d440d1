use crate::{catalog, error::ValidationError};
use reportql_schema::prelude::*;
use serde::Serialize;

///
/// Sort
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum Sort {
    #[default]
    Ascending,
    Descending,
}

///
/// OrderField
///
/// One ordering key of a query. Ordering is restricted to direct fields
/// of the query target; `seq` fixes the application order.
///

#[derive(Clone, Debug, Serialize)]
pub struct OrderField {
    pub field_name: String,
    pub sort: Sort,
    pub seq: u32,
}

impl OrderField {
    #[must_use]
    pub fn new(field_name: impl Into<String>, sort: Sort, seq: u32) -> Self {
        Self {
            field_name: field_name.into(),
            sort,
            seq,
        }
    }

    pub fn validate(&self, model: &'static Model) -> Result<(), ValidationError> {
        let exposed = catalog::model_data_for_order_field()
            .get(model.ident)
            .is_some_and(|data| data.fields.iter().any(|f| f == &self.field_name));

        if exposed {
            Ok(())
        } else {
            Err(ValidationError::InvalidFieldValue)
        }
    }

    /// The `order_by` URL token for this key.
    #[must_use]
    pub fn expression(&self) -> String {
        match self.sort {
            Sort::Ascending => self.field_name.clone(),
            Sort::Descending => format!("-{}", self.field_name),
        }
    }
}
