use crate::{
    ALL_VALUE, catalog,
    error::ValidationError,
    hierarchy,
    query::{Lookup, Predicate},
    store::Store,
    value::{Value, coerce_for_field, parse_bool, parse_literal_list, symbolic_date_boundary},
};
use reportql_schema::{
    introspect::{
        get_field_via_field_traversal, split_path, validate_field_traversal_of_model_data,
    },
    prelude::*,
};
use serde::Serialize;

///
/// Filter
///
/// One saved predicate of a query. `value` is stored exactly as entered,
/// never trimmed, because trailing whitespace is significant to text
/// lookups. `runtime_parameter` marks the value as a default the viewing
/// user may override.
///

#[derive(Clone, Debug, Serialize)]
pub struct Filter {
    pub field_name: String,
    pub lookup: Lookup,
    pub value: String,
    pub runtime_parameter: bool,
    pub negate: bool,
}

impl Filter {
    #[must_use]
    pub fn new(field_name: impl Into<String>, lookup: Lookup, value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            lookup,
            value: value.into(),
            runtime_parameter: false,
            negate: false,
        }
    }

    #[must_use]
    pub fn runtime(mut self) -> Self {
        self.runtime_parameter = true;
        self
    }

    #[must_use]
    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }

    /// Save-time validation: the path must resolve through exposed
    /// fields, the lookup must be structurally compatible with the
    /// terminal field, and fixed-vocabulary lookups must carry a value
    /// from their vocabulary.
    pub fn validate(&self, model: &'static Model) -> Result<(), ValidationError> {
        let field = self.resolve_field(model)?;
        self.lookup.check_compatibility(field, model)?;

        match self.lookup {
            // Stored tri-state values must be boolean at save time; the
            // runtime vocabulary is more forgiving.
            Lookup::IsNull | Lookup::IsEmpty if !self.runtime_parameter => {
                parse_bool(&self.value)
                    .map(|_| ())
                    .ok_or(ValidationError::BooleanRequired)
            }

            Lookup::Year if !self.runtime_parameter => self
                .value
                .parse::<i64>()
                .map(|_| ())
                .map_err(|_| ValidationError::Value {
                    field: field.ident.to_string(),
                    message: "Enter a whole number.".to_string(),
                }),

            _ => {
                if !self.runtime_parameter {
                    self.coerced_value(field, &self.value).map(|_| ())?;
                }

                Ok(())
            }
        }
    }

    /// Compile this filter against the store, or `None` when the filter
    /// is inactive for this run (empty value, `ALL` sentinel,
    /// out-of-vocabulary tri-state, unresolvable reference).
    pub fn get_q(
        &self,
        store: &Store,
        model: &'static Model,
        user: Option<&str>,
        runtime_value: Option<&str>,
    ) -> Result<Option<Predicate>, ValidationError> {
        let raw = if self.runtime_parameter {
            runtime_value.unwrap_or(&self.value)
        } else {
            &self.value
        };

        if raw.is_empty() || raw == ALL_VALUE {
            return Ok(None);
        }

        let field = self.resolve_field(model)?;
        let path: Vec<String> = split_path(&self.field_name)
            .into_iter()
            .map(str::to_string)
            .collect();

        let predicate = match self.lookup {
            Lookup::IsNull => match parse_bool(raw) {
                Some(value) => Predicate::IsNull { path, value },
                None => return Ok(None),
            },

            Lookup::IsEmpty => match parse_bool(raw) {
                Some(value) => Predicate::IsEmpty { path, value },
                None => return Ok(None),
            },

            Lookup::Descendant => match hierarchy::resolve_reference(store, model, raw) {
                Some(id) => Predicate::IdIn(hierarchy::descendant_ids(store, model, id)),
                None => return Ok(None),
            },

            Lookup::ProductDescendant => match catalog::resolve_product(store, raw, user) {
                Some(product) => {
                    Predicate::IdIn(catalog::merged_descendant_ids(store, product, user))
                }
                None => return Ok(None),
            },

            Lookup::In => Predicate::Compare {
                path,
                lookup: self.lookup,
                value: Value::List(parse_literal_list(raw)),
            },

            Lookup::Regex | Lookup::IRegex => Predicate::Compare {
                path,
                lookup: self.lookup,
                value: Value::text(raw),
            },

            Lookup::Year => match raw.parse::<i64>() {
                Ok(year) => Predicate::Compare {
                    path,
                    lookup: self.lookup,
                    value: Value::Int(year),
                },
                Err(_) => return Ok(None),
            },

            _ => Predicate::Compare {
                path,
                lookup: self.lookup,
                value: self.coerced_value(field, raw)?,
            },
        };

        Ok(Some(if self.negate {
            predicate.negate()
        } else {
            predicate
        }))
    }

    fn resolve_field(&self, model: &'static Model) -> Result<&'static Field, ValidationError> {
        let segments = split_path(&self.field_name);
        let model_data = catalog::model_data_for_query();

        validate_field_traversal_of_model_data(&segments, model, model_data)?;
        get_field_via_field_traversal(&segments, model, model_data)
            .ok_or(ValidationError::InvalidFieldValue)
    }

    /// Coerce the effective raw value against the resolved field. The
    /// literal `"None"` means null, and symbolic date tokens expand to
    /// their absolute day-start boundary. The contains family compares as
    /// text regardless of the field type; every other lookup keeps the
    /// field's own coercion.
    fn coerced_value(&self, field: &Field, raw: &str) -> Result<Value, ValidationError> {
        if raw == "None" {
            return Ok(Value::Null);
        }

        if matches!(
            field.kind.primitive(),
            Some(Primitive::Date | Primitive::DateTime)
        ) && let Some(boundary) = symbolic_date_boundary(raw)
        {
            return Ok(Value::DateTime(boundary));
        }

        if matches!(self.lookup, Lookup::Contains | Lookup::IContains) {
            return Ok(Value::text(raw));
        }

        coerce_for_field(field, raw)
    }
}
