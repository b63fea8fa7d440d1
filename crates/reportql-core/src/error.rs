use reportql_schema::introspect::InvalidFieldValue;
use thiserror::Error as ThisError;

///
/// ValidationError
///
/// Save-time failures surfaced to the editing user. Structural path and
/// lookup problems each carry their own human-readable message; path
/// resolution deliberately collapses to the single generic
/// "Invalid field value".
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValidationError {
    #[error("Invalid field value")]
    InvalidFieldValue,

    #[error("Invalid lookup: '{0}'")]
    UnknownLookup(String),

    #[error("Case-insensitive lookups are not supported on boolean fields.")]
    CaseInsensitiveBoolean,

    #[error("isnull is only supported on nullable or related fields.")]
    IsNullNotSupported,

    #[error("isempty is not supported on related fields.")]
    IsEmptyOnRelation,

    #[error("isempty is only supported on fields that accept blank values.")]
    IsEmptyNotBlank,

    #[error("year is only supported on date fields.")]
    YearOnNonDate,

    #[error("descendant is only supported on hierarchical object types.")]
    DescendantModel,

    #[error("descendant can only be applied to the id field.")]
    DescendantField,

    #[error("product_descendant is only supported on component queries.")]
    ProductDescendantModel,

    #[error("Value must be either True or False.")]
    BooleanRequired,

    /// A stored or runtime value failed the resolved field's validators.
    #[error("{field}: {message}")]
    Value { field: String, message: String },

    #[error("The query and column template must target the same object type.")]
    ContentTypeMismatch,

    #[error("'{name}' cannot be deleted: it is referenced by one or more reports or cards.")]
    Protected { name: String },

    #[error("The object type cannot be modified since the object is referenced by a report.")]
    TargetImmutable,

    #[error("'{name}' already exists in this dataspace.")]
    DuplicateName { name: String },

    #[error("'{model}' is not a reportable object type.")]
    NotReportable { model: String },
}

impl From<InvalidFieldValue> for ValidationError {
    fn from(_: InvalidFieldValue) -> Self {
        Self::InvalidFieldValue
    }
}

///
/// ReportError
///
/// Runtime (report-viewing time) failures. Recoverable by design: stored
/// queries may reference schema elements that later changed, so callers
/// surface these as an inline error block rather than a crash.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ReportError {
    #[error("unknown object type: '{0}'")]
    UnknownModel(String),

    #[error("unknown reference: '{0}'")]
    UnknownReference(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

///
/// FieldErrors
///
/// Form-shaped validation outcome: per-field errors plus non-field
/// ("whole object") errors, for callers that attach messages to specific
/// inputs.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldErrors {
    pub field_errors: Vec<(&'static str, ValidationError)>,
    pub non_field_errors: Vec<ValidationError>,
}

impl FieldErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            field_errors: Vec::new(),
            non_field_errors: Vec::new(),
        }
    }

    pub fn add_field(&mut self, field: &'static str, error: ValidationError) {
        self.field_errors.push((field, error));
    }

    pub fn add_non_field(&mut self, error: ValidationError) {
        self.non_field_errors.push(error);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, error) in &self.field_errors {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{field}: {error}")?;
            first = false;
        }
        for error in &self.non_field_errors {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
            first = false;
        }

        Ok(())
    }
}

impl std::error::Error for FieldErrors {}
