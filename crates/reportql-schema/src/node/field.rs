use crate::prelude::*;

///
/// FieldList
///

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(transparent)]
pub struct FieldList {
    pub fields: &'static [Field],
}

impl FieldList {
    // get
    #[must_use]
    pub fn get(&self, ident: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.ident == ident)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Field> {
        self.fields.iter()
    }
}

///
/// Field
///

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Field {
    pub ident: &'static str,
    pub kind: FieldKind,

    /// Whether the stored value may be null.
    pub nullable: bool,

    /// Whether a blank (empty) value is accepted on write.
    pub blank: bool,

    /// Slug character-set validation applies to input values.
    pub slug: bool,

    /// Enumerated (stored, display label) choices, empty when free-form.
    pub choices: &'static [(&'static str, &'static str)],

    /// Opt out of substituting display labels during projection.
    pub choices_display_disabled: bool,
}

impl Field {
    #[must_use]
    pub const fn new(ident: &'static str, kind: FieldKind) -> Self {
        Self {
            ident,
            kind,
            nullable: false,
            blank: false,
            slug: false,
            choices: &[],
            choices_display_disabled: false,
        }
    }

    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub const fn blank(mut self) -> Self {
        self.blank = true;
        self
    }

    #[must_use]
    pub const fn slug(mut self) -> Self {
        self.slug = true;
        self
    }

    #[must_use]
    pub const fn choices(mut self, choices: &'static [(&'static str, &'static str)]) -> Self {
        self.choices = choices;
        self
    }

    #[must_use]
    pub const fn raw_choice_display(mut self) -> Self {
        self.choices_display_disabled = true;
        self
    }

    /// Look up the display label for a stored choice value.
    #[must_use]
    pub fn choice_label(&self, stored: &str) -> Option<&'static str> {
        self.choices
            .iter()
            .find(|(value, _)| *value == stored)
            .map(|(_, label)| *label)
    }
}
