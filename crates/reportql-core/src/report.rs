use serde::Serialize;

///
/// Report
///
/// A named pairing of a saved query with a column template, both targeting
/// the same model. References are by name; the registry resolves them at
/// output time and enforces referential protection.
///

#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub name: String,
    pub description: String,
    pub query_name: String,
    pub column_template_name: String,
    /// Visible to non-administrative users when set.
    pub user_available: bool,
    /// Free-form context rendered alongside the output, e.g. a legal
    /// disclaimer or usage note.
    pub report_context: String,
    pub group: Vec<String>,
}

impl Report {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        query_name: impl Into<String>,
        column_template_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            query_name: query_name.into(),
            column_template_name: column_template_name.into(),
            user_available: false,
            report_context: String::new(),
            group: Vec::new(),
        }
    }

    #[must_use]
    pub fn user_available(mut self) -> Self {
        self.user_available = true;
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.report_context = context.into();
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group.push(group.into());
        self
    }
}
