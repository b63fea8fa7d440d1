//! Per-dataspace registry of saved reporting objects.
//!
//! Names are unique per object kind within a dataspace. Reports reference
//! queries and column templates by name, and those references are
//! protected: a referenced object cannot be deleted and cannot change its
//! target model.

use crate::{
    card::{Card, CardLayout},
    catalog,
    column::ColumnTemplate,
    error::{FieldErrors, ReportError, ValidationError},
    query::Query,
    report::Report,
    store::Store,
};
use reportql_schema::prelude::*;
use std::collections::BTreeMap;

///
/// ReportOutput
///
/// Fully materialized report: headers plus display rows.
///

#[derive(Clone, Debug)]
pub struct ReportOutput {
    pub name: String,
    pub description: String,
    pub report_context: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

///
/// ReportingRegistry
///

#[derive(Clone, Debug, Default)]
pub struct ReportingRegistry {
    pub dataspace: String,
    queries: BTreeMap<String, Query>,
    column_templates: BTreeMap<String, ColumnTemplate>,
    reports: BTreeMap<String, Report>,
    cards: BTreeMap<String, Card>,
    card_layouts: BTreeMap<String, CardLayout>,
}

impl ReportingRegistry {
    #[must_use]
    pub fn new(dataspace: impl Into<String>) -> Self {
        Self {
            dataspace: dataspace.into(),
            ..Self::default()
        }
    }

    //
    // queries
    //

    pub fn add_query(&mut self, query: Query) -> Result<(), ValidationError> {
        if !catalog::is_reportable(query.model) {
            return Err(ValidationError::NotReportable {
                model: query.model.ident.to_string(),
            });
        }
        if self.queries.contains_key(&query.name) {
            return Err(ValidationError::DuplicateName { name: query.name });
        }

        query.validate()?;
        self.queries.insert(query.name.clone(), query);

        Ok(())
    }

    #[must_use]
    pub fn query(&self, name: &str) -> Option<&Query> {
        self.queries.get(name)
    }

    pub fn delete_query(&mut self, name: &str) -> Result<(), ValidationError> {
        let referenced = self.reports.values().any(|r| r.query_name == name)
            || self.cards.values().any(|c| c.query_name == name);
        if referenced {
            return Err(ValidationError::Protected {
                name: name.to_string(),
            });
        }

        self.queries.remove(name);

        Ok(())
    }

    /// Retargeting a query is allowed only while nothing references it.
    pub fn set_query_model(
        &mut self,
        name: &str,
        model: &'static Model,
    ) -> Result<(), ValidationError> {
        let referenced = self.reports.values().any(|r| r.query_name == name);
        if referenced {
            return Err(ValidationError::TargetImmutable);
        }

        if let Some(query) = self.queries.get_mut(name) {
            query.model = model;
        }

        Ok(())
    }

    //
    // column templates
    //

    pub fn add_column_template(
        &mut self,
        template: ColumnTemplate,
        store: &Store,
    ) -> Result<(), ValidationError> {
        if self.column_templates.contains_key(&template.name) {
            return Err(ValidationError::DuplicateName {
                name: template.name,
            });
        }

        template.validate(store)?;
        self.column_templates.insert(template.name.clone(), template);

        Ok(())
    }

    #[must_use]
    pub fn column_template(&self, name: &str) -> Option<&ColumnTemplate> {
        self.column_templates.get(name)
    }

    /// Retargeting a template is allowed only while nothing references it.
    pub fn set_column_template_model(
        &mut self,
        name: &str,
        model: &'static Model,
    ) -> Result<(), ValidationError> {
        let referenced = self
            .reports
            .values()
            .any(|r| r.column_template_name == name);
        if referenced {
            return Err(ValidationError::TargetImmutable);
        }

        if let Some(template) = self.column_templates.get_mut(name) {
            template.model = model;
        }

        Ok(())
    }

    pub fn delete_column_template(&mut self, name: &str) -> Result<(), ValidationError> {
        let referenced = self
            .reports
            .values()
            .any(|r| r.column_template_name == name);
        if referenced {
            return Err(ValidationError::Protected {
                name: name.to_string(),
            });
        }

        self.column_templates.remove(name);

        Ok(())
    }

    //
    // reports
    //

    /// Both references must resolve and must target the same model. The
    /// mismatch is reported against both offending inputs plus once at
    /// the object level, form-style.
    pub fn add_report(&mut self, report: Report) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.reports.contains_key(&report.name) {
            errors.add_field(
                "name",
                ValidationError::DuplicateName {
                    name: report.name.clone(),
                },
            );
        }

        let query = self.queries.get(&report.query_name);
        let template = self.column_templates.get(&report.column_template_name);

        if query.is_none() {
            errors.add_field("query", ValidationError::InvalidFieldValue);
        }
        if template.is_none() {
            errors.add_field("column_template", ValidationError::InvalidFieldValue);
        }

        if let (Some(query), Some(template)) = (query, template)
            && !std::ptr::eq(query.model, template.model)
        {
            errors.add_field("query", ValidationError::ContentTypeMismatch);
            errors.add_field("column_template", ValidationError::ContentTypeMismatch);
            errors.add_non_field(ValidationError::ContentTypeMismatch);
        }

        errors.result()?;
        self.reports.insert(report.name.clone(), report);

        Ok(())
    }

    #[must_use]
    pub fn report(&self, name: &str) -> Option<&Report> {
        self.reports.get(name)
    }

    pub fn delete_report(&mut self, name: &str) {
        self.reports.remove(name);
    }

    /// Materialize a report for a viewing user.
    pub fn report_output(
        &self,
        name: &str,
        store: &Store,
        runtime_overrides: &BTreeMap<usize, String>,
        user: Option<&str>,
    ) -> Result<ReportOutput, ReportError> {
        self.materialize(name, store, runtime_overrides, user, false)
    }

    /// Materialize a report with a trailing cell holding each row's
    /// instance details path.
    pub fn report_output_with_view_link(
        &self,
        name: &str,
        store: &Store,
        runtime_overrides: &BTreeMap<usize, String>,
        user: Option<&str>,
    ) -> Result<ReportOutput, ReportError> {
        self.materialize(name, store, runtime_overrides, user, true)
    }

    fn materialize(
        &self,
        name: &str,
        store: &Store,
        runtime_overrides: &BTreeMap<usize, String>,
        user: Option<&str>,
        include_view_link: bool,
    ) -> Result<ReportOutput, ReportError> {
        let report = self
            .reports
            .get(name)
            .ok_or_else(|| ReportError::UnknownReference(name.to_string()))?;
        let query = self
            .queries
            .get(&report.query_name)
            .ok_or_else(|| ReportError::UnknownReference(report.query_name.clone()))?;
        let template = self
            .column_templates
            .get(&report.column_template_name)
            .ok_or_else(|| ReportError::UnknownReference(report.column_template_name.clone()))?;

        let ids = query.get_qs(store, runtime_overrides, user)?;
        let rows = if include_view_link {
            template.get_output_with_view_link(store, &ids, user)
        } else {
            template.get_output(store, &ids, user)
        };

        let mut headers: Vec<String> = template
            .headers()
            .into_iter()
            .map(str::to_string)
            .collect();
        if include_view_link {
            headers.push("View".to_string());
        }

        Ok(ReportOutput {
            name: report.name.clone(),
            description: report.description.clone(),
            report_context: report.report_context.clone(),
            headers,
            rows,
        })
    }

    //
    // cards
    //

    pub fn add_card(&mut self, card: Card) -> Result<(), ValidationError> {
        if self.cards.contains_key(&card.title) {
            return Err(ValidationError::DuplicateName { name: card.title });
        }

        self.cards.insert(card.title.clone(), card);

        Ok(())
    }

    #[must_use]
    pub fn card(&self, title: &str) -> Option<&Card> {
        self.cards.get(title)
    }

    pub fn add_card_layout(&mut self, layout: CardLayout) -> Result<(), ValidationError> {
        if self.card_layouts.contains_key(&layout.name) {
            return Err(ValidationError::DuplicateName { name: layout.name });
        }

        self.card_layouts.insert(layout.name.clone(), layout);

        Ok(())
    }

    #[must_use]
    pub fn card_layout(&self, name: &str) -> Option<&CardLayout> {
        self.card_layouts.get(name)
    }

    /// The first `number_of_results` matching instances, rendered through
    /// the target model's repr.
    pub fn card_output(
        &self,
        title: &str,
        store: &Store,
        user: Option<&str>,
    ) -> Result<Vec<String>, ReportError> {
        let card = self
            .cards
            .get(title)
            .ok_or_else(|| ReportError::UnknownReference(title.to_string()))?;
        let query = self
            .queries
            .get(&card.query_name)
            .ok_or_else(|| ReportError::UnknownReference(card.query_name.clone()))?;

        let ids = query.get_qs(store, &BTreeMap::new(), user)?;

        Ok(ids
            .into_iter()
            .take(card.number_of_results)
            .map(|id| catalog::instance_repr(store, query.model.ident, id))
            .collect())
    }
}

///
/// TESTS
///
