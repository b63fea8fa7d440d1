//! Textual input coercion against the declared field type.
//!
//! Invalid comparisons at evaluation time are non-matches, but invalid
//! *inputs* raise here, keyed to the offending field, so the editing user
//! sees them at save time.

use crate::{error::ValidationError, value::Value};
use reportql_schema::prelude::*;
use time::{Duration, OffsetDateTime, Time, format_description::well_known::Rfc3339, macros::format_description};

/// Parse the fixed boolean vocabulary; `None` for unrecognized tokens.
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Expand a symbolic date token to an absolute day-start boundary in the
/// local offset. UTC stands in when the local offset cannot be read.
#[must_use]
pub fn symbolic_date_boundary(raw: &str) -> Option<OffsetDateTime> {
    let days = match raw {
        "today" => 0,
        "past_7_days" => 7,
        "past_30_days" => 30,
        "past_90_days" => 90,
        _ => return None,
    };

    let start = OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .replace_time(Time::MIDNIGHT);

    Some(start - Duration::days(days))
}

/// Coerce a raw textual input into the typed value the resolved field
/// declares. Fields with no typed surface pass the raw string through
/// unchanged.
pub fn coerce_for_field(field: &Field, raw: &str) -> Result<Value, ValidationError> {
    let err = |message: &str| ValidationError::Value {
        field: field.ident.to_string(),
        message: message.to_string(),
    };

    match field.kind {
        FieldKind::Scalar(Primitive::Bool) => parse_bool(raw)
            .map(Value::Bool)
            .ok_or_else(|| err("Enter a valid boolean value.")),

        FieldKind::Scalar(Primitive::Int) => raw
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| err("Enter a whole number.")),

        FieldKind::Scalar(Primitive::Float | Primitive::Decimal) => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| err("Enter a number.")),

        FieldKind::Scalar(Primitive::Date) => {
            let format = format_description!("[year]-[month]-[day]");
            time::Date::parse(raw, &format)
                .map(Value::Date)
                .map_err(|_| err("Enter a valid date."))
        }

        FieldKind::Scalar(Primitive::DateTime) => {
            if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
                return Ok(Value::DateTime(dt));
            }
            let format = format_description!("[year]-[month]-[day]");
            time::Date::parse(raw, &format)
                .map(|date| Value::DateTime(date.midnight().assume_utc()))
                .map_err(|_| err("Enter a valid date/time."))
        }

        FieldKind::Scalar(Primitive::Text) => {
            if field.slug && !is_valid_slug(raw) {
                return Err(err(
                    "Enter a valid 'slug' consisting of letters, numbers, underscores or hyphens.",
                ));
            }
            if !field.choices.is_empty() && field.choice_label(raw).is_none() {
                return Err(ValidationError::Value {
                    field: field.ident.to_string(),
                    message: format!(
                        "Select a valid choice. {raw} is not one of the available choices."
                    ),
                });
            }

            Ok(Value::text(raw))
        }

        // No form-level descriptor; the raw string passes through.
        FieldKind::Scalar(Primitive::Json) => Ok(Value::text(raw)),

        // Relation fields filter against the related primary key.
        FieldKind::ForeignKey { .. }
        | FieldKind::ManyToMany { .. }
        | FieldKind::RelatedManyToMany { .. }
        | FieldKind::Related { .. }
        | FieldKind::GenericRelation { .. } => Ok(raw
            .parse::<u64>()
            .map_or_else(|_| Value::text(raw), Value::Ref)),
    }
}

fn is_valid_slug(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

///
/// Literal list parsing
///
/// Restricted evaluator for Python-literal-looking list strings, e.g.
/// `"['a', 'b']"`. Accepts quoted strings, integers, booleans and None.
/// Syntax errors yield an empty list (lenient, not a hard failure); used
/// only by the `in` lookup.
///

#[must_use]
pub fn parse_literal_list(raw: &str) -> Vec<Value> {
    parse_list(raw.trim()).unwrap_or_default()
}

fn parse_list(raw: &str) -> Option<Vec<Value>> {
    let inner = raw.strip_prefix('[')?.strip_suffix(']')?;
    let mut items = Vec::new();
    let mut rest = inner.trim_start();

    while !rest.is_empty() {
        let (item, remainder) = parse_item(rest)?;
        items.push(item);

        rest = remainder.trim_start();
        if let Some(after_comma) = rest.strip_prefix(',') {
            rest = after_comma.trim_start();
        } else if !rest.is_empty() {
            return None;
        }
    }

    Some(items)
}

fn parse_item(rest: &str) -> Option<(Value, &str)> {
    let mut chars = rest.chars();

    match chars.next()? {
        quote @ ('\'' | '"') => {
            let body: String = chars.clone().take_while(|&c| c != quote).collect();
            let consumed = 1 + body.len() + 1;
            if rest.len() < consumed || rest.as_bytes()[consumed - 1] != quote as u8 {
                return None;
            }
            Some((Value::Text(body), &rest[consumed..]))
        }
        _ => {
            let end = rest
                .find([',', ']'])
                .unwrap_or(rest.len());
            let token = rest[..end].trim();
            let value = match token {
                "True" => Value::Bool(true),
                "False" => Value::Bool(false),
                "None" => Value::Null,
                _ => Value::Int(token.parse::<i64>().ok()?),
            };
            Some((value, &rest[end..]))
        }
    }
}
