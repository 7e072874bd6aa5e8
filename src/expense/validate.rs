//! Validation of raw expense submissions.

use std::collections::BTreeMap;

use serde_json::Value;
use time::{
    Date, OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

/// Validation failures keyed by field name.
///
/// A `BTreeMap` keeps the JSON rendering of error details in a stable order.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// A validated expense submission, trimmed and parsed but not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    /// The amount spent, in rupees. Always greater than zero.
    pub amount: f64,
    /// The trimmed category.
    pub category: String,
    /// The trimmed description. May be empty.
    pub description: String,
    /// When the expense happened, normalized to UTC.
    pub date: OffsetDateTime,
}

/// Parse a raw JSON submission into an [ExpenseDraft].
///
/// Every field is checked and every failure reported, so a client can fix a
/// whole form in one round trip. A submission that is not a JSON object
/// yields a single `body` error.
pub fn parse_expense_input(raw: &Value) -> Result<ExpenseDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let Some(fields) = raw.as_object() else {
        errors.insert("body", "Invalid request body".to_owned());
        return Err(errors);
    };

    let amount = match coerce_amount(fields.get("amount")) {
        None => {
            errors.insert("amount", "Amount is required and must be a number".to_owned());
            None
        }
        Some(amount) if amount <= 0.0 => {
            errors.insert("amount", "Amount must be greater than 0".to_owned());
            None
        }
        Some(amount) => Some(amount),
    };

    let category = match fields.get("category").and_then(Value::as_str) {
        Some(category) if !category.trim().is_empty() => Some(category.trim().to_owned()),
        _ => {
            errors.insert("category", "Category is required".to_owned());
            None
        }
    };

    let date = match fields.get("date").and_then(Value::as_str) {
        None => {
            errors.insert("date", "Date is required".to_owned());
            None
        }
        Some(text) if text.trim().is_empty() => {
            errors.insert("date", "Date is required".to_owned());
            None
        }
        Some(text) => match parse_client_date(text) {
            Some(date) => Some(date),
            None => {
                errors.insert("date", "Date must be a valid ISO date string".to_owned());
                None
            }
        },
    };

    // The description is optional and never rejected.
    let description = fields
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_owned();

    match (amount, category, date) {
        (Some(amount), Some(category), Some(date)) => Ok(ExpenseDraft {
            amount,
            category,
            description,
            date,
        }),
        _ => Err(errors),
    }
}

/// Check a raw JSON submission, returning a mapping of field names to error
/// messages. An empty mapping means the submission is valid.
pub fn validate_expense_input(raw: &Value) -> FieldErrors {
    parse_expense_input(raw).err().unwrap_or_default()
}

/// Read the amount field as a number.
///
/// Accepts JSON numbers and numeric strings such as `"250"` so that
/// hand-written clients are not rejected over a quoting mistake.
fn coerce_amount(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(number)) => number.as_f64().filter(|amount| amount.is_finite()),
        Some(Value::String(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite()),
        _ => None,
    }
}

/// Parse a client-supplied date string.
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates, which are read
/// as midnight UTC. The result is normalized to UTC so that stored dates
/// sort correctly as text.
fn parse_client_date(text: &str) -> Option<OffsetDateTime> {
    let text = text.trim();

    if let Ok(datetime) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(datetime.to_offset(UtcOffset::UTC));
    }

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

// ==============
// TESTS
// ==============
