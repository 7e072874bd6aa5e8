//! The expense ingestion pipeline.
//!
//! Turns a raw client submission plus an idempotency key into a stored
//! expense, deduplicating retries so at most one row exists per key.

use rusqlite::Connection;
use serde_json::Value;

use crate::{
    Error,
    expense::{
        Expense, NewExpense, get_expense_by_idempotency_key, insert_expense,
        validate::parse_expense_input,
    },
    money::to_minor_units,
};

/// The result of ingesting an expense submission.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// The submission was stored as a new expense.
    Created(Expense),
    /// An expense with the same idempotency key already existed. The stored
    /// expense is returned unchanged, even if the retried submission had
    /// different field values.
    AlreadyExists(Expense),
}

/// Run a raw submission through the ingestion pipeline.
///
/// The pipeline checks the idempotency key, validates the payload, converts
/// the amount to paise, and inserts the expense unless one already exists
/// for the key. The first write for a key wins; later submissions get the
/// stored expense back.
///
/// # Errors
/// This function will return a:
/// - [Error::MissingIdempotencyKey] if `idempotency_key` is empty or blank,
/// - or [Error::MalformedPayload] if `body` is not a JSON object,
/// - or [Error::ValidationFailed] if any field is missing or invalid,
/// - or [Error::SqlError] if there is an SQL error.
pub fn ingest_expense(
    idempotency_key: &str,
    body: &Value,
    connection: &Connection,
) -> Result<IngestOutcome, Error> {
    if idempotency_key.trim().is_empty() {
        return Err(Error::MissingIdempotencyKey);
    }

    if !body.is_object() {
        return Err(Error::MalformedPayload);
    }

    let draft = parse_expense_input(body).map_err(Error::ValidationFailed)?;

    if let Some(existing) = get_expense_by_idempotency_key(idempotency_key, connection)? {
        return Ok(IngestOutcome::AlreadyExists(existing));
    }

    let new_expense = NewExpense {
        amount_cents: to_minor_units(draft.amount),
        category: draft.category,
        description: draft.description,
        date: draft.date,
        idempotency_key: idempotency_key.to_owned(),
    };

    match insert_expense(new_expense, connection) {
        Ok(expense) => Ok(IngestOutcome::Created(expense)),
        // Another submission with the same key won the insert race. The
        // stored row is authoritative.
        Err(Error::DuplicateIdempotencyKey) => {
            let existing = get_expense_by_idempotency_key(idempotency_key, connection)?
                .ok_or(Error::NotFound)?;

            Ok(IngestOutcome::AlreadyExists(existing))
        }
        Err(error) => Err(error),
    }
}

// ==============
// TESTS
// ==============
