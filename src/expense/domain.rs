//! The domain types for expenses.

use serde::Serialize;
use time::OffsetDateTime;

use crate::money::to_major_units;

/// The database ID of an expense.
pub type ExpenseId = i64;

/// The categories offered by the expense form.
///
/// Categories are stored as plain text, so this list is a convention rather
/// than a constraint.
pub const SUGGESTED_CATEGORIES: [&str; 8] = [
    "Food",
    "Transport",
    "Shopping",
    "Health",
    "Entertainment",
    "Utilities",
    "Rent",
    "Other",
];

/// A single recorded expense.
///
/// Expenses are immutable once stored. `amount_cents` holds the amount in
/// whole paise and is always positive.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The amount spent, in paise.
    pub amount_cents: i64,
    /// What kind of spending this was, e.g. "Food".
    pub category: String,
    /// What the expense was for. May be empty.
    pub description: String,
    /// When the expense happened, as reported by the client.
    pub date: OffsetDateTime,
    /// When the expense was recorded by the server.
    pub created_at: OffsetDateTime,
    /// The client token that deduplicates retried submissions.
    pub idempotency_key: String,
}

/// The JSON representation of an expense returned by the API.
///
/// `amount` repeats `amount_cents` in rupees for display convenience. The
/// idempotency key is internal bookkeeping and is not echoed back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseResponse {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The amount spent, in paise.
    pub amount_cents: i64,
    /// The amount spent, in rupees.
    pub amount: f64,
    /// What kind of spending this was.
    pub category: String,
    /// What the expense was for.
    pub description: String,
    /// When the expense happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// When the expense was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Expense> for ExpenseResponse {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id,
            amount_cents: expense.amount_cents,
            amount: to_major_units(expense.amount_cents),
            category: expense.category,
            description: expense.description,
            date: expense.date,
            created_at: expense.created_at,
        }
    }
}

// ==============
// TESTS
// ==============
