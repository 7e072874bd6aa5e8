//! Database operations for expenses.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    expense::domain::{Expense, ExpenseId},
};

// ==============
// MODELS
// ==============

/// The fields needed to record a new expense.
///
/// The server assigns the ID and creation time at insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// The amount spent, in paise. Must be positive.
    pub amount_cents: i64,
    /// The trimmed category.
    pub category: String,
    /// The trimmed description. May be empty.
    pub description: String,
    /// When the expense happened.
    pub date: OffsetDateTime,
    /// The client token that deduplicates retried submissions.
    pub idempotency_key: String,
}

/// How to order expenses in a listing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpenseSort {
    /// Most recently recorded first.
    CreatedDescending,
    /// Most recent expense date first.
    DateDescending,
}

/// Which expenses to include in a listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    /// Keep only expenses with this exact category. `None` keeps everything.
    pub category: Option<String>,
}

// ==============
// DATABASE FUNCTIONS
// ==============

/// Create the expense table and its indexes in the database.
///
/// Safe to run repeatedly.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount_cents INTEGER NOT NULL,
            category TEXT NOT NULL,
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            idempotency_key TEXT NOT NULL UNIQUE
        );

        CREATE INDEX IF NOT EXISTS idx_expense_category ON expense(category);
        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
    )?;

    Ok(())
}

/// Record a new expense in the database, returning it with its generated ID
/// and creation time.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateIdempotencyKey] if an expense with the same
///   idempotency key has already been recorded,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection
        .prepare(
            "INSERT INTO expense (amount_cents, category, description, date, created_at, idempotency_key)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, amount_cents, category, description, date, created_at, idempotency_key",
        )?
        .query_row(
            (
                new_expense.amount_cents,
                new_expense.category,
                new_expense.description,
                new_expense.date,
                created_at,
                new_expense.idempotency_key,
            ),
            map_expense_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateIdempotencyKey,
            error => error.into(),
        })
}

/// Look up an expense by its idempotency key.
///
/// Returns `None` if no expense has been recorded with `idempotency_key`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_expense_by_idempotency_key(
    idempotency_key: &str,
    connection: &Connection,
) -> Result<Option<Expense>, Error> {
    let query_result = connection
        .prepare(
            "SELECT id, amount_cents, category, description, date, created_at, idempotency_key
            FROM expense
            WHERE idempotency_key = :idempotency_key",
        )?
        .query_row(&[(":idempotency_key", idempotency_key)], map_expense_row);

    match query_result {
        Ok(expense) => Ok(Some(expense)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// List recorded expenses, optionally filtered to one category.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_expenses(
    filter: &ExpenseFilter,
    sort: ExpenseSort,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    // Ties are broken by ID to keep the order stable across repeated queries.
    let order_clause = match sort {
        ExpenseSort::CreatedDescending => "ORDER BY created_at DESC, id DESC",
        ExpenseSort::DateDescending => "ORDER BY date DESC, id DESC",
    };

    match &filter.category {
        Some(category) => {
            let query = format!(
                "SELECT id, amount_cents, category, description, date, created_at, idempotency_key
                FROM expense
                WHERE category = :category
                {order_clause}"
            );

            connection
                .prepare(&query)?
                .query_map(&[(":category", category.as_str())], map_expense_row)?
                .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
                .collect()
        }
        None => {
            let query = format!(
                "SELECT id, amount_cents, category, description, date, created_at, idempotency_key
                FROM expense
                {order_clause}"
            );

            connection
                .prepare(&query)?
                .query_map([], map_expense_row)?
                .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
                .collect()
        }
    }
}

/// Get the total number of recorded expenses.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
#[cfg(test)]
pub fn count_expenses(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM expense;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Map a database row to an [Expense].
fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id: ExpenseId = row.get(0)?;
    let amount_cents = row.get(1)?;
    let category = row.get(2)?;
    let description = row.get(3)?;
    let date = row.get(4)?;
    let created_at = row.get(5)?;
    let idempotency_key = row.get(6)?;

    Ok(Expense {
        id,
        amount_cents,
        category,
        description,
        date,
        created_at,
        idempotency_key,
    })
}

// ==============
// TESTS
// ==============
