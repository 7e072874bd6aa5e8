//! Expense recording, validation, and retrieval.

mod create_endpoint;
mod db;
mod domain;
mod ingest;
mod list_endpoint;
mod validate;

pub use create_endpoint::create_expense_endpoint;
pub use db::{
    ExpenseFilter, ExpenseSort, NewExpense, create_expense_table, get_expense_by_idempotency_key,
    insert_expense, list_expenses,
};
pub use domain::{Expense, ExpenseResponse, SUGGESTED_CATEGORIES};
pub use ingest::{IngestOutcome, ingest_expense};
pub use list_endpoint::{ListExpensesParams, list_expenses_endpoint};
pub use validate::{ExpenseDraft, FieldErrors, parse_expense_input, validate_expense_input};

#[cfg(test)]
pub use db::count_expenses;
