//! The endpoint for listing recorded expenses.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    expense::{ExpenseFilter, ExpenseResponse, ExpenseSort, list_expenses},
};

/// The state needed for the expense listing endpoint.
#[derive(Debug, Clone)]
pub struct ListExpensesState {
    /// The database connection shared across handlers.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters accepted when listing expenses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListExpensesParams {
    /// Keep only this category. Omitted, empty, or `"all"` keeps everything.
    pub category: Option<String>,
    /// `"date_desc"` sorts by expense date; anything else sorts by creation
    /// time, newest first.
    pub sort: Option<String>,
}

impl ListExpensesParams {
    /// The store filter these parameters describe.
    pub(crate) fn filter(&self) -> ExpenseFilter {
        let category = self
            .category
            .as_deref()
            .filter(|category| !category.is_empty() && *category != "all")
            .map(str::to_owned);

        ExpenseFilter { category }
    }

    /// The sort order these parameters describe.
    pub(crate) fn sort(&self) -> ExpenseSort {
        match self.sort.as_deref() {
            Some("date_desc") => ExpenseSort::DateDescending,
            _ => ExpenseSort::CreatedDescending,
        }
    }
}

/// List recorded expenses as JSON, optionally filtered and sorted.
pub async fn list_expenses_endpoint(
    State(state): State<ListExpensesState>,
    Query(params): Query<ListExpensesParams>,
) -> Result<Json<Vec<ExpenseResponse>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = list_expenses(&params.filter(), params.sort(), &connection)
        .inspect_err(|error| tracing::error!("Failed to list expenses: {error}"))?;

    Ok(Json(
        expenses.into_iter().map(ExpenseResponse::from).collect(),
    ))
}

// ==============
// TESTS
// ==============

#[cfg(test)]
mod list_expenses_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        db::initialize,
        expense::{
            ingest_expense,
            list_endpoint::{ListExpensesParams, ListExpensesState},
            list_expenses_endpoint,
        },
    };

    fn get_test_state() -> ListExpensesState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        ListExpensesState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn seed_expense(state: &ListExpensesState, key: &str, category: &str, date: &str) {
        let submission = json!({
            "amount": 100,
            "category": category,
            "date": date,
        });
        let connection = state.db_connection.lock().unwrap();
        ingest_expense(key, &submission, &connection).expect("Could not seed expense");
    }

    #[tokio::test]
    async fn lists_nothing_when_empty() {
        let state = get_test_state();

        let got = list_expenses_endpoint(State(state), Query(ListExpensesParams::default()))
            .await
            .expect("Could not list expenses");

        assert!(got.0.is_empty(), "got {:?}, want an empty list", got.0);
    }

    #[tokio::test]
    async fn filters_by_category() {
        let state = get_test_state();
        seed_expense(&state, "key-1", "Food", "2024-02-15");
        seed_expense(&state, "key-2", "Transport", "2024-02-16");

        let params = ListExpensesParams {
            category: Some("Food".to_owned()),
            sort: None,
        };
        let got = list_expenses_endpoint(State(state), Query(params))
            .await
            .expect("Could not list expenses");

        assert_eq!(got.0.len(), 1);
        assert_eq!(got.0[0].category, "Food");
    }

    #[tokio::test]
    async fn category_all_keeps_everything() {
        let state = get_test_state();
        seed_expense(&state, "key-1", "Food", "2024-02-15");
        seed_expense(&state, "key-2", "Transport", "2024-02-16");

        let params = ListExpensesParams {
            category: Some("all".to_owned()),
            sort: None,
        };
        let got = list_expenses_endpoint(State(state), Query(params))
            .await
            .expect("Could not list expenses");

        assert_eq!(got.0.len(), 2);
    }

    #[tokio::test]
    async fn default_sort_is_newest_created_first() {
        let state = get_test_state();
        seed_expense(&state, "key-1", "Food", "2024-02-15");
        seed_expense(&state, "key-2", "Food", "2024-02-15");
        seed_expense(&state, "key-3", "Food", "2024-02-15");

        let got = list_expenses_endpoint(State(state), Query(ListExpensesParams::default()))
            .await
            .expect("Could not list expenses");

        let got_ids: Vec<i64> = got.0.iter().map(|expense| expense.id).collect();
        assert_eq!(got_ids, [3, 2, 1]);
    }

    #[tokio::test]
    async fn sorts_by_expense_date_when_requested() {
        let state = get_test_state();
        seed_expense(&state, "key-1", "Food", "2024-01-10");
        seed_expense(&state, "key-2", "Food", "2024-03-10");
        seed_expense(&state, "key-3", "Food", "2024-02-10");

        let params = ListExpensesParams {
            category: None,
            sort: Some("date_desc".to_owned()),
        };
        let got = list_expenses_endpoint(State(state), Query(params))
            .await
            .expect("Could not list expenses");

        assert!(
            got.0[0].date > got.0[1].date && got.0[1].date > got.0[2].date,
            "got dates {:?}, want newest first",
            got.0.iter().map(|expense| expense.date).collect::<Vec<_>>()
        );
    }
}
