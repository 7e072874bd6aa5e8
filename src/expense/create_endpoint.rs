//! The endpoint for submitting a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    body::Bytes,
    extract::{FromRef, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::Value;

use crate::{
    AppState, Error,
    expense::{ExpenseResponse, IngestOutcome, ingest_expense},
    idempotency::IDEMPOTENCY_KEY_HEADER,
};

/// The state needed for the expense creation endpoint.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection shared across handlers.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Record the expense submitted in the request body.
///
/// The body is taken as raw bytes so malformed JSON can be reported with the
/// API's own error shape instead of axum's default rejection.
///
/// Responds with 201 and the stored expense on a first submission, or 200
/// and the previously stored expense when the idempotency key has been seen
/// before.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let idempotency_key = match headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        Some(key) if !key.trim().is_empty() => key.to_owned(),
        _ => return Error::MissingIdempotencyKey.into_response(),
    };

    let submission: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => return Error::MalformedPayload.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match ingest_expense(&idempotency_key, &submission, &connection) {
        Ok(IngestOutcome::Created(expense)) => {
            (StatusCode::CREATED, Json(ExpenseResponse::from(expense))).into_response()
        }
        Ok(IngestOutcome::AlreadyExists(expense)) => {
            (StatusCode::OK, Json(ExpenseResponse::from(expense))).into_response()
        }
        Err(error) => error.into_response(),
    }
}

// ==============
// TESTS
// ==============
