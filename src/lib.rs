//! Paisa is a web app for tracking personal expenses.
//!
//! This library provides a JSON API for recording and listing expenses,
//! plus a server-rendered page for everyday use. Submissions carry an
//! idempotency key so client retries never create duplicate records.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
mod expense;
mod expenses_page;
mod html;
mod idempotency;
mod logging;
mod money;
mod not_found;
mod routing;
mod summary;
#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use expense::{
    Expense, ExpenseDraft, ExpenseFilter, ExpenseResponse, ExpenseSort, FieldErrors,
    IngestOutcome, NewExpense, get_expense_by_idempotency_key, ingest_expense, insert_expense,
    list_expenses, parse_expense_input, validate_expense_input,
};
pub use idempotency::{IDEMPOTENCY_KEY_HEADER, generate_key};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use money::{to_major_units, to_minor_units};
pub use routing::build_router;
pub use summary::{CategorySummary, aggregate_by_category, summarize_by_category};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An expense submission arrived without an idempotency key.
    #[error("Idempotency-Key header is required")]
    MissingIdempotencyKey,

    /// An expense submission's body was not valid JSON or not a JSON object.
    #[error("Invalid JSON body")]
    MalformedPayload,

    /// An expense submission had missing or invalid fields.
    ///
    /// Carries one message per failing field so clients can fix a whole
    /// form in one round trip.
    #[error("validation failed for {} field(s)", .0.len())]
    ValidationFailed(FieldErrors),

    /// The specified idempotency key already exists in the database.
    ///
    /// The ingestion pipeline resolves this by returning the stored expense,
    /// so the API never surfaces this error to clients.
    #[error("an expense with this idempotency key already exists")]
    DuplicateIdempotencyKey,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::MissingIdempotencyKey | Error::MalformedPayload => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            Error::ValidationFailed(details) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": "Validation failed", "details": details })),
            )
                .into_response(),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
