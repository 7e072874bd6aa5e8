//! The route handler for the 404 not found page.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// Render the 404 not found page.
pub async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(
            error_view(
                "Not Found",
                "404",
                "Sorry, this page does not exist.",
                "Check the address for typos.",
            )
            .into_string(),
        ),
    )
        .into_response()
}

// ==============
// TESTS
// ==============
