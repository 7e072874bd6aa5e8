//! Creates the axum router for the application.

use axum::{Router, routing::get};

use crate::{
    AppState, endpoints,
    expense::{create_expense_endpoint, list_expenses_endpoint},
    expenses_page::get_expenses_page,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_expenses_page))
        .route(
            endpoints::EXPENSES_API,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

// ==============
// TESTS
// ==============

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, routing::build_router};

    fn new_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection).expect("Could not create app state");

        TestServer::try_new(build_router(state)).expect("Could not create test server")
    }

    #[tokio::test]
    async fn root_serves_expenses_page() {
        let server = new_test_server();

        let response = server.get("/").await;

        response.assert_status_ok();
        assert!(response.text().contains("Add Expense"));
    }

    #[tokio::test]
    async fn unknown_route_returns_not_found() {
        let server = new_test_server();

        let response = server.get("/no/such/page").await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn expenses_round_trip_through_the_api() {
        let server = new_test_server();

        let created = server
            .post("/api/expenses")
            .add_header("Idempotency-Key", "key-1")
            .json(&json!({
                "amount": 250,
                "category": "Food",
                "description": "Lunch at cafe",
                "date": "2024-02-15T00:00:00.000Z",
            }))
            .await;

        created.assert_status(StatusCode::CREATED);

        let listed = server.get("/api/expenses").await;
        listed.assert_status_ok();

        let body = listed.json::<Value>();
        let expenses = body.as_array().expect("Response body is not a JSON array");
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0]["category"], "Food");
        assert_eq!(expenses[0]["amount_cents"], 25_000);
    }

    #[tokio::test]
    async fn post_without_key_is_bad_request() {
        let server = new_test_server();

        let response = server
            .post("/api/expenses")
            .json(&json!({
                "amount": 250,
                "category": "Food",
                "date": "2024-02-15",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
