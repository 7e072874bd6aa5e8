//! Defines the endpoints for the application.

/// The expense tracker page.
pub const ROOT: &str = "/";

/// The route for creating and listing expenses.
pub const EXPENSES_API: &str = "/api/expenses";

// These tests are here so that we know the endpoint constants will parse as
// URIs without panicking.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES_API);
    }
}
