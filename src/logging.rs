//! Middleware for logging requests and responses.

use axum::{extract::Request, middleware::Next, response::Response};

/// The maximum number of body bytes included in request and response logs
/// at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and logged in full at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body_text) = extract_header_and_body_text_from_request(request).await;
    log_request(&parts, &body_text);

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body_text) = extract_header_and_body_text_from_response(response).await;
    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

async fn extract_header_and_body_text_from_request(
    request: Request,
) -> (axum::http::request::Parts, String) {
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

async fn extract_header_and_body_text_from_response(
    response: Response,
) -> (axum::http::response::Parts, String) {
    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {parts:#?}\nbody: {:}...",
            truncate_at_char_boundary(body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {parts:#?}\nbody: {body:?}");
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {parts:#?}\nbody: {:}...",
            truncate_at_char_boundary(body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {parts:#?}\nbody: {body:?}");
    }
}

/// Cut `body` at [LOG_BODY_LENGTH_LIMIT], backing up so the cut does not
/// split a multi-byte character such as the rupee sign.
fn truncate_at_char_boundary(body: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT;

    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

// ==============
// TESTS
// ==============

#[cfg(test)]
mod truncation_tests {
    use super::{LOG_BODY_LENGTH_LIMIT, truncate_at_char_boundary};

    #[test]
    fn truncates_ascii_at_limit() {
        let body = "a".repeat(LOG_BODY_LENGTH_LIMIT * 2);

        let got = truncate_at_char_boundary(&body);

        assert_eq!(got.len(), LOG_BODY_LENGTH_LIMIT);
    }

    #[test]
    fn does_not_split_multibyte_characters() {
        // The rupee sign is three bytes, so characters straddle the limit.
        let body = "₹".repeat(LOG_BODY_LENGTH_LIMIT);

        let got = truncate_at_char_boundary(&body);

        assert!(got.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(got.chars().all(|character| character == '₹'));
    }
}
