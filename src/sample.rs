//! Sample HTTP service.
//!
//! Three GET-only routes with fixed responses, kept as a companion to the
//! change-feed subscriber:
//!
//! | Route | Body |
//! |-------|------|
//! | `/hell` | `Hello, World!` |
//! | `/healthcheck` | `OK` |
//! | `/ping` | `pong` |
//!
//! Non-GET methods get `405 Method Not Allowed` from the method router.

// ============================================================================
// Imports
// ============================================================================

use axum::routing::get;
use axum::Router;

// ============================================================================
// Router
// ============================================================================

/// Builds the sample-service router.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/hell", get(hell))
        .route("/healthcheck", get(healthcheck))
        .route("/ping", get(ping))
}

// ============================================================================
// Handlers
// ============================================================================

async fn hell() -> &'static str {
    "Hello, World!"
}

async fn healthcheck() -> &'static str {
    "OK"
}

async fn ping() -> &'static str {
    "pong"
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    async fn send(method: Method, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_hell_returns_greeting() {
        let (status, body) = send(Method::GET, "/hell").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello, World!");
    }

    #[tokio::test]
    async fn test_healthcheck_returns_ok() {
        let (status, body) = send(Method::GET, "/healthcheck").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_ping_returns_pong() {
        let (status, body) = send(Method::GET, "/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "pong");
    }

    #[tokio::test]
    async fn test_non_get_is_rejected() {
        for uri in ["/hell", "/healthcheck", "/ping"] {
            let (status, body) = send(Method::POST, uri).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "POST {uri}");
            assert!(body.is_empty(), "POST {uri} body should be empty");
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = send(Method::GET, "/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
