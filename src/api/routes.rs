//! API Routes
//!
//! Configures the Axum router with the proxy and admin endpoints.

use axum::{
    routing::{any, delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_info_handler, clear_cache_handler, delete_cache_handler, direct_proxy_handler,
    health_handler, proxy_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /proxy` - Proxy a described request through the cache
/// - `ANY /http/*target` - Proxy directly to `https://{target}`
/// - `GET /cache/info/:key` - Describe a stored entry
/// - `DELETE /cache/clear` - Drop every entry (memory backend)
/// - `DELETE /cache/:key` - Drop one entry
/// - `GET /stats` - Request counters and hit rate
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/proxy", post(proxy_handler))
        .route("/http/*target", any(direct_proxy_handler))
        .route("/cache/info/:key", get(cache_info_handler))
        .route("/cache/clear", delete(clear_cache_handler))
        .route("/cache/:key", delete(delete_cache_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::error::Result;
    use crate::models::{ProxyRequest, ProxyResponse};
    use crate::proxy::{flatten_headers, CachingProxy, Fetcher};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{HeaderMap, HeaderValue, Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    struct EchoFetcher;

    #[async_trait]
    impl Fetcher for EchoFetcher {
        async fn fetch(&self, request: &ProxyRequest) -> Result<ProxyResponse> {
            let accept = request
                .headers
                .as_ref()
                .and_then(|h| h.get("accept-encoding").cloned())
                .unwrap_or_default();
            Ok(ProxyResponse::new(200, format!("{} {}", request.method, request.url))
                .with_header("x-accept-encoding", accept)
                .with_header("transfer-encoding", "chunked"))
        }
    }

    /// Origin that sets two cookies, one with a comma in its expiry date.
    struct CookieFetcher;

    #[async_trait]
    impl Fetcher for CookieFetcher {
        async fn fetch(&self, _request: &ProxyRequest) -> Result<ProxyResponse> {
            let mut origin = HeaderMap::new();
            origin.append(
                "set-cookie",
                HeaderValue::from_static("session=abc; Expires=Wed, 21 Oct 2026 07:28:00 GMT"),
            );
            origin.append("set-cookie", HeaderValue::from_static("theme=dark"));

            let mut response = ProxyResponse::new(200, "ok");
            response.headers = flatten_headers(&origin);
            Ok(response)
        }
    }

    fn app_with(fetcher: Arc<dyn Fetcher>) -> Router {
        let store = Arc::new(MemoryStore::new(100, 300));
        let proxy = CachingProxy::new(store, fetcher, 300);
        create_router(AppState::new(proxy))
    }

    fn create_test_app() -> Router {
        app_with(Arc::new(EchoFetcher))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_proxy_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/proxy?ttl=60")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"url":"https://example.com/a"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_direct_proxy_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/http/example.com/path?q=1")
                    .header("accept-encoding", "gzip")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-accept-encoding").unwrap(),
            "identity"
        );
        assert!(response.headers().get("transfer-encoding").is_none());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"GET https://example.com/path?q=1");
    }

    #[tokio::test]
    async fn test_direct_proxy_relays_each_cookie() {
        let app = app_with(Arc::new(CookieFetcher));

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/http/example.com/login")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            let cookies: Vec<_> = response
                .headers()
                .get_all("set-cookie")
                .iter()
                .map(|v| v.to_str().unwrap().to_string())
                .collect();
            assert_eq!(
                cookies,
                vec![
                    "session=abc; Expires=Wed, 21 Oct 2026 07:28:00 GMT".to_string(),
                    "theme=dark".to_string(),
                ]
            );
        }
    }

    #[tokio::test]
    async fn test_cache_info_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/cache/info/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_clear_routes_before_key_delete() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/cache/clear")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&body).contains("Cache cleared"));
    }
}
