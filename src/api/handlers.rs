//! API Handlers
//!
//! HTTP request handlers for the proxy and its administrative endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::cache::{CacheBackend, CacheStore};
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::{
    CacheInfoResponse, HealthResponse, MessageResponse, ProxyQuery, ProxyReply, ProxyRequest,
    StatsResponse,
};
use crate::proxy::{CachingProxy, HttpFetcher, SET_COOKIE_SEPARATOR};

/// Request headers never forwarded on the direct proxy route.
const DROPPED_REQUEST_HEADERS: [&str; 4] =
    ["host", "content-length", "content-encoding", "accept-encoding"];

/// Origin response headers never relayed on the direct proxy route.
const DROPPED_RESPONSE_HEADERS: [&str; 3] =
    ["content-encoding", "transfer-encoding", "content-length"];

/// Application state shared across all handlers.
///
/// Built once at startup; the proxy owns the store and the counters.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<CachingProxy>,
}

impl AppState {
    /// Creates a new AppState around `proxy`.
    pub fn new(proxy: CachingProxy) -> Self {
        Self {
            proxy: Arc::new(proxy),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the configured backend and the HTTP origin fetcher.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = CacheBackend::from_config(config)?;
        let fetcher = HttpFetcher::new(config.fetch_timeout)?;
        Ok(Self::new(CachingProxy::new(
            Arc::new(backend),
            Arc::new(fetcher),
            config.cache_ttl,
        )))
    }

    fn backend_name(&self) -> &'static str {
        self.proxy.store().backend_name()
    }
}

/// Handler for POST /proxy
///
/// Serves the described request through the cache. `?ttl=N` overrides the
/// default lifetime of a newly stored response.
pub async fn proxy_handler(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
    Json(req): Json<ProxyRequest>,
) -> Result<Json<ProxyReply>> {
    if let Some(error_msg) = req.validate() {
        return Err(ProxyError::InvalidRequest(error_msg));
    }

    let response = state.proxy.handle(&req, query.ttl).await?;
    Ok(Json(ProxyReply::from(response)))
}

/// Handler for ANY /http/*target
///
/// Proxies straight to `https://{target}` and relays the origin response.
pub async fn direct_proxy_handler(
    State(state): State<AppState>,
    Path(target): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let target = target.trim_start_matches('/');
    if target.is_empty() {
        return Err(ProxyError::InvalidRequest("Invalid proxy path".to_string()));
    }

    let mut url = format!("https://{}", target);
    if let Some(query) = uri.query() {
        url.push('?');
        url.push_str(query);
    }

    let mut forwarded: HashMap<String, String> = headers
        .iter()
        .filter(|(name, _)| !DROPPED_REQUEST_HEADERS.contains(&name.as_str()))
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    forwarded.insert("accept-encoding".to_string(), "identity".to_string());

    let mut request = ProxyRequest {
        url,
        method: method.as_str().to_string(),
        headers: Some(forwarded),
        ..ProxyRequest::default()
    };
    if request.sends_body() && !body.is_empty() {
        request.body = Some(decode_body(&headers, &body));
    }

    let origin = state.proxy.handle(&request, None).await?;

    let status = StatusCode::from_u16(origin.status_code).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = (status, origin.content).into_response();
    for (name, value) in &origin.headers {
        if DROPPED_RESPONSE_HEADERS.contains(&name.as_str()) {
            continue;
        }
        let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
            continue;
        };
        if name == header::SET_COOKIE {
            // One header line per cookie
            for cookie in value.split(SET_COOKIE_SEPARATOR) {
                if let Ok(cookie) = HeaderValue::from_str(cookie) {
                    response.headers_mut().append(header::SET_COOKIE, cookie);
                }
            }
        } else if let Ok(value) = HeaderValue::from_str(value) {
            response.headers_mut().insert(name, value);
        }
    }

    Ok(response)
}

/// JSON bodies are parsed when declared as such; anything else is kept as text.
fn decode_body(headers: &HeaderMap, body: &Bytes) -> Value {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);

    if is_json {
        if let Ok(value) = serde_json::from_slice(body) {
            return value;
        }
    }
    Value::String(String::from_utf8_lossy(body).into_owned())
}

/// Handler for GET /cache/info/:key
///
/// Describes a stored entry; 404 when absent or expired.
pub async fn cache_info_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<CacheInfoResponse>> {
    let stored = state
        .proxy
        .store()
        .get(&key)
        .await?
        .ok_or_else(|| ProxyError::NotFound(key.clone()))?;

    Ok(Json(CacheInfoResponse::new(key, &stored)))
}

/// Handler for DELETE /cache/:key
///
/// Deleting an absent key succeeds.
pub async fn delete_cache_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.proxy.store().delete(&key).await?;
    Ok(Json(MessageResponse::new(format!(
        "Cache item {} deleted",
        key
    ))))
}

/// Handler for DELETE /cache/clear
///
/// Only the memory backend actually drops entries.
pub async fn clear_cache_handler(State(state): State<AppState>) -> Result<Json<MessageResponse>> {
    let removed = state.proxy.store().clear().await?;
    info!(removed, backend = state.backend_name(), "cache cleared");
    Ok(Json(MessageResponse::new(format!(
        "Cache cleared ({} entries removed)",
        removed
    ))))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.proxy.stats();

    Json(StatsResponse {
        total_requests: stats.total_requests,
        hits: stats.hits,
        misses: stats.misses,
        hit_rate: stats.hit_rate(),
        cache_backend: state.backend_name().to_string(),
    })
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.backend_name()))
}
