//! Origin fetcher.
//!
//! Forwards a request description to the origin server and captures the
//! full response.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, SET_COOKIE};
use reqwest::{Client, Method};
use serde_json::Value;

use crate::error::{ProxyError, Result};
use crate::models::{ProxyRequest, ProxyResponse};

/// Performs the network call for a cache miss.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &ProxyRequest) -> Result<ProxyResponse>;
}

/// reqwest-backed fetcher. Redirects are followed.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProxyError::Configuration(format!("HTTP client error: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &ProxyRequest) -> Result<ProxyResponse> {
        let method = Method::from_bytes(request.method.to_ascii_uppercase().as_bytes())
            .map_err(|_| {
                ProxyError::InvalidRequest(format!("Unsupported method: {}", request.method))
            })?;

        let mut builder = self.client.request(method, &request.url);

        if let Some(headers) = &request.headers {
            for (name, value) in headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }

        if let Some(params) = &request.params {
            let pairs: Vec<(&str, String)> = params
                .iter()
                .map(|(name, value)| (name.as_str(), query_value(value)))
                .collect();
            builder = builder.query(&pairs);
        }

        if request.sends_body() {
            builder = match &request.body {
                Some(body @ (Value::Object(_) | Value::Array(_))) => builder.json(body),
                Some(Value::String(text)) => builder.body(text.clone()),
                Some(Value::Null) | None => builder,
                Some(other) => builder.body(other.to_string()),
            };
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProxyError::Fetch(e.to_string()))?;

        let status_code = response.status().as_u16();
        let headers = flatten_headers(response.headers());
        let content = response
            .bytes()
            .await
            .map_err(|e| ProxyError::Fetch(format!("reading body: {}", e)))?;

        Ok(ProxyResponse {
            status_code,
            content: content.to_vec(),
            headers,
            from_cache: false,
            cache_key: None,
        })
    }
}

/// Strings go out bare; everything else as its JSON text.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Separator between repeated `set-cookie` values. Cookies may contain ", "
/// themselves, and a newline never appears inside a header value.
pub const SET_COOKIE_SEPARATOR: char = '\n';

/// Collapses a header map into lowercase name -> value, joining repeats with
/// ", " (`set-cookie` repeats with [`SET_COOKIE_SEPARATOR`]).
pub fn flatten_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut flat: HashMap<String, String> = HashMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        match flat.entry(name.as_str().to_string()) {
            Entry::Occupied(mut existing) => {
                let joined = existing.get_mut();
                if name == SET_COOKIE {
                    joined.push(SET_COOKIE_SEPARATOR);
                } else {
                    joined.push_str(", ");
                }
                joined.push_str(&value);
            }
            Entry::Vacant(slot) => {
                slot.insert(value.into_owned());
            }
        }
    }
    flat
}
