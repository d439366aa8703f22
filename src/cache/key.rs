//! Cache key derivation.
//!
//! A request's fingerprint covers its method, URL, params and body. Headers
//! never take part.

use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

use crate::models::ProxyRequest;

/// Derives the cache key of `request` as a lowercase SHA-256 hex digest.
///
/// Object keys are ordered before hashing, so `{"a":1,"b":2}` and
/// `{"b":2,"a":1}` fingerprint the same. An absent body stays `null` and
/// never collides with `""` or `{}`.
pub fn derive_cache_key(request: &ProxyRequest) -> String {
    let params = request
        .params
        .as_ref()
        .map(|p| Value::Object(p.clone()))
        .unwrap_or_else(|| Value::Object(Map::new()));

    let key_data = json!({
        "url": request.url,
        "method": request.method,
        "params": params,
        "body": request.body.clone().unwrap_or(Value::Null),
    });

    let canonical = canonicalize(&key_data).to_string();

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

/// Rebuilds every object with its keys in sorted order.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn request(body: Option<Value>) -> ProxyRequest {
        ProxyRequest {
            url: "https://example.com/a".to_string(),
            method: "POST".to_string(),
            body,
            ..ProxyRequest::default()
        }
    }

    #[test]
    fn test_key_is_sha256_hex() {
        let key = derive_cache_key(&ProxyRequest::get("https://example.com/a"));
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_headers_do_not_affect_key() {
        let plain = ProxyRequest::get("https://example.com/a");
        let mut with_headers = plain.clone();
        with_headers.headers = Some(HashMap::from([
            ("authorization".to_string(), "Bearer x".to_string()),
            ("user-agent".to_string(), "curl".to_string()),
        ]));

        assert_eq!(derive_cache_key(&plain), derive_cache_key(&with_headers));
    }

    #[test]
    fn test_param_order_does_not_affect_key() {
        let mut first = ProxyRequest::get("https://example.com/search");
        let mut second = first.clone();

        let a: Value = serde_json::from_str(r#"{"q":"rust","page":2,"f":{"x":1,"y":2}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"f":{"y":2,"x":1},"page":2,"q":"rust"}"#).unwrap();
        first.params = a.as_object().cloned();
        second.params = b.as_object().cloned();

        assert_eq!(derive_cache_key(&first), derive_cache_key(&second));
    }

    #[test]
    fn test_absent_params_equal_empty_params() {
        let bare = ProxyRequest::get("https://example.com/a");
        let mut empty = bare.clone();
        empty.params = Some(Map::new());

        assert_eq!(derive_cache_key(&bare), derive_cache_key(&empty));
    }

    #[test]
    fn test_body_absent_vs_empty_differs() {
        let absent = derive_cache_key(&request(None));
        let empty_object = derive_cache_key(&request(Some(json!({}))));
        let empty_string = derive_cache_key(&request(Some(json!(""))));

        assert_ne!(absent, empty_object);
        assert_ne!(absent, empty_string);
        assert_ne!(empty_object, empty_string);
    }

    #[test]
    fn test_each_field_changes_key() {
        let base = request(Some(json!({"n": 1})));
        let base_key = derive_cache_key(&base);

        let mut other_url = base.clone();
        other_url.url = "https://example.com/b".to_string();
        let mut other_method = base.clone();
        other_method.method = "PUT".to_string();
        let mut other_params = base.clone();
        other_params.params = json!({"page": 1}).as_object().cloned();
        let other_body = request(Some(json!({"n": 2})));

        for changed in [other_url, other_method, other_params, other_body] {
            assert_ne!(base_key, derive_cache_key(&changed));
        }
    }

    #[test]
    fn test_canonicalize_sorts_nested_objects() {
        let value = json!({"b": [{"d": 1, "c": 2}], "a": null});
        assert_eq!(
            canonicalize(&value).to_string(),
            r#"{"a":null,"b":[{"c":2,"d":1}]}"#
        );
    }
}
