//! Bearer Token Transport
//!
//! `Authorization: Bearer <token>` parsing and formatting.

use axum::http::{HeaderMap, header};

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization` header value.
///
/// Only the exact `Bearer ` scheme prefix is recognized; any other scheme,
/// a missing header or an empty token yields `None`.
pub fn extract_bearer_token(header_value: Option<&str>) -> Option<&str> {
    let token = header_value?.strip_prefix(BEARER_PREFIX)?;

    if token.is_empty() { None } else { Some(token) }
}

/// Extract the bearer token from request headers
pub fn bearer_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok();
    extract_bearer_token(value).map(str::to_string)
}

/// Build an `Authorization` header value for `token`
pub fn bearer_header_value(token: &str) -> String {
    format!("{BEARER_PREFIX}{token}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(Some("Bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(Some("abc")), None);
        assert_eq!(extract_bearer_token(None), None);
    }

    #[test]
    fn test_other_schemes_are_absent() {
        assert_eq!(extract_bearer_token(Some("Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_bearer_token(Some("bearer abc")), None);
        assert_eq!(extract_bearer_token(Some("Bearer")), None);
        assert_eq!(extract_bearer_token(Some("Bearer ")), None);
    }

    #[test]
    fn test_bearer_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_from_headers(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t.o.k"));
        assert_eq!(bearer_from_headers(&headers), Some("t.o.k".to_string()));
    }

    #[test]
    fn test_header_value_round_trips() {
        let value = bearer_header_value("xyz");
        assert_eq!(value, "Bearer xyz");
        assert_eq!(extract_bearer_token(Some(&value)), Some("xyz"));
    }
}
