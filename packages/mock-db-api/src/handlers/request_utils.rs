//! Request utilities for HTTP endpoints.

use std::collections::HashMap;
use std::ops::Range;

use http_body_util::BodyExt;
use hyper::{body::Bytes, Method, Request, Response, Uri};
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use tokio::time;

use crate::router::RouterError;
use mock_db_core::error::DbError;
use mock_db_core::record::{id_from_value, parse_id, RecordId};

/// Decoded query string parameters.
pub type QueryParams = HashMap<String, String>;

/// Request as seen by the handlers: body already collected.
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// HTTP method
    pub method: Method,
    /// Request path without query string
    pub path: String,
    /// Decoded query parameters
    pub query: QueryParams,
    /// Raw request body
    pub body: Bytes,
}

impl MockRequest {
    /// Builds a request from a method, a path with optional query string,
    /// and a body.
    pub fn new(method: Method, target: &str, body: impl Into<Bytes>) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };
        Self {
            method,
            path: path.to_string(),
            query: parse_query_params(query),
            body: body.into(),
        }
    }

    /// Returns a query parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Parses the JSON body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RouterError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| RouterError::BadRequest(format!("Failed to parse request: {}", e)))
    }
}

/// Helper function to read request body with timeout
///
/// # Returns
/// The request method and URI together with the collected body.
pub async fn read_request_body_with_timeout(
    req: Request<hyper::body::Incoming>,
    timeout_ms: u64,
) -> Result<(Method, Uri, Bytes), RouterError> {
    let (parts, body) = req.into_parts();
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let body = time::timeout(timeout_duration, body.collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::InternalError(format!("Failed to read request body: {}", e)))?;
    Ok((parts.method, parts.uri, body.to_bytes()))
}

/// Map DbError to appropriate RouterError
pub fn map_db_error_to_router_error(e: DbError) -> RouterError {
    match e {
        DbError::RecordNotFound { .. } => RouterError::NotFound(e.to_string()),
        DbError::InvalidRecordId(_) | DbError::DuplicateId { .. } => {
            RouterError::BadRequest(e.to_string())
        }
        _ => RouterError::InternalError(format!("Store error: {}", e)),
    }
}

/// Reads a record id from a query parameter.
///
/// Missing or non-numeric ids are rejected with the route's `message`.
pub fn id_param(req: &MockRequest, key: &str, message: impl Fn(&str) -> String) -> Result<RecordId, RouterError> {
    let raw = req.param(key).unwrap_or("undefined");
    parse_id(raw).map_err(|_| RouterError::BadRequest(message(raw)))
}

/// Reads a record id from a JSON value.
pub fn id_value(value: Option<&serde_json::Value>, message: impl Fn(&str) -> String) -> Result<RecordId, RouterError> {
    match value {
        Some(v) => id_from_value(v).map_err(|_| RouterError::BadRequest(message(&display_value(v)))),
        None => Err(RouterError::BadRequest(message("undefined"))),
    }
}

/// Renders a JSON value the way it appears in messages: strings unquoted.
pub fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Page window requested through `limit` and `page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page size
    pub limit: usize,
    /// One-based page number
    pub page: usize,
}

impl Pagination {
    /// Reads `limit` and `page`; both must be positive integers.
    pub fn from_query(query: &QueryParams) -> Option<Self> {
        let positive = |key: &str| {
            query
                .get(key)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|v| *v > 0)
        };
        Some(Self {
            limit: positive("limit")?,
            page: positive("page")?,
        })
    }

    /// Index range of the page within `len` items.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = self.limit.saturating_mul(self.page - 1).min(len);
        let end = start.saturating_add(self.limit).min(len);
        start..end
    }
}

/// Current local time in the `yyyy-MM-dd hh:mm:ss` form used by records.
///
/// The hour is on a 12-hour clock.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %I:%M:%S").to_string()
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Helper to build empty HTTP response (for 204 No Content)
pub fn build_empty_response(status: u16) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .body(Bytes::new())
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Parse query parameters from URL query string.
///
/// `+` decodes to a space; a key without `=` maps to an empty value.
pub fn parse_query_params(query_str: Option<&str>) -> QueryParams {
    let mut params = QueryParams::new();
    let Some(query_str) = query_str else {
        return params;
    };

    for pair in query_str.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(decode_component(key), decode_component(value));
    }
    params
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_params() {
        let params = parse_query_params(Some("query=Li%20Wei&limit=10&flag&name=a+b&"));
        assert_eq!(params.get("query").map(String::as_str), Some("Li Wei"));
        assert_eq!(params.get("limit").map(String::as_str), Some("10"));
        assert_eq!(params.get("flag").map(String::as_str), Some(""));
        assert_eq!(params.get("name").map(String::as_str), Some("a b"));
        assert!(parse_query_params(None).is_empty());
    }

    #[test]
    fn test_mock_request_splits_target() {
        let req = MockRequest::new(Method::GET, "/api/student?id=3", Bytes::new());
        assert_eq!(req.path, "/api/student");
        assert_eq!(req.param("id"), Some("3"));
    }

    #[test]
    fn test_pagination_requires_positive_values() {
        let query = parse_query_params(Some("limit=5&page=2"));
        let pagination = Pagination::from_query(&query).unwrap();
        assert_eq!(pagination.range(12), 5..10);
        assert_eq!(pagination.range(7), 5..7);
        assert_eq!(pagination.range(3), 3..3);

        for q in ["limit=5", "limit=0&page=1", "limit=abc&page=1", "limit=5&page=-1"] {
            assert!(Pagination::from_query(&parse_query_params(Some(q))).is_none(), "{}", q);
        }
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
        let hour: u32 = ts[11..13].parse().unwrap();
        assert!((1..=12).contains(&hour));
    }
}
