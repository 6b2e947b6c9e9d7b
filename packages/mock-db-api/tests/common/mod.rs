//! Shared helpers for route tests.

#![allow(dead_code)]

use std::sync::Arc;

use hyper::Method;
use serde_json::Value;

use mock_db_api::handlers::MockRequest;
use mock_db_api::router::Router;
use mock_db_api::school::build_database;
use mock_db_core::config::MockConfig;

/// Router over a freshly seeded store.
pub fn seeded_router() -> Router {
    router_with(MockConfig::default())
}

pub fn router_with(config: MockConfig) -> Router {
    let config = Arc::new(config);
    let db = Arc::new(build_database(&config).expect("fixtures load"));
    Router::new(db, config).expect("routes register")
}

/// Dispatches a request and decodes the JSON envelope.
pub fn call(router: &Router, method: Method, target: &str, body: &str) -> (u16, Value) {
    let response = router.dispatch(&MockRequest::new(method, target, body.to_string()));
    let status = response.status().as_u16();
    let body = response.into_body();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, json)
}

pub fn get(router: &Router, target: &str) -> (u16, Value) {
    call(router, Method::GET, target, "")
}

pub fn post(router: &Router, target: &str, body: &str) -> (u16, Value) {
    call(router, Method::POST, target, body)
}
