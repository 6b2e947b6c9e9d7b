//! Response envelope shared by every endpoint.

use hyper::{body::Bytes, Response};
use serde::Serialize;

use crate::router::RouterError;

/// JSON body returned by every endpoint.
///
/// ```json
/// { "data": ..., "msg": "success", "code": 200 }
/// ```
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Payload, absent on errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human readable status message
    pub msg: String,
    /// Application status code, usually mirroring the HTTP status
    pub code: u16,
}

/// Helper to create a success envelope with the default message
pub fn success_response<T: Serialize>(data: T) -> Envelope<T> {
    success_with_message(data, "success")
}

/// Helper to create a success envelope with a custom message
pub fn success_with_message<T: Serialize>(data: T, msg: &str) -> Envelope<T> {
    Envelope {
        data: Some(data),
        msg: msg.to_string(),
        code: 200,
    }
}

/// Helper to create an error envelope
pub fn error_response(code: u16, msg: impl Into<String>) -> Envelope<()> {
    Envelope {
        data: None,
        msg: msg.into(),
        code,
    }
}

/// Serializes an envelope into an HTTP response with the given status.
pub fn json_response<T: Serialize>(
    status: u16,
    envelope: &Envelope<T>,
) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(envelope)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    super::request_utils::build_response(status, json)
}
