//! Login, logout and token inspection handlers.

use hyper::{body::Bytes, Response};
use rand::Rng;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::router::{AppState, RouterError};

use super::request_utils::{map_db_error_to_router_error, MockRequest};
use super::response::{error_response, json_response, success_response, success_with_message};

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuv";
const TOKEN_LENGTH: usize = 11;

/// Payload of a successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    /// Opaque token ending in `~<loginType>`
    pub token: String,
    /// Role the user logged in as
    pub login_type: String,
}

/// Builds a token: random base-32 characters, `~`, then the login type.
pub fn generate_token(login_type: &str) -> String {
    let mut rng = rand::thread_rng();
    let random: String = (0..TOKEN_LENGTH)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect();
    format!("{}~{}", random, login_type)
}

/// Authenticates a user.
///
/// # Endpoint
/// `GET /login?email=..&password=..&loginType=..`
///
/// # Response
/// - **200 OK**: `{ "data": { "token": "...~student", "loginType": "student" }, "msg": "login success", "code": 200 }`
/// - **403 Forbidden**: `{ "msg": "Check user or email", "code": 400 }`
///
/// # Notes
/// A user matches when email, password and `type == loginType` all match.
/// Missing parameters never match.
pub fn login(req: &MockRequest, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let (Some(email), Some(password), Some(login_type)) =
        (req.param("email"), req.param("password"), req.param("loginType"))
    else {
        return json_response(403, &error_response(400, "Check user or email"));
    };

    let mut query = Map::new();
    query.insert("email".to_string(), Value::from(email));
    query.insert("password".to_string(), Value::from(password));
    query.insert("type".to_string(), Value::from(login_type));

    let users = state
        .db
        .where_eq("user", &query)
        .map_err(map_db_error_to_router_error)?;

    if users.is_empty() {
        tracing::debug!(email, login_type, "login rejected");
        return json_response(403, &error_response(400, "Check user or email"));
    }

    let data = LoginData {
        token: generate_token(login_type),
        login_type: login_type.to_string(),
    };
    json_response(200, &success_with_message(data, "login success"))
}

/// Extracts the role from a token.
///
/// # Endpoint
/// `GET /userType?token=..`
///
/// # Response
/// - **200 OK**: `{ "data": "student", "msg": "success", "code": 200 }`
/// - **400 Bad Request**: `{ "msg": "Token is not exist", "code": 400 }`
pub fn user_type(req: &MockRequest, _state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let role = req
        .param("token")
        .and_then(|token| token.split('~').nth(1))
        .filter(|role| !role.is_empty());

    match role {
        Some(role) => json_response(200, &success_response(role)),
        None => json_response(400, &error_response(400, "Token is not exist")),
    }
}

/// Ends a session. Always succeeds.
///
/// # Endpoint
/// `POST /logout`
pub fn logout(_req: &MockRequest, _state: &AppState) -> Result<Response<Bytes>, RouterError> {
    json_response(200, &success_response(true))
}
