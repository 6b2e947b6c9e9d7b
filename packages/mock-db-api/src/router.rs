//! Matchit routing configuration.

use std::sync::Arc;

use hyper::{body::Bytes, header::HeaderValue, Method, Request, Response};
use matchit::Router as MatchitRouter;

use crate::handlers::{self, request_utils, MockRequest};
use mock_db_core::{config::MockConfig, Database};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Model store
    pub db: Arc<Database>,
    /// Server configuration
    pub config: Arc<MockConfig>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a router with every mock route under the configured namespace.
    ///
    /// # Errors
    /// `InternalError` when the namespace yields an invalid route pattern.
    pub fn new(db: Arc<Database>, config: Arc<MockConfig>) -> Result<Self, RouterError> {
        let prefix = config.route_prefix();
        let mut router = MatchitRouter::new();

        for handler in RouteHandler::ALL {
            let path = format!("{}{}", prefix, handler.path());
            router.insert(path.clone(), handler).map_err(|e| {
                RouterError::InternalError(format!("Failed to insert {} route: {}", path, e))
            })?;
        }

        Ok(Self {
            inner: router,
            state: AppState { db, config },
        })
    }

    /// Returns the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// # Arguments
    /// * `req` - HTTP request
    ///
    /// # Returns
    /// The rendered response; body read failures become error envelopes
    /// with the same CORS headers as routed responses.
    pub async fn route(&self, req: Request<hyper::body::Incoming>) -> Response<Bytes> {
        match request_utils::read_request_body_with_timeout(
            req,
            self.state.config.request_timeout_ms,
        )
        .await
        {
            Ok((method, uri, body)) => {
                let target = uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or_else(|| uri.path());
                self.dispatch(&MockRequest::new(method, target, body))
            }
            Err(e) => {
                let mut response = Response::from(e);
                allow_any_origin(&mut response);
                response
            }
        }
    }

    /// Dispatches a collected request and renders any handler error.
    pub fn dispatch(&self, req: &MockRequest) -> Response<Bytes> {
        let result = match self.inner.at(&req.path) {
            Ok(matched) => {
                let handler = *matched.value;
                if req.method == Method::OPTIONS {
                    request_utils::build_empty_response(204)
                } else if req.method == handler.method() {
                    handler.handle(req, &self.state)
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            Err(_) => Err(RouterError::NotFound(format!(
                "No route found for {}",
                req.path
            ))),
        };

        let mut response = result.unwrap_or_else(Response::from);
        allow_any_origin(&mut response);
        response
    }
}

/// Adds permissive CORS headers so a dev frontend on another port can call in.
fn allow_any_origin(response: &mut Response<Bytes>) {
    let headers = response.headers_mut();
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET, POST, DELETE, OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type, Authorization"),
    );
}

/// Route handler function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteHandler {
    Login,
    UserType,
    Logout,
    Students,
    AddStudent,
    UpdateStudent,
    DeleteStudent,
    StudentProfile,
    Courses,
    Course,
}

impl RouteHandler {
    const ALL: [RouteHandler; 10] = [
        RouteHandler::Login,
        RouteHandler::UserType,
        RouteHandler::Logout,
        RouteHandler::Students,
        RouteHandler::AddStudent,
        RouteHandler::UpdateStudent,
        RouteHandler::DeleteStudent,
        RouteHandler::StudentProfile,
        RouteHandler::Courses,
        RouteHandler::Course,
    ];

    /// Path relative to the namespace.
    fn path(self) -> &'static str {
        match self {
            RouteHandler::Login => "/login",
            RouteHandler::UserType => "/userType",
            RouteHandler::Logout => "/logout",
            RouteHandler::Students => "/students",
            RouteHandler::AddStudent => "/students/add",
            RouteHandler::UpdateStudent => "/students/update",
            RouteHandler::DeleteStudent => "/students/delete",
            RouteHandler::StudentProfile => "/student",
            RouteHandler::Courses => "/courses",
            RouteHandler::Course => "/course",
        }
    }

    fn method(self) -> Method {
        match self {
            RouteHandler::Logout | RouteHandler::AddStudent | RouteHandler::UpdateStudent => {
                Method::POST
            }
            RouteHandler::DeleteStudent => Method::DELETE,
            _ => Method::GET,
        }
    }

    /// Handles a request already matched to this route.
    fn handle(self, req: &MockRequest, state: &AppState) -> Result<Response<Bytes>, RouterError> {
        match self {
            RouteHandler::Login => handlers::login(req, state),
            RouteHandler::UserType => handlers::user_type(req, state),
            RouteHandler::Logout => handlers::logout(req, state),
            RouteHandler::Students => handlers::list_students(req, state),
            RouteHandler::AddStudent => handlers::add_student(req, state),
            RouteHandler::UpdateStudent => handlers::update_student(req, state),
            RouteHandler::DeleteStudent => handlers::delete_student(req, state),
            RouteHandler::StudentProfile => handlers::student_profile(req, state),
            RouteHandler::Courses => handlers::list_courses(req, state),
            RouteHandler::Course => handlers::course_detail(req, state),
        }
    }
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    BadRequest(String),
    NotFound(String),
}

impl RouterError {
    /// HTTP status for the error.
    pub fn status(&self) -> u16 {
        match self {
            RouterError::MethodNotAllowed => 405,
            RouterError::InternalError(_) => 500,
            RouterError::Timeout => 408,
            RouterError::BadRequest(_) => 400,
            RouterError::NotFound(_) => 404,
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
        }
    }
}

impl std::error::Error for RouterError {}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        let message = match &err {
            RouterError::MethodNotAllowed => "Method Not Allowed",
            RouterError::InternalError(msg) => {
                tracing::error!("{}", msg);
                "server error"
            }
            RouterError::Timeout => "Request Timeout",
            RouterError::BadRequest(msg) => msg.as_str(),
            RouterError::NotFound(msg) => msg.as_str(),
        };

        let envelope = handlers::error_response(status, message);
        let body = serde_json::to_vec(&envelope).unwrap_or_else(|e| {
            format!("{{\"msg\":\"Failed to serialize error: {}\",\"code\":500}}", e).into_bytes()
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Bytes::from(body))
            .unwrap_or_else(|_| {
                let mut fallback = Response::new(Bytes::from("Internal Server Error"));
                *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            })
    }
}
