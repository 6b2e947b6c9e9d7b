//! Course listing and detail handlers.

use hyper::{body::Bytes, Response};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::router::{AppState, RouterError};

use super::request_utils::{id_param, map_db_error_to_router_error, MockRequest, Pagination};
use super::response::{json_response, success_response};
use super::student_handlers::name_of;

/// Payload of `/courses`.
#[derive(Debug, Serialize)]
pub struct CourseList {
    /// Number of courses in the store
    pub total: usize,
    pub courses: Vec<Map<String, Value>>,
}

fn course_not_found(raw: &str) -> String {
    format!("can't find course by id {} ", raw)
}

/// Lists courses with their teacher's name.
///
/// # Endpoint
/// `GET /courses?page=..&limit=..`
///
/// # Response
/// - **200 OK**: `{ "data": { "total": 6, "courses": [{ "id": "1", "teacher": "Ivy Marsh", ... }] }, ... }`
///
/// # Notes
/// Without a positive `page` and `limit` every course is returned.
pub fn list_courses(req: &MockRequest, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let all = state
        .db
        .all("course")
        .map_err(map_db_error_to_router_error)?;
    let total = all.len();
    let window = match Pagination::from_query(&req.query) {
        Some(p) => &all[p.range(total)],
        None => &all[..],
    };

    let mut courses = Vec::with_capacity(window.len());
    for course in window {
        let teacher = state
            .db
            .belongs_to("course", course, "teacher")
            .map_err(map_db_error_to_router_error)?;
        let mut item = course.to_json();
        item.insert("teacher".to_string(), name_of(teacher.as_ref()));
        courses.push(item);
    }

    json_response(200, &success_response(CourseList { total, courses }))
}

/// Returns one course with teacher, sales, type and progress joined in.
///
/// # Endpoint
/// `GET /course?id=..`
///
/// # Response
/// - **200 OK**: course plus `teacher` (name), `sales` (record),
///   `typeName` and `process` (record)
/// - **400 Bad Request**: `can't find course by id <id> `
pub fn course_detail(req: &MockRequest, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let id = id_param(req, "id", course_not_found)?;
    let course = state
        .db
        .find("course", id)
        .map_err(map_db_error_to_router_error)?
        .ok_or_else(|| RouterError::BadRequest(course_not_found(&id.to_string())))?;

    let join = |association: &str| {
        state
            .db
            .belongs_to("course", &course, association)
            .map_err(map_db_error_to_router_error)
    };
    let teacher = join("teacher")?;
    let sales = join("sales")?;
    let kind = join("type")?;
    let process = join("process")?;

    let mut data = course.to_json();
    data.insert("teacher".to_string(), name_of(teacher.as_ref()));
    data.insert("sales".to_string(), record_value(sales));
    data.insert("typeName".to_string(), name_of(kind.as_ref()));
    data.insert("process".to_string(), record_value(process));
    json_response(200, &success_response(data))
}

fn record_value(record: Option<mock_db_core::Record>) -> Value {
    record
        .map(|r| Value::Object(r.to_json()))
        .unwrap_or(Value::Null)
}
