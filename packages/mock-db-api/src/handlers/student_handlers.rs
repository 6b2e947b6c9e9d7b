//! Student listing, CRUD and profile handlers.

use hyper::{body::Bytes, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::router::{AppState, RouterError};
use mock_db_core::error::DbError;
use mock_db_core::record::{Attrs, RecordId};
use mock_db_core::Record;

use super::request_utils::{
    id_param, id_value, map_db_error_to_router_error, timestamp, MockRequest, Pagination,
};
use super::response::{json_response, success_response};

/// Body of `/students/add` and `/students/update`.
#[derive(Debug, Deserialize)]
pub struct StudentPayload {
    /// Student id, required by update only
    pub id: Option<Value>,
    /// Full name
    pub name: Option<Value>,
    /// Contact email
    pub email: Option<Value>,
    /// Region
    pub area: Option<Value>,
    /// Student type id
    #[serde(rename = "type")]
    pub kind: Option<Value>,
}

/// Course reference attached to listed students.
#[derive(Debug, Serialize)]
pub struct CourseRef {
    /// Course name, null when the course is gone
    pub name: Option<String>,
    /// Enrollment (student course) id
    pub id: RecordId,
}

/// Page metadata returned with paginated listings.
#[derive(Debug, Serialize)]
pub struct Paginator {
    pub limit: usize,
    pub page: usize,
    pub total: usize,
}

/// Payload of `/students`.
#[derive(Debug, Serialize)]
pub struct StudentList {
    /// Number of students matching the filter
    pub total: usize,
    pub students: Vec<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paginator: Option<Paginator>,
}

fn student_not_found(raw: &str) -> String {
    format!("can't find student by id {} ", raw)
}

fn student_type_not_found(raw: &str) -> String {
    format!("can't find student type by id {} ", raw)
}

/// Lists students, optionally filtered and paginated.
///
/// # Endpoint
/// `GET /students?query=..&limit=..&page=..`
///
/// # Response
/// - **200 OK**:
/// ```json
/// {
///   "data": {
///     "total": 3,
///     "students": [{ "id": "1", "name": "Li Wei", "courses": [{ "name": "...", "id": 1 }], "typeName": "tester" }],
///     "paginator": { "limit": 10, "page": 1, "total": 3 }
///   },
///   "msg": "success",
///   "code": 200
/// }
/// ```
///
/// # Notes
/// - `query` keeps students whose name contains it (case-sensitive)
/// - `paginator` is present only when `limit` and `page` are positive integers
pub fn list_students(req: &MockRequest, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let query = req.param("query").filter(|q| !q.is_empty());
    let matching: Vec<Record> = state
        .db
        .all("student")
        .map_err(map_db_error_to_router_error)?
        .into_iter()
        .filter(|student| match query {
            Some(q) => student.get_str("name").is_some_and(|name| name.contains(q)),
            None => true,
        })
        .collect();
    let total = matching.len();

    let pagination = Pagination::from_query(&req.query);
    let window = match pagination {
        Some(p) => &matching[p.range(total)],
        None => &matching[..],
    };

    let students = window
        .iter()
        .map(|student| student_summary(state, student))
        .collect::<Result<Vec<_>, _>>()?;

    let data = StudentList {
        total,
        students,
        paginator: pagination.map(|p| Paginator {
            limit: p.limit,
            page: p.page,
            total,
        }),
    };
    json_response(200, &success_response(data))
}

/// Creates a student.
///
/// # Endpoint
/// `POST /students/add`
///
/// # Request Body
/// ```json
/// { "name": "Ann", "email": "ann@mail.com", "area": "China", "type": 1 }
/// ```
///
/// # Errors
/// - **400 Bad Request**: malformed body or unknown student type
pub fn add_student(req: &MockRequest, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let payload: StudentPayload = req.json()?;
    let kind = resolve_student_type(state, payload.kind.as_ref())?;

    let mut attrs = text_attrs(&payload);
    attrs.insert("typeId".to_string(), Value::from(kind.id));
    attrs.insert("ctime".to_string(), Value::from(timestamp()));
    attrs.insert("studentCourseIds".to_string(), Value::Array(Vec::new()));

    let student = state
        .db
        .create("student", attrs)
        .map_err(map_db_error_to_router_error)?;
    tracing::info!(id = student.id, "student added");

    let mut data = student.to_json();
    data.insert("typeName".to_string(), name_of(Some(&kind)));
    json_response(200, &success_response(data))
}

/// Updates a student.
///
/// # Endpoint
/// `POST /students/update`
///
/// # Request Body
/// ```json
/// { "id": 3, "name": "Ann", "email": "ann@mail.com", "area": "China", "type": 2 }
/// ```
///
/// # Errors
/// - **400 Bad Request**: `can't find student by id <id> ` or unknown student type
///
/// # Notes
/// Only fields present in the body change; `updateAt` is always refreshed.
pub fn update_student(req: &MockRequest, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let payload: StudentPayload = req.json()?;
    let id = id_value(payload.id.as_ref(), student_not_found)?;
    if state
        .db
        .find("student", id)
        .map_err(map_db_error_to_router_error)?
        .is_none()
    {
        return Err(RouterError::BadRequest(student_not_found(&id.to_string())));
    }

    let mut attrs = text_attrs(&payload);
    if payload.kind.is_some() {
        let kind = resolve_student_type(state, payload.kind.as_ref())?;
        attrs.insert("typeId".to_string(), Value::from(kind.id));
    }
    attrs.insert("updateAt".to_string(), Value::from(timestamp()));

    let student = state
        .db
        .update("student", id, attrs)
        .map_err(map_db_error_to_router_error)?;
    tracing::info!(id, "student updated");

    let kind = state
        .db
        .belongs_to("student", &student, "type")
        .map_err(map_db_error_to_router_error)?;
    let mut data = student.to_json();
    data.insert("typeName".to_string(), name_of(kind.as_ref()));
    json_response(200, &success_response(data))
}

/// Deletes a student.
///
/// # Endpoint
/// `DELETE /students/delete?id=..`
///
/// # Response
/// - **200 OK**: `{ "data": true, "msg": "success", "code": 200 }`
/// - **400 Bad Request**: `can't find student by id <id> `
pub fn delete_student(req: &MockRequest, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let id = id_param(req, "id", student_not_found)?;
    match state.db.destroy("student", id) {
        Ok(_) => {
            tracing::info!(id, "student deleted");
            json_response(200, &success_response(true))
        }
        Err(DbError::RecordNotFound { .. }) => {
            Err(RouterError::BadRequest(student_not_found(&id.to_string())))
        }
        Err(e) => Err(map_db_error_to_router_error(e)),
    }
}

/// Returns a student profile with enrolled courses.
///
/// # Endpoint
/// `GET /student?id=..`
///
/// # Response
/// - **200 OK**: profile plus `courses` (each enrollment with the course
///   `name` and course `type` name) and `typeName`
/// - **400 Bad Request**: `can't find student by id <id> `
pub fn student_profile(req: &MockRequest, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let id = id_param(req, "id", student_not_found)?;
    let profile = state
        .db
        .find("studentProfile", id)
        .map_err(map_db_error_to_router_error)?
        .ok_or_else(|| RouterError::BadRequest(student_not_found(&id.to_string())))?;

    let enrollments = state
        .db
        .has_many("studentProfile", &profile, "studentCourses")
        .map_err(map_db_error_to_router_error)?;

    let mut courses = Vec::with_capacity(enrollments.len());
    for enrollment in &enrollments {
        let course = state
            .db
            .belongs_to("studentCourse", enrollment, "course")
            .map_err(map_db_error_to_router_error)?;
        let course_type = match &course {
            Some(course) => state
                .db
                .belongs_to("course", course, "type")
                .map_err(map_db_error_to_router_error)?,
            None => None,
        };
        let mut item = enrollment.to_json();
        item.insert("name".to_string(), name_of(course.as_ref()));
        item.insert("type".to_string(), name_of(course_type.as_ref()));
        courses.push(Value::Object(item));
    }

    let kind = state
        .db
        .belongs_to("studentProfile", &profile, "type")
        .map_err(map_db_error_to_router_error)?;
    let mut data = profile.to_json();
    data.insert("courses".to_string(), Value::Array(courses));
    data.insert("typeName".to_string(), name_of(kind.as_ref()));
    json_response(200, &success_response(data))
}

/// Student with `courses` and `typeName` attached.
fn student_summary(state: &AppState, student: &Record) -> Result<Map<String, Value>, RouterError> {
    let enrollments = state
        .db
        .has_many("student", student, "studentCourses")
        .map_err(map_db_error_to_router_error)?;

    let mut courses = Vec::with_capacity(enrollments.len());
    for enrollment in enrollments {
        let course = state
            .db
            .belongs_to("studentCourse", &enrollment, "course")
            .map_err(map_db_error_to_router_error)?;
        courses.push(CourseRef {
            name: course.and_then(|c| c.get_str("name").map(str::to_string)),
            id: enrollment.id,
        });
    }

    let kind = state
        .db
        .belongs_to("student", student, "type")
        .map_err(map_db_error_to_router_error)?;

    let mut data = student.to_json();
    data.insert(
        "courses".to_string(),
        serde_json::to_value(courses)
            .map_err(|e| RouterError::InternalError(format!("Failed to serialize courses: {}", e)))?,
    );
    data.insert("typeName".to_string(), name_of(kind.as_ref()));
    Ok(data)
}

fn resolve_student_type(state: &AppState, kind: Option<&Value>) -> Result<Record, RouterError> {
    let id = id_value(kind, student_type_not_found)?;
    state
        .db
        .find("studentType", id)
        .map_err(map_db_error_to_router_error)?
        .ok_or_else(|| RouterError::BadRequest(student_type_not_found(&id.to_string())))
}

/// Text fields present in the body, stored as sent.
fn text_attrs(payload: &StudentPayload) -> Attrs {
    let mut attrs = Attrs::new();
    for (key, value) in [
        ("name", &payload.name),
        ("email", &payload.email),
        ("area", &payload.area),
    ] {
        if let Some(value) = value {
            attrs.insert(key.to_string(), value.clone());
        }
    }
    attrs
}

/// `name` attribute of an optional record, null when absent.
pub(crate) fn name_of(record: Option<&Record>) -> Value {
    record
        .and_then(|r| r.get("name"))
        .cloned()
        .unwrap_or(Value::Null)
}
