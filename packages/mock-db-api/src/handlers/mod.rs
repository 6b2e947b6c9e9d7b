//! HTTP endpoint implementations for authentication, students and courses.

pub mod auth_handlers;
pub mod course_handlers;
pub mod request_utils;
pub mod response;
pub mod student_handlers;

pub use auth_handlers::{login, logout, user_type};
pub use course_handlers::{course_detail, list_courses};
pub use request_utils::{parse_query_params, MockRequest, QueryParams};
pub use response::{error_response, success_response, Envelope};
pub use student_handlers::{
    add_student, delete_student, list_students, student_profile, update_student,
};
