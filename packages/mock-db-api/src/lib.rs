//! Mock REST API for the school admin frontend.
//!
//! Provides the school model schema with its embedded fixtures, HTTP
//! endpoints for login, students and courses, and request routing.

pub mod handlers;
pub mod router;
pub mod school;
pub mod server;
