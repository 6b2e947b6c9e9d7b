//! In-memory model store for the mock API.
//!
//! Provides model schemas with belongsTo/hasMany associations,
//! ordered record collections, a shared database container,
//! fixture seeding, and server configuration.

pub mod collection;
pub mod config;
pub mod database;
pub mod error;
pub mod fixtures;
pub mod record;
pub mod schema;

pub use database::Database;
pub use record::{Record, RecordId};
