//! Integration test suite for the model store.
//!
//! Tests are organized by area:
//! 1. Fixture seeding from directories and embedded sources
//! 2. Relation lifecycle across collections

pub mod fixture_tests;
pub mod helpers;
pub mod relation_tests;
