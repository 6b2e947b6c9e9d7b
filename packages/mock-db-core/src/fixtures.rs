//! Fixture loading and seeding.
//!
//! Fixtures are JSON arrays of objects, one file per model. A seed plan
//! fixes the order in which models are loaded so that records exist
//! before anything that refers to them is inspected.

use std::path::Path;

use serde_json::Value;

use crate::database::Database;
use crate::error::DbError;
use crate::record::Attrs;

/// One step of a seed plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedEntry {
    /// Model to seed
    pub model: &'static str,
    /// Fixture file name
    pub file: &'static str,
}

/// Where fixture content comes from.
#[derive(Debug, Clone, Copy)]
pub enum FixtureSource<'a> {
    /// Fixture content compiled into the binary, keyed by file name
    Embedded(&'a [(&'static str, &'static str)]),
    /// Directory containing one file per seed entry
    Directory(&'a Path),
}

/// Parses fixture text into attribute maps.
///
/// # Errors
/// `InvalidFixture` when the text is not a JSON array of objects.
pub fn parse_fixture(source_name: &str, text: &str) -> Result<Vec<Attrs>, DbError> {
    let invalid = |message: String| DbError::InvalidFixture {
        source_name: source_name.to_string(),
        message,
    };
    let value: Value = serde_json::from_str(text).map_err(|e| invalid(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(invalid("expected a JSON array".to_string()));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(attrs) => Ok(attrs),
            other => Err(invalid(format!(
                "entry {} is not an object: {}",
                index, other
            ))),
        })
        .collect()
}

/// Inserts every fixture entry into a model's collection.
///
/// # Returns
/// Number of records created.
pub fn seed_model(db: &Database, model: &str, source_name: &str, text: &str) -> Result<usize, DbError> {
    let entries = parse_fixture(source_name, text)?;
    let count = entries.len();
    for attrs in entries {
        db.create(model, attrs)?;
    }
    tracing::debug!(model, source = source_name, count, "seeded fixture");
    Ok(count)
}

/// Seeds a database following a plan.
///
/// # Returns
/// Total number of records created.
pub fn seed(db: &Database, plan: &[SeedEntry], source: FixtureSource<'_>) -> Result<usize, DbError> {
    let mut total = 0;
    for entry in plan {
        let text = read_fixture(entry.file, source)?;
        total += seed_model(db, entry.model, entry.file, &text)?;
    }
    tracing::info!(models = plan.len(), records = total, "fixtures loaded");
    Ok(total)
}

fn read_fixture(file: &str, source: FixtureSource<'_>) -> Result<String, DbError> {
    match source {
        FixtureSource::Embedded(files) => files
            .iter()
            .find(|(name, _)| *name == file)
            .map(|(_, text)| text.to_string())
            .ok_or_else(|| DbError::FixtureIo {
                path: file.to_string(),
                message: "no embedded fixture with this name".to_string(),
            }),
        FixtureSource::Directory(dir) => {
            let path = dir.join(file);
            std::fs::read_to_string(&path).map_err(|e| DbError::FixtureIo {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }
    }
}
