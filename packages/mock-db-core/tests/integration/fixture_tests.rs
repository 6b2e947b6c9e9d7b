//! Fixture seeding tests.

use std::fs;

use anyhow::Result;
use tempfile::tempdir;

use mock_db_core::error::DbError;
use mock_db_core::fixtures::{seed, FixtureSource};
use mock_db_core::Database;

use super::helpers::{library_schema, AUTHORS, BOOKS, GENRES, LIBRARY_PLAN};

#[test]
fn test_seed_from_directory() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("genre.json"), GENRES)?;
    fs::write(dir.path().join("book.json"), BOOKS)?;
    fs::write(dir.path().join("author.json"), AUTHORS)?;

    let db = Database::new(library_schema());
    let total = seed(&db, LIBRARY_PLAN, FixtureSource::Directory(dir.path()))?;

    assert_eq!(total, 7);
    assert_eq!(db.record_count("books")?, 3);
    assert!(db.dangling_references()?.is_empty());
    Ok(())
}

#[test]
fn test_seed_from_embedded() -> Result<()> {
    let files = [
        ("genre.json", GENRES),
        ("book.json", BOOKS),
        ("author.json", AUTHORS),
    ];
    let db = Database::new(library_schema());
    seed(&db, LIBRARY_PLAN, FixtureSource::Embedded(&files))?;

    let melville = db.find("author", 2)?.expect("author 2 seeded");
    let books = db.has_many("author", &melville, "books")?;
    assert_eq!(
        books.iter().filter_map(|b| b.get_str("title")).collect::<Vec<_>>(),
        vec!["Moby-Dick", "Typee"]
    );
    Ok(())
}

#[test]
fn test_missing_fixture_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("genre.json"), GENRES).unwrap();

    let db = Database::new(library_schema());
    let err = seed(&db, LIBRARY_PLAN, FixtureSource::Directory(dir.path())).unwrap_err();
    match err {
        DbError::FixtureIo { path, .. } => assert!(path.ends_with("book.json")),
        other => panic!("unexpected error: {}", other),
    }
    // models seeded before the failure stay loaded
    assert_eq!(db.record_count("genre").unwrap(), 2);
}

#[test]
fn test_duplicate_fixture_ids_rejected() {
    let files = [
        ("genre.json", r#"[{"id": 1}, {"id": "1"}]"#),
        ("book.json", "[]"),
        ("author.json", "[]"),
    ];
    let db = Database::new(library_schema());
    let err = seed(&db, LIBRARY_PLAN, FixtureSource::Embedded(&files)).unwrap_err();
    assert!(matches!(err, DbError::DuplicateId { id: 1, .. }));
}
