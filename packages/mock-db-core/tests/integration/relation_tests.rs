//! Relation lifecycle tests: create, resolve, destroy, detect dangling keys.

use serde_json::{json, Value};

use mock_db_core::fixtures::{seed, FixtureSource};
use mock_db_core::Database;

use super::helpers::{attrs, library_schema, AUTHORS, BOOKS, GENRES, LIBRARY_PLAN};

fn seeded() -> Database {
    let files = [
        ("genre.json", GENRES),
        ("book.json", BOOKS),
        ("author.json", AUTHORS),
    ];
    let db = Database::new(library_schema());
    seed(&db, LIBRARY_PLAN, FixtureSource::Embedded(&files)).unwrap();
    db
}

#[test]
fn test_created_records_continue_fixture_ids() {
    let db = seeded();
    let book = db
        .create("book", attrs(json!({"title": "Omoo", "genreId": 2})))
        .unwrap();
    assert_eq!(book.id, 4);

    let genre = db.belongs_to("book", &book, "genre").unwrap().unwrap();
    assert_eq!(genre.get_str("name"), Some("Novel"));
}

#[test]
fn test_update_repoints_belongs_to() {
    let db = seeded();
    let walden = db
        .update("books", 1, attrs(json!({"genreId": "2"})))
        .unwrap();
    let genre = db.belongs_to("book", &walden, "genre").unwrap().unwrap();
    assert_eq!(genre.id, 2);
}

#[test]
fn test_destroy_cascades_to_owners() {
    let db = seeded();
    db.destroy("book", 2).unwrap();

    let melville = db.find("author", 2).unwrap().unwrap();
    assert_eq!(melville.get("bookIds"), Some(&json!([3])));

    db.destroy("genre", 2).unwrap();
    let typee = db.find("book", 3).unwrap().unwrap();
    assert_eq!(typee.get("genreId"), Some(&Value::Null));
    assert!(db.dangling_references().unwrap().is_empty());
}

#[test]
fn test_where_matches_mixed_id_forms() {
    let db = seeded();
    let novels = db
        .where_eq("book", &attrs(json!({"genreId": 2})))
        .unwrap();
    assert_eq!(novels.len(), 2);

    let found = db
        .find_by("book", &attrs(json!({"id": "3"})))
        .unwrap()
        .unwrap();
    assert_eq!(found.get_str("title"), Some("Typee"));
}

#[test]
fn test_dangling_reference_report() {
    let db = seeded();
    db.create("author", attrs(json!({"name": "Ghost", "bookIds": [1, 42]})))
        .unwrap();
    let dangling = db.dangling_references().unwrap();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].to_string(), "author#3.books -> book#42 (missing)");
}
