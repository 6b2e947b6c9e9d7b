//! Shared test helpers.

use mock_db_core::fixtures::SeedEntry;
use mock_db_core::record::Attrs;
use mock_db_core::schema::{Association, Schema};
use serde_json::Value;

/// Small library schema: authors own books, books belong to a genre.
pub fn library_schema() -> Schema {
    Schema::new()
        .model("genre", "genres", vec![])
        .model(
            "book",
            "books",
            vec![Association::belongs_to("genre", "genre")],
        )
        .model(
            "author",
            "authors",
            vec![Association::has_many("books", "book")],
        )
}

pub const LIBRARY_PLAN: &[SeedEntry] = &[
    SeedEntry {
        model: "genre",
        file: "genre.json",
    },
    SeedEntry {
        model: "book",
        file: "book.json",
    },
    SeedEntry {
        model: "author",
        file: "author.json",
    },
];

pub const GENRES: &str = r#"[{"id": 1, "name": "Essay"}, {"id": 2, "name": "Novel"}]"#;
pub const BOOKS: &str = r#"[
    {"id": 1, "title": "Walden", "genreId": 1},
    {"id": 2, "title": "Moby-Dick", "genreId": "2"},
    {"id": 3, "title": "Typee", "genreId": 2}
]"#;
pub const AUTHORS: &str = r#"[
    {"id": 1, "name": "Thoreau", "bookIds": [1]},
    {"id": 2, "name": "Melville", "bookIds": ["2", 3]}
]"#;

pub fn attrs(value: Value) -> Attrs {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}
