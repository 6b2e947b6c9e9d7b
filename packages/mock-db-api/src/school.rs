//! School domain schema, seed plan and embedded fixtures.

use mock_db_core::config::MockConfig;
use mock_db_core::error::DbError;
use mock_db_core::fixtures::{seed, FixtureSource, SeedEntry};
use mock_db_core::schema::{Association, Schema};
use mock_db_core::Database;

/// Models of the school admin backend.
pub fn school_schema() -> Schema {
    Schema::new()
        .model("user", "users", vec![])
        .model("studentType", "studentTypes", vec![])
        .model(
            "student",
            "students",
            vec![
                Association::has_many("studentCourses", "studentCourse"),
                Association::belongs_to("type", "studentType"),
            ],
        )
        .model("courseType", "courseTypes", vec![])
        .model(
            "course",
            "courses",
            vec![
                Association::belongs_to("type", "courseType"),
                Association::belongs_to("teacher", "teacher"),
                Association::belongs_to("sales", "sales"),
                Association::belongs_to("process", "process"),
            ],
        )
        .model(
            "studentCourse",
            "studentCourses",
            vec![Association::belongs_to("course", "course")],
        )
        .model(
            "studentProfile",
            "studentProfiles",
            vec![
                Association::has_many("studentCourses", "studentCourse"),
                Association::belongs_to("type", "studentType"),
            ],
        )
        .model("teacher", "teachers", vec![])
        .model("sales", "sales", vec![])
        .model("process", "processes", vec![])
}

/// Load order of the fixture files.
pub const SEED_PLAN: &[SeedEntry] = &[
    SeedEntry { model: "user", file: "user.json" },
    SeedEntry { model: "teacher", file: "teacher.json" },
    SeedEntry { model: "courseType", file: "course_type.json" },
    SeedEntry { model: "sales", file: "sales.json" },
    SeedEntry { model: "process", file: "process.json" },
    SeedEntry { model: "course", file: "course.json" },
    SeedEntry { model: "studentCourse", file: "student_course.json" },
    SeedEntry { model: "studentType", file: "student_type.json" },
    SeedEntry { model: "student", file: "student.json" },
    SeedEntry { model: "studentProfile", file: "student-profile.json" },
];

/// Fixture files compiled into the crate.
pub const EMBEDDED_FIXTURES: &[(&str, &str)] = &[
    ("user.json", include_str!("../fixtures/user.json")),
    ("teacher.json", include_str!("../fixtures/teacher.json")),
    ("course_type.json", include_str!("../fixtures/course_type.json")),
    ("sales.json", include_str!("../fixtures/sales.json")),
    ("process.json", include_str!("../fixtures/process.json")),
    ("course.json", include_str!("../fixtures/course.json")),
    ("student_course.json", include_str!("../fixtures/student_course.json")),
    ("student_type.json", include_str!("../fixtures/student_type.json")),
    ("student.json", include_str!("../fixtures/student.json")),
    ("student-profile.json", include_str!("../fixtures/student-profile.json")),
];

/// Seeds a database from the configured fixture source.
pub fn seed_school(db: &Database, config: &MockConfig) -> Result<usize, DbError> {
    let source = match &config.fixtures_dir {
        Some(dir) => FixtureSource::Directory(dir),
        None => FixtureSource::Embedded(EMBEDDED_FIXTURES),
    };
    seed(db, SEED_PLAN, source)
}

/// Builds the school database, seeded when the environment asks for it.
pub fn build_database(config: &MockConfig) -> Result<Database, DbError> {
    let db = Database::new(school_schema());
    if config.environment.seeds_on_start() {
        seed_school(&db, config)?;
    } else {
        tracing::info!("test environment: starting with an empty store");
    }
    Ok(db)
}
