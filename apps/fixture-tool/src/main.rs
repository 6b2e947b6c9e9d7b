//! CLI tool for fixture validation and store inspection.
//!
//! Provides commands for:
//! - Validating that every fixture parses and every relation resolves
//! - Dumping the seeded store, whole or one collection at a time

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use mock_db_api::school::{school_schema, seed_school};
use mock_db_core::config::MockConfig;
use mock_db_core::Database;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load fixtures and report record counts and dangling references
    Validate {
        /// Directory with fixture files (embedded fixtures when omitted)
        #[arg(long)]
        fixtures_dir: Option<PathBuf>,
    },
    /// Print the seeded store as JSON
    Dump {
        /// Directory with fixture files (embedded fixtures when omitted)
        #[arg(long)]
        fixtures_dir: Option<PathBuf>,
        /// Only print this collection (e.g. `students`)
        #[arg(long)]
        collection: Option<String>,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Validate { fixtures_dir } => {
            let db = load(fixtures_dir.as_deref())?;
            let report = validate(&db)?;
            print!("{}", report.render());
            Ok(if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Dump {
            fixtures_dir,
            collection,
        } => {
            let db = load(fixtures_dir.as_deref())?;
            let value = dump(&db, collection.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Seeds a fresh store from the given directory or the embedded fixtures.
fn load(fixtures_dir: Option<&Path>) -> Result<Database> {
    let config = MockConfig {
        fixtures_dir: fixtures_dir.map(Path::to_path_buf),
        ..Default::default()
    };
    let db = Database::new(school_schema());
    seed_school(&db, &config).context("Failed to seed fixtures")?;
    Ok(db)
}

/// Outcome of a validation run.
#[derive(Debug)]
struct Report {
    counts: Vec<(String, usize)>,
    dangling: Vec<String>,
}

impl Report {
    fn is_clean(&self) -> bool {
        self.dangling.is_empty()
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for (collection, count) in &self.counts {
            out.push_str(&format!("{:<16} {:>5}\n", collection, count));
        }
        if self.is_clean() {
            out.push_str("all references resolve\n");
        } else {
            out.push_str(&format!("{} dangling reference(s):\n", self.dangling.len()));
            for line in &self.dangling {
                out.push_str(&format!("  {}\n", line));
            }
        }
        out
    }
}

fn validate(db: &Database) -> Result<Report> {
    let mut counts = Vec::new();
    for model in db.schema().models() {
        counts.push((model.collection.clone(), db.record_count(&model.name)?));
    }
    let dangling = db
        .dangling_references()?
        .into_iter()
        .map(|d| d.to_string())
        .collect();
    Ok(Report { counts, dangling })
}

fn dump(db: &Database, collection: Option<&str>) -> Result<Value> {
    let mut all = db.dump()?;
    let Some(name) = collection else {
        return Ok(all);
    };
    let collection = db.schema().get(name)?.collection.clone();
    match all.get_mut(&collection) {
        Some(records) => Ok(records.take()),
        None => bail!("collection '{}' not found", name),
    }
}
