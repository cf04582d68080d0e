//! Seed the shared default word set from a semicolon-delimited CSV file.
//!
//! Rows are `english;type;phonetic;vietnamese`. Blank rows, rows with fewer
//! than four fields, and rows missing the English or Vietnamese term are
//! skipped. Reruns refresh the existing default set instead of duplicating
//! it.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use tokio::runtime::Builder;

use backend::domain::NewWord;
use backend::domain::WordSetId;
use backend::domain::ports::{WordRepository, WordSetRepository};
use backend::outbound::persistence::{
    DbPool, DieselWordRepository, DieselWordSetRepository, PoolConfig,
};

/// `seed-default-words` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seed-default-words",
    about = "Load the shared default vocabulary set from a semicolon-delimited CSV file",
    version
)]
struct CliArgs {
    /// Path to the CSV file of default words.
    #[arg(value_name = "csv")]
    csv_path: PathBuf,
    /// Name for the default set.
    #[arg(long = "name", value_name = "name", default_value = "3000 từ vựng cơ bản")]
    set_name: String,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

/// Outcome counters reported after an import.
#[derive(Debug, Default, PartialEq, Eq)]
struct ImportReport {
    imported: u64,
    skipped: u64,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url)?;

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let sets = DieselWordSetRepository::new(pool.clone());
    let words = DieselWordRepository::new(pool);

    let default_set = sets
        .upsert_default_set(&args.set_name)
        .await
        .map_err(|error| io::Error::other(format!("upsert default set: {error}")))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_path(&args.csv_path)
        .map_err(|error| {
            io::Error::other(format!(
                "open CSV file '{}': {error}",
                args.csv_path.display()
            ))
        })?;

    let mut report = ImportReport::default();
    let mut batch = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|error| io::Error::other(format!("read CSV record: {error}")))?;
        match parse_row(&record, &default_set.id) {
            Some(word) => batch.push(word),
            None => report.skipped += 1,
        }
    }

    report.imported = words
        .replace_set_words(&default_set.id, &batch)
        .await
        .map_err(|error| io::Error::other(format!("replace default set words: {error}")))?;

    println!("set_id={}", default_set.id);
    println!("set_name={}", default_set.name);
    println!("imported={}", report.imported);
    println!("skipped={}", report.skipped);

    Ok(())
}

/// Parse one CSV row into a default-set word, or `None` when the row is
/// unusable.
fn parse_row(record: &csv::StringRecord, set_id: &WordSetId) -> Option<NewWord> {
    if record.len() < 4 {
        return None;
    }
    let english = record.get(0)?.trim();
    let type_tag = record.get(1)?.trim();
    let phonetic = record.get(2)?.trim();
    let vietnamese = record.get(3)?.trim();
    if english.is_empty() || vietnamese.is_empty() {
        return None;
    }

    Some(NewWord {
        english: english.to_owned(),
        phonetic: (!phonetic.is_empty()).then(|| phonetic.to_owned()),
        type_tag: (!type_tag.is_empty()).then(|| type_tag.to_owned()),
        vietnamese: vietnamese.to_owned(),
        word_set: *set_id,
        owner: None,
        remembered: false,
    })
}

fn resolve_database_url(explicit: Option<String>) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    let from_env = env::var("DATABASE_URL").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "database URL missing: set --database-url or DATABASE_URL",
        )
    })?;
    if from_env.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "DATABASE_URL must not be empty",
        ));
    }
    Ok(from_env)
}
