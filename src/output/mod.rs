//! CSV persistence for the batch run.
//!
//! Every record type declares its columns as an explicit `id -> title` table
//! ([`CsvRecord::COLUMNS`]). The titles form the header row, which is written
//! even when there are no records.

mod rows;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

pub use rows::{LegacyReleaseRow, WeekdayReleaseRow};

pub const DETAILS_FILE: &str = "enhanced_release_details.csv";
pub const LEGACY_DETAILS_FILE: &str = "release_details.csv";
pub const WEEKDAY_DETAILS_FILE: &str = "weekday_release_details.csv";
pub const STATISTICS_FILE: &str = "release_statistics.csv";

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// A CSV column: serde field id and display title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub id: &'static str,
    pub title: &'static str,
}

impl Column {
    pub const fn new(id: &'static str, title: &'static str) -> Self {
        Self { id, title }
    }
}

/// A record that can be written as one CSV row.
///
/// The serialized field order must match `COLUMNS`.
pub trait CsvRecord: Serialize {
    const COLUMNS: &'static [Column];

    fn header() -> Vec<&'static str> {
        Self::COLUMNS.iter().map(|c| c.title).collect()
    }
}

/// Write `records` to `dir/file_name`, creating `dir` if needed and replacing
/// any existing file. Returns the path written.
#[tracing::instrument(skip(runtime, records))]
pub fn write_records<R: Runtime, T: CsvRecord>(
    runtime: &R,
    dir: &Path,
    file_name: &str,
    records: &[T],
) -> Result<PathBuf> {
    if !runtime.exists(dir) {
        runtime.create_dir_all(dir)?;
    }

    let path = dir.join(file_name);
    let file = runtime.create_file(&path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer
        .write_record(T::header())
        .with_context(|| format!("Failed to write header to {}", path.display()))?;

    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("Failed to write record to {}", path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    info!("{} saved to {} ({} rows)", file_name, path.display(), records.len());

    Ok(path)
}
