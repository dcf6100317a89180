// src/data/mod.rs - Reading and writing the linkage files
pub mod atomic;
pub mod candidate_file;
pub mod entities;
pub mod headers;
pub mod media_file;
pub mod report;

use log::warn;
use std::fs::File;
use std::path::Path;

use crate::error::{LinkageError, LinkageResult};
use crate::models::stats_models::InputStats;
use crate::utils::constants::SCORE_DECIMALS;

/// Records read from one file, with the number of rows skipped as malformed.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: T,
    pub loaded: usize,
    pub skipped: usize,
}

impl<T> Loaded<T> {
    pub fn input_stats(&self, path: &Path) -> InputStats {
        InputStats {
            path: path.display().to_string(),
            records_loaded: self.loaded,
            records_skipped: self.skipped,
        }
    }
}

/// What a writer put on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub rows: usize,
    pub sha256: String,
}

pub fn format_score(score: f64) -> String {
    format!("{:.*}", SCORE_DECIMALS, score)
}

pub(crate) fn open_csv(path: &Path) -> LinkageResult<csv::Reader<File>> {
    let file = File::open(path).map_err(|e| LinkageError::io(path, e))?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file))
}

/// Logs and counts a skippable error, hands back anything fatal.
pub(crate) fn skip_or_fail(err: LinkageError, skipped: &mut usize) -> LinkageResult<()> {
    if err.is_skippable() {
        warn!("Skipping row: {}", err);
        *skipped += 1;
        Ok(())
    } else {
        Err(err)
    }
}

pub(crate) fn record_line(record: &csv::StringRecord) -> u64 {
    record.position().map(|pos| pos.line()).unwrap_or_default()
}

/// Rows must carry exactly as many fields as the header.
pub(crate) fn check_width(record: &csv::StringRecord, expected: usize, path: &Path) -> LinkageResult<()> {
    if record.len() != expected {
        return Err(LinkageError::malformed(
            path,
            record_line(record),
            format!("expected {} fields, found {}", expected, record.len()),
        ));
    }
    Ok(())
}
