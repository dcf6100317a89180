// src/data/report.rs - Stage 2 match report
use std::path::Path;

use crate::data::atomic::{sha256_hex, write_atomic};
use crate::data::{format_score, WriteOutcome};
use crate::error::{LinkageError, LinkageResult};
use crate::models::matching::LinkDecision;

pub const REPORT_HEADER: [&str; 11] = [
    "label",
    "sourceID",
    "sourceName",
    "targetID",
    "targetName",
    "totalScore",
    "nameScore",
    "overlapScore",
    "sourceMediaCount",
    "targetMediaCount",
    "matchedMediaCount",
];

/// Reported decisions, highest total first, ties by name score. The sort
/// is stable so equal rows keep adjudication order.
pub fn report_order(decisions: &[LinkDecision]) -> Vec<&LinkDecision> {
    let mut rows: Vec<&LinkDecision> = decisions.iter().filter(|d| d.label.is_reported()).collect();
    rows.sort_by(|a, b| {
        b.total_score
            .total_cmp(&a.total_score)
            .then_with(|| b.name_score.total_cmp(&a.name_score))
    });
    rows
}

pub fn render_report(decisions: &[LinkDecision]) -> LinkageResult<(Vec<u8>, usize)> {
    let buffer_path = Path::new("<report buffer>");
    let rows = report_order(decisions);

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(REPORT_HEADER)
        .map_err(|e| LinkageError::from_csv(buffer_path, e))?;
    for d in &rows {
        writer
            .write_record([
                d.label.as_str().to_string(),
                d.source_id.clone(),
                d.source_name.clone(),
                d.target_id.clone(),
                d.target_name.clone(),
                format_score(d.total_score),
                format_score(d.name_score),
                format_score(d.overlap_score),
                d.source_media_count.to_string(),
                d.target_media_count.to_string(),
                d.matched_media_count.to_string(),
            ])
            .map_err(|e| LinkageError::from_csv(buffer_path, e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LinkageError::io(buffer_path, e.into_error()))?;
    Ok((bytes, rows.len()))
}

/// Writes the report atomically. NOPE decisions are left out.
pub fn write_report(path: &Path, decisions: &[LinkDecision]) -> LinkageResult<WriteOutcome> {
    let (bytes, rows) = render_report(decisions)?;
    write_atomic(path, &bytes)?;
    Ok(WriteOutcome {
        rows,
        sha256: sha256_hex(&bytes),
    })
}
