// src/data/candidate_file.rs - Stage 1 output, stage 2 input
use csv::StringRecord;
use log::info;
use std::path::Path;

use crate::data::atomic::{sha256_hex, write_atomic};
use crate::data::headers::{find_named, require_column, Column};
use crate::data::{check_width, format_score, open_csv, record_line, skip_or_fail, Loaded, WriteOutcome};
use crate::error::{LinkageError, LinkageResult};
use crate::models::matching::{Candidate, CandidateList};

pub const SOURCE_ID: Column = Column::new("sourceID", &["tmdbID"]);
pub const SOURCE_NAME: Column = Column::new("sourceName", &["tmdbName"]);

fn result_columns(rank: usize) -> [String; 3] {
    [
        format!("result{}Score", rank),
        format!("result{}ID", rank),
        format!("result{}Name", rank),
    ]
}

pub fn header(width: usize) -> Vec<String> {
    let mut header = vec![SOURCE_ID.name.to_string(), SOURCE_NAME.name.to_string()];
    for rank in 1..=width {
        header.extend(result_columns(rank));
    }
    header
}

/// Orders lists by best score, highest first. Stable, so equal scores keep
/// the order the matcher produced them in.
pub fn sort_by_best_score(lists: &[CandidateList]) -> Vec<&CandidateList> {
    let mut ordered: Vec<&CandidateList> = lists.iter().collect();
    ordered.sort_by(|a, b| b.best_score().total_cmp(&a.best_score()));
    ordered
}

/// Serializes candidate lists, padding short lists with empty triples up to
/// `max_results` columns.
pub fn render_candidate_file(lists: &[CandidateList], max_results: usize) -> LinkageResult<Vec<u8>> {
    let width = lists
        .iter()
        .map(|list| list.candidates.len())
        .max()
        .unwrap_or(0)
        .max(max_results);
    let buffer_path = Path::new("<candidate buffer>");

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(header(width))
        .map_err(|e| LinkageError::from_csv(buffer_path, e))?;

    for list in sort_by_best_score(lists) {
        let mut row = vec![list.source_id.clone(), list.source_name.clone()];
        for rank in 0..width {
            match list.candidates.get(rank) {
                Some(candidate) => {
                    row.push(format_score(candidate.score));
                    row.push(candidate.target_id.clone());
                    row.push(candidate.target_name.clone());
                }
                None => row.extend([String::new(), String::new(), String::new()]),
            }
        }
        writer
            .write_record(&row)
            .map_err(|e| LinkageError::from_csv(buffer_path, e))?;
    }

    writer
        .into_inner()
        .map_err(|e| LinkageError::io(buffer_path, e.into_error()))
}

pub fn write_candidate_file(
    path: &Path,
    lists: &[CandidateList],
    max_results: usize,
) -> LinkageResult<WriteOutcome> {
    let bytes = render_candidate_file(lists, max_results)?;
    write_atomic(path, &bytes)?;
    Ok(WriteOutcome {
        rows: lists.len(),
        sha256: sha256_hex(&bytes),
    })
}

struct ResultColumns {
    score: usize,
    id: usize,
    name: usize,
}

fn parse_row(
    record: &StringRecord,
    width: usize,
    source_id_col: usize,
    source_name_col: usize,
    results: &[ResultColumns],
    path: &Path,
) -> LinkageResult<CandidateList> {
    check_width(record, width, path)?;
    let line = record_line(record);
    let source_id = record.get(source_id_col).unwrap_or("").trim();
    if source_id.is_empty() {
        return Err(LinkageError::malformed(path, line, "empty sourceID"));
    }

    let mut candidates = Vec::with_capacity(results.len());
    for (rank, cols) in results.iter().enumerate() {
        let raw_score = record.get(cols.score).unwrap_or("").trim();
        // empty trailing triples mean a shorter list
        if raw_score.is_empty() {
            break;
        }
        let score: f64 = raw_score.parse().map_err(|_| {
            LinkageError::malformed(path, line, format!("result{}Score '{}' is not a number", rank + 1, raw_score))
        })?;
        if !(0.0..=1.0).contains(&score) {
            return Err(LinkageError::malformed(
                path,
                line,
                format!("result{}Score {} outside [0, 1]", rank + 1, score),
            ));
        }
        let target_id = record.get(cols.id).unwrap_or("").trim();
        if target_id.is_empty() {
            return Err(LinkageError::malformed(path, line, format!("empty result{}ID", rank + 1)));
        }
        candidates.push(Candidate {
            score,
            target_id: target_id.to_string(),
            target_name: record.get(cols.name).unwrap_or("").to_string(),
        });
    }

    Ok(CandidateList {
        source_id: source_id.to_string(),
        source_name: record.get(source_name_col).unwrap_or("").to_string(),
        candidates,
    })
}

pub fn read_candidate_file(path: &Path) -> LinkageResult<Loaded<Vec<CandidateList>>> {
    let mut reader = open_csv(path)?;
    let headers = reader
        .headers()
        .map_err(|e| LinkageError::from_csv(path, e))?
        .clone();

    let source_id_col = require_column(&headers, &SOURCE_ID, path)?;
    let source_name_col = require_column(&headers, &SOURCE_NAME, path)?;

    let mut results = Vec::new();
    for rank in 1.. {
        let [score, id, name] = result_columns(rank);
        let Some(score_col) = find_named(&headers, &score) else {
            break;
        };
        let id_col = find_named(&headers, &id).ok_or_else(|| LinkageError::missing_column(path, id))?;
        let name_col = find_named(&headers, &name).ok_or_else(|| LinkageError::missing_column(path, name))?;
        results.push(ResultColumns {
            score: score_col,
            id: id_col,
            name: name_col,
        });
    }
    if results.is_empty() {
        return Err(LinkageError::missing_column(path, "result1Score"));
    }

    let mut lists = Vec::new();
    let mut skipped = 0;
    for result in reader.records() {
        let parsed = result
            .map_err(|e| LinkageError::from_csv(path, e))
            .and_then(|record| parse_row(&record, headers.len(), source_id_col, source_name_col, &results, path));
        match parsed {
            Ok(list) => lists.push(list),
            Err(err) => skip_or_fail(err, &mut skipped)?,
        }
    }

    info!(
        "Loaded {} candidate lists ({} result columns) from {}",
        lists.len(),
        results.len(),
        path.display()
    );
    Ok(Loaded {
        loaded: lists.len(),
        records: lists,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn candidate(score: f64, id: &str, name: &str) -> Candidate {
        Candidate {
            score,
            target_id: id.to_string(),
            target_name: name.to_string(),
        }
    }

    fn lists() -> Vec<CandidateList> {
        vec![
            CandidateList {
                source_id: "7".to_string(),
                source_name: "Toho".to_string(),
                candidates: vec![candidate(0.8, "Q9", "Toho Co"), candidate(0.6667, "Q10", "Toei")],
            },
            CandidateList {
                source_id: "1".to_string(),
                source_name: "Universal Pictures".to_string(),
                candidates: vec![candidate(1.0, "Q1", "Universal Pictures")],
            },
        ]
    }

    #[test]
    fn test_header_and_padding() {
        let text = String::from_utf8(render_candidate_file(&lists(), 3).unwrap()).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(
            rows[0],
            "sourceID,sourceName,result1Score,result1ID,result1Name,result2Score,result2ID,result2Name,result3Score,result3ID,result3Name"
        );
        // best score first
        assert_eq!(rows[1], "1,Universal Pictures,1.0000,Q1,Universal Pictures,,,,,,");
        assert_eq!(rows[2], "7,Toho,0.8000,Q9,Toho Co,0.6667,Q10,Toei,,,");
    }

    #[test]
    fn test_write_then_read_reproduces_lists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("candidates.csv");
        let outcome = write_candidate_file(&path, &lists(), 5).unwrap();
        assert_eq!(outcome.rows, 2);
        assert_eq!(outcome.sha256, sha256_hex(&fs::read(&path).unwrap()));

        let loaded = read_candidate_file(&path).unwrap();
        assert_eq!(loaded.skipped, 0);
        let mut expected = lists();
        expected.reverse();
        assert_eq!(loaded.records, expected);
    }

    #[test]
    fn test_legacy_headers_and_bad_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("legacy.csv");
        fs::write(
            &path,
            "tmdbID,tmdbName,result1Score,result1ID,result1Name,result2Score,result2ID,result2Name\n\
             1,Universal Pictures,1.0000,Q1,Universal Pictures,,,\n\
             2,Broken,high,Q2,Nope,,,\n\
             3,Short row\n\
             5\n\
             ,No id,0.9,Q3,Three,,,\n\
             6,Too wide,0.9,Q6,Six,,,,\n\
             4,Gaumont,0.7000,Q4,Gaumont SA,0.6500,Q5,Gaumont Film\n",
        )
        .unwrap();

        let loaded = read_candidate_file(&path).unwrap();
        let ids: Vec<&str> = loaded.records.iter().map(|l| l.source_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(loaded.skipped, 5);
        assert_eq!(loaded.records[1].candidates.len(), 2);
    }

    #[test]
    fn test_row_with_only_a_source_id_is_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.csv");
        fs::write(
            &path,
            "sourceID,sourceName,result1Score,result1ID,result1Name\n2\n1,Pixar,1.0000,Q1,Pixar\n",
        )
        .unwrap();

        let loaded = read_candidate_file(&path).unwrap();
        assert_eq!(loaded.loaded, 1);
        assert_eq!(loaded.skipped, 1);
        assert_eq!(loaded.records[0].source_id, "1");
    }

    #[test]
    fn test_missing_source_column_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "id,name,result1Score,result1ID,result1Name\n1,a,0.9,Q1,b\n").unwrap();
        let err = read_candidate_file(&path).unwrap_err();
        assert!(matches!(err, LinkageError::MissingRequiredColumn { .. }));
    }
}
