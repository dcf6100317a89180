// src/data/entities.rs - Source (JSON Lines) and target (CSV) entity lists
use log::{debug, info};
use serde::Deserialize;
use flate2::read::GzDecoder;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use url::Url;

use crate::data::{check_width, open_csv, record_line, skip_or_fail, Loaded};
use crate::error::{LinkageError, LinkageResult};
use crate::models::core::NamedEntity;

/// One line of the source list. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct SourceRecord {
    id: u64,
    name: String,
}

/// Opens the source list, decompressing on the fly when the name ends in `.gz`.
fn open_source_lines(path: &Path) -> LinkageResult<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| LinkageError::io(path, e))?;
    let gzipped = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("gz"));
    if gzipped {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Loads the source list: one JSON object per line, blank lines ignored.
/// Later lines repeating an id are dropped.
pub fn load_source_entities(path: &Path) -> LinkageResult<Loaded<Vec<NamedEntity>>> {
    let mut reader = open_source_lines(path)?;

    let mut seen = HashSet::new();
    let mut entities = Vec::new();
    let mut skipped = 0;
    let mut duplicates = 0;
    let mut buf = Vec::new();
    let mut line_no = 0u64;
    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(|e| LinkageError::io(path, e))?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let parsed = std::str::from_utf8(&buf)
            .map_err(|e| LinkageError::malformed(path, line_no, format!("invalid UTF-8: {}", e)))
            .and_then(|line| {
                let line = line.trim();
                if line.is_empty() {
                    return Ok(None);
                }
                serde_json::from_str::<SourceRecord>(line)
                    .map(Some)
                    .map_err(|e| LinkageError::malformed(path, line_no, e.to_string()))
            });

        match parsed {
            Ok(Some(record)) => {
                let id = record.id.to_string();
                if seen.insert(id.clone()) {
                    entities.push(NamedEntity::new(id, record.name));
                } else {
                    duplicates += 1;
                    debug!("Dropping duplicate source {} at line {}", id, line_no);
                }
            }
            Ok(None) => {}
            Err(err) => skip_or_fail(err, &mut skipped)?,
        }
    }

    info!(
        "Loaded {} source entities from {} ({} duplicate ids dropped)",
        entities.len(),
        path.display(),
        duplicates
    );
    Ok(Loaded {
        loaded: entities.len(),
        records: entities,
        skipped,
    })
}

/// Final non-empty path segment of a knowledge-base URI, e.g.
/// `http://www.wikidata.org/entity/Q1` gives `Q1`. Values that are not URLs
/// are split on '/' the same way.
pub fn target_id_from_uri(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let from_url = Url::parse(raw).ok().and_then(|url| {
        url.path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last().map(str::to_string))
    });
    from_url
        .or_else(|| raw.rsplit('/').find(|s| !s.is_empty()).map(str::to_string))
        .filter(|id| !id.is_empty())
}

/// Loads the target list: header row, then URI and display name in the
/// first two columns. Later rows repeating an id are dropped.
pub fn load_target_entities(path: &Path) -> LinkageResult<Loaded<Vec<NamedEntity>>> {
    let mut reader = open_csv(path)?;
    let width = reader.headers().map_err(|e| LinkageError::from_csv(path, e))?.len();
    let mut seen = HashSet::new();
    let mut entities = Vec::new();
    let mut skipped = 0;
    let mut duplicates = 0;

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                skip_or_fail(LinkageError::from_csv(path, e), &mut skipped)?;
                continue;
            }
        };
        let line = record_line(&record);

        let parsed = check_width(&record, width, path).and_then(|_| match (record.get(0), record.get(1)) {
            (Some(uri), Some(name)) => target_id_from_uri(uri)
                .map(|id| (id, name.trim().to_string()))
                .ok_or_else(|| LinkageError::malformed(path, line, format!("no id in '{}'", uri))),
            _ => Err(LinkageError::malformed(path, line, "expected an id column and a name column")),
        });

        match parsed {
            Ok((id, name)) => {
                if seen.insert(id.clone()) {
                    entities.push(NamedEntity::new(id, name));
                } else {
                    duplicates += 1;
                    debug!("Dropping duplicate target {} at line {}", id, line);
                }
            }
            Err(err) => skip_or_fail(err, &mut skipped)?,
        }
    }

    info!(
        "Loaded {} target entities from {} ({} duplicate ids dropped)",
        entities.len(),
        path.display(),
        duplicates
    );
    Ok(Loaded {
        loaded: entities.len(),
        records: entities,
        skipped,
    })
}
