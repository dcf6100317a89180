// src/data/media_file.rs - Per-entity media listings for either side
use csv::StringRecord;
use log::info;
use std::path::Path;

use crate::data::headers::{require_column, Column};
use crate::data::{check_width, open_csv, record_line, skip_or_fail, Loaded};
use crate::error::{LinkageError, LinkageResult};
use crate::models::core::{MediaCatalog, MediaKind, MediaRef};

pub const ENTITY_ID: Column = Column::new("entityID", &["company_id"]);
pub const MEDIA_ID: Column = Column::new("mediaID", &["id"]);
pub const MEDIA_KIND: Column = Column::new("mediaKind", &["type"]);

/// One parsed row, or None when the row lists an entity without media.
fn parse_row(
    record: &StringRecord,
    width: usize,
    entity_col: usize,
    media_col: usize,
    kind_col: usize,
    path: &Path,
) -> LinkageResult<Option<(String, MediaRef)>> {
    check_width(record, width, path)?;
    let line = record_line(record);
    let entity_id = record.get(entity_col).unwrap_or("").trim();
    if entity_id.is_empty() {
        return Err(LinkageError::malformed(path, line, "empty entityID"));
    }

    let raw_media = record.get(media_col).unwrap_or("").trim();
    if raw_media.is_empty() {
        return Ok(None);
    }

    let media_id: u64 = raw_media
        .parse()
        .map_err(|_| LinkageError::malformed(path, line, format!("mediaID '{}' is not a number", raw_media)))?;
    let kind: MediaKind = record
        .get(kind_col)
        .unwrap_or("")
        .parse()
        .map_err(|reason: String| LinkageError::malformed(path, line, reason))?;

    Ok(Some((entity_id.to_string(), MediaRef { media_id, kind })))
}

/// Loads a media mapping file into a catalog. Rows with an empty media id
/// are placeholders for entities without media; those entities stay unknown
/// so the adjudicator never weighs them.
pub fn load_media_catalog(path: &Path) -> LinkageResult<Loaded<MediaCatalog>> {
    let mut reader = open_csv(path)?;
    let headers = reader
        .headers()
        .map_err(|e| LinkageError::from_csv(path, e))?
        .clone();

    let entity_col = require_column(&headers, &ENTITY_ID, path)?;
    let media_col = require_column(&headers, &MEDIA_ID, path)?;
    let kind_col = require_column(&headers, &MEDIA_KIND, path)?;

    let width = headers.len();
    let mut catalog = MediaCatalog::new();
    let mut rows = 0;
    let mut without_media = 0;
    let mut skipped = 0;
    for result in reader.records() {
        let parsed = result
            .map_err(|e| LinkageError::from_csv(path, e))
            .and_then(|record| parse_row(&record, width, entity_col, media_col, kind_col, path));
        match parsed {
            Ok(Some((entity_id, media))) => {
                catalog.insert(&entity_id, media);
                rows += 1;
            }
            Ok(None) => without_media += 1,
            Err(err) => skip_or_fail(err, &mut skipped)?,
        }
    }

    info!(
        "Loaded {} media rows for {} entities ({} distinct media refs, {} rows without media) from {}",
        rows,
        catalog.len(),
        catalog.media_count(),
        without_media,
        path.display()
    );
    Ok(Loaded {
        records: catalog,
        loaded: rows,
        skipped,
    })
}
