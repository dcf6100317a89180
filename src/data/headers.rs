// src/data/headers.rs - Header lookup with legacy column names
use csv::StringRecord;
use std::path::Path;

use crate::error::{LinkageError, LinkageResult};

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    /// Older exports used these names for the same column.
    pub aliases: &'static [&'static str],
}

impl Column {
    pub const fn new(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases }
    }

    fn matches(&self, header: &str) -> bool {
        let header = header.trim().trim_start_matches('\u{feff}');
        header == self.name || self.aliases.iter().any(|alias| header == *alias)
    }
}

pub fn find_column(headers: &StringRecord, column: &Column) -> Option<usize> {
    headers.iter().position(|h| column.matches(h))
}

pub fn require_column(headers: &StringRecord, column: &Column, file: &Path) -> LinkageResult<usize> {
    find_column(headers, column).ok_or_else(|| LinkageError::missing_column(file, column.name))
}

/// Header-position lookup by exact name.
pub fn find_named(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}
