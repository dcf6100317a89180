// src/error.rs - Error taxonomy for loading, matching and writing linkage files
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkageError {
    /// A single row could not be interpreted. Loaders log these and move on.
    #[error("malformed record in {} at line {line}: {reason}", file.display())]
    MalformedRecord {
        file: PathBuf,
        line: u64,
        reason: String,
    },

    /// The header row does not carry a column the loader needs. Always fatal.
    #[error("missing required column '{column}' in header of {}", file.display())]
    MissingRequiredColumn { file: PathBuf, column: String },

    #[error("I/O failure on {}: {source}", file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV failure in {} at line {line}: {source}", file.display())]
    Csv {
        file: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("JSON failure on {}: {source}", file.display())]
    Json {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl LinkageError {
    pub fn malformed(file: &Path, line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            file: file.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    pub fn missing_column(file: &Path, column: impl Into<String>) -> Self {
        Self::MissingRequiredColumn {
            file: file.to_path_buf(),
            column: column.into(),
        }
    }

    pub fn io(file: &Path, source: std::io::Error) -> Self {
        Self::Io {
            file: file.to_path_buf(),
            source,
        }
    }

    pub fn json(file: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            file: file.to_path_buf(),
            source,
        }
    }

    /// Classifies a csv error: row-level decoding problems become
    /// `MalformedRecord` (skippable), everything else stays fatal.
    pub fn from_csv(file: &Path, source: csv::Error) -> Self {
        let line = source
            .position()
            .map(|pos| pos.line())
            .unwrap_or_default();
        match source.kind() {
            csv::ErrorKind::Utf8 { .. } | csv::ErrorKind::UnequalLengths { .. } => {
                Self::malformed(file, line, source.to_string())
            }
            _ => Self::Csv {
                file: file.to_path_buf(),
                line,
                source,
            },
        }
    }

    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::MalformedRecord { .. })
    }
}

pub type LinkageResult<T> = std::result::Result<T, LinkageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_file_and_line() {
        let err = LinkageError::malformed(Path::new("companies.csv"), 12, "score 'abc' is not a number");
        let msg = err.to_string();
        assert!(msg.contains("companies.csv"));
        assert!(msg.contains("line 12"));
        assert!(err.is_skippable());

        let err = LinkageError::missing_column(Path::new("media.csv"), "mediaKind");
        assert!(err.to_string().contains("mediaKind"));
        assert!(err.to_string().contains("media.csv"));
        assert!(!err.is_skippable());
    }

    #[test]
    fn test_io_error_is_fatal() {
        let err = LinkageError::io(
            Path::new("/nope/report.csv"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(!err.is_skippable());
        assert!(err.to_string().contains("/nope/report.csv"));
    }
}
