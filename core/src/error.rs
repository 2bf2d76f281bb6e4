//! Error types for synchronization operations

use crate::types::CellRef;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for registry, naming and conversion operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// A file could not be read, written or deleted
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// Path the operation was working on
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// The data path is already registered and overwriting was not allowed
    #[error("a mapping for {} already exists", data_path.display())]
    DuplicateMapping {
        /// Data path that is already registered
        data_path: PathBuf,
    },

    /// The spreadsheet name is already owned by another entry
    #[error("spreadsheet '{name}' is already mapped")]
    DuplicateSpreadsheet {
        /// Conflicting spreadsheet name
        name: String,
    },

    /// No entry exists for the data path
    #[error("no mapping registered for {}", data_path.display())]
    NotRegistered {
        /// Data path that was looked up
        data_path: PathBuf,
    },

    /// A spreadsheet name that cannot live directly in the spreadsheet directory
    #[error("invalid spreadsheet name '{name}': {reason}")]
    InvalidName {
        /// Rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Every directory breadcrumb was tried and the name still collides
    #[error("spreadsheet namespace exhausted for {}", data_path.display())]
    NameResolution {
        /// Data path a name was being allocated for
        data_path: PathBuf,
    },

    /// A column's type tag is `Unknown` or not a recognised tag
    #[error("column {column} has unusable type tag '{tag}'")]
    UnknownType {
        /// Zero-based column index
        column: usize,
        /// Tag text found in the type row
        tag: String,
    },

    /// A data cell does not satisfy its column's declared type
    #[error("cell {cell}: cannot read '{value}' as {expected}")]
    Format {
        /// Offending cell
        cell: CellRef,
        /// Cell text
        value: String,
        /// Declared column type
        expected: String,
    },

    /// The workbook could not be opened, parsed or written
    #[error("spreadsheet error in {}: {message}", path.display())]
    Spreadsheet {
        /// Workbook path
        path: PathBuf,
        /// Error message from the workbook library
        message: String,
    },

    /// The registry document is malformed
    #[error("registry document {} is invalid: {message}", path.display())]
    Registry {
        /// Registry document path
        path: PathBuf,
        /// What was wrong
        message: String,
    },

    /// JSON serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// The interactive prompt failed
    #[error("prompt error: {0}")]
    Prompt(String),
}

/// Result type alias for synchronization operations
pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    /// Create an IO error bound to a path
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a spreadsheet error
    #[must_use]
    pub fn spreadsheet(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Spreadsheet {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a registry document error
    #[must_use]
    pub fn registry(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Registry {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a format error for a cell
    #[must_use]
    pub fn format(cell: CellRef, value: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::Format {
            cell,
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a prompt error
    #[must_use]
    pub fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt(message.into())
    }

    /// True when the spreadsheet content, not the environment, is at fault
    #[must_use]
    pub fn is_content_error(&self) -> bool {
        matches!(self, Self::UnknownType { .. } | Self::Format { .. })
    }

    /// True for an IO error whose kind is `NotFound`
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_path() {
        let err = SyncError::io(
            "data/items.bytes",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let display = err.to_string();
        assert!(display.contains("data/items.bytes"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_format_error_uses_a1_reference() {
        let err = SyncError::format(CellRef::new(3, 1), "abc", "Integer");
        assert_eq!(err.to_string(), "cell B4: cannot read 'abc' as Integer");
        assert!(err.is_content_error());
    }

    #[test]
    fn test_error_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: SyncError = json_err.into();
        assert!(matches!(err, SyncError::Serialization(_)));
        assert!(!err.is_content_error());
    }
}
