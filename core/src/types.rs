//! Domain types shared by the registry, converter and CLI

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Declared type of a spreadsheet column (row 1 of every template)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Placeholder that authors must replace before conversion
    Unknown,
    /// Base-10 integer
    Integer,
    /// Decimal number
    Float,
    /// Free text
    String,
    /// `True` / `False`
    Bool,
}

impl DataType {
    /// Every tag, in dropdown order
    pub const ALL: [DataType; 5] = [
        DataType::Unknown,
        DataType::Integer,
        DataType::Float,
        DataType::String,
        DataType::Bool,
    ];

    /// Tag text as written in the type row
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DataType::Unknown => "Unknown",
            DataType::Integer => "Integer",
            DataType::Float => "Float",
            DataType::String => "String",
            DataType::Bool => "Bool",
        }
    }

    /// Tag names for the type-row dropdown
    #[must_use]
    pub fn tag_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|t| t.as_str()).collect()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a type tag is not one of [`DataType::ALL`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedTag(pub String);

impl FromStr for DataType {
    type Err = UnrecognizedTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| UnrecognizedTag(s.to_string()))
    }
}

/// Zero-based cell coordinate, displayed in A1 notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    /// Zero-based row
    pub row: u32,
    /// Zero-based column
    pub column: u32,
}

impl CellRef {
    /// Create a cell reference
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Column letters, `0 -> A`, `26 -> AA`
    #[must_use]
    pub fn column_letters(column: u32) -> String {
        let mut letters = Vec::new();
        let mut n = column + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
            n = (n - 1) / 26;
        }
        letters.iter().rev().collect()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_letters(self.column), self.row + 1)
    }
}

/// One managed (data file, spreadsheet) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Generated data file; unique across the registry
    pub data_path: PathBuf,
    /// Spreadsheet file name inside the spreadsheet directory; unique
    pub spreadsheet_name: String,
    /// Spreadsheet digest recorded at the last successful conversion
    pub last_digest: Option<String>,
}

impl RegistryEntry {
    /// Create an entry that has never been converted
    #[must_use]
    pub fn new(data_path: impl Into<PathBuf>, spreadsheet_name: impl Into<String>) -> Self {
        Self {
            data_path: data_path.into(),
            spreadsheet_name: spreadsheet_name.into(),
            last_digest: None,
        }
    }
}

/// The JSON artifact written for every pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    /// Field names in column order
    #[serde(rename = "Fields")]
    pub fields: Vec<String>,
    /// One value per field for every authored row
    #[serde(rename = "Rows")]
    pub rows: Vec<Vec<Value>>,
}

impl DataRecord {
    /// Number of columns every row carries
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// What happened to one pair during a batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairStatus {
    /// The data file was regenerated
    Converted,
    /// Digest matched and the data file exists
    Fresh,
    /// Needs conversion; reported by status checks that do not convert
    Stale,
    /// Conversion or staleness check failed
    Failed(String),
}

/// Per-pair result collected by the batch driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairOutcome {
    /// Data file of the pair
    pub data_path: PathBuf,
    /// Spreadsheet of the pair
    pub spreadsheet_name: String,
    /// Result
    pub status: PairStatus,
}

/// Aggregate of one `synchronize_all` run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Outcomes in registry order
    pub outcomes: Vec<PairOutcome>,
}

impl SyncReport {
    /// Pairs that were regenerated
    #[must_use]
    pub fn converted(&self) -> usize {
        self.count(|s| matches!(s, PairStatus::Converted))
    }

    /// Pairs skipped as fresh
    #[must_use]
    pub fn fresh(&self) -> usize {
        self.count(|s| matches!(s, PairStatus::Fresh))
    }

    /// Pairs reported as needing conversion
    #[must_use]
    pub fn stale(&self) -> usize {
        self.count(|s| matches!(s, PairStatus::Stale))
    }

    /// Pairs that failed
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, PairStatus::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&PairStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Result of an orphan cleanup pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Items removed
    pub removed: Vec<PathBuf>,
    /// Items that could not be removed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}
