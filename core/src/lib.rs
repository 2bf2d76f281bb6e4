//! # sheetsync core
//!
//! Core types, errors and configuration for keeping JSON data files in sync
//! with hand-edited spreadsheet templates.
//!
//! A template is a single-sheet workbook with three header rows:
//!
//! ```text
//! row 0 | banner (ignored)
//! row 1 | Integer | String | Float | Bool      <- type tags
//! row 2 | id      | name   | score | active    <- field names
//! row 3+| 7       | Ann    | 3     |           <- records
//! ```
//!
//! which converts to `{"Fields":["id","name","score","active"],"Rows":[[7,"Ann",3.0,false]]}`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Error taxonomy for registry, naming and conversion operations
pub mod error;

/// Domain types: type tags, registry entries, data records, reports
pub mod types;

/// Configuration with defaults and validation
pub mod config;

/// Collaborator traits for prompts and external viewers
pub mod traits;

pub use config::{OutputConfig, SkeletonConfig, SyncConfig};
pub use error::{Result, SyncError};
pub use types::{
    CellRef, CleanupReport, DataRecord, DataType, PairOutcome, PairStatus, RegistryEntry,
    SyncReport,
};
