//! # sheetsync service
//!
//! Keeps JSON data files in sync with the spreadsheet templates authors edit.
//!
//! Every data file is paired with exactly one spreadsheet in a registry
//! document. A pair is regenerated when its spreadsheet's SHA-256 digest no
//! longer matches the digest recorded at the last conversion, when its data
//! file is missing, or when a run is forced.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sheetsync_core::SyncConfig;
//! use sheetsync_service::SheetSync;
//! use std::path::Path;
//!
//! # fn main() -> sheetsync_core::Result<()> {
//! let config = SyncConfig::default().resolve_paths(Path::new("/srv/game"));
//! let mut sync = SheetSync::open(config)?;
//!
//! // Creates excel/items.xlsx and an empty data/items.bytes
//! let name = sync.register(Path::new("/srv/game/data/items.bytes"), false)?;
//! assert_eq!(name, "items.xlsx");
//!
//! // ...authors fill in the spreadsheet...
//! let report = sync.synchronize_all(false);
//! println!("{} converted, {} failed", report.converted(), report.failed());
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! - [`registry`]: the registry document, digests and orphan scans
//! - [`naming`]: collision-free spreadsheet names
//! - [`grid`] and [`converter`]: template reading and JSON generation
//! - [`skeleton`]: empty template creation
//! - [`sync`]: the batch driver
//! - [`session`] and [`cli`]: operator workflows

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod console;
pub mod converter;
pub mod file_system_adapter;
pub mod grid;
pub mod hasher;
pub mod launcher;
pub mod naming;
pub mod registry;
pub mod service;
pub mod session;
pub mod skeleton;
pub mod sync;

pub use converter::ConversionEngine;
pub use naming::NameAllocator;
pub use registry::MappingRegistry;
pub use service::SheetSync;
pub use session::{CleanSummary, Session};
pub use skeleton::SkeletonFactory;

// Re-export core types
pub use sheetsync_core::{
    CellRef, CleanupReport, DataRecord, DataType, PairOutcome, PairStatus, RegistryEntry, Result,
    SyncConfig, SyncError, SyncReport,
};
