//! Configuration types for the synchronization tool
//!
//! Every field has a default so an absent or partial configuration file
//! still yields a usable setup. Relative paths are resolved against a base
//! directory by [`SyncConfig::resolve_paths`].

use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest column index a worksheet may address
pub const MAX_COLUMNS: u32 = 16_384;

/// Complete tool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Registry document location
    pub registry_path: PathBuf,
    /// Flat directory that holds every managed spreadsheet
    pub spreadsheet_dir: PathBuf,
    /// Plain-text log file; `null` disables file logging
    pub log_path: Option<PathBuf>,
    /// Extension given to new spreadsheets, without the dot
    pub spreadsheet_extension: String,
    /// Data file output settings
    pub output: OutputConfig,
    /// Skeleton spreadsheet settings
    pub skeleton: SkeletonConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            registry_path: PathBuf::from("config.xml"),
            spreadsheet_dir: PathBuf::from("excel"),
            log_path: Some(PathBuf::from("sheetsync.log")),
            spreadsheet_extension: "xlsx".to_string(),
            output: OutputConfig::default(),
            skeleton: SkeletonConfig::default(),
        }
    }
}

/// Data file output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indent the JSON instead of writing it compactly
    pub pretty: bool,
}

/// Skeleton spreadsheet settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkeletonConfig {
    /// How many columns of the type row receive the dropdown
    pub validation_columns: u32,
    /// Header fill colour (RGB hex, no `#`)
    pub header_color: String,
    /// Freeze the three header rows
    pub freeze_headers: bool,
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            validation_columns: 256,
            header_color: "CCFFCC".to_string(),
            freeze_headers: true,
        }
    }
}

impl SkeletonConfig {
    /// Header colour as a 24-bit RGB value
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Config` if the colour is not six hex digits
    pub fn header_rgb(&self) -> Result<u32> {
        let hex = self.header_color.trim_start_matches('#');
        if hex.len() != 6 {
            return Err(SyncError::config(format!(
                "header_color must be six hex digits, got '{}'",
                self.header_color
            )));
        }
        u32::from_str_radix(hex, 16).map_err(|e| {
            SyncError::config(format!("header_color '{}' is not hex: {e}", self.header_color))
        })
    }
}

impl SyncConfig {
    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Config` describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        let ext = &self.spreadsheet_extension;
        if ext.is_empty() || ext.contains(['.', '/', '\\']) {
            return Err(SyncError::config(format!(
                "spreadsheet_extension must be a bare extension like 'xlsx', got '{ext}'"
            )));
        }
        if self.skeleton.validation_columns == 0 || self.skeleton.validation_columns > MAX_COLUMNS
        {
            return Err(SyncError::config(format!(
                "skeleton.validation_columns must be within 1..={MAX_COLUMNS}, got {}",
                self.skeleton.validation_columns
            )));
        }
        self.skeleton.header_rgb()?;
        if self.registry_path.as_os_str().is_empty() {
            return Err(SyncError::config("registry_path must not be empty"));
        }
        if self.spreadsheet_dir.as_os_str().is_empty() {
            return Err(SyncError::config("spreadsheet_dir must not be empty"));
        }
        Ok(())
    }

    /// Anchor relative paths at `base`
    #[must_use]
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        self.registry_path = anchor(base, &self.registry_path);
        self.spreadsheet_dir = anchor(base, &self.spreadsheet_dir);
        self.log_path = self.log_path.map(|p| anchor(base, &p));
        self
    }

    /// Create the spreadsheet directory and the registry's parent directory
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` if a directory cannot be created
    pub fn ensure_layout(&self) -> Result<()> {
        let mut dirs = vec![self.spreadsheet_dir.as_path()];
        if let Some(parent) = self.registry_path.parent() {
            dirs.push(parent);
        }
        for dir in dirs.into_iter().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| SyncError::io(dir, e))?;
        }
        Ok(())
    }

    /// Absolute location of a managed spreadsheet
    #[must_use]
    pub fn spreadsheet_path(&self, spreadsheet_name: &str) -> PathBuf {
        self.spreadsheet_dir.join(spreadsheet_name)
    }
}

fn anchor(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = SyncConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.skeleton.header_rgb().unwrap(), 0x00CC_FFCC);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: SyncConfig = serde_yaml::from_str(
            "spreadsheet_dir: sheets\noutput:\n  pretty: true\n",
        )
        .unwrap();
        assert_eq!(config.spreadsheet_dir, PathBuf::from("sheets"));
        assert!(config.output.pretty);
        assert_eq!(config.registry_path, PathBuf::from("config.xml"));
        assert_eq!(config.skeleton.validation_columns, 256);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SyncConfig {
            spreadsheet_extension: ".xlsx".into(),
            ..SyncConfig::default()
        };
        assert!(matches!(config.validate(), Err(SyncError::Config(_))));

        config.spreadsheet_extension = "xlsx".into();
        config.skeleton.validation_columns = MAX_COLUMNS + 1;
        assert!(config.validate().is_err());

        config.skeleton.validation_columns = 10;
        config.skeleton.header_color = "green".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_paths_keeps_absolute() {
        let base = Path::new("/srv/tool");
        let config = SyncConfig {
            log_path: Some(PathBuf::from("/var/log/sync.log")),
            ..SyncConfig::default()
        }
        .resolve_paths(base);
        assert_eq!(config.registry_path, PathBuf::from("/srv/tool/config.xml"));
        assert_eq!(config.spreadsheet_dir, PathBuf::from("/srv/tool/excel"));
        assert_eq!(config.log_path, Some(PathBuf::from("/var/log/sync.log")));
        assert_eq!(
            config.spreadsheet_path("a.xlsx"),
            PathBuf::from("/srv/tool/excel/a.xlsx")
        );
    }

    #[test]
    fn test_ensure_layout_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config = SyncConfig {
            registry_path: PathBuf::from("state/config.xml"),
            spreadsheet_dir: PathBuf::from("sheets/all"),
            ..SyncConfig::default()
        }
        .resolve_paths(dir.path());

        config.ensure_layout().unwrap();
        assert!(dir.path().join("sheets/all").is_dir());
        assert!(dir.path().join("state").is_dir());
        config.ensure_layout().unwrap();
    }
}
