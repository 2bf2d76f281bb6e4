//! Configuration loading
//!
//! YAML files with `${VAR:-default}` environment substitution. Relative paths
//! in the file are anchored at the file's own directory.

use sheetsync_core::{Result, SyncConfig, SyncError};
use std::env;
use std::path::Path;
use tracing::debug;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "sheetsync.yaml";

/// Load, anchor and validate a configuration file.
///
/// A missing file yields the defaults anchored at the file's directory.
///
/// # Errors
///
/// - `SyncError::Io` if the file exists but cannot be read
/// - `SyncError::Config` if the YAML cannot be parsed or a value is invalid
pub fn load_config(path: &Path) -> Result<SyncConfig> {
    let base = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let config = match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no configuration file, using defaults");
            SyncConfig::default()
        }
        Err(e) => return Err(SyncError::io(path, e)),
    };

    let config = config.resolve_paths(base);
    config.validate()?;
    Ok(config)
}

/// Parse configuration text after environment substitution
///
/// # Errors
///
/// Returns `SyncError::Config` if the YAML cannot be parsed
pub fn parse_config(contents: &str) -> Result<SyncConfig> {
    if contents.trim().is_empty() {
        return Ok(SyncConfig::default());
    }
    let substituted = substitute_env_vars(contents);
    serde_yaml::from_str(&substituted)
        .map_err(|e| SyncError::config(format!("Failed to parse YAML config: {e}")))
}

/// Substitute environment variables in the format `${VAR:-default}`
fn substitute_env_vars(content: &str) -> String {
    let Ok(re) = regex::Regex::new(r"\$\{([^}:]+)(?::(-)?([^}]*))?\}") else {
        return content.to_string();
    };

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default_value = caps.get(3).map_or("", |m| m.as_str());

        env::var(var_name).unwrap_or_else(|_| default_value.to_string())
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_env_var_substitution() {
        let text = substitute_env_vars("dir: ${SHEETSYNC_SURELY_UNSET_VAR:-sheets}");
        assert_eq!(text, "dir: sheets");

        if let Ok(path) = env::var("PATH") {
            assert_eq!(substitute_env_vars("${PATH:-x}"), path);
        }
        assert_eq!(substitute_env_vars("no vars here"), "no vars here");
    }

    #[test]
    fn test_missing_file_gives_anchored_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("sheetsync.yaml")).unwrap();
        assert_eq!(config.registry_path, dir.path().join("config.xml"));
        assert_eq!(config.spreadsheet_dir, dir.path().join("excel"));
    }

    #[test]
    fn test_load_file_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheetsync.yaml");
        std::fs::write(
            &path,
            "spreadsheet_dir: ${SHEETSYNC_SURELY_UNSET_DIR:-templates}\nlog_path: null\noutput:\n  pretty: true\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.spreadsheet_dir, dir.path().join("templates"));
        assert_eq!(config.log_path, None);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheetsync.yaml");
        std::fs::write(&path, "spreadsheet_extension: \".xlsx\"\n").unwrap();
        assert!(matches!(load_config(&path), Err(SyncError::Config(_))));

        std::fs::write(&path, "skeleton: [not, a, map]\n").unwrap();
        assert!(matches!(load_config(&path), Err(SyncError::Config(_))));
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse_config("  \n").unwrap(), SyncConfig::default());
        assert_eq!(
            parse_config("registry_path: state.xml\n").unwrap().registry_path,
            PathBuf::from("state.xml")
        );
    }
}
