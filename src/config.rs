//! User configuration, read from a TOML file.
//!
//! ```toml
//! thousand_separator = ","
//! decimal_point = "."
//! row_mode = false
//! combine_mode = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculator::SeparatorConfig;

const APP_DIR: &str = "ocrcalc";
const CONFIG_FILE: &str = "config.toml";

/// Settings a session starts from. Missing keys take their defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcConfig {
    #[serde(flatten)]
    pub separators: SeparatorConfig,
    /// Treat every line of recognized text as exactly one number.
    pub row_mode: bool,
    /// Append new batches to the current expression instead of replacing it.
    pub combine_mode: bool,
}

impl CalcConfig {
    /// Default location: `$XDG_CONFIG_HOME/ocrcalc/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing default file gives the defaults; a missing explicit file is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::Separator;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CalcConfig::default();
        assert_eq!(config.separators, SeparatorConfig::default());
        assert!(!config.row_mode);
        assert!(!config.combine_mode);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = CalcConfig::from_toml("decimal_point = \",\"\ncombine_mode = true\n").unwrap();
        assert_eq!(config.separators.thousand_separator, Separator::Comma);
        assert_eq!(config.separators.decimal_point, Separator::Comma);
        assert!(config.combine_mode);
        assert!(!config.row_mode);
    }

    #[test]
    fn test_empty_symbol_disables_slot() {
        let config = CalcConfig::from_toml("thousand_separator = \"\"").unwrap();
        assert_eq!(config.separators.thousand_separator, Separator::Disabled);
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        assert!(CalcConfig::from_toml("decimal_point = \";\"").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = CalcConfig {
            separators: SeparatorConfig::european(),
            row_mode: true,
            combine_mode: true,
        };
        let text = config.to_toml().unwrap();
        assert_eq!(CalcConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "thousand_separator = \" \"").unwrap();
        writeln!(file, "row_mode = true").unwrap();

        let config = CalcConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.separators.thousand_separator, Separator::Space);
        assert!(config.row_mode);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CalcConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
