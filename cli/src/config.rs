//! Render configuration.
//!
//! Loaded from YAML (by default `.option-schema.yml` in the working
//! directory) to control output formatting and how validation failures are
//! handled.
//!
//! # Example YAML
//!
//! ```yaml
//! output:
//!   pretty: true
//! validation:
//!   enabled: true
//!   allow_invalid: false
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Config file looked up when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = ".option-schema.yml";

/// Output formatting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print rendered JSON.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Tree validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Run tree validation before rendering.
    pub enabled: bool,
    /// Render even when validation reports problems.
    pub allow_invalid: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allow_invalid: false,
        }
    }
}

/// Top-level render configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub output: OutputConfig,
    pub validation: ValidationConfig,
}

impl RenderConfig {
    /// Loads configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|err| format!("Failed to open config '{}': {err}", path.display()))?;
        serde_yaml::from_reader(BufReader::new(file))
            .map_err(|err| format!("Failed to parse config '{}': {err}", path.display()))
    }

    /// Loads `explicit` if given, otherwise [`DEFAULT_CONFIG_FILE`] if it
    /// exists, otherwise the defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, String> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::load(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)
            .map_err(|err| format!("Failed to create '{}': {err}", path.display()))?;
        serde_yaml::to_writer(BufWriter::new(file), self)
            .map_err(|err| format!("Failed to write config '{}': {err}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_complete() {
        let yaml = r#"
output:
  pretty: false
validation:
  enabled: true
  allow_invalid: true
"#;
        let config: RenderConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(!config.output.pretty);
        assert!(config.validation.enabled);
        assert!(config.validation.allow_invalid);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: RenderConfig = serde_yaml::from_str("validation:\n  enabled: false\n").unwrap();
        assert!(config.output.pretty);
        assert!(!config.validation.enabled);
        assert!(!config.validation.allow_invalid);
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");

        let mut original = RenderConfig::default();
        original.output.pretty = false;
        original.save(&path).unwrap();

        let loaded = RenderConfig::load(&path).unwrap();
        assert!(!loaded.output.pretty);
        assert!(loaded.validation.enabled);
    }

    #[test]
    fn test_resolve_explicit_missing_file() {
        let err = RenderConfig::resolve(Some(Path::new("/nonexistent/config.yml"))).unwrap_err();
        assert!(err.contains("Failed to open config"));
    }
}
