//! Application configuration for toolcard.
//!
//! User config lives at `~/.toolcard/toolcard.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolcardError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "toolcard.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".toolcard";

// ---------------------------------------------------------------------------
// Config structs (matching toolcard.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Output defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Directory scan settings.
    #[serde(default)]
    pub scan: ScanConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default output format: "json" or "jsonl".
    #[serde(default = "default_format")]
    pub format: String,

    /// Pretty-print JSON output.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            pretty: default_true(),
        }
    }
}

fn default_format() -> String {
    "json".into()
}
fn default_true() -> bool {
    true
}

/// `[scan]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// File extensions to consider when scanning a directory.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Maximum directory depth; 0 means unlimited.
    #[serde(default)]
    pub max_depth: usize,

    /// Whether to follow symlinks while walking.
    #[serde(default)]
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            max_depth: 0,
            follow_links: false,
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["txt".into(), "md".into(), "log".into()]
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.toolcard/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ToolcardError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.toolcard/toolcard.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ToolcardError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| ToolcardError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ToolcardError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ToolcardError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ToolcardError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("format"));
        assert!(toml_str.contains("extensions"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.format, "json");
        assert!(parsed.defaults.pretty);
        assert_eq!(parsed.scan.extensions, vec!["txt", "md", "log"]);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
format = "jsonl"

[scan]
max_depth = 2
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.format, "jsonl");
        assert!(config.defaults.pretty);
        assert_eq!(config.scan.max_depth, 2);
        assert_eq!(config.scan.extensions, vec!["txt", "md", "log"]);
        assert!(!config.scan.follow_links);
    }

    #[test]
    fn empty_config_is_all_defaults() {
        let config: AppConfig = toml::from_str("").expect("parse empty");
        assert_eq!(config.defaults.format, "json");
        assert_eq!(config.scan.max_depth, 0);
    }
}
