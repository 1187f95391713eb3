use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::errors::{LocateError, Result};

/// Name of the configuration file stored inside the `.funcsnip` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory holding funcsnip settings.
pub const FUNCSNIP_DIR: &str = ".funcsnip";

/// Configuration for function lookups and the repository store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Directory under which each job's source tree is materialized.
    pub storage_path: String,
    /// Enabled source languages, in lookup priority order.
    pub languages: Vec<String>,
    /// Glob patterns (relative to the tree root) pruned from every scan.
    pub exclude: Vec<String>,
    /// Maximum file size in bytes; larger files are skipped.
    pub max_file_size: u64,
    /// Whether a matched span starts at the first decorator/attribute line.
    pub include_decorators: bool,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            version: 1,
            storage_path: "./repos".to_string(),
            languages: vec!["python".to_string()],
            exclude: vec![
                ".git/**".to_string(),
                "**/__pycache__/**".to_string(),
                "**/node_modules/**".to_string(),
            ],
            max_file_size: 1_048_576,
            include_decorators: true,
        }
    }
}

/// Returns the path to the `.funcsnip` directory within the given directory.
pub fn get_funcsnip_dir(base: &Path) -> PathBuf {
    base.join(FUNCSNIP_DIR)
}

/// Returns the path to `config.json` within the `.funcsnip` directory.
pub fn get_config_path(base: &Path) -> PathBuf {
    get_funcsnip_dir(base).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk, falling back to defaults when the
/// file does not exist.
pub fn load_config(base: &Path) -> Result<LocatorConfig> {
    let config_path = get_config_path(base);

    if !config_path.exists() {
        return Ok(LocatorConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| LocateError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    serde_json::from_str(&contents).map_err(|e| LocateError::Config {
        message: format!(
            "failed to parse config file '{}': {}",
            config_path.display(),
            e
        ),
    })
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it into place.
pub fn save_config(base: &Path, config: &LocatorConfig) -> Result<()> {
    let dir = get_funcsnip_dir(base);
    fs::create_dir_all(&dir).map_err(|e| LocateError::Config {
        message: format!(
            "failed to create config directory '{}': {}",
            dir.display(),
            e
        ),
    })?;

    let config_path = get_config_path(base);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config)?;

    fs::write(&tmp_path, &json).map_err(|e| LocateError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| LocateError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}

/// Returns `true` if a root-relative path matches any exclude pattern.
///
/// Patterns that fail to compile are ignored.
pub fn is_excluded(relative_path: &str, config: &LocatorConfig) -> bool {
    let match_opts = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    config.exclude.iter().any(|pattern_str| {
        Pattern::new(pattern_str)
            .map(|pattern| pattern.matches_with(relative_path, match_opts))
            .unwrap_or(false)
    })
}
