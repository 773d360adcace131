//! User configuration
//!
//! Loaded from `$UPC_CONCAT_CONFIG` or `<config dir>/upc-concat/config.toml`.
//! A missing file means defaults; a malformed one is an error.
//!
//! ```toml
//! [columns]
//! offer_id = "Offer ID"
//! title = "Offer Title"
//! item_name = "Item Description"
//! barcode = "UPC"
//!
//! [output]
//! format = "xlsx"
//! directory = "~/Documents/offers"
//! preview_rows = 20
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::concat::{ColumnRole, ColumnSelection};
use crate::excel::OutputFormat;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "UPC_CONCAT_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub columns: ColumnDefaults,
    pub output: OutputConfig,
}

/// Default column names, used when not given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnDefaults {
    pub offer_id: Option<String>,
    pub title: Option<String>,
    pub item_name: Option<String>,
    pub barcode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when the output path has no known extension
    pub format: OutputFormat,
    /// Directory for default output paths (defaults to the input's directory)
    pub directory: Option<PathBuf>,
    /// Maximum rows shown by `--preview`
    pub preview_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Xlsx,
            directory: None,
            preview_rows: 20,
        }
    }
}

impl ColumnDefaults {
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        match role {
            ColumnRole::OfferId => self.offer_id.as_deref(),
            ColumnRole::Title => self.title.as_deref(),
            ColumnRole::ItemName => self.item_name.as_deref(),
            ColumnRole::Barcode => self.barcode.as_deref(),
        }
    }

    /// Fill blank roles of `selection` from these defaults
    pub fn fill(&self, selection: &mut ColumnSelection) {
        for role in ColumnRole::all_variants() {
            if selection.get(*role).trim().is_empty() {
                if let Some(column) = self.get(*role) {
                    selection.set(*role, column);
                }
            }
        }
    }
}

impl Config {
    /// Resolve the config file path
    pub fn path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        dirs::config_dir().map(|dir| dir.join("upc-concat").join("config.toml"))
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                log::debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(dir) = config.output.directory.take() {
            config.output.directory = Some(expand_home(&dir));
        }

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
