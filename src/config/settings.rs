//! Application settings loading from config.toml
//!
//! Every key in the file is optional. A missing file yields the defaults so the bot can
//! start without any configuration; a file that exists but cannot be parsed is an error.

use crate::core::invest::AllocationPolicy;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Parameters for the investment allocation waterfall
    pub investment: AllocationPolicy,
    /// Split-expense ledger defaults
    pub ledger: LedgerSettings,
}

/// Defaults applied when recording split expenses
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    /// Currency used when a command does not name one
    pub default_currency: String,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            default_currency: "INR".to_string(),
        }
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A value has the wrong type
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    debug!("Loading settings from {}", path.display());

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read {}: {e}", path.display()),
    })?;

    parse_settings(&contents)
}

/// Parses settings from TOML text
pub fn parse_settings(contents: &str) -> Result<Settings> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from ./config.toml, falling back to defaults if the file is absent
pub fn load_default_settings() -> Result<Settings> {
    let path = Path::new("config.toml");
    if !path.exists() {
        warn!("config.toml not found, using default settings");
        return Ok(Settings::default());
    }
    load_settings(path)
}
