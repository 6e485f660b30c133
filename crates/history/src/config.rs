use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HistoryError, Result};
use crate::view::{HistoryFilter, SortKey};

/// Presentation defaults for the history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Filter tag applied when the list is first shown (`all` or a type name)
    pub default_filter: String,

    /// Sort key applied when the list is first shown
    pub default_sort: String,

    /// Maximum rows handed to the renderer (None = unlimited)
    pub max_rows: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_filter: HistoryFilter::All.as_str().to_string(),
            default_sort: SortKey::Recent.as_str().to_string(),
            max_rows: None,
        }
    }
}

impl HistoryConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        log::debug!("loading history config from {}", path.display());
        Self::from_toml_str(&raw)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if HistoryFilter::from_tag(&self.default_filter).is_none() {
            return Err(HistoryError::invalid_config(format!(
                "default_filter '{}' is not 'all' or a known investigation type",
                self.default_filter
            )));
        }

        if SortKey::from_key(&self.default_sort).is_none() {
            return Err(HistoryError::invalid_config(format!(
                "default_sort '{}' must be one of recent, oldest, alphabetical, type",
                self.default_sort
            )));
        }

        if self.max_rows == Some(0) {
            return Err(HistoryError::invalid_config("max_rows must be > 0"));
        }

        Ok(())
    }

    #[must_use]
    pub fn filter(&self) -> HistoryFilter {
        HistoryFilter::parse(&self.default_filter)
    }

    #[must_use]
    pub fn sort(&self) -> SortKey {
        SortKey::parse(&self.default_sort)
    }
}
