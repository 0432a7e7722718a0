//! Engine configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! directory = "eps"
//! id_pattern = "^\\d{4}_EPS_\\d+$"
//! sheet_id = "1AbC"
//! requirements_range = "Requirements!A1:AF"
//! roster_range = "Roster!A1:C"
//! ```

use crate::error::ConfigError;
use reqsync_core::{Assembler, IdPattern};
use serde::Deserialize;
use std::path::Path;

/// Synchronization settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Path prefix of requirement pages in roster links
    pub directory: String,
    /// Regex matching requirement IDs; `None` means "contains the current year"
    pub id_pattern: Option<String>,
    /// Table store sheet identifier
    pub sheet_id: String,
    /// Range holding the requirement rows (header first)
    pub requirements_range: String,
    /// Range receiving rows recovered from a roster
    pub roster_range: String,
    /// Report idempotent no-ops to the notifier
    pub notify_on_noop: bool,
}

impl SyncConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// [`ConfigError::Toml`] on syntax errors or unknown keys,
    /// [`ConfigError::InvalidIdPattern`] if `id_pattern` does not compile.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.id_pattern()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        Self::from_toml_str(&text)
    }

    /// With directory
    #[inline]
    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into();
        self
    }

    /// With requirement ID regex
    #[inline]
    #[must_use]
    pub fn with_id_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.id_pattern = Some(pattern.into());
        self
    }

    /// With sheet id
    #[inline]
    #[must_use]
    pub fn with_sheet(mut self, sheet_id: impl Into<String>) -> Self {
        self.sheet_id = sheet_id.into();
        self
    }

    /// With requirement and roster ranges
    #[inline]
    #[must_use]
    pub fn with_ranges(mut self, requirements: impl Into<String>, roster: impl Into<String>) -> Self {
        self.requirements_range = requirements.into();
        self.roster_range = roster.into();
        self
    }

    /// With no-op notifications
    #[inline]
    #[must_use]
    pub fn with_notify_on_noop(mut self, notify: bool) -> Self {
        self.notify_on_noop = notify;
        self
    }

    /// Compiled requirement ID predicate
    ///
    /// # Errors
    /// [`ConfigError::InvalidIdPattern`] if the regex does not compile
    pub fn id_pattern(&self) -> Result<IdPattern, ConfigError> {
        match &self.id_pattern {
            None => Ok(IdPattern::current_year()),
            Some(pattern) => IdPattern::regex(pattern).map_err(|e| ConfigError::InvalidIdPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            }),
        }
    }

    /// Assembler for this configuration
    ///
    /// # Errors
    /// Same as [`id_pattern`](Self::id_pattern).
    pub fn assembler(&self) -> Result<Assembler, ConfigError> {
        Ok(Assembler::new(&self.directory, self.id_pattern()?))
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            directory: String::new(),
            id_pattern: None,
            sheet_id: String::new(),
            requirements_range: "Requirements!A1:AH".to_string(),
            roster_range: "Roster!A1:C".to_string(),
            notify_on_noop: false,
        }
    }
}
