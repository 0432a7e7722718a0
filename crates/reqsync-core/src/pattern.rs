//! Requirement ID recognition
//!
//! Roster rows whose ID does not look like a requirement ID are group
//! headers. What "looks like" means is injected here rather than fixed.

use chrono::Datelike;
use regex::Regex;

/// Predicate deciding whether an ID names a requirement
#[derive(Debug, Clone)]
pub enum IdPattern {
    /// ID contains the given token
    Contains(String),
    /// ID matches the regex
    Regex(Regex),
}

impl IdPattern {
    /// Compile a regex pattern
    ///
    /// # Errors
    /// Returns the regex compile error for invalid patterns
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::Regex)
    }

    /// IDs containing `token`
    #[inline]
    #[must_use]
    pub fn containing(token: impl Into<String>) -> Self {
        Self::Contains(token.into())
    }

    /// IDs containing the current calendar year (UTC)
    #[must_use]
    pub fn current_year() -> Self {
        Self::containing(chrono::Utc::now().year().to_string())
    }

    /// Check whether `id` is a requirement ID (as opposed to a group header)
    #[must_use]
    pub fn is_requirement_id(&self, id: &str) -> bool {
        match self {
            Self::Contains(token) => id.contains(token.as_str()),
            Self::Regex(re) => re.is_match(id),
        }
    }
}

impl Default for IdPattern {
    fn default() -> Self {
        Self::current_year()
    }
}
