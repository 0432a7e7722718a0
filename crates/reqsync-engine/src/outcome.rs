//! Command results

use reqsync_core::{BodyDigest, DocumentId, LinkRef};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// Top-level synchronization commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    PublishRoster,
    PublishRequirement,
    PublishAllRequirements,
    PullRoster,
    RefreshLinkTracker,
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PublishRoster => "publish-roster",
            Self::PublishRequirement => "publish-requirement",
            Self::PublishAllRequirements => "publish-all-requirements",
            Self::PullRoster => "pull-roster",
            Self::RefreshLinkTracker => "refresh-link-tracker",
        };
        f.write_str(name)
    }
}

/// What a command changed remotely
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Document body replaced
    Updated { before: BodyDigest, after: BodyDigest },
    /// New body equals the old one; no remote mutation
    Noop,
    /// Rows written to the table store
    TableWritten { rows: usize },
}

/// Per-command counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Marker regions whose content changed
    pub patched: usize,
    /// Marker regions already up to date
    pub unchanged: usize,
    /// Marker regions with no matching sheet row
    pub missing: usize,
    /// Records replaced by the error banner
    pub failed: usize,
    /// Malformed roster entries skipped while parsing
    pub skipped: usize,
}

/// Successful command result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub command: Command,
    /// Document read or written
    pub document: DocumentId,
    pub change: Change,
    pub stats: SyncStats,
}

impl SyncOutcome {
    /// Create outcome with empty stats
    #[inline]
    #[must_use]
    pub fn new(command: Command, document: DocumentId, change: Change) -> Self {
        Self {
            command,
            document,
            change,
            stats: SyncStats::default(),
        }
    }

    /// With stats
    #[inline]
    #[must_use]
    pub fn with_stats(mut self, stats: SyncStats) -> Self {
        self.stats = stats;
        self
    }

    /// Check if nothing was mutated remotely
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self.change, Change::Noop)
    }
}

/// Incoming and outgoing links of one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Subject page path, no leading slash
    pub path: String,
    /// Pages linking to the subject
    pub incoming: BTreeSet<LinkRef>,
    /// Paths the subject links to
    pub outgoing: BTreeSet<String>,
}
