//! Reqsync Engine
//!
//! Runs synchronization commands between a requirement sheet and a
//! document store:
//! - Publishes rosters (DRL) and requirement pages from sheet rows
//! - Patches only the machine-owned marker regions of human-edited pages
//! - Recovers sheet rows from an edited roster
//! - Maintains link trackers and answers incoming/outgoing link queries
//!
//! Remote systems are reached through the [`DocumentStore`], [`TableStore`]
//! and [`Notifier`] traits.
//!
//! # Example
//!
//! ```rust,ignore
//! use reqsync_engine::{DocumentId, SyncConfig, SyncEngine};
//!
//! # async fn example(docs: impl DocumentStore, tables: impl TableStore, chat: impl Notifier)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//! let config = SyncConfig::from_file("reqsync.toml")?;
//! let engine = SyncEngine::new(config, docs, tables, chat)?;
//!
//! let outcome = engine.publish_roster(DocumentId(42)).await?;
//! println!("{} on {}: {:?}", outcome.command, outcome.document, outcome.change);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod collaborators;
pub mod config;
pub mod engine;
pub mod error;
pub mod outcome;

pub use collaborators::{DocumentStore, Notifier, TableStore};
pub use config::SyncConfig;
pub use engine::{SyncEngine, ROSTER_COLUMNS};
pub use error::{ConfigError, RemoteError, SyncError, SyncResult};
pub use outcome::{Change, Command, LinkReport, SyncOutcome, SyncStats};
pub use reqsync_core::{Document, DocumentId};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the engine
    pub use crate::{
        Change, Document, DocumentId, DocumentStore, Notifier, RemoteError, SyncConfig, SyncEngine,
        SyncError, SyncOutcome, TableStore,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
