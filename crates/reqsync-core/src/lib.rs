//! Reqsync Core
//!
//! Turns requirement rows into markdown document bodies and back.
//!
//! # Components
//!
//! - [`FieldRecord`] / [`Sheet`]: header-keyed rows from the tabular store
//! - [`escape`]: transport escaping of bodies
//! - [`SectionTemplate`]: one field → one markdown fragment, or nothing
//! - [`verification`]: densely numbered verification blocks
//! - [`Assembler`]: requirement pages, rosters (DRL) and link trackers
//! - [`patch`]: replace the machine-owned `<!--ID-->…<!--ID-->` region
//! - [`parse_roster`]: recover groups and requirements from a roster
//! - [`LinkGraph`]: incoming and outgoing links from a link tracker
//!
//! # Data Flow
//!
//! ```text
//! rows → Sheet → FieldRecord* → Assembler → body → escape::encode → store
//! store → Document.body → parse_roster → FieldRecord* → rows
//! ```
//!
//! # Example
//!
//! ```rust
//! use reqsync_core::{parse_roster, Assembler, FieldRecord, IdPattern};
//!
//! let assembler = Assembler::new("dir", IdPattern::containing("2024"));
//! let record = FieldRecord::new()
//!     .with("ID", "2024_X_01")
//!     .with("Title", "Foo")
//!     .with("Description", "Bar.");
//! let roster = assembler.roster(&[record]).unwrap();
//! assert!(roster.starts_with("- [2024_X_01](/dir/2024_X_01) **Foo**\nBar.\n"));
//!
//! let parsed = parse_roster(&roster);
//! assert_eq!(parsed.items().next().unwrap().path, "dir/2024_X_01");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod assemble;
pub mod cursor;
pub mod digest;
pub mod document;
pub mod error;
pub mod escape;
pub mod links;
pub mod patch;
pub mod pattern;
pub mod record;
pub mod roster;
pub mod template;
pub mod verification;

// Re-exports
pub use assemble::{assemble_link_tracker, Assembler};
pub use digest::BodyDigest;
pub use document::{Document, DocumentId};
pub use error::{AssembleError, PatchError, RecordError, ERROR_BANNER, MALFORMED_SOURCE_DIAGNOSTIC};
pub use escape::TransportBody;
pub use links::{incoming_links, outgoing_links, LinkGraph, LinkRef};
pub use patch::{marked_ids, patch, validate_markers, PatchOutcome};
pub use pattern::IdPattern;
pub use record::{FieldRecord, Sheet, MAX_VERIFICATIONS};
pub use roster::{parse_roster, ParsedRoster, RosterEntry, RosterItem};
pub use template::SectionTemplate;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
