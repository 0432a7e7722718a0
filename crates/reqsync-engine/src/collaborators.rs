//! External collaborators
//!
//! The engine never talks HTTP itself. Document store, table store and chat
//! notifications are reached through these traits; each call either returns
//! usable content or a [`RemoteError`] for the caller to act on.

use crate::error::RemoteError;
use async_trait::async_trait;
use reqsync_core::{Document, DocumentId, TransportBody};

/// Remote page store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document with its literal body
    async fn fetch_document(&self, id: DocumentId) -> Result<Document, RemoteError>;

    /// Replace a document's body
    async fn update_document(&self, id: DocumentId, body: &TransportBody) -> Result<(), RemoteError>;

    /// Re-render a document so readers see the new body
    async fn render_document(&self, id: DocumentId) -> Result<(), RemoteError>;
}

/// Remote spreadsheet
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Read a range; rows may be shorter than the header
    async fn fetch_table_range(&self, sheet_id: &str, range: &str) -> Result<Vec<Vec<String>>, RemoteError>;

    /// Overwrite a range with `rows`
    async fn write_table_range(
        &self,
        sheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), RemoteError>;
}

/// Operator-facing message sink
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message
    async fn notify(&self, text: &str) -> Result<(), RemoteError>;
}
