//! Testing utilities for the reqsync workspace
//!
//! In-memory collaborators, fixtures and tracing setup.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use reqsync_core::{Document, DocumentId, FieldRecord, TransportBody};
use reqsync_engine::{DocumentStore, Notifier, RemoteError, TableStore};
use std::collections::{BTreeMap, HashMap};

/// Document store backed by a map
///
/// Updates decode the transport body and replace the stored body, so a
/// following fetch sees what a real store would return.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<BTreeMap<DocumentId, Document>>,
    updates: Mutex<Vec<(DocumentId, String)>>,
    renders: Mutex<Vec<DocumentId>>,
    failure: Mutex<Option<RemoteError>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// With a stored document
    #[must_use]
    pub fn with_document(self, document: Document) -> Self {
        self.insert(document);
        self
    }

    pub fn insert(&self, document: Document) {
        self.documents.lock().insert(document.id, document);
    }

    /// Current body of a stored document
    pub fn body(&self, id: DocumentId) -> Option<String> {
        self.documents.lock().get(&id).map(|d| d.body.clone())
    }

    /// Transport bodies received by `update_document`, in call order
    pub fn updates(&self) -> Vec<(DocumentId, String)> {
        self.updates.lock().clone()
    }

    pub fn renders(&self) -> Vec<DocumentId> {
        self.renders.lock().clone()
    }

    /// Make every following call fail with `error`
    pub fn fail_with(&self, error: RemoteError) {
        *self.failure.lock() = Some(error);
    }

    fn check(&self) -> Result<(), RemoteError> {
        match self.failure.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn fetch_document(&self, id: DocumentId) -> Result<Document, RemoteError> {
        self.check()?;
        self.documents
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| RemoteError::not_found("document store", id.to_string()))
    }

    async fn update_document(&self, id: DocumentId, body: &TransportBody) -> Result<(), RemoteError> {
        self.check()?;
        let mut documents = self.documents.lock();
        let document = documents
            .get_mut(&id)
            .ok_or_else(|| RemoteError::not_found("document store", id.to_string()))?;
        document.body = body.decode();
        self.updates.lock().push((id, body.as_str().to_string()));
        Ok(())
    }

    async fn render_document(&self, id: DocumentId) -> Result<(), RemoteError> {
        self.check()?;
        self.renders.lock().push(id);
        Ok(())
    }
}

/// Table store keyed by `(sheet, range)`
#[derive(Debug, Default)]
pub struct InMemoryTableStore {
    ranges: Mutex<HashMap<(String, String), Vec<Vec<String>>>>,
    writes: Mutex<Vec<(String, String, Vec<Vec<String>>)>>,
}

impl InMemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// With rows stored under a range
    #[must_use]
    pub fn with_range(self, sheet_id: &str, range: &str, rows: Vec<Vec<String>>) -> Self {
        self.ranges
            .lock()
            .insert((sheet_id.to_string(), range.to_string()), rows);
        self
    }

    /// Rows currently stored under a range
    pub fn range(&self, sheet_id: &str, range: &str) -> Option<Vec<Vec<String>>> {
        self.ranges
            .lock()
            .get(&(sheet_id.to_string(), range.to_string()))
            .cloned()
    }

    pub fn writes(&self) -> Vec<(String, String, Vec<Vec<String>>)> {
        self.writes.lock().clone()
    }
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn fetch_table_range(&self, sheet_id: &str, range: &str) -> Result<Vec<Vec<String>>, RemoteError> {
        self.range(sheet_id, range)
            .ok_or_else(|| RemoteError::not_found("table store", format!("{sheet_id}/{range}")))
    }

    async fn write_table_range(&self, sheet_id: &str, range: &str, rows: &[Vec<String>]) -> Result<(), RemoteError> {
        self.ranges
            .lock()
            .insert((sheet_id.to_string(), range.to_string()), rows.to_vec());
        self.writes
            .lock()
            .push((sheet_id.to_string(), range.to_string(), rows.to_vec()));
        Ok(())
    }
}

/// Notifier that keeps every message
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) -> Result<(), RemoteError> {
        self.messages.lock().push(text.to_string());
        Ok(())
    }
}

/// Requirement record with the mandatory fields
pub fn requirement_record(id: &str, title: &str, description: &str) -> FieldRecord {
    FieldRecord::new()
        .with("ID", id)
        .with("Title", title)
        .with("Description", description)
}

/// Group header record
pub fn group_record(label: &str) -> FieldRecord {
    FieldRecord::new().with("ID", label)
}

/// Raw sheet rows: header then one row per line of cells
pub fn sheet_rows(header: &[&str], rows: &[&[&str]]) -> Vec<Vec<String>> {
    std::iter::once(header)
        .chain(rows.iter().copied())
        .map(|cells| cells.iter().map(|c| (*c).to_string()).collect())
        .collect()
}

/// Page body with one empty marker region per ID, framed by human text
pub fn page_with_markers(ids: &[&str]) -> String {
    let mut body = String::from("Human introduction.\n");
    for id in ids {
        body.push_str(&format!("<!--{id}--><!--{id}-->\nNotes on {id}.\n"));
    }
    body
}

/// Install a test-friendly tracing subscriber once
///
/// Honors `RUST_LOG`; output goes through the test harness capture.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
