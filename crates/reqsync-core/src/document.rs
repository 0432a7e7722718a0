//! Remote documents
//!
//! A [`Document`] is fetched per operation and dropped afterwards; the
//! document store owns all persisted state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Document store identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

impl Display for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for DocumentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// One remote page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Store identifier
    pub id: DocumentId,
    /// Page path, without leading slash (e.g. `eps/2024_EPS_01`)
    pub path: String,
    /// Page title
    pub title: String,
    /// Literal markdown body
    #[serde(alias = "content")]
    pub body: String,
    /// Page description
    #[serde(default)]
    pub description: String,
    /// Author display name
    #[serde(default, alias = "authorName")]
    pub author: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Create document with the given body and `now` timestamps
    #[must_use]
    pub fn new(
        id: u64,
        path: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: DocumentId(id),
            path: normalize_path(&path.into()).to_string(),
            title: title.into(),
            body: body.into(),
            description: String::new(),
            author: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Path with a leading slash, as used in links
    #[inline]
    #[must_use]
    pub fn link_path(&self) -> String {
        format!("/{}", self.path)
    }
}

/// Strip leading slashes so paths compare equal regardless of link style
#[inline]
#[must_use]
pub fn normalize_path(path: &str) -> &str {
    path.trim().trim_start_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_store_payload() {
        let json = r###"{
            "id": 42,
            "path": "eps/drl",
            "title": "EPS DRL",
            "content": "## Group\n",
            "authorName": "Jane",
            "createdAt": "2024-01-02T03:04:05Z",
            "updatedAt": "2024-02-02T03:04:05Z"
        }"###;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.id, DocumentId(42));
        assert_eq!(doc.body, "## Group\n");
        assert_eq!(doc.author, "Jane");
        assert!(doc.description.is_empty());
        assert_eq!(doc.link_path(), "/eps/drl");
    }

    #[test]
    fn new_normalizes_path() {
        let doc = Document::new(1, "/eps/page", "Page", "");
        assert_eq!(doc.path, "eps/page");
    }

    #[test]
    fn normalize_path_strips_slashes() {
        assert_eq!(normalize_path("/a/b"), "a/b");
        assert_eq!(normalize_path("a/b"), "a/b");
        assert_eq!(normalize_path(" //a "), "a");
    }

    #[test]
    fn document_id_display() {
        assert_eq!(DocumentId(7).to_string(), "#7");
    }
}
