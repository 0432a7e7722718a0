//! Link extraction and the link graph
//!
//! A link tracker body lists, per page, the site-local paths that page links
//! to:
//!
//! ```text
//! ## [Battery](/eps/battery)
//! - /eps/solar
//! - /eps/harness
//! ```
//!
//! Outgoing links of a page are read directly from its section; incoming
//! links are found by inverting every section.

use crate::cursor::Cursor;
use crate::document::normalize_path;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const LINK_TARGET: &str = "](/";
const SECTION_START: &str = "\n## [";
const SECTION_PATH: &str = "](";

/// Site-local link targets in `body`, first-seen order, deduplicated
///
/// Anchors and query strings are dropped; returned paths have no leading
/// slash.
#[must_use]
pub fn extract_link_paths(body: &str) -> Vec<String> {
    let mut paths = IndexSet::new();
    let mut rest = body;
    while let Some(at) = rest.find(LINK_TARGET) {
        let target = &rest[at + LINK_TARGET.len()..];
        let end = target
            .find(|c: char| c == ')' || c.is_whitespace())
            .unwrap_or(target.len());
        let path = target[..end]
            .split(|c: char| c == '#' || c == '?')
            .next()
            .unwrap_or_default();
        let path = normalize_path(path);
        if !path.is_empty() {
            paths.insert(path.to_string());
        }
        rest = &target[end..];
    }
    paths.into_iter().collect()
}

/// Page title and path (no leading slash)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkRef {
    pub title: String,
    pub path: String,
}

/// One page's section of a link tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerSection {
    /// The page the section describes
    pub page: LinkRef,
    /// Paths the page links to, in listed order
    pub links: Vec<String>,
}

/// Parsed link tracker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkGraph {
    sections: Vec<TrackerSection>,
}

impl LinkGraph {
    /// Parse a tracker body
    ///
    /// Headers that are not `## [Title](/path)` are ignored along with their
    /// lists.
    #[must_use]
    pub fn parse(tracker_body: &str) -> Self {
        let text = format!("\n{tracker_body}");
        let mut cursor = Cursor::new(&text);
        let mut sections = Vec::new();

        while let Some(start) = cursor.find(SECTION_START) {
            let header_start = start + SECTION_START.len();
            let next = cursor
                .find_from(header_start, SECTION_START)
                .unwrap_or(text.len());
            let block = cursor.slice(header_start, next);
            if let Some(section) = parse_section(block) {
                sections.push(section);
            }
            cursor.advance_to(next);
        }

        Self { sections }
    }

    /// All parsed sections
    #[inline]
    #[must_use]
    pub fn sections(&self) -> &[TrackerSection] {
        &self.sections
    }

    /// Pages that link to `subject`
    #[must_use]
    pub fn incoming(&self, subject: &str) -> BTreeSet<LinkRef> {
        let subject = normalize_path(subject);
        self.sections
            .iter()
            .filter(|s| s.links.iter().any(|l| l == subject))
            .map(|s| s.page.clone())
            .collect()
    }

    /// Paths `subject` links to, from the first section describing it
    #[must_use]
    pub fn outgoing(&self, subject: &str) -> BTreeSet<String> {
        let subject = normalize_path(subject);
        self.sections
            .iter()
            .find(|s| s.page.path == subject)
            .map(|s| s.links.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Tracked pages no other page links to
    #[must_use]
    pub fn orphans(&self) -> Vec<&LinkRef> {
        self.sections
            .iter()
            .map(|s| &s.page)
            .filter(|page| {
                !self
                    .sections
                    .iter()
                    .any(|s| s.page.path != page.path && s.links.contains(&page.path))
            })
            .collect()
    }
}

/// Pages whose tracker section lists `subject_path`
#[must_use]
pub fn incoming_links(tracker_body: &str, subject_path: &str) -> BTreeSet<LinkRef> {
    LinkGraph::parse(tracker_body).incoming(subject_path)
}

/// Paths listed in the tracker section of `subject_path`
#[must_use]
pub fn outgoing_links(tracker_body: &str, subject_path: &str) -> BTreeSet<String> {
    LinkGraph::parse(tracker_body).outgoing(subject_path)
}

/// `Title](/path)\n- /a\n- /b` (leading `## [` already consumed)
fn parse_section(block: &str) -> Option<TrackerSection> {
    let (header, list) = block.split_once('\n').unwrap_or((block, ""));
    let (title, rest) = header.split_once(SECTION_PATH)?;
    let path = rest.strip_suffix(')').unwrap_or(rest);
    let path = normalize_path(path);
    if title.is_empty() || path.is_empty() {
        return None;
    }

    let links = list
        .lines()
        .filter_map(|line| line.trim().strip_prefix("- "))
        .filter_map(list_item_path)
        .collect();

    Some(TrackerSection {
        page: LinkRef {
            title: title.to_string(),
            path: path.to_string(),
        },
        links,
    })
}

/// `/path` or `[text](/path)`
fn list_item_path(item: &str) -> Option<String> {
    let item = item.trim();
    let raw = match item.split_once(SECTION_PATH) {
        Some((_, target)) if item.starts_with('[') => target.strip_suffix(')').unwrap_or(target),
        _ => item,
    };
    let path = normalize_path(raw);
    (!path.is_empty()).then(|| path.to_string())
}
