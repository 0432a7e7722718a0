//! Roster (DRL) format and reverse parser
//!
//! A roster body is a flat list of items grouped under `## Label` headers:
//!
//! ```text
//! ## Power
//! - [2024_P_01](/eps/2024_P_01) **Battery**
//! Holds charge.
//! {.links-list}
//! ```
//!
//! [`parse_roster`] recovers the group headers and items from a body
//! produced by [`crate::Assembler::roster`]. Entries that do not match the
//! item shape are skipped and counted, never reported as errors.

use crate::cursor::Cursor;
use crate::record::{keys, FieldRecord};
use serde::{Deserialize, Serialize};

/// Start of a roster item
pub const ITEM_START: &str = "\n- [";
/// Between ID and path
pub const PATH_START: &str = "](/";
/// Between path and name
pub const NAME_START: &str = ") **";
/// Between name and description
pub const DESCRIPTION_START: &str = "**\n";
/// End of description
pub const DESCRIPTION_END: &str = "\n";
/// Start of a group header
pub const GROUP_START: &str = "\n## ";
/// Closing tag of a group's list
pub const GROUP_CLOSE: &str = "{.links-list}";

/// Render one roster item
#[must_use]
pub fn roster_item(id: &str, path: &str, name: &str, description: &str) -> String {
    format!("- [{id}](/{path}) **{name}**\n{description}\n")
}

/// One requirement recovered from a roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterItem {
    pub id: String,
    /// Page path without leading slash
    pub path: String,
    pub name: String,
    pub description: String,
}

impl RosterItem {
    /// Render back into roster form
    #[must_use]
    pub fn render(&self) -> String {
        roster_item(&self.id, &self.path, &self.name, &self.description)
    }
}

/// Group header or requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterEntry {
    Group { label: String },
    Requirement(RosterItem),
}

impl RosterEntry {
    /// Field record suitable for writing back to the sheet
    ///
    /// Groups carry only an `ID`; requirements carry `ID`, `Title` and
    /// `Description`.
    #[must_use]
    pub fn to_record(&self) -> FieldRecord {
        match self {
            Self::Group { label } => FieldRecord::new().with(keys::ID, label.as_str()),
            Self::Requirement(item) => FieldRecord::new()
                .with(keys::ID, item.id.as_str())
                .with(keys::TITLE, item.name.as_str())
                .with(keys::DESCRIPTION, item.description.as_str()),
        }
    }
}

/// Result of reverse parsing a roster
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRoster {
    /// Entries in document order
    pub entries: Vec<RosterEntry>,
    /// Item starts that did not yield a well-formed item
    pub skipped: usize,
}

impl ParsedRoster {
    /// Requirement items only
    pub fn items(&self) -> impl Iterator<Item = &RosterItem> {
        self.entries.iter().filter_map(|entry| match entry {
            RosterEntry::Requirement(item) => Some(item),
            RosterEntry::Group { .. } => None,
        })
    }

    /// Records in document order
    #[must_use]
    pub fn records(&self) -> Vec<FieldRecord> {
        self.entries.iter().map(RosterEntry::to_record).collect()
    }
}

/// Recover group headers and items from a roster body
///
/// Start of body counts as a line start. Always terminates: the cursor only
/// moves forward and every iteration advances it.
#[must_use]
pub fn parse_roster(body: &str) -> ParsedRoster {
    let text = format!("\n{body}");
    let mut cursor = Cursor::new(&text);
    let mut parsed = ParsedRoster::default();

    loop {
        let item = cursor.find(ITEM_START);
        let group = cursor.find(GROUP_START);

        match (group, item) {
            (Some(g), _) if item.map_or(true, |i| g < i) => {
                let label_start = g + GROUP_START.len();
                let line_end = cursor
                    .find_from(label_start, DESCRIPTION_END)
                    .unwrap_or(text.len());
                let label_end = item.map_or(line_end, |i| i.min(line_end));
                let label = cursor.slice(label_start, label_end);
                if !label.is_empty() {
                    parsed.entries.push(RosterEntry::Group {
                        label: label.to_string(),
                    });
                }
                cursor.advance_to(label_end.max(label_start));
            }
            (_, Some(i)) => match parse_item(&cursor, i) {
                Some((entry, end)) => {
                    parsed.entries.push(RosterEntry::Requirement(entry));
                    cursor.advance_to(end);
                }
                None => {
                    parsed.skipped += 1;
                    cursor.advance_to(i + ITEM_START.len());
                }
            },
            _ => break,
        }
    }

    if parsed.skipped > 0 {
        tracing::warn!(skipped = parsed.skipped, "skipped malformed roster entries");
    }
    parsed
}

/// Parse the item starting at `start`; returns it and the offset of its
/// terminating newline
fn parse_item(cursor: &Cursor<'_>, start: usize) -> Option<(RosterItem, usize)> {
    let id_start = start + ITEM_START.len();
    let path_tok = cursor.find_from(id_start, PATH_START)?;
    let path_start = path_tok + PATH_START.len();
    let name_tok = cursor.find_from(path_start, NAME_START)?;
    let name_start = name_tok + NAME_START.len();
    let desc_tok = cursor.find_from(name_start, DESCRIPTION_START)?;
    let desc_start = desc_tok + DESCRIPTION_START.len();
    let desc_end = cursor.find_from(desc_start, DESCRIPTION_END)?;

    let id = single_line(cursor.slice(id_start, path_tok))?;
    let path = single_line(cursor.slice(path_start, name_tok))?;
    let name = single_line(cursor.slice(name_start, desc_tok))?;
    let description = cursor.slice(desc_start, desc_end);
    if description.is_empty() || description.starts_with("- [") || description.starts_with("## ") {
        return None;
    }

    Some((
        RosterItem {
            id: id.to_string(),
            path: path.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        },
        desc_end,
    ))
}

fn single_line(s: &str) -> Option<&str> {
    (!s.is_empty() && !s.contains('\n')).then_some(s)
}
