//! Forward direction: records → document bodies
//!
//! - Requirement pages (one machine-owned region per requirement)
//! - Rosters (DRL): grouped list of every requirement in a sheet
//! - Link trackers: per page, the paths its body links to

use crate::document::Document;
use crate::error::AssembleError;
use crate::links::extract_link_paths;
use crate::pattern::IdPattern;
use crate::record::{keys, FieldRecord};
use crate::roster::{roster_item, GROUP_CLOSE};
use crate::template::page;
use crate::verification::render_verifications;

/// Builds page, roster and tracker bodies
#[derive(Debug, Clone)]
pub struct Assembler {
    /// Link prefix for roster items, empty or ending in `/`
    directory: String,
    /// Requirement vs. group header predicate
    pattern: IdPattern,
}

impl Assembler {
    /// Create assembler linking roster items under `directory`
    #[must_use]
    pub fn new(directory: &str, pattern: IdPattern) -> Self {
        let trimmed = directory.trim().trim_matches('/');
        let directory = if trimmed.is_empty() {
            String::new()
        } else {
            format!("{trimmed}/")
        };
        Self { directory, pattern }
    }

    /// Normalized directory prefix
    #[inline]
    #[must_use]
    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// Requirement ID predicate
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &IdPattern {
        &self.pattern
    }

    /// Page path (no leading slash) for a requirement ID
    #[inline]
    #[must_use]
    pub fn item_path(&self, id: &str) -> String {
        format!("{}{id}", self.directory)
    }

    /// Full requirement page body
    ///
    /// Sections in order: ID, Title, Description, info box (Source, Author,
    /// Assignee), Justification, Compliance, Criticality, Verification.
    ///
    /// # Errors
    /// [`AssembleError::MandatoryFieldMissing`] if ID, Title or Description
    /// is absent.
    pub fn requirement_page(&self, record: &FieldRecord) -> Result<String, AssembleError> {
        let id = mandatory(record, "<unknown>", keys::ID)?;
        mandatory(record, id, keys::TITLE)?;
        mandatory(record, id, keys::DESCRIPTION)?;

        let mut out = String::new();
        page::ID.render(&mut out, record);
        page::TITLE.render(&mut out, record);
        page::DESCRIPTION.render(&mut out, record);

        let mut info = String::new();
        for template in [page::SOURCE, page::AUTHOR, page::ASSIGNEE] {
            template.render(&mut info, record);
        }
        if !info.is_empty() {
            out.push('\n');
            out.push_str(&info);
            out.push_str(page::INFO_BOX_CLOSE);
        }

        page::JUSTIFICATION.render(&mut out, record);
        page::COMPLIANCE.render(&mut out, record);
        page::CRITICALITY.render(&mut out, record);
        render_verifications(&mut out, record);

        Ok(out)
    }

    /// Requirement page body framed for a marker region
    ///
    /// # Errors
    /// Same as [`requirement_page`](Self::requirement_page).
    pub fn requirement_region(&self, record: &FieldRecord) -> Result<String, AssembleError> {
        self.requirement_page(record).map(|body| format!("\n{body}"))
    }

    /// Roster (DRL) body for an ordered record list
    ///
    /// Records whose ID is not a requirement ID start a new `## ID` group and
    /// close the previous one with `{.links-list}`.
    ///
    /// # Errors
    /// [`AssembleError::MandatoryFieldMissing`] if any record lacks an ID, or
    /// any requirement lacks Title or Description. Nothing partial is
    /// returned.
    pub fn roster(&self, records: &[FieldRecord]) -> Result<String, AssembleError> {
        let mut out = String::new();
        let mut first_group = true;

        for record in records {
            let id = mandatory(record, "<unknown>", keys::ID)?;
            if !self.pattern.is_requirement_id(id) {
                if !first_group {
                    out.push_str(GROUP_CLOSE);
                    out.push_str("\n\n");
                }
                first_group = false;
                out.push_str(&format!("## {id}\n"));
                continue;
            }

            let title = mandatory(record, id, keys::TITLE)?;
            let description = mandatory(record, id, keys::DESCRIPTION)?;
            out.push_str(&roster_item(id, &self.item_path(id), title, description));
        }

        out.push_str(GROUP_CLOSE);
        out.push('\n');
        Ok(out)
    }
}

/// Link tracker body: one `## [Title](/path)` section per page listing the
/// paths its body links to
#[must_use]
pub fn assemble_link_tracker(pages: &[Document]) -> String {
    let mut out = String::new();
    for (i, doc) in pages.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("## [{}]({})\n", doc.title, doc.link_path()));
        for path in extract_link_paths(&doc.body) {
            out.push_str(&format!("- /{path}\n"));
        }
    }
    out
}

fn mandatory<'r>(
    record: &'r FieldRecord,
    id: &str,
    field: &'static str,
) -> Result<&'r str, AssembleError> {
    record
        .present(field)
        .ok_or_else(|| AssembleError::missing(id, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assembler() -> Assembler {
        Assembler::new("dir", IdPattern::containing("2024"))
    }

    fn requirement(id: &str, title: &str, description: &str) -> FieldRecord {
        FieldRecord::new()
            .with("ID", id)
            .with("Title", title)
            .with("Description", description)
    }

    fn group(label: &str) -> FieldRecord {
        FieldRecord::new().with("ID", label)
    }

    #[test]
    fn directory_is_normalized() {
        assert_eq!(Assembler::new("/dir/", IdPattern::containing("x")).directory(), "dir/");
        assert_eq!(Assembler::new("a/b", IdPattern::containing("x")).directory(), "a/b/");
        assert_eq!(Assembler::new("", IdPattern::containing("x")).directory(), "");
    }

    #[test]
    fn roster_single_item() {
        let body = assembler()
            .roster(&[requirement("2024_X_01", "Foo", "Bar.")])
            .unwrap();
        assert_eq!(body, "- [2024_X_01](/dir/2024_X_01) **Foo**\nBar.\n{.links-list}\n");
    }

    #[test]
    fn roster_groups() {
        let body = assembler()
            .roster(&[
                group("Power"),
                requirement("2024_P_01", "Battery", "Holds charge."),
                requirement("2024_P_02", "Solar", "Makes power."),
                group("Thermal"),
                requirement("2024_T_01", "Heater", "Keeps warm."),
            ])
            .unwrap();
        assert_eq!(
            body,
            "## Power\n\
             - [2024_P_01](/dir/2024_P_01) **Battery**\nHolds charge.\n\
             - [2024_P_02](/dir/2024_P_02) **Solar**\nMakes power.\n\
             {.links-list}\n\n\
             ## Thermal\n\
             - [2024_T_01](/dir/2024_T_01) **Heater**\nKeeps warm.\n\
             {.links-list}\n"
        );
    }

    #[test]
    fn group_ids_never_become_items() {
        let body = assembler().roster(&[group("Power"), group("Empty")]).unwrap();
        assert!(!body.contains("- ["));
        assert_eq!(body.matches("{.links-list}").count(), 2);
    }

    #[test]
    fn roster_requires_title_and_description() {
        let err = assembler()
            .roster(&[group("G"), requirement("2024_X_01", "Foo", "TBD")])
            .unwrap_err();
        assert_eq!(err, AssembleError::missing("2024_X_01", "Description"));

        let err = assembler()
            .roster(&[FieldRecord::new().with("ID", "2024_X_02").with("Description", "d")])
            .unwrap_err();
        assert_eq!(err, AssembleError::missing("2024_X_02", "Title"));
    }

    #[test]
    fn group_headers_need_no_title() {
        assert!(assembler().roster(&[group("Only a label")]).is_ok());
    }

    #[test]
    fn minimal_page() {
        let body = assembler()
            .requirement_page(&requirement("2024_X_01", "Foo", "Bar."))
            .unwrap();
        assert_eq!(body, "# 2024_X_01\n## Foo\n\nBar.\n");
    }

    #[test]
    fn full_page_section_order() {
        let record = requirement("2024_X_01", "Foo", "Bar.")
            .with("Source", "ECSS")
            .with("Author", "N/A")
            .with("Assignee", "Sam")
            .with("Justification", "Because.")
            .with("Compliance", "TBD")
            .with("Criticality", "High")
            .with("Verification Method 3", "Test")
            .with("Verification Status 3", "In progress");
        let body = assembler().requirement_page(&record).unwrap();
        assert_eq!(
            body,
            "# 2024_X_01\n## Foo\n\nBar.\n\
             \n> **Source**: ECSS\n> **Assignee**: Sam\n{.is-info}\n\
             \n# Justification\nBecause.\n\
             \n# Criticality\nHigh\n\
             \n# Verification\n\n## Verification 1\n**Method**: Test\n**Status**: 🟠 In progress\n"
        );
    }

    #[test]
    fn info_box_omitted_when_empty() {
        let record = requirement("2024_X_01", "Foo", "Bar.").with("Source", "");
        let body = assembler().requirement_page(&record).unwrap();
        assert!(!body.contains("{.is-info}"));
    }

    #[test]
    fn page_requires_mandatory_fields() {
        let err = assembler()
            .requirement_page(&FieldRecord::new().with("Title", "t"))
            .unwrap_err();
        assert_eq!(err, AssembleError::missing("<unknown>", "ID"));
    }

    #[test]
    fn region_is_framed() {
        let region = assembler()
            .requirement_region(&requirement("2024_X_01", "Foo", "Bar."))
            .unwrap();
        assert!(region.starts_with("\n# 2024_X_01\n"));
    }

    #[test]
    fn link_tracker_sections() {
        let pages = vec![
            Document::new(1, "eps/a", "A", "See [B](/eps/b) and [C](/eps/c#top)."),
            Document::new(2, "eps/b", "B", "No links."),
        ];
        assert_eq!(
            assemble_link_tracker(&pages),
            "## [A](/eps/a)\n- /eps/b\n- /eps/c\n\n## [B](/eps/b)\n"
        );
    }
}
