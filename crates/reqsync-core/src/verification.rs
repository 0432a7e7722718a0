//! Verification blocks
//!
//! A requirement row carries up to [`MAX_VERIFICATIONS`] optional
//! (method, deadline, status) triples. Present triples are rendered with a
//! dense display number starting at 1; absent slots leave no gap.

use crate::record::{keys, FieldRecord, MAX_VERIFICATIONS};
use crate::template::SectionTemplate;
use std::borrow::Cow;

/// Section title emitted once before the first verification
pub const VERIFICATION_TITLE: &str = "\n# Verification\n";

/// Known verification states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationStatus {
    /// Verification done
    Completed,
    /// Verification started
    InProgress,
    /// Verification not started
    Uncompleted,
}

impl VerificationStatus {
    /// Parse the exact status strings used in the sheet
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Completed" => Some(Self::Completed),
            "In progress" => Some(Self::InProgress),
            "Uncompleted" => Some(Self::Uncompleted),
            _ => None,
        }
    }

    /// Colored indicator for this status
    #[inline]
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Completed => "🟢",
            Self::InProgress => "🟠",
            Self::Uncompleted => "🔴",
        }
    }
}

/// Prefix a known status with its indicator; unknown strings pass through
#[must_use]
pub fn decorate_status(value: &str) -> Cow<'_, str> {
    match VerificationStatus::parse(value) {
        Some(status) => Cow::Owned(format!("{} {value}", status.icon())),
        None => Cow::Borrowed(value),
    }
}

/// Append the verification block for `record` to `out`
///
/// Returns the number of verifications rendered.
pub fn render_verifications(out: &mut String, record: &FieldRecord) -> usize {
    let mut display = 0;
    for index in 1..=MAX_VERIFICATIONS {
        let method = SectionTemplate::labelled("Method", keys::verification_method(index));
        if record.present(method.field()).is_none() {
            continue;
        }

        display += 1;
        if display == 1 {
            out.push_str(VERIFICATION_TITLE);
        }
        out.push_str(&format!("\n## Verification {display}\n"));
        method.render(out, record);
        SectionTemplate::labelled("Deadline", keys::verification_deadline(index)).render(out, record);
        SectionTemplate::labelled("Status", keys::verification_status(index))
            .render_with(out, record, decorate_status);
    }
    display
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn status_icons() {
        assert_eq!(decorate_status("Completed"), "🟢 Completed");
        assert_eq!(decorate_status("In progress"), "🟠 In progress");
        assert_eq!(decorate_status("Uncompleted"), "🔴 Uncompleted");
        assert_eq!(decorate_status("Blocked"), "Blocked");
        assert_eq!(decorate_status("completed"), "completed");
    }

    #[test]
    fn no_title_without_verifications() {
        let record = FieldRecord::new()
            .with("Verification Deadline 1", "2024-05-01")
            .with("Verification Method 2", "N/A");
        let mut out = String::new();
        assert_eq!(render_verifications(&mut out, &record), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn renumbers_sparse_indices() {
        let record = FieldRecord::new()
            .with("Verification Method 2", "Inspection")
            .with("Verification Status 2", "Completed")
            .with("Verification Method 5", "Test")
            .with("Verification Deadline 5", "2024-06-30")
            .with("Verification Method 9", "Analysis")
            .with("Verification Status 9", "Waived");
        let mut out = String::new();
        assert_eq!(render_verifications(&mut out, &record), 3);
        assert_eq!(
            out,
            "\n# Verification\n\
             \n## Verification 1\n**Method**: Inspection\n**Status**: 🟢 Completed\n\
             \n## Verification 2\n**Method**: Test\n**Deadline**: 2024-06-30\n\
             \n## Verification 3\n**Method**: Analysis\n**Status**: Waived\n"
        );
    }

    #[test]
    fn deadline_without_method_is_skipped() {
        let record = FieldRecord::new()
            .with("Verification Deadline 1", "2024-01-01")
            .with("Verification Status 1", "Completed")
            .with("Verification Method 3", "Review");
        let mut out = String::new();
        render_verifications(&mut out, &record);
        assert!(!out.contains("2024-01-01"));
        assert!(out.contains("## Verification 1\n**Method**: Review\n"));
    }

    proptest! {
        #[test]
        fn display_numbers_are_dense(present in prop::collection::btree_set(1usize..=MAX_VERIFICATIONS, 0..=MAX_VERIFICATIONS)) {
            let mut record = FieldRecord::new();
            for index in &present {
                record.insert(keys::verification_method(*index), format!("method {index}"));
            }
            let mut out = String::new();
            let rendered = render_verifications(&mut out, &record);
            prop_assert_eq!(rendered, present.len());
            for (display, index) in present.iter().enumerate() {
                let expected = format!("## Verification {}\n**Method**: method {}\n", display + 1, index);
                prop_assert!(out.contains(&expected));
            }
        }
    }
}
