//! Marker-delimited patching
//!
//! Requirement pages are written by people. The engine owns only the text
//! between two identical `<!--ID-->` markers and never touches anything
//! outside them.

use crate::error::PatchError;

/// Result of a patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Body changed; contains the new body
    Updated(String),
    /// New region equals the old one; nothing to push
    Noop,
}

impl PatchOutcome {
    /// Check if the patch changed nothing
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Noop)
    }
}

/// `<!--ID-->`
#[inline]
#[must_use]
pub fn marker(id: &str) -> String {
    format!("<!--{id}-->")
}

/// Byte range strictly between the two markers of `id`
///
/// # Errors
/// - [`PatchError::MarkerNotFound`] if fewer than two markers exist
/// - [`PatchError::UnbalancedMarkers`] if more than two exist
pub fn region_bounds(body: &str, id: &str) -> Result<(usize, usize), PatchError> {
    let marker = marker(id);
    let first = body.find(&marker).ok_or_else(|| PatchError::not_found(id))?;
    let start = first + marker.len();
    let end = body[start..]
        .find(&marker)
        .map(|i| start + i)
        .ok_or_else(|| PatchError::not_found(id))?;

    let occurrences = body.matches(&marker).count();
    if occurrences != 2 {
        return Err(PatchError::UnbalancedMarkers {
            id: id.to_string(),
            occurrences,
        });
    }
    Ok((start, end))
}

/// Current content of the region for `id`
///
/// # Errors
/// Same as [`region_bounds`].
pub fn region<'a>(body: &'a str, id: &str) -> Result<&'a str, PatchError> {
    let (start, end) = region_bounds(body, id)?;
    Ok(&body[start..end])
}

/// Replace the region for `id` with `fragment`
///
/// Markers and everything outside them are preserved byte for byte. When
/// the result equals `body`, returns [`PatchOutcome::Noop`].
///
/// # Errors
/// Same as [`region_bounds`]; `body` is never modified on error.
pub fn patch(body: &str, id: &str, fragment: &str) -> Result<PatchOutcome, PatchError> {
    let (start, end) = region_bounds(body, id)?;
    if &body[start..end] == fragment {
        return Ok(PatchOutcome::Noop);
    }

    let mut updated = String::with_capacity(body.len() - (end - start) + fragment.len());
    updated.push_str(&body[..start]);
    updated.push_str(fragment);
    updated.push_str(&body[end..]);
    Ok(PatchOutcome::Updated(updated))
}

/// IDs whose marker occurs exactly twice, in order of first occurrence
///
/// Comments containing whitespace (ordinary HTML comments) are ignored.
#[must_use]
pub fn marked_ids(body: &str) -> Vec<String> {
    marker_counts(body)
        .into_iter()
        .filter(|(_, count)| *count == 2)
        .map(|(id, _)| id)
        .collect()
}

/// Check that every marker accepted by `is_marker` delimits exactly one
/// region
///
/// Other comments are human text and never fail validation.
///
/// # Errors
/// [`PatchError::UnbalancedMarkers`] for the first accepted marker occurring
/// a number of times other than two.
pub fn validate_markers<F>(body: &str, is_marker: F) -> Result<(), PatchError>
where
    F: Fn(&str) -> bool,
{
    let unbalanced = marker_counts(body)
        .into_iter()
        .find(|(id, count)| *count != 2 && is_marker(id));
    match unbalanced {
        Some((id, occurrences)) => Err(PatchError::UnbalancedMarkers { id, occurrences }),
        None => Ok(()),
    }
}

fn marker_counts(body: &str) -> Vec<(String, usize)> {
    let mut seen: Vec<(String, usize)> = Vec::new();
    let mut rest = body;
    while let Some(open) = rest.find("<!--") {
        let after = &rest[open + 4..];
        let Some(close) = after.find("-->") else {
            break;
        };
        let id = &after[..close];
        if !id.is_empty() && !id.contains(char::is_whitespace) {
            match seen.iter_mut().find(|(s, _)| s.as_str() == id) {
                Some((_, count)) => *count += 1,
                None => seen.push((id.to_string(), 1)),
            }
        }
        rest = &after[close + 3..];
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn replaces_region() {
        let outcome = patch("<!--R1-->old<!--R1-->", "R1", "new").unwrap();
        assert_eq!(outcome, PatchOutcome::Updated("<!--R1-->new<!--R1-->".into()));
    }

    #[test]
    fn same_content_is_noop() {
        assert_eq!(patch("<!--R1-->old<!--R1-->", "R1", "old").unwrap(), PatchOutcome::Noop);
    }

    #[test]
    fn preserves_surrounding_text() {
        let body = "intro\n<!--R1-->\nold\n<!--R1-->\nhuman notes <!--R2-->x<!--R2-->";
        let PatchOutcome::Updated(updated) = patch(body, "R1", "\nnew\n").unwrap() else {
            panic!("expected update");
        };
        assert_eq!(updated, "intro\n<!--R1-->\nnew\n<!--R1-->\nhuman notes <!--R2-->x<!--R2-->");
    }

    #[test]
    fn missing_markers() {
        assert_eq!(patch("no markers", "R1", "x").unwrap_err(), PatchError::not_found("R1"));
        assert_eq!(patch("<!--R1--> once", "R1", "x").unwrap_err(), PatchError::not_found("R1"));
    }

    #[test]
    fn extra_markers_rejected() {
        let err = patch("<!--R1-->a<!--R1-->b<!--R1-->", "R1", "x").unwrap_err();
        assert_eq!(
            err,
            PatchError::UnbalancedMarkers {
                id: "R1".into(),
                occurrences: 3
            }
        );
    }

    #[test]
    fn empty_region_can_be_filled() {
        let outcome = patch("<!--R1--><!--R1-->", "R1", "x").unwrap();
        assert_eq!(outcome, PatchOutcome::Updated("<!--R1-->x<!--R1-->".into()));
    }

    #[test]
    fn region_reads_current_content() {
        assert_eq!(region("a<!--R-->mid<!--R-->b", "R").unwrap(), "mid");
    }

    #[test]
    fn marked_ids_in_order() {
        let body = "<!-- a note --><!--B-->x<!--B--> <!--A-->y<!--A--> <!--C-->";
        assert_eq!(marked_ids(body), vec!["B".to_string(), "A".to_string()]);
        assert!(marked_ids("<!--unterminated").is_empty());
    }

    #[test]
    fn validates_marker_pairs() {
        let any = |_: &str| true;
        assert!(validate_markers("<!-- note --><!--A-->x<!--A-->", any).is_ok());
        assert_eq!(
            validate_markers("<!--A-->x<!--A--><!--B-->", any).unwrap_err(),
            PatchError::UnbalancedMarkers {
                id: "B".into(),
                occurrences: 1
            }
        );
    }

    #[test]
    fn lone_human_comments_are_not_markers() {
        let body = "Intro <!--more-->\n<!--R1-->old<!--R1-->\n";
        assert!(validate_markers(body, |id| id.starts_with('R')).is_ok());
        assert!(patch(body, "R1", "new").is_ok());

        let err = validate_markers("<!--R1-->a<!--R1-->b<!--R1--><!--draft-->", |id| id.starts_with('R'))
            .unwrap_err();
        assert_eq!(
            err,
            PatchError::UnbalancedMarkers {
                id: "R1".into(),
                occurrences: 3
            }
        );
    }

    proptest! {
        #[test]
        fn patch_is_idempotent(
            before in "[a-z \n]{0,20}",
            old in "[a-z \n]{0,20}",
            after in "[a-z \n]{0,20}",
            fragment in "[a-z \n]{0,20}",
        ) {
            let body = format!("{before}<!--R1-->{old}<!--R1-->{after}");
            let once = match patch(&body, "R1", &fragment).unwrap() {
                PatchOutcome::Updated(b) => b,
                PatchOutcome::Noop => body.clone(),
            };
            prop_assert_eq!(patch(&once, "R1", &fragment).unwrap(), PatchOutcome::Noop);
            prop_assert!(once.starts_with(&before));
            prop_assert!(once.ends_with(&after));
        }
    }
}
