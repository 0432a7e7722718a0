//! Section templates
//!
//! A [`SectionTemplate`] is a markdown fragment containing one `$Field$`
//! placeholder. Rendering appends the fragment with the field's value
//! substituted, or appends nothing when the field is absent.

use crate::record::FieldRecord;
use std::borrow::Cow;

/// Markdown fragment with a single `$field$` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTemplate {
    template: Cow<'static, str>,
    field: Cow<'static, str>,
}

impl SectionTemplate {
    /// Create template for `field`; `template` must contain `$field$`
    #[inline]
    #[must_use]
    pub const fn new(template: &'static str, field: &'static str) -> Self {
        Self {
            template: Cow::Borrowed(template),
            field: Cow::Borrowed(field),
        }
    }

    /// Create `**label**: $field$` line template
    #[must_use]
    pub fn labelled(label: &str, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            template: Cow::Owned(format!("**{label}**: ${field}$\n")),
            field: Cow::Owned(field),
        }
    }

    /// Field name this template reads
    #[inline]
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Placeholder token, e.g. `$Title$`
    #[inline]
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("${}$", self.field)
    }

    /// Append the rendered fragment to `out`
    ///
    /// Returns `false` and leaves `out` untouched when the field is absent
    /// (missing, empty, `N/A` or `TBD`).
    pub fn render(&self, out: &mut String, record: &FieldRecord) -> bool {
        self.render_with(out, record, Cow::Borrowed)
    }

    /// Like [`render`](Self::render) but passes the value through `decorate`
    /// before substitution
    pub fn render_with<'r, F>(&self, out: &mut String, record: &'r FieldRecord, decorate: F) -> bool
    where
        F: FnOnce(&'r str) -> Cow<'r, str>,
    {
        let Some(value) = record.present(&self.field) else {
            return false;
        };
        let value = decorate(value);
        out.push_str(&self.template.replace(&self.placeholder(), &value));
        true
    }
}

/// Templates used by requirement pages
pub mod page {
    use super::SectionTemplate;
    use crate::record::keys;

    pub const ID: SectionTemplate = SectionTemplate::new("# $ID$\n", keys::ID);
    pub const TITLE: SectionTemplate = SectionTemplate::new("## $Title$\n", keys::TITLE);
    pub const DESCRIPTION: SectionTemplate =
        SectionTemplate::new("\n$Description$\n", keys::DESCRIPTION);
    pub const SOURCE: SectionTemplate = SectionTemplate::new("> **Source**: $Source$\n", keys::SOURCE);
    pub const AUTHOR: SectionTemplate = SectionTemplate::new("> **Author**: $Author$\n", keys::AUTHOR);
    pub const ASSIGNEE: SectionTemplate =
        SectionTemplate::new("> **Assignee**: $Assignee$\n", keys::ASSIGNEE);
    pub const JUSTIFICATION: SectionTemplate =
        SectionTemplate::new("\n# Justification\n$Justification$\n", keys::JUSTIFICATION);
    pub const COMPLIANCE: SectionTemplate =
        SectionTemplate::new("\n# Compliance\n$Compliance$\n", keys::COMPLIANCE);
    pub const CRITICALITY: SectionTemplate =
        SectionTemplate::new("\n# Criticality\n$Criticality$\n", keys::CRITICALITY);

    /// Closing tag of the info box
    pub const INFO_BOX_CLOSE: &str = "{.is-info}\n";
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn renders_present_field() {
        let record = FieldRecord::new().with("Title", "Foo");
        let mut out = String::from("> ");
        assert!(page::TITLE.render(&mut out, &record));
        assert_eq!(out, "> ## Foo\n");
    }

    #[test]
    fn omits_absent_fields() {
        for value in ["", "N/A", "TBD"] {
            let record = FieldRecord::new().with("Title", value);
            let mut out = String::new();
            assert!(!page::TITLE.render(&mut out, &record));
            assert!(out.is_empty());
        }
        let mut out = String::new();
        assert!(!page::TITLE.render(&mut out, &FieldRecord::new()));
        assert!(out.is_empty());
    }

    #[test]
    fn value_is_substituted_literally() {
        let record = FieldRecord::new().with("Title", "costs $5$ and $Title$");
        let mut out = String::new();
        page::TITLE.render(&mut out, &record);
        assert_eq!(out, "## costs $5$ and $Title$\n");
    }

    #[test]
    fn labelled_template() {
        let template = SectionTemplate::labelled("Method", "Verification Method 4");
        assert_eq!(template.placeholder(), "$Verification Method 4$");
        let record = FieldRecord::new().with("Verification Method 4", "Test");
        let mut out = String::new();
        assert!(template.render(&mut out, &record));
        assert_eq!(out, "**Method**: Test\n");
    }

    #[test]
    fn render_with_decorates_value() {
        let record = FieldRecord::new().with("Title", "foo");
        let mut out = String::new();
        page::TITLE.render_with(&mut out, &record, |v| Cow::Owned(v.to_uppercase()));
        assert_eq!(out, "## FOO\n");
    }

    proptest! {
        #[test]
        fn absent_field_renders_nothing_regardless_of_other_fields(
            other in "[a-zA-Z ]{1,16}",
            sentinel in prop::sample::select(vec!["", "N/A", "TBD"]),
        ) {
            let record = FieldRecord::new()
                .with("Title", sentinel)
                .with("Description", other.clone())
                .with("Source", other);
            let mut out = String::new();
            prop_assert!(!page::TITLE.render(&mut out, &record));
            prop_assert!(out.is_empty());
        }
    }
}
