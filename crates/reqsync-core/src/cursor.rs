//! Forward-only token scanning over an immutable buffer

/// Read-only view over text with a monotonic position
///
/// All positions are byte offsets. Tokens searched for are ASCII, so every
/// offset returned lies on a char boundary.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor at the start of `text`
    #[inline]
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Current offset
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whole underlying text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Check if the cursor reached the end
    #[inline]
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Offset of the next `token` at or after the cursor
    #[inline]
    #[must_use]
    pub fn find(&self, token: &str) -> Option<usize> {
        self.find_from(self.pos, token)
    }

    /// Offset of the next `token` at or after `from`
    #[must_use]
    pub fn find_from(&self, from: usize, token: &str) -> Option<usize> {
        self.text.get(from..)?.find(token).map(|i| from + i)
    }

    /// Move forward to `pos`; never moves backwards
    #[inline]
    pub fn advance_to(&mut self, pos: usize) {
        self.pos = self.pos.max(pos.min(self.text.len()));
    }

    /// Text between two offsets
    #[inline]
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        self.text.get(start..end).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_is_relative_to_position() {
        let mut cursor = Cursor::new("ab ab ab");
        assert_eq!(cursor.find("ab"), Some(0));
        cursor.advance_to(1);
        assert_eq!(cursor.find("ab"), Some(3));
        assert_eq!(cursor.find_from(4, "ab"), Some(6));
        assert_eq!(cursor.find("zz"), None);
    }

    #[test]
    fn advance_is_monotonic_and_clamped() {
        let mut cursor = Cursor::new("abc");
        cursor.advance_to(2);
        cursor.advance_to(1);
        assert_eq!(cursor.position(), 2);
        cursor.advance_to(100);
        assert!(cursor.is_at_end());
        assert_eq!(cursor.find("a"), None);
    }

    #[test]
    fn slice_out_of_range_is_empty() {
        let cursor = Cursor::new("abc");
        assert_eq!(cursor.slice(1, 3), "bc");
        assert_eq!(cursor.slice(2, 10), "");
    }
}
