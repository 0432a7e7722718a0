//! Transport escaping for document bodies
//!
//! The document store receives bodies embedded in a quoted query string, so
//! literal newlines and quotes are escaped before transport. Newlines are
//! escaped first, then quotes.

use std::fmt::{self, Display, Formatter};

/// A body already escaped for transport
///
/// Only produced by [`encode`] (or [`TransportBody::from_encoded`] for
/// collaborators that receive already-escaped text).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransportBody(String);

impl TransportBody {
    /// Wrap text that is already escaped
    #[inline]
    #[must_use]
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Escaped text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into escaped text
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Recover the literal body
    #[inline]
    #[must_use]
    pub fn decode(&self) -> String {
        decode(&self.0)
    }
}

impl Display for TransportBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape a literal body for transport
#[must_use]
pub fn encode(body: &str) -> TransportBody {
    TransportBody(body.replace('\n', "\\n").replace('"', "\\\""))
}

/// Undo [`encode`]
///
/// Single pass: `\n` becomes a newline and `\"` a quote; any other backslash
/// is kept as is.
#[must_use]
pub fn decode(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len());
    let mut chars = encoded.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('n') => {
                    chars.next();
                    out.push('\n');
                    continue;
                }
                Some('"') => {
                    chars.next();
                    out.push('"');
                    continue;
                }
                _ => {}
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_escapes_newlines_and_quotes() {
        let encoded = encode("say \"hi\"\nbye");
        assert_eq!(encoded.as_str(), "say \\\"hi\\\"\\nbye");
    }

    #[test]
    fn decode_keeps_unknown_escapes() {
        assert_eq!(decode("a\\tb\\nc"), "a\\tb\nc");
        assert_eq!(decode("trailing\\"), "trailing\\");
    }

    #[test]
    fn transport_body_decodes() {
        let body = "- [R1](/dir/R1) **\"Quoted\"**\nText\n";
        assert_eq!(encode(body).decode(), body);
    }

    proptest! {
        #[test]
        fn decode_inverts_encode_without_backslashes(body in "[^\\\\]{0,64}") {
            prop_assert_eq!(decode(encode(&body).as_str()), body);
        }

        #[test]
        fn encoded_body_has_no_raw_newlines(body in "(?s).{0,64}") {
            prop_assert!(!encode(&body).as_str().contains('\n'));
        }
    }
}
