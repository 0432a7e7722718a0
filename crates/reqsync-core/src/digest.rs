//! Body digests for audit logging
//!
//! Provides [`BodyDigest`], a Blake3 hash of a document body recorded
//! before and after every push.

use std::fmt::{self, Display, Formatter};

/// Blake3 digest of a document body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyDigest([u8; 32]);

impl BodyDigest {
    /// Digest of `body`
    #[inline]
    #[must_use]
    pub fn of(body: &str) -> Self {
        Self(*blake3::hash(body.as_bytes()).as_bytes())
    }

    /// Raw bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for BodyDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(BodyDigest::of("body"), BodyDigest::of("body"));
        assert_ne!(BodyDigest::of("body"), BodyDigest::of("body\n"));
    }

    #[test]
    fn short_and_display() {
        let digest = BodyDigest::of("");
        assert_eq!(digest.short().len(), 16);
        assert_eq!(digest.to_string().len(), 64);
        assert!(digest.to_string().starts_with(&digest.short()));
    }
}
