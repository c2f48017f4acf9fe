//! Opaque continuation cursor.

use std::fmt;

use bytes::Bytes;

/// Opaque continuation token produced by a paged listing call.
///
/// The lister never inspects the token. Only the [`PageSource`] that
/// produced it gives it meaning.
///
/// [`PageSource`]: crate::PageSource
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ContinuationToken(Bytes);

impl ContinuationToken {
    /// Wraps raw token bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw token bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the token as UTF-8, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Consumes the token and returns the underlying [`Bytes`].
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl fmt::Debug for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContinuationToken")
            .field("len", &self.0.len())
            .finish()
    }
}

/// Position in a segmented listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cursor {
    /// No further pages remain, or no page has been requested yet.
    #[default]
    Absent,
    /// More pages remain; forward the token verbatim on the next request.
    Present(ContinuationToken),
}

impl Cursor {
    /// Creates a present cursor from raw token bytes.
    pub fn present(token: impl Into<Bytes>) -> Self {
        Self::Present(ContinuationToken::new(token))
    }

    /// Returns true if more pages remain.
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Returns the continuation token, if present.
    pub fn token(&self) -> Option<&ContinuationToken> {
        match self {
            Self::Absent => None,
            Self::Present(token) => Some(token),
        }
    }
}

impl From<Option<ContinuationToken>> for Cursor {
    fn from(token: Option<ContinuationToken>) -> Self {
        token.map_or(Self::Absent, Self::Present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_absent() {
        assert_eq!(Cursor::default(), Cursor::Absent);
        assert!(!Cursor::default().is_present());
    }

    #[test]
    fn present_exposes_token() {
        let cursor = Cursor::present("next-marker");
        assert!(cursor.is_present());
        assert_eq!(cursor.token().and_then(|t| t.as_str()), Some("next-marker"));
    }

    #[test]
    fn debug_hides_token_contents() {
        let token = ContinuationToken::new("secret-marker");
        let debug = format!("{token:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("13"));
    }
}
