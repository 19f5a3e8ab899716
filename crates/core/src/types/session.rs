//! Guest session identifier.
//!
//! Anonymous visitors get a client-generated token the first time they add
//! something to their cart. The backend keys the guest cart by this token
//! until the visitor authenticates and the cart is merged.

use core::fmt;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Prefix carried by every generated session identifier.
const PREFIX: &str = "guest_";

/// Number of random base-36 characters appended to the timestamp.
const RANDOM_LEN: usize = 13;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Errors that can occur when parsing a [`SessionId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionIdError {
    /// The input string is empty or whitespace.
    #[error("session id cannot be empty")]
    Empty,
    /// The input contains characters that cannot travel in an HTTP header.
    #[error("session id contains invalid characters")]
    InvalidCharacters,
}

/// An opaque guest session token.
///
/// Generated tokens look like `guest_1718000000000_k3j9x0a1b2c3d`: a unix
/// timestamp in milliseconds followed by random base-36 characters.
/// Tokens read back from storage are accepted as long as they are non-empty
/// and header-safe, since older clients may have written other formats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh session identifier.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let suffix: String = (0..RANDOM_LEN)
            .map(|_| {
                let idx = rng.random_range(0..BASE36.len());
                char::from(BASE36.get(idx).copied().unwrap_or(b'0'))
            })
            .collect();

        Self(format!("{PREFIX}{}_{suffix}", Utc::now().timestamp_millis()))
    }

    /// Parse a stored session identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty or contains characters outside
    /// visible ASCII.
    pub fn parse(s: &str) -> Result<Self, SessionIdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SessionIdError::Empty);
        }
        if !trimmed.chars().all(|c| c.is_ascii_graphic()) {
            return Err(SessionIdError::InvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identifier was produced by [`SessionId::generate`].
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.0.starts_with(PREFIX)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = SessionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_format() {
        let id = SessionId::generate();
        let parts: Vec<&str> = id.as_str().splitn(3, '_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "guest");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), RANDOM_LEN);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric() && !c.is_ascii_uppercase()));
        assert!(id.is_generated());
    }

    #[test]
    fn test_generate_is_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn test_parse_accepts_foreign_tokens() {
        let id = SessionId::parse("s1").unwrap();
        assert_eq!(id.as_str(), "s1");
        assert!(!id.is_generated());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(SessionId::parse("  s1\n").unwrap().as_str(), "s1");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(SessionId::parse("   "), Err(SessionIdError::Empty));
    }

    #[test]
    fn test_parse_rejects_header_unsafe() {
        assert_eq!(
            SessionId::parse("abc def"),
            Err(SessionIdError::InvalidCharacters)
        );
        assert_eq!(
            SessionId::parse("sesión"),
            Err(SessionIdError::InvalidCharacters)
        );
    }

    #[test]
    fn test_serde_validates() {
        let id: SessionId = serde_json::from_str("\"s1\"").unwrap();
        assert_eq!(id.as_str(), "s1");
        assert!(serde_json::from_str::<SessionId>("\"\"").is_err());
    }
}
