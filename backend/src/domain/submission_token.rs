//! Client-supplied token that makes ticket creation safe to retry.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors for [`SubmissionToken`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionTokenValidationError {
    EmptyToken,
    InvalidToken,
}

impl fmt::Display for SubmissionTokenValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyToken => write!(f, "submission token must not be empty"),
            Self::InvalidToken => write!(f, "submission token must be a UUID"),
        }
    }
}

impl std::error::Error for SubmissionTokenValidationError {}

/// UUID sent in the `Idempotency-Key` header when a ticket is submitted.
///
/// Two submissions carrying the same token store one ticket; the second
/// returns the first. The token is kept in canonical hyphenated lowercase
/// form so differently cased retries still match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubmissionToken(Uuid, String);

impl SubmissionToken {
    /// Parse a token from its textual form.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::SubmissionToken;
    ///
    /// let token = SubmissionToken::new("9F1C2D3E-4A5B-4C6D-8E7F-0A1B2C3D4E5F")
    ///     .expect("valid token");
    /// assert_eq!(token.as_ref(), "9f1c2d3e-4a5b-4c6d-8e7f-0a1b2c3d4e5f");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SubmissionTokenValidationError> {
        let raw = raw.as_ref();
        if raw.is_empty() {
            return Err(SubmissionTokenValidationError::EmptyToken);
        }
        if raw.trim() != raw {
            return Err(SubmissionTokenValidationError::InvalidToken);
        }
        Uuid::parse_str(raw)
            .map(Self::from_uuid)
            .map_err(|_| SubmissionTokenValidationError::InvalidToken)
    }

    /// Wrap an already parsed UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.hyphenated().to_string())
    }

    /// Fresh random token.
    #[must_use]
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for SubmissionToken {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for SubmissionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<SubmissionToken> for String {
    fn from(value: SubmissionToken) -> Self {
        value.1
    }
}

impl TryFrom<String> for SubmissionToken {
    type Error = SubmissionTokenValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", SubmissionTokenValidationError::EmptyToken)]
    #[case("not-a-uuid", SubmissionTokenValidationError::InvalidToken)]
    #[case(" 9f1c2d3e-4a5b-4c6d-8e7f-0a1b2c3d4e5f", SubmissionTokenValidationError::InvalidToken)]
    fn rejects_malformed_tokens(
        #[case] raw: &str,
        #[case] expected: SubmissionTokenValidationError,
    ) {
        assert_eq!(SubmissionToken::new(raw), Err(expected));
    }

    #[rstest]
    fn differently_cased_tokens_are_equal() {
        let lower = SubmissionToken::new("9f1c2d3e-4a5b-4c6d-8e7f-0a1b2c3d4e5f").expect("lower");
        let upper = SubmissionToken::new("9F1C2D3E-4A5B-4C6D-8E7F-0A1B2C3D4E5F").expect("upper");
        assert_eq!(lower, upper);
    }

    #[rstest]
    fn random_tokens_round_trip_through_text() {
        let token = SubmissionToken::random();
        let parsed = SubmissionToken::new(token.to_string()).expect("parse own output");
        assert_eq!(parsed, token);
        assert_eq!(parsed.as_uuid(), token.as_uuid());
    }
}
