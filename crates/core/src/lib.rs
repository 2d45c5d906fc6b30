//! Shared primitives for all Rust crates in the roster service.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across roster service crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input or unknown identifier.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller did not identify an acting user.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Acting user is identified but not permitted to perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Operation is not valid for the current lifecycle state of a resource.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Storage or other unexpected failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns a stable category label for logs and API payloads.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::InvalidState(_) => "invalid_state",
            Self::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn non_empty_string_keeps_original_value() {
        let value = NonEmptyString::new(" I want to visit ZDV ");
        assert!(value.is_ok());
        assert_eq!(
            value.map(String::from).unwrap_or_default(),
            " I want to visit ZDV "
        );
    }

    #[test]
    fn error_category_is_stable() {
        assert_eq!(
            AppError::InvalidState("request already accepted".to_owned()).category(),
            "invalid_state"
        );
        assert_eq!(
            AppError::Forbidden("missing grant".to_owned()).to_string(),
            "forbidden: missing grant"
        );
    }
}
