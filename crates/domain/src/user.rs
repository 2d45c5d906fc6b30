//! Controller identity as seen by the roster core.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use artcc_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::roster::OperatingInitials;

/// Numeric controller identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cid(u32);

impl Cid {
    /// Creates a controller identifier. Zero is not a valid CID.
    pub fn new(value: u32) -> AppResult<Self> {
        if value == 0 {
            return Err(AppError::Validation("cid must be positive".to_owned()));
        }

        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl FromStr for Cid {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed = value
            .trim()
            .parse::<u32>()
            .map_err(|error| AppError::Validation(format!("invalid cid '{value}': {error}")))?;
        Self::new(parsed)
    }
}

impl Display for Cid {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Controller record used for roster admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    cid: Cid,
    first_name: NonEmptyString,
    last_name: NonEmptyString,
    preferred_initials: Option<OperatingInitials>,
}

impl User {
    /// Creates a controller record.
    pub fn new(
        cid: Cid,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        preferred_initials: Option<OperatingInitials>,
    ) -> AppResult<Self> {
        Ok(Self {
            cid,
            first_name: NonEmptyString::new(first_name)?,
            last_name: NonEmptyString::new(last_name)?,
            preferred_initials,
        })
    }

    /// Returns the controller identifier.
    #[must_use]
    pub fn cid(&self) -> Cid {
        self.cid
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Returns the controller's preferred operating initials.
    #[must_use]
    pub fn preferred_initials(&self) -> Option<&OperatingInitials> {
        self.preferred_initials.as_ref()
    }

    /// Returns the full display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name(), self.last_name())
    }

    /// Returns the first-name initial and last-name initial, when both are
    /// ASCII letters.
    #[must_use]
    pub fn name_letters(&self) -> (Option<char>, Option<char>) {
        (
            first_ascii_letter(self.first_name()),
            first_ascii_letter(self.last_name()),
        )
    }
}

fn first_ascii_letter(value: &str) -> Option<char> {
    value
        .trim()
        .chars()
        .next()
        .filter(char::is_ascii_alphabetic)
        .map(|letter| letter.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Cid, User};

    #[test]
    fn cid_rejects_zero_and_garbage() {
        assert!(Cid::new(0).is_err());
        assert!(Cid::from_str("abc").is_err());
        assert!(Cid::from_str(" 1293257 ").is_ok_and(|cid| cid.value() == 1_293_257));
    }

    #[test]
    fn name_letters_are_upper_cased() {
        let Ok(cid) = Cid::new(1_293_257) else {
            unreachable!()
        };
        let user = User::new(cid, "jane", "doe", None);
        assert!(user.is_ok_and(|user| user.name_letters() == (Some('J'), Some('D'))));
    }

    #[test]
    fn non_ascii_name_letters_are_skipped() {
        let Ok(cid) = Cid::new(42) else {
            unreachable!()
        };
        let user = User::new(cid, "Élodie", "Dupont", None);
        assert!(user.is_ok_and(|user| user.name_letters() == (None, Some('D'))));
    }

    #[test]
    fn blank_names_are_rejected() {
        let Ok(cid) = Cid::new(42) else {
            unreachable!()
        };
        assert!(User::new(cid, " ", "Doe", None).is_err());
    }
}
