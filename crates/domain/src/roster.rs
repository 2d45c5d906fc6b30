//! Roster entries and operating-initials allocation.

use std::collections::{BTreeSet, HashSet};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use artcc_core::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::facility::FacilityId;
use crate::user::{Cid, User};

const LETTERS: std::ops::RangeInclusive<char> = 'A'..='Z';

/// Two-letter operating initials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OperatingInitials([u8; 2]);

impl OperatingInitials {
    /// Creates validated initials from two ASCII letters. Input is
    /// upper-cased.
    pub fn new(value: impl AsRef<str>) -> AppResult<Self> {
        let raw = value.as_ref().trim();
        let mut letters = raw.chars();
        match (letters.next(), letters.next(), letters.next()) {
            (Some(first), Some(second), None) => Self::from_letters(first, second).ok_or_else(|| {
                AppError::Validation(format!("operating initials '{raw}' must be two letters"))
            }),
            _ => Err(AppError::Validation(format!(
                "operating initials '{raw}' must be two letters"
            ))),
        }
    }

    /// Creates initials from two letters, returning `None` when either is not
    /// an ASCII letter.
    #[must_use]
    pub fn from_letters(first: char, second: char) -> Option<Self> {
        if !first.is_ascii_alphabetic() || !second.is_ascii_alphabetic() {
            return None;
        }

        Some(Self([
            first.to_ascii_uppercase() as u8,
            second.to_ascii_uppercase() as u8,
        ]))
    }

    /// Returns the initials as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII upper-case letters by construction.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl TryFrom<String> for OperatingInitials {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OperatingInitials> for String {
    fn from(value: OperatingInitials) -> Self {
        value.as_str().to_owned()
    }
}

impl Display for OperatingInitials {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Kind of roster membership. A roster entry has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipKind {
    /// Home facility membership.
    Home,
    /// Visiting membership.
    Visiting,
}

impl MembershipKind {
    /// Returns the storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Visiting => "visiting",
        }
    }

    /// Resolves a kind from the separate home/visiting flags used by
    /// roster forms. Exactly one flag must be set.
    pub fn from_flags(home: bool, visiting: bool) -> AppResult<Self> {
        match (home, visiting) {
            (true, false) => Ok(Self::Home),
            (false, true) => Ok(Self::Visiting),
            (true, true) => Err(AppError::Validation(
                "home and visiting cannot both be true".to_owned(),
            )),
            (false, false) => Err(AppError::Validation(
                "home and visiting cannot both be false".to_owned(),
            )),
        }
    }
}

impl FromStr for MembershipKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "home" => Ok(Self::Home),
            "visiting" => Ok(Self::Visiting),
            _ => Err(AppError::Validation(format!(
                "unknown membership kind '{value}'"
            ))),
        }
    }
}

/// Roster membership status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterStatus {
    /// Actively controlling.
    Active,
    /// Leave of absence.
    LeaveOfAbsence,
}

impl RosterStatus {
    /// Returns the storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::LeaveOfAbsence => "loa",
        }
    }
}

impl FromStr for RosterStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "loa" => Ok(Self::LeaveOfAbsence),
            _ => Err(AppError::Validation(format!(
                "unknown roster status '{value}'"
            ))),
        }
    }
}

/// Stable roster entry identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RosterEntryId(Uuid);

impl RosterEntryId {
    /// Creates a random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RosterEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RosterEntryId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// One controller's membership at one facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Stable entry identifier.
    pub id: RosterEntryId,
    /// Rostered controller.
    pub cid: Cid,
    /// Facility the entry belongs to.
    pub facility_id: FacilityId,
    /// Operating initials inside the facility.
    pub operating_initials: OperatingInitials,
    /// Home or visiting.
    pub membership_kind: MembershipKind,
    /// Active or leave of absence.
    pub status: RosterStatus,
    /// Mentor flag.
    pub mentor: bool,
    /// Instructor flag.
    pub instructor: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl RosterEntry {
    /// Returns whether the entry counts toward initials uniqueness.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == RosterStatus::Active
    }
}

/// Returns the ordered operating-initials candidates for a controller.
///
/// Order: preferred initials, first/last name initials, first initial with
/// every letter, every letter with last initial, then every pair `AA..ZZ`.
/// Duplicates are removed keeping the first occurrence.
#[must_use]
pub fn initials_candidates(user: &User) -> Vec<OperatingInitials> {
    let (first, last) = user.name_letters();
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    let mut push = |candidate: Option<OperatingInitials>| {
        if let Some(candidate) = candidate
            && seen.insert(candidate)
        {
            candidates.push(candidate);
        }
    };

    push(user.preferred_initials().copied());
    if let (Some(first), Some(last)) = (first, last) {
        push(OperatingInitials::from_letters(first, last));
    }
    if let Some(first) = first {
        for letter in LETTERS {
            push(OperatingInitials::from_letters(first, letter));
        }
    }
    if let Some(last) = last {
        for letter in LETTERS {
            push(OperatingInitials::from_letters(letter, last));
        }
    }
    for leading in LETTERS {
        for trailing in LETTERS {
            push(OperatingInitials::from_letters(leading, trailing));
        }
    }

    candidates
}

/// Picks the first candidate initials not held by an active entry.
///
/// Fails with a conflict when every two-letter pair is already active in the
/// facility.
pub fn resolve_operating_initials(
    user: &User,
    facility_id: &FacilityId,
    active_initials: &BTreeSet<OperatingInitials>,
) -> AppResult<OperatingInitials> {
    initials_candidates(user)
        .into_iter()
        .find(|candidate| !active_initials.contains(candidate))
        .ok_or_else(|| {
            AppError::Conflict(format!(
                "operating initials exhausted in facility '{facility_id}' for cid '{}'",
                user.cid()
            ))
        })
}
