use std::fmt::{Display, Formatter};

use artcc_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Three-letter facility code such as `ZDV`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FacilityId(String);

impl FacilityId {
    /// Creates a validated facility code.
    ///
    /// Input is trimmed and upper-cased; the result must be exactly three
    /// ASCII letters.
    pub fn new(value: impl AsRef<str>) -> AppResult<Self> {
        let normalized = value.as_ref().trim().to_ascii_uppercase();
        if normalized.len() != 3 || !normalized.chars().all(|value| value.is_ascii_uppercase()) {
            return Err(AppError::Validation(format!(
                "facility '{}' must be a three-letter code",
                value.as_ref()
            )));
        }

        Ok(Self(normalized))
    }

    /// Returns the facility code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for FacilityId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FacilityId> for String {
    fn from(value: FacilityId) -> Self {
        value.0
    }
}

impl Display for FacilityId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Organizational unit controllers can be rostered at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    id: FacilityId,
    name: NonEmptyString,
    url: Option<String>,
}

impl Facility {
    /// Creates a facility record.
    pub fn new(id: FacilityId, name: impl Into<String>, url: Option<String>) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            url: url.filter(|value| !value.trim().is_empty()),
        })
    }

    /// Returns the facility code.
    #[must_use]
    pub fn id(&self) -> &FacilityId {
        &self.id
    }

    /// Returns the facility display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the facility website, if known.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// Facilities every deployment starts with: the ARTCCs plus the special
/// academy, headquarters, non-member and inactive buckets.
pub const STANDARD_FACILITIES: &[(&str, &str)] = &[
    ("ZAE", "Academy"),
    ("ZHQ", "Headquarters"),
    ("ZZN", "Non-Member"),
    ("ZZI", "Inactive"),
    ("ZAB", "Albuquerque ARTCC"),
    ("ZAN", "Anchorage ARTCC"),
    ("ZTL", "Atlanta ARTCC"),
    ("ZBW", "Boston ARTCC"),
    ("ZAU", "Chicago ARTCC"),
    ("ZOB", "Cleveland ARTCC"),
    ("ZDV", "Denver ARTCC"),
    ("ZFW", "Fort Worth ARTCC"),
    ("HCF", "Honolulu Control Facility"),
    ("ZHU", "Houston ARTCC"),
    ("ZID", "Indianapolis ARTCC"),
    ("ZJX", "Jacksonville ARTCC"),
    ("ZKC", "Kansas City ARTCC"),
    ("ZLA", "Los Angeles ARTCC"),
    ("ZME", "Memphis ARTCC"),
    ("ZMA", "Miami ARTCC"),
    ("ZMP", "Minneapolis ARTCC"),
    ("ZNY", "New York ARTCC"),
    ("ZOA", "Oakland ARTCC"),
    ("ZLC", "Salt Lake ARTCC"),
    ("ZSE", "Seattle ARTCC"),
    ("ZDC", "Washington, D.C. ARTCC"),
];

/// Builds the standard facility records.
pub fn standard_facilities() -> AppResult<Vec<Facility>> {
    STANDARD_FACILITIES
        .iter()
        .map(|(code, name)| Facility::new(FacilityId::new(code)?, *name, None))
        .collect()
}
