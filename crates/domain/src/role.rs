use std::fmt::{Display, Formatter};
use std::str::FromStr;

use artcc_core::AppError;
use serde::{Deserialize, Serialize};

/// Role codes known to the division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoleId {
    /// Division director.
    #[serde(rename = "USA1")]
    DivisionDirector,
    /// Deputy division director.
    #[serde(rename = "USA2")]
    DeputyDivisionDirector,
    /// Division staff member.
    #[serde(rename = "DIVISION_STAFF")]
    DivisionStaff,
    /// Division developer team member.
    #[serde(rename = "DEVELOPER")]
    DeveloperTeam,
    /// ACE team member.
    #[serde(rename = "ACE")]
    AceTeam,
    /// National traffic management supervisor.
    #[serde(rename = "NTMS")]
    NationalTrafficManagementSupervisor,
    /// National traffic management team member.
    #[serde(rename = "NTMT")]
    NationalTrafficManagementTeam,
    /// Social media team member.
    #[serde(rename = "SMT")]
    SocialMediaTeam,
    /// Training content team member.
    #[serde(rename = "TCT")]
    TrainingContentTeam,
    /// Academy material editor for the division academy.
    #[serde(rename = "CBT")]
    AcademyMaterialEditor,
    /// Facility air traffic manager.
    #[serde(rename = "ATM")]
    AirTrafficManager,
    /// Facility deputy air traffic manager.
    #[serde(rename = "DATM")]
    DeputyAirTrafficManager,
    /// Facility training administrator.
    #[serde(rename = "TA")]
    TrainingAdministrator,
    /// Facility event coordinator.
    #[serde(rename = "EC")]
    EventCoordinator,
    /// Facility engineer.
    #[serde(rename = "FE")]
    FacilityEngineer,
    /// Facility webmaster.
    #[serde(rename = "WM")]
    WebMaster,
    /// Facility instructor.
    #[serde(rename = "INS")]
    Instructor,
    /// Facility mentor.
    #[serde(rename = "MTR")]
    Mentor,
    /// Academy material editor scoped to one facility.
    #[serde(rename = "FACCBT")]
    FacilityMaterialEditor,
    /// Facility email account holder.
    #[serde(rename = "EMAIL")]
    EmailUser,
}

impl RoleId {
    /// Returns the stable role code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DivisionDirector => "USA1",
            Self::DeputyDivisionDirector => "USA2",
            Self::DivisionStaff => "DIVISION_STAFF",
            Self::DeveloperTeam => "DEVELOPER",
            Self::AceTeam => "ACE",
            Self::NationalTrafficManagementSupervisor => "NTMS",
            Self::NationalTrafficManagementTeam => "NTMT",
            Self::SocialMediaTeam => "SMT",
            Self::TrainingContentTeam => "TCT",
            Self::AcademyMaterialEditor => "CBT",
            Self::AirTrafficManager => "ATM",
            Self::DeputyAirTrafficManager => "DATM",
            Self::TrainingAdministrator => "TA",
            Self::EventCoordinator => "EC",
            Self::FacilityEngineer => "FE",
            Self::WebMaster => "WM",
            Self::Instructor => "INS",
            Self::Mentor => "MTR",
            Self::FacilityMaterialEditor => "FACCBT",
            Self::EmailUser => "EMAIL",
        }
    }

    /// Returns every known role code.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[RoleId] = &[
            RoleId::DivisionDirector,
            RoleId::DeputyDivisionDirector,
            RoleId::DivisionStaff,
            RoleId::DeveloperTeam,
            RoleId::AceTeam,
            RoleId::NationalTrafficManagementSupervisor,
            RoleId::NationalTrafficManagementTeam,
            RoleId::SocialMediaTeam,
            RoleId::TrainingContentTeam,
            RoleId::AcademyMaterialEditor,
            RoleId::AirTrafficManager,
            RoleId::DeputyAirTrafficManager,
            RoleId::TrainingAdministrator,
            RoleId::EventCoordinator,
            RoleId::FacilityEngineer,
            RoleId::WebMaster,
            RoleId::Instructor,
            RoleId::Mentor,
            RoleId::FacilityMaterialEditor,
            RoleId::EmailUser,
        ];

        ALL
    }

    /// Parses a transport value into a role code.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for RoleId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown role '{value}'")))
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Coarse permission groups used in grant rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupId {
    /// Division director and deputies.
    DivisionManagement,
    /// Division staff positions.
    DivisionStaff,
    /// Division web and tooling developers.
    DivisionDevelopment,
    /// Facility senior staff (ATM, DATM, TA).
    FacilityManagement,
    /// All facility staff positions.
    FacilityStaff,
    /// Facility training staff.
    FacilityTraining,
    /// Division academy staff.
    Academy,
    /// National traffic management.
    TrafficManagement,
}

impl GroupId {
    /// Returns the stable group code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DivisionManagement => "DIVISION_MANAGEMENT",
            Self::DivisionStaff => "DIVISION_STAFF",
            Self::DivisionDevelopment => "DIVISION_DEVELOPMENT",
            Self::FacilityManagement => "FACILITY_MANAGEMENT",
            Self::FacilityStaff => "FACILITY_STAFF",
            Self::FacilityTraining => "FACILITY_TRAINING",
            Self::Academy => "ACADEMY",
            Self::TrafficManagement => "TRAFFIC_MANAGEMENT",
        }
    }

    /// Returns every known group code.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[GroupId] = &[
            GroupId::DivisionManagement,
            GroupId::DivisionStaff,
            GroupId::DivisionDevelopment,
            GroupId::FacilityManagement,
            GroupId::FacilityStaff,
            GroupId::FacilityTraining,
            GroupId::Academy,
            GroupId::TrafficManagement,
        ];

        ALL
    }
}

impl FromStr for GroupId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|group| group.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown group '{value}'")))
    }
}

impl Display for GroupId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{GroupId, RoleId};

    #[test]
    fn role_codes_parse_back() {
        for role in RoleId::all() {
            let parsed = RoleId::from_str(role.as_str());
            assert!(matches!(parsed, Ok(value) if value == *role));
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(RoleId::from_transport("USA99").is_err());
        assert!(RoleId::from_transport("atm").is_err());
    }

    #[test]
    fn serde_uses_role_codes() {
        let encoded = serde_json::to_string(&RoleId::AirTrafficManager);
        assert_eq!(encoded.unwrap_or_default(), "\"ATM\"");

        let encoded = serde_json::to_string(&GroupId::DivisionManagement);
        assert_eq!(encoded.unwrap_or_default(), "\"DIVISION_MANAGEMENT\"");
    }

    #[test]
    fn group_codes_parse_back() {
        for group in GroupId::all() {
            assert!(matches!(GroupId::from_str(group.as_str()), Ok(value) if value == *group));
        }
        assert!(GroupId::from_str("FACILITY").is_err());
    }
}
