//! Immutable role and group catalog.
//!
//! The catalog is built once at startup and shared behind an `Arc`. Every
//! authorization decision in the service reads from it; nothing mutates it
//! after construction.

use std::collections::{BTreeSet, HashMap};

use artcc_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::role::{GroupId, RoleId};

/// Static definition of one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    name: String,
    facility_based: bool,
    groups: BTreeSet<GroupId>,
    roles_can_add: BTreeSet<RoleId>,
    groups_can_add: BTreeSet<GroupId>,
}

impl RoleDefinition {
    /// Creates a division-wide role definition with no groups and no grantors.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            facility_based: false,
            groups: BTreeSet::new(),
            roles_can_add: BTreeSet::new(),
            groups_can_add: BTreeSet::new(),
        }
    }

    /// Marks the role as held within one facility rather than division-wide.
    #[must_use]
    pub fn facility_based(mut self) -> Self {
        self.facility_based = true;
        self
    }

    /// Adds group memberships.
    #[must_use]
    pub fn in_groups(mut self, groups: impl IntoIterator<Item = GroupId>) -> Self {
        self.groups.extend(groups);
        self
    }

    /// Adds roles whose holders may grant this role.
    #[must_use]
    pub fn granted_by_roles(mut self, roles: impl IntoIterator<Item = RoleId>) -> Self {
        self.roles_can_add.extend(roles);
        self
    }

    /// Adds groups whose members may grant this role.
    #[must_use]
    pub fn granted_by_groups(mut self, groups: impl IntoIterator<Item = GroupId>) -> Self {
        self.groups_can_add.extend(groups);
        self
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns whether assignments of this role are scoped to one facility.
    #[must_use]
    pub fn is_facility_based(&self) -> bool {
        self.facility_based
    }

    /// Returns the groups this role belongs to.
    #[must_use]
    pub fn groups(&self) -> &BTreeSet<GroupId> {
        &self.groups
    }

    /// Returns the roles whose holders may grant this role.
    #[must_use]
    pub fn roles_can_add(&self) -> &BTreeSet<RoleId> {
        &self.roles_can_add
    }

    /// Returns the groups whose members may grant this role.
    #[must_use]
    pub fn groups_can_add(&self) -> &BTreeSet<GroupId> {
        &self.groups_can_add
    }

    /// Returns whether the role can only be seeded administratively.
    #[must_use]
    pub fn is_administratively_seeded(&self) -> bool {
        self.roles_can_add.is_empty() && self.groups_can_add.is_empty()
    }
}

/// Registry of every role definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCatalog {
    definitions: HashMap<RoleId, RoleDefinition>,
}

impl RoleCatalog {
    /// Builds a catalog from explicit definitions.
    ///
    /// Fails when a role is defined twice or when a definition lists a
    /// granting role that the catalog does not contain.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = (RoleId, RoleDefinition)>,
    ) -> AppResult<Self> {
        let mut by_role = HashMap::new();
        for (role, definition) in definitions {
            if definition.name.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "role '{role}' must have a display name"
                )));
            }

            if by_role.insert(role, definition).is_some() {
                return Err(AppError::Validation(format!(
                    "role '{role}' is defined more than once"
                )));
            }
        }

        for (role, definition) in &by_role {
            if let Some(missing) = definition
                .roles_can_add
                .iter()
                .find(|grantor| !by_role.contains_key(grantor))
            {
                return Err(AppError::Validation(format!(
                    "role '{role}' lists unknown granting role '{missing}'"
                )));
            }
        }

        Ok(Self {
            definitions: by_role,
        })
    }

    /// Builds the division's standard catalog.
    #[must_use]
    pub fn standard() -> Self {
        use GroupId as G;
        use RoleId as R;

        let facility_managers = [R::AirTrafficManager, R::DeputyAirTrafficManager];
        let training_managers = [
            R::AirTrafficManager,
            R::DeputyAirTrafficManager,
            R::TrainingAdministrator,
        ];

        let definitions = [
            (
                R::DivisionDirector,
                RoleDefinition::new("Division Director")
                    .in_groups([G::DivisionManagement, G::DivisionStaff]),
            ),
            (
                R::DeputyDivisionDirector,
                RoleDefinition::new("Deputy Division Director")
                    .in_groups([G::DivisionManagement, G::DivisionStaff])
                    .granted_by_roles([R::DivisionDirector]),
            ),
            (
                R::DivisionStaff,
                RoleDefinition::new("Division Staff")
                    .in_groups([G::DivisionStaff])
                    .granted_by_groups([G::DivisionManagement]),
            ),
            (
                R::DeveloperTeam,
                RoleDefinition::new("Developer Team")
                    .in_groups([G::DivisionDevelopment])
                    .granted_by_groups([G::DivisionManagement]),
            ),
            (
                R::AceTeam,
                RoleDefinition::new("ACE Team").granted_by_groups([G::DivisionManagement]),
            ),
            (
                R::NationalTrafficManagementSupervisor,
                RoleDefinition::new("National Traffic Management Supervisor")
                    .in_groups([G::TrafficManagement])
                    .granted_by_groups([G::DivisionManagement]),
            ),
            (
                R::NationalTrafficManagementTeam,
                RoleDefinition::new("National Traffic Management Team")
                    .in_groups([G::TrafficManagement])
                    .granted_by_roles([R::NationalTrafficManagementSupervisor])
                    .granted_by_groups([G::DivisionManagement]),
            ),
            (
                R::SocialMediaTeam,
                RoleDefinition::new("Social Media Team")
                    .granted_by_groups([G::DivisionManagement]),
            ),
            (
                R::TrainingContentTeam,
                RoleDefinition::new("Training Content Team")
                    .in_groups([G::Academy])
                    .granted_by_groups([G::DivisionManagement]),
            ),
            (
                R::AcademyMaterialEditor,
                RoleDefinition::new("Academy Material Editor (Academy)")
                    .in_groups([G::Academy])
                    .granted_by_roles([R::TrainingContentTeam])
                    .granted_by_groups([G::DivisionManagement]),
            ),
            (
                R::AirTrafficManager,
                RoleDefinition::new("Air Traffic Manager")
                    .facility_based()
                    .in_groups([G::FacilityManagement, G::FacilityStaff])
                    .granted_by_groups([G::DivisionManagement]),
            ),
            (
                R::DeputyAirTrafficManager,
                RoleDefinition::new("Deputy Air Traffic Manager")
                    .facility_based()
                    .in_groups([G::FacilityManagement, G::FacilityStaff])
                    .granted_by_roles([R::AirTrafficManager])
                    .granted_by_groups([G::DivisionManagement]),
            ),
            (
                R::TrainingAdministrator,
                RoleDefinition::new("Training Administrator")
                    .facility_based()
                    .in_groups([
                        G::FacilityManagement,
                        G::FacilityStaff,
                        G::FacilityTraining,
                    ])
                    .granted_by_roles(facility_managers)
                    .granted_by_groups([G::DivisionManagement]),
            ),
            (
                R::EventCoordinator,
                RoleDefinition::new("Event Coordinator")
                    .facility_based()
                    .in_groups([G::FacilityStaff])
                    .granted_by_roles(facility_managers)
                    .granted_by_groups([G::DivisionManagement]),
            ),
            (
                R::FacilityEngineer,
                RoleDefinition::new("Facility Engineer")
                    .facility_based()
                    .in_groups([G::FacilityStaff])
                    .granted_by_roles(facility_managers)
                    .granted_by_groups([G::DivisionManagement]),
            ),
            (
                R::WebMaster,
                RoleDefinition::new("Webmaster")
                    .facility_based()
                    .in_groups([G::FacilityStaff])
                    .granted_by_roles(facility_managers)
                    .granted_by_groups([G::DivisionManagement]),
            ),
            (
                R::Instructor,
                RoleDefinition::new("Instructor")
                    .facility_based()
                    .in_groups([G::FacilityTraining])
                    .granted_by_roles(training_managers)
                    .granted_by_groups([G::DivisionManagement]),
            ),
            (
                R::Mentor,
                RoleDefinition::new("Mentor")
                    .facility_based()
                    .in_groups([G::FacilityTraining])
                    .granted_by_roles(training_managers)
                    .granted_by_groups([G::DivisionManagement]),
            ),
            (
                R::FacilityMaterialEditor,
                RoleDefinition::new("Academy Material Editor (Facility)")
                    .facility_based()
                    .in_groups([G::FacilityTraining])
                    .granted_by_roles(training_managers)
                    .granted_by_groups([G::DivisionManagement, G::Academy]),
            ),
            (
                R::EmailUser,
                RoleDefinition::new("Email User")
                    .facility_based()
                    .granted_by_roles([
                        R::AirTrafficManager,
                        R::DeputyAirTrafficManager,
                        R::WebMaster,
                    ])
                    .granted_by_groups([G::DivisionManagement, G::DivisionDevelopment]),
            ),
        ];

        Self {
            definitions: definitions.into_iter().collect(),
        }
    }

    /// Returns the definition for a role, if the catalog contains it.
    #[must_use]
    pub fn definition(&self, role: RoleId) -> Option<&RoleDefinition> {
        self.definitions.get(&role)
    }

    /// Returns the display name for a role, if the catalog contains it.
    #[must_use]
    pub fn display_name(&self, role: RoleId) -> Option<&str> {
        self.definition(role).map(RoleDefinition::name)
    }

    /// Returns whether the role belongs to the group.
    #[must_use]
    pub fn in_group(&self, role: RoleId, group: GroupId) -> bool {
        self.definition(role)
            .is_some_and(|definition| definition.groups.contains(&group))
    }

    /// Returns whether the catalog defines the role.
    #[must_use]
    pub fn is_valid_role(&self, role: RoleId) -> bool {
        self.definitions.contains_key(&role)
    }

    /// Returns whether a raw role code names a role in the catalog.
    #[must_use]
    pub fn is_valid_role_code(&self, code: &str) -> bool {
        RoleId::from_transport(code).is_ok_and(|role| self.is_valid_role(role))
    }

    /// Returns every defined role with its definition, ordered by role code.
    #[must_use]
    pub fn roles(&self) -> Vec<(RoleId, &RoleDefinition)> {
        let mut roles: Vec<(RoleId, &RoleDefinition)> = self
            .definitions
            .iter()
            .map(|(role, definition)| (*role, definition))
            .collect();
        roles.sort_by(|left, right| left.0.as_str().cmp(right.0.as_str()));
        roles
    }

    /// Returns every role that belongs to the group, ordered by role code.
    #[must_use]
    pub fn roles_in_group(&self, group: GroupId) -> Vec<RoleId> {
        self.roles()
            .into_iter()
            .filter_map(|(role, definition)| definition.groups.contains(&group).then_some(role))
            .collect()
    }
}
