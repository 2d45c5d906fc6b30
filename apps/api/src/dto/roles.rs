use artcc_domain::{RoleAssignment, RoleDefinition, RoleId};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of one catalog role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-definition-response.ts"
)]
pub struct RoleDefinitionResponse {
    pub role: String,
    pub display_name: String,
    pub facility_based: bool,
    pub groups: Vec<String>,
    pub roles_can_add: Vec<String>,
    pub groups_can_add: Vec<String>,
}

/// Incoming payload for granting or revoking a role.
///
/// A missing or null `facility` addresses the division-wide scope.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-assignment-request.ts"
)]
pub struct RoleAssignmentRequest {
    pub cid: u32,
    pub role: String,
    #[serde(default)]
    pub facility: Option<String>,
}

/// API representation of a role assignment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-assignment-response.ts"
)]
pub struct RoleAssignmentResponse {
    pub assignment_id: String,
    pub cid: u32,
    pub role: String,
    pub facility: Option<String>,
    pub created_at: String,
}

impl From<(RoleId, &RoleDefinition)> for RoleDefinitionResponse {
    fn from((role, definition): (RoleId, &RoleDefinition)) -> Self {
        Self {
            role: role.as_str().to_owned(),
            display_name: definition.name().to_owned(),
            facility_based: definition.is_facility_based(),
            groups: definition
                .groups()
                .iter()
                .map(|group| group.as_str().to_owned())
                .collect(),
            roles_can_add: definition
                .roles_can_add()
                .iter()
                .map(|role| role.as_str().to_owned())
                .collect(),
            groups_can_add: definition
                .groups_can_add()
                .iter()
                .map(|group| group.as_str().to_owned())
                .collect(),
        }
    }
}

impl From<RoleAssignment> for RoleAssignmentResponse {
    fn from(value: RoleAssignment) -> Self {
        Self {
            assignment_id: value.id.to_string(),
            cid: value.cid.value(),
            role: value.role.as_str().to_owned(),
            facility: value.scope.facility_id().map(ToString::to_string),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}
