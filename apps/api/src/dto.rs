use serde::Serialize;
use ts_rs::TS;

mod directory;
mod roles;
mod roster;

pub use directory::{FacilityResponse, UpsertUserRequest, UserFlagsPayload, UserResponse};
pub use roles::{RoleAssignmentRequest, RoleAssignmentResponse, RoleDefinitionResponse};
pub use roster::{
    AdmitToRosterRequest, RosterDecisionRequest, RosterEntryResponse, RosterRequestListQuery,
    RosterRequestResponse, SubmitRosterRequestRequest, UpdateRosterStatusRequest,
};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}
