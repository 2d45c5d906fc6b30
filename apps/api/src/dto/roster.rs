use artcc_domain::{RosterEntry, RosterRequest};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for a visiting or transferring request.
///
/// `cid` defaults to the acting controller.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/submit-roster-request-request.ts"
)]
pub struct SubmitRosterRequestRequest {
    #[serde(default)]
    pub cid: Option<u32>,
    pub facility: String,
    pub request_type: String,
    pub reason: String,
}

/// Query parameters for listing roster requests.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/roster-request-list-query.ts"
)]
pub struct RosterRequestListQuery {
    pub facility: Option<String>,
    pub cid: Option<u32>,
    pub request_type: Option<String>,
    pub status: Option<String>,
}

/// Incoming payload for deciding a pending request.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/roster-decision-request.ts"
)]
pub struct RosterDecisionRequest {
    pub decision: String,
}

/// API representation of a roster request.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/roster-request-response.ts"
)]
pub struct RosterRequestResponse {
    pub request_id: String,
    pub cid: u32,
    pub facility: String,
    pub request_type: String,
    pub status: String,
    pub reason: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Incoming payload for direct roster admission.
///
/// Exactly one of `home` and `visiting` must be set.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/admit-to-roster-request.ts"
)]
pub struct AdmitToRosterRequest {
    pub cid: u32,
    #[serde(default)]
    pub home: bool,
    #[serde(default)]
    pub visiting: bool,
    #[serde(default)]
    pub mentor: bool,
    #[serde(default)]
    pub instructor: bool,
}

/// Incoming payload for moving a roster entry between active and leave.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-roster-status-request.ts"
)]
pub struct UpdateRosterStatusRequest {
    pub status: String,
}

/// API representation of a roster entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/roster-entry-response.ts"
)]
pub struct RosterEntryResponse {
    pub entry_id: String,
    pub cid: u32,
    pub facility: String,
    pub operating_initials: String,
    pub membership_kind: String,
    pub status: String,
    pub mentor: bool,
    pub instructor: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<RosterRequest> for RosterRequestResponse {
    fn from(value: RosterRequest) -> Self {
        Self {
            request_id: value.id.to_string(),
            cid: value.cid.value(),
            facility: value.facility_id.to_string(),
            request_type: value.request_type.as_str().to_owned(),
            status: value.status.as_str().to_owned(),
            reason: value.reason,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

impl From<RosterEntry> for RosterEntryResponse {
    fn from(value: RosterEntry) -> Self {
        Self {
            entry_id: value.id.to_string(),
            cid: value.cid.value(),
            facility: value.facility_id.to_string(),
            operating_initials: value.operating_initials.as_str().to_owned(),
            membership_kind: value.membership_kind.as_str().to_owned(),
            status: value.status.as_str().to_owned(),
            mentor: value.mentor,
            instructor: value.instructor,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}
