use artcc_domain::{Facility, User, UserFlags};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a facility.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/facility-response.ts"
)]
pub struct FacilityResponse {
    pub facility: String,
    pub name: String,
    pub url: Option<String>,
}

/// API representation of a controller record.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub cid: u32,
    pub first_name: String,
    pub last_name: String,
    pub preferred_initials: Option<String>,
}

/// Incoming payload for creating or updating a controller record.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/upsert-user-request.ts"
)]
pub struct UpsertUserRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub preferred_initials: Option<String>,
}

/// Membership flags of a controller, used for both reads and updates.
///
/// Omitted fields are cleared on update.
#[derive(Debug, Default, Deserialize, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-flags-payload.ts"
)]
pub struct UserFlagsPayload {
    #[serde(default)]
    pub no_staff_role: bool,
    #[serde(default)]
    pub no_visiting: bool,
    #[serde(default)]
    pub no_transferring: bool,
    #[serde(default)]
    pub no_training: bool,
}

impl From<UserFlags> for UserFlagsPayload {
    fn from(value: UserFlags) -> Self {
        Self {
            no_staff_role: value.no_staff_role,
            no_visiting: value.no_visiting,
            no_transferring: value.no_transferring,
            no_training: value.no_training,
        }
    }
}

impl From<UserFlagsPayload> for UserFlags {
    fn from(value: UserFlagsPayload) -> Self {
        Self {
            no_staff_role: value.no_staff_role,
            no_visiting: value.no_visiting,
            no_transferring: value.no_transferring,
            no_training: value.no_training,
        }
    }
}

impl From<Facility> for FacilityResponse {
    fn from(value: Facility) -> Self {
        Self {
            facility: value.id().to_string(),
            name: value.name().to_owned(),
            url: value.url().map(str::to_owned),
        }
    }
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            cid: value.cid().value(),
            first_name: value.first_name().to_owned(),
            last_name: value.last_name().to_owned(),
            preferred_initials: value
                .preferred_initials()
                .map(|initials| initials.as_str().to_owned()),
        }
    }
}
