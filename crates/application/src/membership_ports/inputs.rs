use artcc_domain::{
    Cid, FacilityId, MembershipKind, RoleId, RoleScope, RosterRequestStatus, RosterRequestType,
};

/// Input payload for granting or revoking one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrantInput {
    /// Controller receiving or losing the role.
    pub cid: Cid,
    /// Role to grant or revoke.
    pub role: RoleId,
    /// Facility or division scope of the assignment.
    pub scope: RoleScope,
}

/// Input payload for submitting a roster request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRosterRequestInput {
    /// Requesting controller.
    pub cid: Cid,
    /// Requested facility.
    pub facility_id: FacilityId,
    /// Visiting or transferring.
    pub request_type: RosterRequestType,
    /// Free-text reason. Must not be blank.
    pub reason: String,
}

/// Input payload for direct roster admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmitToRosterInput {
    /// Controller being admitted.
    pub cid: Cid,
    /// Facility roster to admit into.
    pub facility_id: FacilityId,
    /// Home or visiting membership.
    pub membership_kind: MembershipKind,
    /// Mentor flag on the new entry.
    pub mentor: bool,
    /// Instructor flag on the new entry.
    pub instructor: bool,
}

impl AdmitToRosterInput {
    /// Creates an admission input with mentor and instructor flags cleared.
    #[must_use]
    pub fn new(cid: Cid, facility_id: FacilityId, membership_kind: MembershipKind) -> Self {
        Self {
            cid,
            facility_id,
            membership_kind,
            mentor: false,
            instructor: false,
        }
    }
}

/// Filter for listing roster requests. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterRequestQuery {
    /// Only requests for this facility.
    pub facility_id: Option<FacilityId>,
    /// Only requests by this controller.
    pub cid: Option<Cid>,
    /// Only requests of this type.
    pub request_type: Option<RosterRequestType>,
    /// Only requests in this status.
    pub status: Option<RosterRequestStatus>,
}

impl RosterRequestQuery {
    /// Returns whether a request passes the filter.
    #[must_use]
    pub fn matches(&self, request: &artcc_domain::RosterRequest) -> bool {
        self.facility_id
            .as_ref()
            .is_none_or(|facility_id| facility_id == &request.facility_id)
            && self.cid.is_none_or(|cid| cid == request.cid)
            && self
                .request_type
                .is_none_or(|request_type| request_type == request.request_type)
            && self.status.is_none_or(|status| status == request.status)
    }
}
