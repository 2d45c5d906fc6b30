//! Domain entities and invariants for division roles and facility rosters.

#![forbid(unsafe_code)]

mod assignment;
mod audit;
mod catalog;
mod facility;
mod role;
mod roster;
mod roster_request;
mod user;
mod user_flags;

pub use assignment::{HeldRoles, RoleAssignment, RoleAssignmentId, RoleScope};
pub use audit::AuditAction;
pub use catalog::{RoleCatalog, RoleDefinition};
pub use facility::{Facility, FacilityId, STANDARD_FACILITIES, standard_facilities};
pub use role::{GroupId, RoleId};
pub use roster::{
    MembershipKind, OperatingInitials, RosterEntry, RosterEntryId, RosterStatus,
    initials_candidates, resolve_operating_initials,
};
pub use roster_request::{
    RosterDecision, RosterRequest, RosterRequestId, RosterRequestStatus, RosterRequestType,
};
pub use user::{Cid, User};
pub use user_flags::UserFlags;
