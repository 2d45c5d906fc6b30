//! Application services and ports for division roles and facility rosters.

#![forbid(unsafe_code)]

mod actor;
mod audit_ports;
mod authorization_service;
mod directory_service;
mod membership_ports;
mod role_assignment_service;
mod roster_service;

#[cfg(test)]
mod test_support;

pub use actor::Actor;
pub use audit_ports::{AuditEvent, AuditRepository};
pub use authorization_service::{AuthorizationService, RosterDecisionPolicy};
pub use directory_service::DirectoryService;
pub use membership_ports::{
    AdmitToRosterInput, MembershipRepository, RoleGrantInput, RosterRequestQuery,
    RosterTransaction, SubmitRosterRequestInput,
};
pub use role_assignment_service::RoleAssignmentService;
pub use roster_service::RosterService;
