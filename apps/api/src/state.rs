use artcc_application::{
    AuthorizationService, DirectoryService, RoleAssignmentService, RosterService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub role_assignment_service: RoleAssignmentService,
    pub roster_service: RosterService,
    pub directory_service: DirectoryService,
}
