use std::sync::Arc;

use artcc_application::{
    AuditRepository, AuthorizationService, DirectoryService, MembershipRepository,
    RoleAssignmentService, RosterDecisionPolicy, RosterService,
};
use artcc_core::AppError;
use artcc_domain::{GroupId, RoleCatalog};
use artcc_infrastructure::{
    InMemoryMembershipRepository, PostgresAuditRepository, PostgresMembershipRepository,
    TracingAuditRepository,
};
use sqlx::PgPool;
use tracing::info;

use crate::state::AppState;

/// Store adapters backing the application services.
#[derive(Clone)]
pub struct StorageSet {
    pub membership_repository: Arc<dyn MembershipRepository>,
    pub audit_repository: Arc<dyn AuditRepository>,
}

pub fn build_postgres_storage(pool: &PgPool) -> StorageSet {
    StorageSet {
        membership_repository: Arc::new(PostgresMembershipRepository::new(pool.clone())),
        audit_repository: Arc::new(PostgresAuditRepository::new(pool.clone())),
    }
}

pub fn build_memory_storage() -> Result<StorageSet, AppError> {
    info!("using in-memory storage; data is lost on shutdown");
    Ok(StorageSet {
        membership_repository: Arc::new(InMemoryMembershipRepository::with_standard_facilities()?),
        audit_repository: Arc::new(TracingAuditRepository::new()),
    })
}

pub fn build_app_state(
    storage: StorageSet,
    decider_groups: Option<&[GroupId]>,
) -> Result<AppState, AppError> {
    let decision_policy = match decider_groups {
        Some(groups) => RosterDecisionPolicy::new(groups.iter().copied())?,
        None => RosterDecisionPolicy::standard(),
    };
    let authorization_service =
        AuthorizationService::new(Arc::new(RoleCatalog::standard()), decision_policy);

    Ok(AppState {
        role_assignment_service: RoleAssignmentService::new(
            authorization_service.clone(),
            storage.membership_repository.clone(),
            storage.audit_repository.clone(),
        ),
        roster_service: RosterService::new(
            authorization_service.clone(),
            storage.membership_repository.clone(),
            storage.audit_repository.clone(),
        ),
        directory_service: DirectoryService::new(
            authorization_service.clone(),
            storage.membership_repository,
            storage.audit_repository,
        ),
        authorization_service,
    })
}
