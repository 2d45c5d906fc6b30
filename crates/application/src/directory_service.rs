use std::sync::Arc;

use artcc_core::{AppError, AppResult};
use artcc_domain::{AuditAction, Cid, Facility, FacilityId, User, UserFlags};
use tracing::{info, warn};

use crate::{Actor, AuditEvent, AuditRepository, AuthorizationService, MembershipRepository};

/// Application service for controller and facility records.
#[derive(Clone)]
pub struct DirectoryService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn MembershipRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl DirectoryService {
    /// Creates a directory service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn MembershipRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            audit_repository,
        }
    }

    /// Creates or replaces a controller record.
    ///
    /// Controllers may sync their own record; division staff may sync anyone.
    pub async fn upsert_user(&self, actor: &Actor, user: User) -> AppResult<User> {
        let is_division_staff = self
            .authorization_service
            .is_division_staff(actor.held_roles());
        if actor.cid() != user.cid() && !is_division_staff {
            return Err(AppError::Forbidden(format!(
                "cid '{}' may not update user '{}'",
                actor.cid(),
                user.cid()
            )));
        }

        self.repository.upsert_user(user.clone()).await?;
        info!(actor = %actor.cid(), cid = %user.cid(), "user record saved");
        Ok(user)
    }

    /// Creates or replaces a controller record without an acting controller.
    pub async fn seed_user(&self, user: User) -> AppResult<User> {
        self.repository.upsert_user(user.clone()).await?;
        info!(cid = %user.cid(), "user record seeded");
        Ok(user)
    }

    /// Returns one controller record.
    pub async fn find_user(&self, cid: Cid) -> AppResult<User> {
        self.repository
            .find_user(cid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{cid}' does not exist")))
    }

    /// Returns a controller's membership flags.
    pub async fn find_user_flags(&self, cid: Cid) -> AppResult<UserFlags> {
        self.find_user(cid).await?;
        self.repository.find_user_flags(cid).await
    }

    /// Replaces a controller's membership flags. Only division staff may
    /// change flags, including their own.
    pub async fn set_user_flags(
        &self,
        actor: &Actor,
        cid: Cid,
        flags: UserFlags,
    ) -> AppResult<UserFlags> {
        if !self
            .authorization_service
            .is_division_staff(actor.held_roles())
        {
            warn!(actor = %actor.cid(), cid = %cid, "user flag update denied");
            return Err(AppError::Forbidden(format!(
                "cid '{}' may not change flags of user '{cid}'",
                actor.cid()
            )));
        }

        self.repository.upsert_user_flags(cid, flags).await?;
        info!(actor = %actor.cid(), cid = %cid, "user flags saved");
        self.audit_repository
            .append_event(AuditEvent {
                actor: Some(actor.cid()),
                action: AuditAction::UserFlagsUpdated,
                resource_type: "user_flags".to_owned(),
                resource_id: cid.to_string(),
                detail: Some(format!(
                    "no_staff_role={} no_visiting={} no_transferring={} no_training={}",
                    flags.no_staff_role, flags.no_visiting, flags.no_transferring, flags.no_training
                )),
            })
            .await?;

        Ok(flags)
    }

    /// Lists every facility.
    pub async fn list_facilities(&self) -> AppResult<Vec<Facility>> {
        self.repository.list_facilities().await
    }

    /// Returns one facility.
    pub async fn find_facility(&self, facility_id: &FacilityId) -> AppResult<Facility> {
        self.repository
            .find_facility(facility_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("facility '{facility_id}' does not exist")))
    }
}
