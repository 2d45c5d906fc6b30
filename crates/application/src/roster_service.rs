use std::sync::Arc;

use artcc_core::{AppError, AppResult};
use artcc_domain::{
    AuditAction, Cid, FacilityId, MembershipKind, RosterEntry, RosterEntryId, RosterStatus, User,
    resolve_operating_initials,
};
use chrono::Utc;

use crate::{
    Actor, AuditEvent, AuditRepository, AuthorizationService, MembershipRepository,
    RosterTransaction,
};

mod admission;
mod management;
mod requests;

/// Application service orchestrating roster requests and roster membership.
#[derive(Clone)]
pub struct RosterService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn MembershipRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl RosterService {
    /// Creates a roster service.
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

    /// Resolves a referenced controller. An unknown cid is a validation
    /// failure of the caller's input, not a missing resource.
    async fn require_user(&self, cid: Cid) -> AppResult<User> {
        self.repository
            .find_user(cid)
            .await?
            .ok_or_else(|| AppError::Validation(format!("user '{cid}' does not exist")))
    }

    async fn require_facility(&self, facility_id: &FacilityId) -> AppResult<()> {
        if self.repository.find_facility(facility_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "facility '{facility_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn append_audit(
        &self,
        actor: &Actor,
        action: AuditAction,
        resource_type: &str,
        resource_id: String,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                actor: Some(actor.cid()),
                action,
                resource_type: resource_type.to_owned(),
                resource_id,
                detail: Some(detail),
            })
            .await
    }
}

/// Stages a new roster entry inside an open roster transaction.
///
/// Rejects a controller already on the facility roster and allocates operating
/// initials against the facility's active entries as seen by the transaction.
async fn stage_admission(
    transaction: &mut dyn RosterTransaction,
    user: &User,
    facility_id: &FacilityId,
    membership_kind: MembershipKind,
    mentor: bool,
    instructor: bool,
) -> AppResult<RosterEntry> {
    if transaction.find_roster_entry(user.cid()).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "cid '{}' is already on the roster of facility '{facility_id}'",
            user.cid()
        )));
    }

    let active_initials = transaction.list_active_initials().await?;
    let operating_initials = resolve_operating_initials(user, facility_id, &active_initials)?;

    let now = Utc::now();
    let entry = RosterEntry {
        id: RosterEntryId::new(),
        cid: user.cid(),
        facility_id: facility_id.clone(),
        operating_initials,
        membership_kind,
        status: RosterStatus::Active,
        mentor,
        instructor,
        created_at: now,
        updated_at: now,
    };
    transaction.insert_roster_entry(&entry).await?;

    Ok(entry)
}
