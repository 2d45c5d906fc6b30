use std::sync::Arc;

use artcc_core::{AppError, AppResult};
use artcc_domain::{
    AuditAction, Cid, FacilityId, HeldRoles, RoleAssignment, RoleAssignmentId, RoleId, RoleScope,
};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
    Actor, AuditEvent, AuditRepository, AuthorizationService, MembershipRepository,
    RoleGrantInput,
};

/// Application service for granting and revoking roles.
#[derive(Clone)]
pub struct RoleAssignmentService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn MembershipRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl RoleAssignmentService {
    /// Creates a role assignment service.
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

    /// Grants a role after checking the actor's authority over the target
    /// scope.
    pub async fn grant_role(
        &self,
        actor: &Actor,
        input: RoleGrantInput,
    ) -> AppResult<RoleAssignment> {
        self.validate_scope(input.role, &input.scope)?;
        self.authorization_service
            .require_grant(actor, input.role, &input.scope)?;
        if self.authorization_service.is_staff_role(input.role)
            && self.repository.find_user_flags(input.cid).await?.no_staff_role
        {
            warn!(
                actor = %actor.cid(),
                cid = %input.cid,
                role = input.role.as_str(),
                "staff role grant blocked by user flag"
            );
            return Err(AppError::Forbidden(format!(
                "cid '{}' is barred from staff role '{}'",
                input.cid,
                input.role.as_str()
            )));
        }

        let assignment = self.persist_assignment(input).await?;

        info!(
            actor = %actor.cid(),
            cid = %assignment.cid,
            role = assignment.role.as_str(),
            scope = %assignment.scope,
            "role granted"
        );
        self.audit_repository
            .append_event(AuditEvent {
                actor: Some(actor.cid()),
                action: AuditAction::RoleAssigned,
                resource_type: "role_assignment".to_owned(),
                resource_id: assignment.id.to_string(),
                detail: Some(format!(
                    "granted role '{}' to '{}' in scope '{}'",
                    assignment.role.as_str(),
                    assignment.cid,
                    assignment.scope
                )),
            })
            .await?;

        Ok(assignment)
    }

    /// Revokes a role. Requires the same authority as granting it.
    pub async fn revoke_role(&self, actor: &Actor, input: RoleGrantInput) -> AppResult<()> {
        self.validate_scope(input.role, &input.scope)?;
        self.authorization_service
            .require_grant(actor, input.role, &input.scope)?;
        self.require_references(&input).await?;

        let removed = self
            .repository
            .delete_role_assignment(input.cid, input.role, &input.scope)
            .await?;
        if !removed {
            return Err(AppError::NotFound(format!(
                "cid '{}' does not hold role '{}' in scope '{}'",
                input.cid,
                input.role.as_str(),
                input.scope
            )));
        }

        info!(
            actor = %actor.cid(),
            cid = %input.cid,
            role = input.role.as_str(),
            scope = %input.scope,
            "role revoked"
        );
        self.audit_repository
            .append_event(AuditEvent {
                actor: Some(actor.cid()),
                action: AuditAction::RoleUnassigned,
                resource_type: "role_assignment".to_owned(),
                resource_id: format!("{}:{}:{}", input.cid, input.role.as_str(), input.scope),
                detail: Some(format!(
                    "revoked role '{}' from '{}' in scope '{}'",
                    input.role.as_str(),
                    input.cid,
                    input.scope
                )),
            })
            .await
    }

    /// Persists a role without an acting controller. Used to seed roles that
    /// nobody can grant, such as the division director.
    pub async fn seed_role(&self, input: RoleGrantInput) -> AppResult<RoleAssignment> {
        self.validate_scope(input.role, &input.scope)?;
        let assignment = self.persist_assignment(input).await?;

        info!(
            cid = %assignment.cid,
            role = assignment.role.as_str(),
            scope = %assignment.scope,
            "role seeded"
        );
        self.audit_repository
            .append_event(AuditEvent {
                actor: None,
                action: AuditAction::RoleAssigned,
                resource_type: "role_assignment".to_owned(),
                resource_id: assignment.id.to_string(),
                detail: Some(format!(
                    "seeded role '{}' for '{}' in scope '{}'",
                    assignment.role.as_str(),
                    assignment.cid,
                    assignment.scope
                )),
            })
            .await?;

        Ok(assignment)
    }

    /// Builds the role snapshot used to authorize a controller's actions.
    pub async fn held_roles(&self, cid: Cid) -> AppResult<HeldRoles> {
        let assignments = self.repository.list_role_assignments_for_user(cid).await?;
        debug!(cid = %cid, count = assignments.len(), "loaded held roles");
        Ok(assignments.iter().collect())
    }

    /// Lists role assignments held by one controller.
    pub async fn list_assignments_for_user(&self, cid: Cid) -> AppResult<Vec<RoleAssignment>> {
        self.repository.list_role_assignments_for_user(cid).await
    }

    /// Lists role assignments scoped to one facility.
    pub async fn list_assignments_for_facility(
        &self,
        facility_id: &FacilityId,
    ) -> AppResult<Vec<RoleAssignment>> {
        if self.repository.find_facility(facility_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "facility '{facility_id}' does not exist"
            )));
        }
        self.repository
            .list_role_assignments_for_facility(facility_id)
            .await
    }

    fn validate_scope(&self, role: RoleId, scope: &RoleScope) -> AppResult<()> {
        let definition = self
            .authorization_service
            .catalog()
            .definition(role)
            .ok_or_else(|| {
                AppError::Validation(format!("role '{}' is not in the catalog", role.as_str()))
            })?;

        match (definition.is_facility_based(), scope) {
            (true, RoleScope::Division) => Err(AppError::Validation(format!(
                "role '{}' must be granted within a facility",
                role.as_str()
            ))),
            (false, RoleScope::Facility(facility_id)) => Err(AppError::Validation(format!(
                "role '{}' is division-wide and cannot be scoped to facility '{facility_id}'",
                role.as_str()
            ))),
            _ => Ok(()),
        }
    }

    async fn persist_assignment(&self, input: RoleGrantInput) -> AppResult<RoleAssignment> {
        self.require_references(&input).await?;

        let now = Utc::now();
        let assignment = RoleAssignment {
            id: RoleAssignmentId::new(),
            cid: input.cid,
            role: input.role,
            scope: input.scope,
            created_at: now,
            updated_at: now,
        };
        self.repository
            .insert_role_assignment(assignment.clone())
            .await?;

        Ok(assignment)
    }

    async fn require_references(&self, input: &RoleGrantInput) -> AppResult<()> {
        if self.repository.find_user(input.cid).await?.is_none() {
            return Err(AppError::Validation(format!(
                "user '{}' does not exist",
                input.cid
            )));
        }
        if let Some(facility_id) = input.scope.facility_id() {
            self.require_facility(facility_id).await?;
        }

        Ok(())
    }

    async fn require_facility(&self, facility_id: &FacilityId) -> AppResult<()> {
        if self.repository.find_facility(facility_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "facility '{facility_id}' does not exist"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
