use artcc_core::{AppError, AppResult, NonEmptyString};
use artcc_domain::{
    AuditAction, RosterDecision, RosterEntry, RosterRequest, RosterRequestId, RosterRequestStatus,
};
use chrono::Utc;
use tracing::{info, warn};

use super::{RosterService, stage_admission};
use crate::{Actor, RosterRequestQuery, SubmitRosterRequestInput};

impl RosterService {
    /// Submits a pending roster request.
    ///
    /// Controllers submit for themselves; roster managers of the facility may
    /// submit on a controller's behalf.
    pub async fn submit_roster_request(
        &self,
        actor: &Actor,
        input: SubmitRosterRequestInput,
    ) -> AppResult<RosterRequest> {
        let reason = NonEmptyString::new(input.reason)
            .map_err(|_| AppError::Validation("roster request reason is required".to_owned()))?;

        if actor.cid() != input.cid
            && !self
                .authorization_service
                .can_manage_roster(actor.held_roles(), &input.facility_id)
        {
            return Err(AppError::Forbidden(format!(
                "cid '{}' may not submit roster requests for cid '{}'",
                actor.cid(),
                input.cid
            )));
        }

        self.require_user(input.cid).await?;
        self.require_facility(&input.facility_id).await?;
        if self
            .repository
            .find_user_flags(input.cid)
            .await?
            .blocks_request(input.request_type)
        {
            warn!(
                cid = %input.cid,
                request_type = input.request_type.as_str(),
                "roster request blocked by user flag"
            );
            return Err(AppError::Forbidden(format!(
                "cid '{}' is barred from {} requests",
                input.cid,
                input.request_type.as_str()
            )));
        }

        let mut transaction = self
            .repository
            .begin_roster_transaction(&input.facility_id)
            .await?;

        if transaction.find_roster_entry(input.cid).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "cid '{}' is already on the roster of facility '{}'",
                input.cid, input.facility_id
            )));
        }
        if let Some(existing) = transaction
            .find_pending_roster_request(input.cid, input.request_type)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "cid '{}' already has pending {} request '{}' for facility '{}'",
                input.cid,
                input.request_type.as_str(),
                existing.id,
                input.facility_id
            )));
        }

        let now = Utc::now();
        let request = RosterRequest {
            id: RosterRequestId::new(),
            cid: input.cid,
            facility_id: input.facility_id,
            request_type: input.request_type,
            status: RosterRequestStatus::Pending,
            reason: reason.into(),
            created_at: now,
            updated_at: now,
        };
        transaction.insert_roster_request(&request).await?;
        transaction.commit().await?;

        info!(
            request_id = %request.id,
            cid = %request.cid,
            facility = %request.facility_id,
            request_type = request.request_type.as_str(),
            "roster request submitted"
        );
        self.append_audit(
            actor,
            AuditAction::RosterRequestSubmitted,
            "roster_request",
            request.id.to_string(),
            format!(
                "{} request by '{}' for facility '{}'",
                request.request_type.as_str(),
                request.cid,
                request.facility_id
            ),
        )
        .await?;

        Ok(request)
    }

    /// Accepts or rejects a pending roster request.
    ///
    /// Acceptance admits the controller in the same roster transaction; if
    /// admission fails nothing is written and the request stays pending.
    pub async fn decide_roster_request(
        &self,
        actor: &Actor,
        request_id: RosterRequestId,
        decision: RosterDecision,
    ) -> AppResult<RosterRequest> {
        let existing = self.find_roster_request(request_id).await?;
        self.authorization_service
            .require_roster_manager(actor, &existing.facility_id)?;
        let user = match decision {
            RosterDecision::Accept => Some(self.require_user(existing.cid).await?),
            RosterDecision::Reject => None,
        };

        let mut transaction = self
            .repository
            .begin_roster_transaction(&existing.facility_id)
            .await?;
        let mut request = transaction
            .find_roster_request_for_update(request_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("roster request '{request_id}' does not exist"))
            })?;
        let status = request.transition(decision)?;

        let admitted: Option<RosterEntry> = match user {
            Some(user) => Some(
                stage_admission(
                    transaction.as_mut(),
                    &user,
                    &request.facility_id,
                    request.request_type.membership_kind(),
                    false,
                    false,
                )
                .await?,
            ),
            None => None,
        };

        let now = Utc::now();
        transaction
            .update_roster_request_status(request_id, status, now)
            .await?;
        transaction.commit().await?;

        request.status = status;
        request.updated_at = now;

        info!(
            request_id = %request.id,
            actor = %actor.cid(),
            status = status.as_str(),
            "roster request decided"
        );
        let action = match decision {
            RosterDecision::Accept => AuditAction::RosterRequestAccepted,
            RosterDecision::Reject => AuditAction::RosterRequestRejected,
        };
        self.append_audit(
            actor,
            action,
            "roster_request",
            request.id.to_string(),
            format!(
                "{} {} request by '{}' for facility '{}'",
                status.as_str(),
                request.request_type.as_str(),
                request.cid,
                request.facility_id
            ),
        )
        .await?;
        if let Some(entry) = admitted {
            self.audit_admission(actor, &entry).await?;
        }

        Ok(request)
    }

    /// Returns one roster request.
    pub async fn find_roster_request(
        &self,
        request_id: RosterRequestId,
    ) -> AppResult<RosterRequest> {
        self.repository
            .find_roster_request(request_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("roster request '{request_id}' does not exist"))
            })
    }

    /// Lists roster requests matching a filter.
    pub async fn list_roster_requests(
        &self,
        query: &RosterRequestQuery,
    ) -> AppResult<Vec<RosterRequest>> {
        self.repository.list_roster_requests(query).await
    }
}
