use artcc_core::{AppError, AppResult};
use artcc_domain::{AuditAction, Cid, FacilityId, RosterEntry, RosterStatus};
use chrono::Utc;
use tracing::info;

use super::RosterService;
use crate::Actor;

impl RosterService {
    /// Removes a controller from a facility roster.
    pub async fn remove_from_roster(
        &self,
        actor: &Actor,
        cid: Cid,
        facility_id: &FacilityId,
    ) -> AppResult<()> {
        self.authorization_service
            .require_roster_manager(actor, facility_id)?;

        let mut transaction = self.repository.begin_roster_transaction(facility_id).await?;
        let entry = transaction.find_roster_entry(cid).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "cid '{cid}' is not on the roster of facility '{facility_id}'"
            ))
        })?;
        transaction.delete_roster_entry(entry.id).await?;
        transaction.commit().await?;

        info!(cid = %cid, facility = %facility_id, "controller removed from roster");
        self.append_audit(
            actor,
            AuditAction::RosterEntryRemoved,
            "roster_entry",
            entry.id.to_string(),
            format!("removed '{cid}' from facility '{facility_id}'"),
        )
        .await
    }

    /// Moves a roster entry between active and leave of absence.
    ///
    /// Returning to active fails when another active entry took the same
    /// operating initials in the meantime.
    pub async fn set_roster_status(
        &self,
        actor: &Actor,
        cid: Cid,
        facility_id: &FacilityId,
        status: RosterStatus,
    ) -> AppResult<RosterEntry> {
        self.authorization_service
            .require_roster_manager(actor, facility_id)?;

        let mut transaction = self.repository.begin_roster_transaction(facility_id).await?;
        let mut entry = transaction.find_roster_entry(cid).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "cid '{cid}' is not on the roster of facility '{facility_id}'"
            ))
        })?;
        if entry.status == status {
            return Ok(entry);
        }

        if status == RosterStatus::Active
            && transaction
                .list_active_initials()
                .await?
                .contains(&entry.operating_initials)
        {
            return Err(AppError::Conflict(format!(
                "operating initials '{}' are held by another active controller in facility '{facility_id}'",
                entry.operating_initials
            )));
        }

        let now = Utc::now();
        transaction
            .update_roster_entry_status(entry.id, status, now)
            .await?;
        transaction.commit().await?;

        let previous = entry.status;
        entry.status = status;
        entry.updated_at = now;

        info!(
            cid = %cid,
            facility = %facility_id,
            status = status.as_str(),
            "roster status changed"
        );
        self.append_audit(
            actor,
            AuditAction::RosterEntryStatusChanged,
            "roster_entry",
            entry.id.to_string(),
            format!(
                "changed '{cid}' in facility '{facility_id}' from {} to {}",
                previous.as_str(),
                status.as_str()
            ),
        )
        .await?;

        Ok(entry)
    }

    /// Lists the roster of one facility.
    pub async fn list_roster(&self, facility_id: &FacilityId) -> AppResult<Vec<RosterEntry>> {
        if self.repository.find_facility(facility_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "facility '{facility_id}' does not exist"
            )));
        }
        self.repository.list_roster_entries(facility_id).await
    }

    /// Lists every roster entry held by one controller.
    pub async fn list_rosters_for_user(&self, cid: Cid) -> AppResult<Vec<RosterEntry>> {
        self.repository.list_roster_entries_for_user(cid).await
    }
}
