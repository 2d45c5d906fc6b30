use artcc_core::AppResult;
use artcc_domain::{AuditAction, RosterEntry};
use tracing::info;

use super::{RosterService, stage_admission};
use crate::{Actor, AdmitToRosterInput};

impl RosterService {
    /// Adds a controller to a facility roster without a roster request.
    pub async fn admit_to_roster(
        &self,
        actor: &Actor,
        input: AdmitToRosterInput,
    ) -> AppResult<RosterEntry> {
        self.authorization_service
            .require_roster_manager(actor, &input.facility_id)?;
        let user = self.require_user(input.cid).await?;
        self.require_facility(&input.facility_id).await?;

        let mut transaction = self
            .repository
            .begin_roster_transaction(&input.facility_id)
            .await?;
        let entry = stage_admission(
            transaction.as_mut(),
            &user,
            &input.facility_id,
            input.membership_kind,
            input.mentor,
            input.instructor,
        )
        .await?;
        transaction.commit().await?;

        self.audit_admission(actor, &entry).await?;
        Ok(entry)
    }

    pub(super) async fn audit_admission(
        &self,
        actor: &Actor,
        entry: &RosterEntry,
    ) -> AppResult<()> {
        info!(
            cid = %entry.cid,
            facility = %entry.facility_id,
            initials = entry.operating_initials.as_str(),
            membership = entry.membership_kind.as_str(),
            "controller admitted to roster"
        );
        self.append_audit(
            actor,
            AuditAction::RosterEntryCreated,
            "roster_entry",
            entry.id.to_string(),
            format!(
                "admitted '{}' to facility '{}' as {} with initials '{}'",
                entry.cid,
                entry.facility_id,
                entry.membership_kind.as_str(),
                entry.operating_initials
            ),
        )
        .await
    }
}
