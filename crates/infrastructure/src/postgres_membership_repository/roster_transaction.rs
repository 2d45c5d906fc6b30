use std::collections::BTreeSet;

use async_trait::async_trait;
use artcc_application::RosterTransaction;
use artcc_core::{AppError, AppResult};
use artcc_domain::{
    Cid, FacilityId, OperatingInitials, RosterEntry, RosterEntryId, RosterRequest,
    RosterRequestId, RosterRequestStatus, RosterRequestType, RosterStatus,
};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use super::{
    ROSTER_ENTRY_COLUMNS, ROSTER_REQUEST_COLUMNS, RosterEntryRow, RosterRequestRow,
    cid_to_column, is_unique_violation,
};

/// Roster unit of work backed by one database transaction.
///
/// The transaction takes a facility-keyed advisory lock first, so roster
/// writers for the same facility run one at a time. The lock is released when
/// the transaction commits or rolls back.
pub(super) struct PostgresRosterTransaction {
    facility_id: FacilityId,
    transaction: Transaction<'static, Postgres>,
}

impl PostgresRosterTransaction {
    pub(super) async fn begin(pool: &PgPool, facility_id: &FacilityId) -> AppResult<Self> {
        let mut transaction = pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext('roster:' || $1))")
            .bind(facility_id.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to lock roster of facility '{facility_id}': {error}"
                ))
            })?;

        Ok(Self {
            facility_id: facility_id.clone(),
            transaction,
        })
    }

    fn require_same_facility(&self, facility_id: &FacilityId) -> AppResult<()> {
        if facility_id != &self.facility_id {
            return Err(AppError::Internal(format!(
                "roster write for '{facility_id}' staged in transaction for '{}'",
                self.facility_id
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl RosterTransaction for PostgresRosterTransaction {
    async fn find_roster_request_for_update(
        &mut self,
        request_id: RosterRequestId,
    ) -> AppResult<Option<RosterRequest>> {
        let row = sqlx::query_as::<_, RosterRequestRow>(&format!(
            "SELECT {ROSTER_REQUEST_COLUMNS} FROM roster_requests \
             WHERE id = $1 AND facility_id = $2 FOR UPDATE"
        ))
        .bind(request_id.as_uuid())
        .bind(self.facility_id.as_str())
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to lock roster request '{request_id}': {error}"
            ))
        })?;

        row.map(RosterRequest::try_from).transpose()
    }

    async fn find_pending_roster_request(
        &mut self,
        cid: Cid,
        request_type: RosterRequestType,
    ) -> AppResult<Option<RosterRequest>> {
        let row = sqlx::query_as::<_, RosterRequestRow>(&format!(
            "SELECT {ROSTER_REQUEST_COLUMNS} FROM roster_requests \
             WHERE facility_id = $1 AND cid = $2 AND request_type = $3 AND status = 'pending'"
        ))
        .bind(self.facility_id.as_str())
        .bind(cid_to_column(cid))
        .bind(request_type.as_str())
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find pending roster request: {error}"))
        })?;

        row.map(RosterRequest::try_from).transpose()
    }

    async fn find_roster_entry(&mut self, cid: Cid) -> AppResult<Option<RosterEntry>> {
        let row = sqlx::query_as::<_, RosterEntryRow>(&format!(
            "SELECT {ROSTER_ENTRY_COLUMNS} FROM roster_entries \
             WHERE facility_id = $1 AND cid = $2"
        ))
        .bind(self.facility_id.as_str())
        .bind(cid_to_column(cid))
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find roster entry for '{cid}': {error}"))
        })?;

        row.map(RosterEntry::try_from).transpose()
    }

    async fn list_active_initials(&mut self) -> AppResult<BTreeSet<OperatingInitials>> {
        let initials = sqlx::query_scalar::<_, String>(
            r#"
            SELECT operating_initials
            FROM roster_entries
            WHERE facility_id = $1
              AND status = 'active'
            "#,
        )
        .bind(self.facility_id.as_str())
        .fetch_all(&mut *self.transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list active initials: {error}"))
        })?;

        initials.into_iter().map(OperatingInitials::new).collect()
    }

    async fn insert_roster_request(&mut self, request: &RosterRequest) -> AppResult<()> {
        self.require_same_facility(&request.facility_id)?;

        sqlx::query(
            r#"
            INSERT INTO roster_requests (
                id,
                cid,
                facility_id,
                request_type,
                status,
                reason,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(cid_to_column(request.cid))
        .bind(request.facility_id.as_str())
        .bind(request.request_type.as_str())
        .bind(request.status.as_str())
        .bind(request.reason.as_str())
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Conflict(format!(
                    "cid '{}' already has a pending {} request for facility '{}'",
                    request.cid,
                    request.request_type.as_str(),
                    request.facility_id
                ));
            }

            AppError::Internal(format!("failed to insert roster request: {error}"))
        })?;

        Ok(())
    }

    async fn update_roster_request_status(
        &mut self,
        request_id: RosterRequestId,
        status: RosterRequestStatus,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE roster_requests
            SET status = $3, updated_at = $4
            WHERE id = $1 AND facility_id = $2
            "#,
        )
        .bind(request_id.as_uuid())
        .bind(self.facility_id.as_str())
        .bind(status.as_str())
        .bind(updated_at)
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update roster request '{request_id}': {error}"
            ))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "roster request '{request_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn insert_roster_entry(&mut self, entry: &RosterEntry) -> AppResult<()> {
        self.require_same_facility(&entry.facility_id)?;

        sqlx::query(
            r#"
            INSERT INTO roster_entries (
                id,
                cid,
                facility_id,
                operating_initials,
                membership_kind,
                status,
                mentor,
                instructor,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(cid_to_column(entry.cid))
        .bind(entry.facility_id.as_str())
        .bind(entry.operating_initials.as_str())
        .bind(entry.membership_kind.as_str())
        .bind(entry.status.as_str())
        .bind(entry.mentor)
        .bind(entry.instructor)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Conflict(format!(
                    "cid '{}' or initials '{}' already on the roster of facility '{}'",
                    entry.cid, entry.operating_initials, entry.facility_id
                ));
            }

            AppError::Internal(format!("failed to insert roster entry: {error}"))
        })?;

        Ok(())
    }

    async fn update_roster_entry_status(
        &mut self,
        entry_id: RosterEntryId,
        status: RosterStatus,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE roster_entries
            SET status = $3, updated_at = $4
            WHERE id = $1 AND facility_id = $2
            "#,
        )
        .bind(entry_id.as_uuid())
        .bind(self.facility_id.as_str())
        .bind(status.as_str())
        .bind(updated_at)
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Conflict(format!(
                    "roster entry '{entry_id}' conflicts with active initials in facility '{}'",
                    self.facility_id
                ));
            }

            AppError::Internal(format!(
                "failed to update roster entry '{entry_id}': {error}"
            ))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "roster entry '{entry_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn delete_roster_entry(&mut self, entry_id: RosterEntryId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM roster_entries
            WHERE id = $1 AND facility_id = $2
            "#,
        )
        .bind(entry_id.as_uuid())
        .bind(self.facility_id.as_str())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to delete roster entry '{entry_id}': {error}"
            ))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "roster entry '{entry_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit roster transaction: {error}"))
        })
    }
}
