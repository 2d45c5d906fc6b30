use std::str::FromStr;

use async_trait::async_trait;
use artcc_application::{MembershipRepository, RosterRequestQuery, RosterTransaction};
use artcc_core::{AppError, AppResult};
use artcc_domain::{
    Cid, Facility, FacilityId, MembershipKind, OperatingInitials, RoleAssignment,
    RoleAssignmentId, RoleId, RoleScope, RosterEntry, RosterEntryId, RosterRequest,
    RosterRequestId, RosterRequestStatus, RosterRequestType, RosterStatus, User, UserFlags,
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

mod roster_transaction;

use roster_transaction::PostgresRosterTransaction;

/// PostgreSQL-backed membership repository.
#[derive(Clone)]
pub struct PostgresMembershipRepository {
    pool: PgPool,
}

impl PostgresMembershipRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    cid: i64,
    first_name: String,
    last_name: String,
    preferred_initials: Option<String>,
}

#[derive(Debug, FromRow)]
struct UserFlagsRow {
    no_staff_role: bool,
    no_visiting: bool,
    no_transferring: bool,
    no_training: bool,
}

#[derive(Debug, FromRow)]
struct FacilityRow {
    id: String,
    name: String,
    url: Option<String>,
}

#[derive(Debug, FromRow)]
struct RoleAssignmentRow {
    id: Uuid,
    cid: i64,
    role: String,
    facility_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct RosterEntryRow {
    id: Uuid,
    cid: i64,
    facility_id: String,
    operating_initials: String,
    membership_kind: String,
    status: String,
    mentor: bool,
    instructor: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct RosterRequestRow {
    id: Uuid,
    cid: i64,
    facility_id: String,
    request_type: String,
    status: String,
    reason: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const ROSTER_ENTRY_COLUMNS: &str = "id, cid, facility_id, operating_initials, membership_kind, \
     status, mentor, instructor, created_at, updated_at";

const ROSTER_REQUEST_COLUMNS: &str =
    "id, cid, facility_id, request_type, status, reason, created_at, updated_at";

fn cid_from_column(value: i64) -> AppResult<Cid> {
    let value = u32::try_from(value)
        .map_err(|error| AppError::Internal(format!("stored cid '{value}' is invalid: {error}")))?;
    Cid::new(value)
}

fn cid_to_column(cid: Cid) -> i64 {
    i64::from(cid.value())
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return true;
    }

    false
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let preferred_initials = row
            .preferred_initials
            .map(OperatingInitials::new)
            .transpose()?;
        User::new(
            cid_from_column(row.cid)?,
            row.first_name,
            row.last_name,
            preferred_initials,
        )
    }
}

impl From<UserFlagsRow> for UserFlags {
    fn from(row: UserFlagsRow) -> Self {
        Self {
            no_staff_role: row.no_staff_role,
            no_visiting: row.no_visiting,
            no_transferring: row.no_transferring,
            no_training: row.no_training,
        }
    }
}

impl TryFrom<FacilityRow> for Facility {
    type Error = AppError;

    fn try_from(row: FacilityRow) -> Result<Self, Self::Error> {
        Facility::new(FacilityId::new(row.id)?, row.name, row.url)
    }
}

impl TryFrom<RoleAssignmentRow> for RoleAssignment {
    type Error = AppError;

    fn try_from(row: RoleAssignmentRow) -> Result<Self, Self::Error> {
        Ok(RoleAssignment {
            id: RoleAssignmentId::from_uuid(row.id),
            cid: cid_from_column(row.cid)?,
            role: RoleId::from_str(row.role.as_str())?,
            scope: RoleScope::from_facility(row.facility_id.map(FacilityId::new).transpose()?),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<RosterEntryRow> for RosterEntry {
    type Error = AppError;

    fn try_from(row: RosterEntryRow) -> Result<Self, Self::Error> {
        Ok(RosterEntry {
            id: RosterEntryId::from_uuid(row.id),
            cid: cid_from_column(row.cid)?,
            facility_id: FacilityId::new(row.facility_id)?,
            operating_initials: OperatingInitials::new(row.operating_initials)?,
            membership_kind: MembershipKind::from_str(row.membership_kind.as_str())?,
            status: RosterStatus::from_str(row.status.as_str())?,
            mentor: row.mentor,
            instructor: row.instructor,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<RosterRequestRow> for RosterRequest {
    type Error = AppError;

    fn try_from(row: RosterRequestRow) -> Result<Self, Self::Error> {
        Ok(RosterRequest {
            id: RosterRequestId::from_uuid(row.id),
            cid: cid_from_column(row.cid)?,
            facility_id: FacilityId::new(row.facility_id)?,
            request_type: RosterRequestType::from_str(row.request_type.as_str())?,
            status: RosterRequestStatus::from_str(row.status.as_str())?,
            reason: row.reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn convert_rows<R, T>(rows: Vec<R>) -> AppResult<Vec<T>>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
    async fn find_user(&self, cid: Cid) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT cid, first_name, last_name, preferred_initials
            FROM users
            WHERE cid = $1
            "#,
        )
        .bind(cid_to_column(cid))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user '{cid}': {error}")))?;

        row.map(User::try_from).transpose()
    }

    async fn upsert_user(&self, user: User) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (cid, first_name, last_name, preferred_initials)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (cid) DO UPDATE
            SET first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                preferred_initials = EXCLUDED.preferred_initials,
                updated_at = now()
            "#,
        )
        .bind(cid_to_column(user.cid()))
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.preferred_initials().map(OperatingInitials::as_str))
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to upsert user '{}': {error}", user.cid()))
        })?;

        Ok(())
    }

    async fn find_user_flags(&self, cid: Cid) -> AppResult<UserFlags> {
        let row = sqlx::query_as::<_, UserFlagsRow>(
            r#"
            SELECT no_staff_role, no_visiting, no_transferring, no_training
            FROM user_flags
            WHERE cid = $1
            "#,
        )
        .bind(cid_to_column(cid))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find flags for user '{cid}': {error}"))
        })?;

        Ok(row.map(UserFlags::from).unwrap_or_default())
    }

    async fn upsert_user_flags(&self, cid: Cid, flags: UserFlags) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_flags (cid, no_staff_role, no_visiting, no_transferring, no_training)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (cid) DO UPDATE
            SET no_staff_role = EXCLUDED.no_staff_role,
                no_visiting = EXCLUDED.no_visiting,
                no_transferring = EXCLUDED.no_transferring,
                no_training = EXCLUDED.no_training,
                updated_at = now()
            "#,
        )
        .bind(cid_to_column(cid))
        .bind(flags.no_staff_role)
        .bind(flags.no_visiting)
        .bind(flags.no_transferring)
        .bind(flags.no_training)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(database_error))
                if database_error.code().as_deref() == Some("23503") =>
            {
                Err(AppError::Validation(format!("user '{cid}' does not exist")))
            }
            Err(error) => Err(AppError::Internal(format!(
                "failed to upsert flags for user '{cid}': {error}"
            ))),
        }
    }

    async fn find_facility(&self, facility_id: &FacilityId) -> AppResult<Option<Facility>> {
        let row = sqlx::query_as::<_, FacilityRow>(
            r#"
            SELECT id, name, url
            FROM facilities
            WHERE id = $1
            "#,
        )
        .bind(facility_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find facility '{facility_id}': {error}"))
        })?;

        row.map(Facility::try_from).transpose()
    }

    async fn list_facilities(&self) -> AppResult<Vec<Facility>> {
        let rows = sqlx::query_as::<_, FacilityRow>(
            r#"
            SELECT id, name, url
            FROM facilities
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list facilities: {error}")))?;

        convert_rows(rows)
    }

    async fn list_role_assignments_for_user(&self, cid: Cid) -> AppResult<Vec<RoleAssignment>> {
        let rows = sqlx::query_as::<_, RoleAssignmentRow>(
            r#"
            SELECT id, cid, role, facility_id, created_at, updated_at
            FROM role_assignments
            WHERE cid = $1
            ORDER BY role, facility_id NULLS FIRST
            "#,
        )
        .bind(cid_to_column(cid))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list role assignments for '{cid}': {error}"
            ))
        })?;

        convert_rows(rows)
    }

    async fn list_role_assignments_for_facility(
        &self,
        facility_id: &FacilityId,
    ) -> AppResult<Vec<RoleAssignment>> {
        let rows = sqlx::query_as::<_, RoleAssignmentRow>(
            r#"
            SELECT id, cid, role, facility_id, created_at, updated_at
            FROM role_assignments
            WHERE facility_id = $1
            ORDER BY role, cid
            "#,
        )
        .bind(facility_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list role assignments for facility '{facility_id}': {error}"
            ))
        })?;

        convert_rows(rows)
    }

    async fn insert_role_assignment(&self, assignment: RoleAssignment) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO role_assignments (id, cid, role, facility_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(assignment.id.as_uuid())
        .bind(cid_to_column(assignment.cid))
        .bind(assignment.role.as_str())
        .bind(assignment.scope.facility_id().map(FacilityId::as_str))
        .bind(assignment.created_at)
        .bind(assignment.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(error) if is_unique_violation(&error) => Err(AppError::Conflict(format!(
                "cid '{}' already holds role '{}' in scope '{}'",
                assignment.cid,
                assignment.role.as_str(),
                assignment.scope
            ))),
            Err(sqlx::Error::Database(database_error))
                if database_error.code().as_deref() == Some("23503") =>
            {
                Err(AppError::Validation(format!(
                    "user '{}' or scope '{}' does not exist",
                    assignment.cid, assignment.scope
                )))
            }
            Err(error) => Err(AppError::Internal(format!(
                "failed to insert role assignment: {error}"
            ))),
        }
    }

    async fn delete_role_assignment(
        &self,
        cid: Cid,
        role: RoleId,
        scope: &RoleScope,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM role_assignments
            WHERE cid = $1
              AND role = $2
              AND facility_id IS NOT DISTINCT FROM $3
            "#,
        )
        .bind(cid_to_column(cid))
        .bind(role.as_str())
        .bind(scope.facility_id().map(FacilityId::as_str))
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete role assignment: {error}"))
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_roster_entries(&self, facility_id: &FacilityId) -> AppResult<Vec<RosterEntry>> {
        let rows = sqlx::query_as::<_, RosterEntryRow>(&format!(
            "SELECT {ROSTER_ENTRY_COLUMNS} FROM roster_entries \
             WHERE facility_id = $1 ORDER BY operating_initials, cid"
        ))
        .bind(facility_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list roster for facility '{facility_id}': {error}"
            ))
        })?;

        convert_rows(rows)
    }

    async fn list_roster_entries_for_user(&self, cid: Cid) -> AppResult<Vec<RosterEntry>> {
        let rows = sqlx::query_as::<_, RosterEntryRow>(&format!(
            "SELECT {ROSTER_ENTRY_COLUMNS} FROM roster_entries \
             WHERE cid = $1 ORDER BY facility_id"
        ))
        .bind(cid_to_column(cid))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list rosters for '{cid}': {error}"))
        })?;

        convert_rows(rows)
    }

    async fn find_roster_request(
        &self,
        request_id: RosterRequestId,
    ) -> AppResult<Option<RosterRequest>> {
        let row = sqlx::query_as::<_, RosterRequestRow>(&format!(
            "SELECT {ROSTER_REQUEST_COLUMNS} FROM roster_requests WHERE id = $1"
        ))
        .bind(request_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find roster request '{request_id}': {error}"
            ))
        })?;

        row.map(RosterRequest::try_from).transpose()
    }

    async fn list_roster_requests(
        &self,
        query: &RosterRequestQuery,
    ) -> AppResult<Vec<RosterRequest>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ROSTER_REQUEST_COLUMNS} FROM roster_requests WHERE TRUE"
        ));
        if let Some(facility_id) = &query.facility_id {
            builder
                .push(" AND facility_id = ")
                .push_bind(facility_id.as_str().to_owned());
        }
        if let Some(cid) = query.cid {
            builder.push(" AND cid = ").push_bind(cid_to_column(cid));
        }
        if let Some(request_type) = query.request_type {
            builder
                .push(" AND request_type = ")
                .push_bind(request_type.as_str());
        }
        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        builder.push(" ORDER BY created_at DESC, id");

        let rows = builder
            .build_query_as::<RosterRequestRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list roster requests: {error}"))
            })?;

        convert_rows(rows)
    }

    async fn begin_roster_transaction(
        &self,
        facility_id: &FacilityId,
    ) -> AppResult<Box<dyn RosterTransaction>> {
        let transaction = PostgresRosterTransaction::begin(&self.pool, facility_id).await?;
        Ok(Box::new(transaction))
    }
}
