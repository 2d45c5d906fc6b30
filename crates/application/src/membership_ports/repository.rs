use async_trait::async_trait;
use artcc_core::AppResult;
use artcc_domain::{
    Cid, Facility, FacilityId, RoleAssignment, RoleId, RoleScope, RosterEntry, RosterRequest,
    RosterRequestId, User, UserFlags,
};

use super::{RosterRequestQuery, RosterTransaction};

/// Repository port for users, facilities, role assignments and rosters.
///
/// Roster mutations go through [`RosterTransaction`] so admission and request
/// decisions are serialized per facility.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Finds one controller record.
    async fn find_user(&self, cid: Cid) -> AppResult<Option<User>>;

    /// Inserts or replaces one controller record.
    async fn upsert_user(&self, user: User) -> AppResult<()>;

    /// Returns the controller's membership flags, all clear when none are
    /// stored.
    async fn find_user_flags(&self, cid: Cid) -> AppResult<UserFlags>;

    /// Inserts or replaces the controller's membership flags. Fails with a
    /// validation error for an unknown controller.
    async fn upsert_user_flags(&self, cid: Cid, flags: UserFlags) -> AppResult<()>;

    /// Finds one facility.
    async fn find_facility(&self, facility_id: &FacilityId) -> AppResult<Option<Facility>>;

    /// Lists every facility ordered by code.
    async fn list_facilities(&self) -> AppResult<Vec<Facility>>;

    /// Lists role assignments held by one controller.
    async fn list_role_assignments_for_user(&self, cid: Cid) -> AppResult<Vec<RoleAssignment>>;

    /// Lists role assignments scoped to one facility.
    async fn list_role_assignments_for_facility(
        &self,
        facility_id: &FacilityId,
    ) -> AppResult<Vec<RoleAssignment>>;

    /// Persists a role assignment. Fails with a conflict when the same
    /// controller already holds the role in the same scope.
    async fn insert_role_assignment(&self, assignment: RoleAssignment) -> AppResult<()>;

    /// Removes a role assignment, returning whether one existed.
    async fn delete_role_assignment(
        &self,
        cid: Cid,
        role: RoleId,
        scope: &RoleScope,
    ) -> AppResult<bool>;

    /// Lists roster entries for one facility.
    async fn list_roster_entries(&self, facility_id: &FacilityId) -> AppResult<Vec<RosterEntry>>;

    /// Lists roster entries held by one controller across facilities.
    async fn list_roster_entries_for_user(&self, cid: Cid) -> AppResult<Vec<RosterEntry>>;

    /// Finds one roster request.
    async fn find_roster_request(
        &self,
        request_id: RosterRequestId,
    ) -> AppResult<Option<RosterRequest>>;

    /// Lists roster requests matching the query, newest first.
    async fn list_roster_requests(
        &self,
        query: &RosterRequestQuery,
    ) -> AppResult<Vec<RosterRequest>>;

    /// Opens a roster transaction holding the facility's roster lock.
    async fn begin_roster_transaction(
        &self,
        facility_id: &FacilityId,
    ) -> AppResult<Box<dyn RosterTransaction>>;
}
