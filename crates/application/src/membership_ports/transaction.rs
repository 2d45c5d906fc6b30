use std::collections::BTreeSet;

use async_trait::async_trait;
use artcc_core::AppResult;
use artcc_domain::{
    Cid, OperatingInitials, RosterEntry, RosterEntryId, RosterRequest, RosterRequestId,
    RosterRequestStatus, RosterRequestType, RosterStatus,
};
use chrono::{DateTime, Utc};

/// Unit of work over one facility's roster and roster requests.
///
/// Holding a transaction excludes every other roster transaction for the same
/// facility. Dropping it without [`RosterTransaction::commit`] discards all
/// staged writes.
#[async_trait]
pub trait RosterTransaction: Send {
    /// Loads a roster request of this facility, locking it for the rest of
    /// the transaction.
    async fn find_roster_request_for_update(
        &mut self,
        request_id: RosterRequestId,
    ) -> AppResult<Option<RosterRequest>>;

    /// Finds the pending request of one type by one controller.
    async fn find_pending_roster_request(
        &mut self,
        cid: Cid,
        request_type: RosterRequestType,
    ) -> AppResult<Option<RosterRequest>>;

    /// Finds the controller's roster entry in this facility.
    async fn find_roster_entry(&mut self, cid: Cid) -> AppResult<Option<RosterEntry>>;

    /// Returns initials held by active entries in this facility.
    async fn list_active_initials(&mut self) -> AppResult<BTreeSet<OperatingInitials>>;

    /// Stages a new roster request.
    async fn insert_roster_request(&mut self, request: &RosterRequest) -> AppResult<()>;

    /// Stages a roster request status change.
    async fn update_roster_request_status(
        &mut self,
        request_id: RosterRequestId,
        status: RosterRequestStatus,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Stages a new roster entry.
    async fn insert_roster_entry(&mut self, entry: &RosterEntry) -> AppResult<()>;

    /// Stages a roster entry status change.
    async fn update_roster_entry_status(
        &mut self,
        entry_id: RosterEntryId,
        status: RosterStatus,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Stages removal of a roster entry.
    async fn delete_roster_entry(&mut self, entry_id: RosterEntryId) -> AppResult<()>;

    /// Publishes every staged write and releases the facility lock.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}
