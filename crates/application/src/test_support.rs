use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use artcc_core::{AppError, AppResult};
use artcc_domain::{
    Cid, Facility, FacilityId, HeldRoles, OperatingInitials, RoleAssignment, RoleId, RoleScope,
    RosterEntry, RosterEntryId, RosterRequest, RosterRequestId, RosterRequestStatus,
    RosterRequestType, RosterStatus, User, UserFlags,
};
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    Actor, AuditEvent, AuditRepository, MembershipRepository, RosterRequestQuery,
    RosterTransaction,
};

pub(crate) fn cid(value: u32) -> Cid {
    Cid::new(value).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn facility(code: &str) -> FacilityId {
    FacilityId::new(code).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn initials(value: &str) -> OperatingInitials {
    OperatingInitials::new(value).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn actor(value: u32, pairs: &[(RoleId, RoleScope)]) -> Actor {
    let held_roles: HeldRoles = pairs.iter().cloned().collect();
    Actor::new(cid(value), held_roles)
}

#[derive(Default)]
pub(crate) struct FakeAuditRepository {
    pub(crate) events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
struct FakeState {
    users: HashMap<Cid, User>,
    flags: HashMap<Cid, UserFlags>,
    facilities: BTreeMap<FacilityId, Facility>,
    assignments: Vec<RoleAssignment>,
    entries: Vec<RosterEntry>,
    requests: Vec<RosterRequest>,
}

#[derive(Default)]
pub(crate) struct FakeMembershipRepository {
    state: Arc<Mutex<FakeState>>,
    fail_entry_inserts: AtomicBool,
}

impl FakeMembershipRepository {
    /// Repository with facilities ZDV and ZLA.
    pub(crate) async fn with_facilities() -> Self {
        let repository = Self::default();
        {
            let mut state = repository.state.lock().await;
            for (code, name) in [("ZDV", "Denver ARTCC"), ("ZLA", "Los Angeles ARTCC")] {
                let facility = Facility::new(facility(code), name, None)
                    .unwrap_or_else(|_| unreachable!());
                state.facilities.insert(facility.id().clone(), facility);
            }
        }
        repository
    }

    pub(crate) async fn add_user(
        &self,
        value: u32,
        first_name: &str,
        last_name: &str,
        preferred: Option<&str>,
    ) {
        let user = User::new(cid(value), first_name, last_name, preferred.map(initials))
            .unwrap_or_else(|_| unreachable!());
        self.state.lock().await.users.insert(user.cid(), user);
    }

    pub(crate) async fn add_flags(&self, value: u32, flags: UserFlags) {
        self.state.lock().await.flags.insert(cid(value), flags);
    }

    pub(crate) async fn add_entry(&self, entry: RosterEntry) {
        self.state.lock().await.entries.push(entry);
    }

    pub(crate) fn fail_entry_inserts(&self) {
        self.fail_entry_inserts.store(true, Ordering::SeqCst);
    }

    pub(crate) async fn entries(&self) -> Vec<RosterEntry> {
        self.state.lock().await.entries.clone()
    }

    pub(crate) async fn requests(&self) -> Vec<RosterRequest> {
        self.state.lock().await.requests.clone()
    }

    pub(crate) async fn assignments(&self) -> Vec<RoleAssignment> {
        self.state.lock().await.assignments.clone()
    }
}

#[async_trait]
impl MembershipRepository for FakeMembershipRepository {
    async fn find_user(&self, cid: Cid) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&cid).cloned())
    }

    async fn upsert_user(&self, user: User) -> AppResult<()> {
        self.state.lock().await.users.insert(user.cid(), user);
        Ok(())
    }

    async fn find_user_flags(&self, cid: Cid) -> AppResult<UserFlags> {
        Ok(self
            .state
            .lock()
            .await
            .flags
            .get(&cid)
            .copied()
            .unwrap_or_default())
    }

    async fn upsert_user_flags(&self, cid: Cid, flags: UserFlags) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&cid) {
            return Err(AppError::Validation(format!("user '{cid}' does not exist")));
        }
        state.flags.insert(cid, flags);
        Ok(())
    }

    async fn find_facility(&self, facility_id: &FacilityId) -> AppResult<Option<Facility>> {
        Ok(self.state.lock().await.facilities.get(facility_id).cloned())
    }

    async fn list_facilities(&self) -> AppResult<Vec<Facility>> {
        Ok(self.state.lock().await.facilities.values().cloned().collect())
    }

    async fn list_role_assignments_for_user(&self, cid: Cid) -> AppResult<Vec<RoleAssignment>> {
        Ok(self
            .state
            .lock()
            .await
            .assignments
            .iter()
            .filter(|assignment| assignment.cid == cid)
            .cloned()
            .collect())
    }

    async fn list_role_assignments_for_facility(
        &self,
        facility_id: &FacilityId,
    ) -> AppResult<Vec<RoleAssignment>> {
        Ok(self
            .state
            .lock()
            .await
            .assignments
            .iter()
            .filter(|assignment| assignment.scope.facility_id() == Some(facility_id))
            .cloned()
            .collect())
    }

    async fn insert_role_assignment(&self, assignment: RoleAssignment) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.assignments.iter().any(|existing| {
            existing.cid == assignment.cid
                && existing.role == assignment.role
                && existing.scope == assignment.scope
        }) {
            return Err(AppError::Conflict("duplicate assignment".to_owned()));
        }
        state.assignments.push(assignment);
        Ok(())
    }

    async fn delete_role_assignment(
        &self,
        cid: Cid,
        role: RoleId,
        scope: &RoleScope,
    ) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.assignments.len();
        state.assignments.retain(|assignment| {
            !(assignment.cid == cid && assignment.role == role && &assignment.scope == scope)
        });
        Ok(state.assignments.len() != before)
    }

    async fn list_roster_entries(&self, facility_id: &FacilityId) -> AppResult<Vec<RosterEntry>> {
        Ok(self
            .state
            .lock()
            .await
            .entries
            .iter()
            .filter(|entry| &entry.facility_id == facility_id)
            .cloned()
            .collect())
    }

    async fn list_roster_entries_for_user(&self, cid: Cid) -> AppResult<Vec<RosterEntry>> {
        Ok(self
            .state
            .lock()
            .await
            .entries
            .iter()
            .filter(|entry| entry.cid == cid)
            .cloned()
            .collect())
    }

    async fn find_roster_request(
        &self,
        request_id: RosterRequestId,
    ) -> AppResult<Option<RosterRequest>> {
        Ok(self
            .state
            .lock()
            .await
            .requests
            .iter()
            .find(|request| request.id == request_id)
            .cloned())
    }

    async fn list_roster_requests(
        &self,
        query: &RosterRequestQuery,
    ) -> AppResult<Vec<RosterRequest>> {
        Ok(self
            .state
            .lock()
            .await
            .requests
            .iter()
            .filter(|request| query.matches(request))
            .cloned()
            .collect())
    }

    async fn begin_roster_transaction(
        &self,
        facility_id: &FacilityId,
    ) -> AppResult<Box<dyn RosterTransaction>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(FakeRosterTransaction {
            facility_id: facility_id.clone(),
            guard,
            working,
            fail_entry_inserts: self.fail_entry_inserts.load(Ordering::SeqCst),
        }))
    }
}

struct FakeRosterTransaction {
    facility_id: FacilityId,
    guard: OwnedMutexGuard<FakeState>,
    working: FakeState,
    fail_entry_inserts: bool,
}

#[async_trait]
impl RosterTransaction for FakeRosterTransaction {
    async fn find_roster_request_for_update(
        &mut self,
        request_id: RosterRequestId,
    ) -> AppResult<Option<RosterRequest>> {
        Ok(self
            .working
            .requests
            .iter()
            .find(|request| request.id == request_id && request.facility_id == self.facility_id)
            .cloned())
    }

    async fn find_pending_roster_request(
        &mut self,
        cid: Cid,
        request_type: RosterRequestType,
    ) -> AppResult<Option<RosterRequest>> {
        Ok(self
            .working
            .requests
            .iter()
            .find(|request| {
                request.cid == cid
                    && request.facility_id == self.facility_id
                    && request.request_type == request_type
                    && request.status == RosterRequestStatus::Pending
            })
            .cloned())
    }

    async fn find_roster_entry(&mut self, cid: Cid) -> AppResult<Option<RosterEntry>> {
        Ok(self
            .working
            .entries
            .iter()
            .find(|entry| entry.cid == cid && entry.facility_id == self.facility_id)
            .cloned())
    }

    async fn list_active_initials(&mut self) -> AppResult<BTreeSet<OperatingInitials>> {
        Ok(self
            .working
            .entries
            .iter()
            .filter(|entry| entry.facility_id == self.facility_id && entry.is_active())
            .map(|entry| entry.operating_initials)
            .collect())
    }

    async fn insert_roster_request(&mut self, request: &RosterRequest) -> AppResult<()> {
        self.working.requests.push(request.clone());
        Ok(())
    }

    async fn update_roster_request_status(
        &mut self,
        request_id: RosterRequestId,
        status: RosterRequestStatus,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let request = self
            .working
            .requests
            .iter_mut()
            .find(|request| request.id == request_id)
            .ok_or_else(|| AppError::NotFound(format!("roster request '{request_id}'")))?;
        request.status = status;
        request.updated_at = updated_at;
        Ok(())
    }

    async fn insert_roster_entry(&mut self, entry: &RosterEntry) -> AppResult<()> {
        if self.fail_entry_inserts {
            return Err(AppError::Internal("roster entry insert failed".to_owned()));
        }
        self.working.entries.push(entry.clone());
        Ok(())
    }

    async fn update_roster_entry_status(
        &mut self,
        entry_id: RosterEntryId,
        status: RosterStatus,
        updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let entry = self
            .working
            .entries
            .iter_mut()
            .find(|entry| entry.id == entry_id)
            .ok_or_else(|| AppError::NotFound(format!("roster entry '{entry_id}'")))?;
        entry.status = status;
        entry.updated_at = updated_at;
        Ok(())
    }

    async fn delete_roster_entry(&mut self, entry_id: RosterEntryId) -> AppResult<()> {
        self.working.entries.retain(|entry| entry.id != entry_id);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let Self {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}
