use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use artcc_application::{MembershipRepository, RosterRequestQuery, RosterTransaction};
use artcc_core::{AppError, AppResult};
use artcc_domain::{
    Cid, Facility, FacilityId, OperatingInitials, RoleAssignment, RoleId, RoleScope, RosterEntry,
    RosterEntryId, RosterRequest, RosterRequestId, RosterRequestStatus, RosterRequestType,
    RosterStatus, User, UserFlags, standard_facilities,
};
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Roster rows of one facility.
#[derive(Debug, Clone, Default)]
struct FacilityRoster {
    entries: Vec<RosterEntry>,
    requests: Vec<RosterRequest>,
}

#[derive(Debug, Default)]
struct MembershipState {
    users: HashMap<Cid, User>,
    flags: HashMap<Cid, UserFlags>,
    facilities: BTreeMap<FacilityId, Facility>,
    assignments: Vec<RoleAssignment>,
    rosters: HashMap<FacilityId, FacilityRoster>,
}

/// In-memory membership repository.
///
/// Roster transactions hold a per-facility lock and stage writes on a copy of
/// that facility's roster, published on commit.
#[derive(Debug, Default)]
pub struct InMemoryMembershipRepository {
    state: Arc<RwLock<MembershipState>>,
    facility_locks: Mutex<HashMap<FacilityId, Arc<Mutex<()>>>>,
}

impl InMemoryMembershipRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with the given facilities.
    #[must_use]
    pub fn with_facilities(facilities: impl IntoIterator<Item = Facility>) -> Self {
        let state = MembershipState {
            facilities: facilities
                .into_iter()
                .map(|facility| (facility.id().clone(), facility))
                .collect(),
            ..MembershipState::default()
        };

        Self {
            state: Arc::new(RwLock::new(state)),
            facility_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a repository seeded with the standard facilities.
    pub fn with_standard_facilities() -> AppResult<Self> {
        Ok(Self::with_facilities(standard_facilities()?))
    }

    async fn facility_lock(&self, facility_id: &FacilityId) -> Arc<Mutex<()>> {
        self.facility_locks
            .lock()
            .await
            .entry(facility_id.clone())
            .or_default()
            .clone()
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn find_user(&self, cid: Cid) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&cid).cloned())
    }

    async fn upsert_user(&self, user: User) -> AppResult<()> {
        self.state.write().await.users.insert(user.cid(), user);
        Ok(())
    }

    async fn find_user_flags(&self, cid: Cid) -> AppResult<UserFlags> {
        Ok(self
            .state
            .read()
            .await
            .flags
            .get(&cid)
            .copied()
            .unwrap_or_default())
    }

    async fn upsert_user_flags(&self, cid: Cid, flags: UserFlags) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&cid) {
            return Err(AppError::Validation(format!("user '{cid}' does not exist")));
        }
        state.flags.insert(cid, flags);
        Ok(())
    }

    async fn find_facility(&self, facility_id: &FacilityId) -> AppResult<Option<Facility>> {
        Ok(self.state.read().await.facilities.get(facility_id).cloned())
    }

    async fn list_facilities(&self) -> AppResult<Vec<Facility>> {
        Ok(self.state.read().await.facilities.values().cloned().collect())
    }

    async fn list_role_assignments_for_user(&self, cid: Cid) -> AppResult<Vec<RoleAssignment>> {
        Ok(self
            .state
            .read()
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
            .read()
            .await
            .assignments
            .iter()
            .filter(|assignment| assignment.scope.facility_id() == Some(facility_id))
            .cloned()
            .collect())
    }

    async fn insert_role_assignment(&self, assignment: RoleAssignment) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&assignment.cid) {
            return Err(AppError::Validation(format!(
                "user '{}' does not exist",
                assignment.cid
            )));
        }
        if let Some(facility_id) = assignment.scope.facility_id()
            && !state.facilities.contains_key(facility_id)
        {
            return Err(AppError::Validation(format!(
                "facility '{facility_id}' does not exist"
            )));
        }
        if state.assignments.iter().any(|existing| {
            existing.cid == assignment.cid
                && existing.role == assignment.role
                && existing.scope == assignment.scope
        }) {
            return Err(AppError::Conflict(format!(
                "cid '{}' already holds role '{}' in scope '{}'",
                assignment.cid,
                assignment.role.as_str(),
                assignment.scope
            )));
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
        let mut state = self.state.write().await;
        let before = state.assignments.len();
        state.assignments.retain(|assignment| {
            !(assignment.cid == cid && assignment.role == role && &assignment.scope == scope)
        });

        Ok(state.assignments.len() != before)
    }

    async fn list_roster_entries(&self, facility_id: &FacilityId) -> AppResult<Vec<RosterEntry>> {
        let state = self.state.read().await;
        let mut entries = state
            .rosters
            .get(facility_id)
            .map(|roster| roster.entries.clone())
            .unwrap_or_default();
        entries.sort_by_key(|entry| entry.operating_initials);

        Ok(entries)
    }

    async fn list_roster_entries_for_user(&self, cid: Cid) -> AppResult<Vec<RosterEntry>> {
        let state = self.state.read().await;
        let mut entries: Vec<RosterEntry> = state
            .rosters
            .values()
            .flat_map(|roster| roster.entries.iter())
            .filter(|entry| entry.cid == cid)
            .cloned()
            .collect();
        entries.sort_by(|left, right| left.facility_id.cmp(&right.facility_id));

        Ok(entries)
    }

    async fn find_roster_request(
        &self,
        request_id: RosterRequestId,
    ) -> AppResult<Option<RosterRequest>> {
        Ok(self
            .state
            .read()
            .await
            .rosters
            .values()
            .flat_map(|roster| roster.requests.iter())
            .find(|request| request.id == request_id)
            .cloned())
    }

    async fn list_roster_requests(
        &self,
        query: &RosterRequestQuery,
    ) -> AppResult<Vec<RosterRequest>> {
        let state = self.state.read().await;
        let mut requests: Vec<RosterRequest> = state
            .rosters
            .values()
            .flat_map(|roster| roster.requests.iter())
            .filter(|request| query.matches(request))
            .cloned()
            .collect();
        requests.sort_by(|left, right| right.created_at.cmp(&left.created_at));

        Ok(requests)
    }

    async fn begin_roster_transaction(
        &self,
        facility_id: &FacilityId,
    ) -> AppResult<Box<dyn RosterTransaction>> {
        let guard = self.facility_lock(facility_id).await.lock_owned().await;
        let working = self
            .state
            .read()
            .await
            .rosters
            .get(facility_id)
            .cloned()
            .unwrap_or_default();

        Ok(Box::new(InMemoryRosterTransaction {
            facility_id: facility_id.clone(),
            state: self.state.clone(),
            working,
            _guard: guard,
        }))
    }
}

struct InMemoryRosterTransaction {
    facility_id: FacilityId,
    state: Arc<RwLock<MembershipState>>,
    working: FacilityRoster,
    _guard: OwnedMutexGuard<()>,
}

impl InMemoryRosterTransaction {
    fn entry_mut(&mut self, entry_id: RosterEntryId) -> AppResult<&mut RosterEntry> {
        self.working
            .entries
            .iter_mut()
            .find(|entry| entry.id == entry_id)
            .ok_or_else(|| AppError::NotFound(format!("roster entry '{entry_id}' does not exist")))
    }
}

#[async_trait]
impl RosterTransaction for InMemoryRosterTransaction {
    async fn find_roster_request_for_update(
        &mut self,
        request_id: RosterRequestId,
    ) -> AppResult<Option<RosterRequest>> {
        Ok(self
            .working
            .requests
            .iter()
            .find(|request| request.id == request_id)
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
            .find(|entry| entry.cid == cid)
            .cloned())
    }

    async fn list_active_initials(&mut self) -> AppResult<BTreeSet<OperatingInitials>> {
        Ok(self
            .working
            .entries
            .iter()
            .filter(|entry| entry.is_active())
            .map(|entry| entry.operating_initials)
            .collect())
    }

    async fn insert_roster_request(&mut self, request: &RosterRequest) -> AppResult<()> {
        if request.facility_id != self.facility_id {
            return Err(AppError::Internal(format!(
                "roster request for '{}' staged in transaction for '{}'",
                request.facility_id, self.facility_id
            )));
        }
        if request.status == RosterRequestStatus::Pending
            && self.working.requests.iter().any(|existing| {
                existing.cid == request.cid
                    && existing.request_type == request.request_type
                    && existing.status == RosterRequestStatus::Pending
            })
        {
            return Err(AppError::Conflict(format!(
                "cid '{}' already has a pending {} request for facility '{}'",
                request.cid,
                request.request_type.as_str(),
                self.facility_id
            )));
        }

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
            .ok_or_else(|| {
                AppError::NotFound(format!("roster request '{request_id}' does not exist"))
            })?;
        request.status = status;
        request.updated_at = updated_at;

        Ok(())
    }

    async fn insert_roster_entry(&mut self, entry: &RosterEntry) -> AppResult<()> {
        if entry.facility_id != self.facility_id {
            return Err(AppError::Internal(format!(
                "roster entry for '{}' staged in transaction for '{}'",
                entry.facility_id, self.facility_id
            )));
        }
        if self
            .working
            .entries
            .iter()
            .any(|existing| existing.cid == entry.cid)
        {
            return Err(AppError::Conflict(format!(
                "cid '{}' is already on the roster of facility '{}'",
                entry.cid, self.facility_id
            )));
        }
        if entry.is_active()
            && self.working.entries.iter().any(|existing| {
                existing.is_active() && existing.operating_initials == entry.operating_initials
            })
        {
            return Err(AppError::Conflict(format!(
                "operating initials '{}' are already active in facility '{}'",
                entry.operating_initials, self.facility_id
            )));
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
        let entry = self.entry_mut(entry_id)?;
        entry.status = status;
        entry.updated_at = updated_at;

        Ok(())
    }

    async fn delete_roster_entry(&mut self, entry_id: RosterEntryId) -> AppResult<()> {
        let before = self.working.entries.len();
        self.working.entries.retain(|entry| entry.id != entry_id);
        if self.working.entries.len() == before {
            return Err(AppError::NotFound(format!(
                "roster entry '{entry_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let Self {
            facility_id,
            state,
            working,
            _guard,
        } = *self;
        state.write().await.rosters.insert(facility_id, working);

        Ok(())
    }
}
