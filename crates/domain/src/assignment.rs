use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::facility::FacilityId;
use crate::role::RoleId;
use crate::user::Cid;

/// Where a role assignment applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "facility")]
pub enum RoleScope {
    /// Applies across the whole division.
    Division,
    /// Applies inside one facility.
    Facility(FacilityId),
}

impl RoleScope {
    /// Builds a scope from an optional facility column.
    #[must_use]
    pub fn from_facility(facility_id: Option<FacilityId>) -> Self {
        facility_id.map_or(Self::Division, Self::Facility)
    }

    /// Returns the facility for scoped assignments.
    #[must_use]
    pub fn facility_id(&self) -> Option<&FacilityId> {
        match self {
            Self::Division => None,
            Self::Facility(facility_id) => Some(facility_id),
        }
    }

    /// Returns whether an assignment with this scope applies in `facility_id`.
    #[must_use]
    pub fn covers(&self, facility_id: &FacilityId) -> bool {
        match self {
            Self::Division => true,
            Self::Facility(scoped) => scoped == facility_id,
        }
    }
}

impl Display for RoleScope {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Division => formatter.write_str("division"),
            Self::Facility(facility_id) => write!(formatter, "{facility_id}"),
        }
    }
}

/// Stable role assignment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleAssignmentId(Uuid);

impl RoleAssignmentId {
    /// Creates a random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleAssignmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoleAssignmentId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// One controller holding one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Stable assignment identifier.
    pub id: RoleAssignmentId,
    /// Controller holding the role.
    pub cid: Cid,
    /// Held role.
    pub role: RoleId,
    /// Facility or division scope.
    pub scope: RoleScope,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Snapshot of the roles one actor holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldRoles {
    held: HashSet<(RoleId, RoleScope)>,
}

impl HeldRoles {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one held role.
    pub fn insert(&mut self, role: RoleId, scope: RoleScope) {
        self.held.insert((role, scope));
    }

    /// Returns whether the exact role/scope pair is held.
    #[must_use]
    pub fn contains(&self, role: RoleId, scope: &RoleScope) -> bool {
        self.held.contains(&(role, scope.clone()))
    }

    /// Iterates over held role/scope pairs.
    pub fn iter(&self) -> impl Iterator<Item = (RoleId, &RoleScope)> {
        self.held.iter().map(|(role, scope)| (*role, scope))
    }

    /// Returns the number of held pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.held.len()
    }

    /// Returns whether nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

impl FromIterator<(RoleId, RoleScope)> for HeldRoles {
    fn from_iter<T: IntoIterator<Item = (RoleId, RoleScope)>>(iter: T) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a RoleAssignment> for HeldRoles {
    fn from_iter<T: IntoIterator<Item = &'a RoleAssignment>>(iter: T) -> Self {
        iter.into_iter()
            .map(|assignment| (assignment.role, assignment.scope.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{HeldRoles, RoleScope};
    use crate::facility::FacilityId;
    use crate::role::RoleId;

    fn facility(code: &str) -> FacilityId {
        FacilityId::new(code).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn division_scope_covers_every_facility() {
        assert!(RoleScope::Division.covers(&facility("ZDV")));
        assert!(RoleScope::Facility(facility("ZDV")).covers(&facility("ZDV")));
        assert!(!RoleScope::Facility(facility("ZDV")).covers(&facility("ZLA")));
    }

    #[test]
    fn held_roles_deduplicate_pairs() {
        let held: HeldRoles = [
            (RoleId::Mentor, RoleScope::Facility(facility("ZDV"))),
            (RoleId::Mentor, RoleScope::Facility(facility("ZDV"))),
            (RoleId::Mentor, RoleScope::Facility(facility("ZLA"))),
        ]
        .into_iter()
        .collect();

        assert_eq!(held.len(), 2);
        assert!(held.contains(RoleId::Mentor, &RoleScope::Facility(facility("ZLA"))));
        assert!(!held.contains(RoleId::Mentor, &RoleScope::Division));
    }

    #[test]
    fn scope_serializes_with_facility_payload() {
        let encoded = serde_json::to_string(&RoleScope::Facility(facility("ZDV")));
        assert_eq!(
            encoded.unwrap_or_default(),
            r#"{"kind":"facility","facility":"ZDV"}"#
        );
    }
}
