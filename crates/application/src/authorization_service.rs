use std::collections::BTreeSet;
use std::sync::Arc;

use artcc_core::{AppError, AppResult};
use artcc_domain::{FacilityId, GroupId, HeldRoles, RoleCatalog, RoleId, RoleScope};
use tracing::warn;

use crate::Actor;

/// Groups whose members may decide roster requests and manage rosters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterDecisionPolicy {
    decider_groups: BTreeSet<GroupId>,
}

impl RosterDecisionPolicy {
    /// Creates a policy from a non-empty set of decider groups.
    pub fn new(decider_groups: impl IntoIterator<Item = GroupId>) -> AppResult<Self> {
        let decider_groups: BTreeSet<GroupId> = decider_groups.into_iter().collect();
        if decider_groups.is_empty() {
            return Err(AppError::Validation(
                "roster decision policy requires at least one group".to_owned(),
            ));
        }

        Ok(Self { decider_groups })
    }

    /// Returns the default policy: facility management and division management.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            decider_groups: BTreeSet::from([
                GroupId::FacilityManagement,
                GroupId::DivisionManagement,
            ]),
        }
    }

    /// Returns the configured decider groups.
    #[must_use]
    pub fn decider_groups(&self) -> &BTreeSet<GroupId> {
        &self.decider_groups
    }
}

impl Default for RosterDecisionPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Pure authorization decisions over the role catalog and an actor's held
/// roles.
#[derive(Clone)]
pub struct AuthorizationService {
    catalog: Arc<RoleCatalog>,
    decision_policy: Arc<RosterDecisionPolicy>,
}

impl AuthorizationService {
    /// Creates an authorization service over a shared catalog.
    #[must_use]
    pub fn new(catalog: Arc<RoleCatalog>, decision_policy: RosterDecisionPolicy) -> Self {
        Self {
            catalog,
            decision_policy: Arc::new(decision_policy),
        }
    }

    /// Returns the role catalog.
    #[must_use]
    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// Returns the roster decision policy.
    #[must_use]
    pub fn decision_policy(&self) -> &RosterDecisionPolicy {
        &self.decision_policy
    }

    /// Returns the display name of a role, if it is in the catalog.
    #[must_use]
    pub fn display_name(&self, role: RoleId) -> Option<&str> {
        self.catalog.display_name(role)
    }

    /// Returns whether a role belongs to a group.
    #[must_use]
    pub fn in_group(&self, role: RoleId, group: GroupId) -> bool {
        self.catalog.in_group(role, group)
    }

    /// Returns whether a role is in the catalog.
    #[must_use]
    pub fn is_valid_role(&self, role: RoleId) -> bool {
        self.catalog.is_valid_role(role)
    }

    /// Returns whether a role is a staff position, barred by the
    /// `no_staff_role` flag.
    #[must_use]
    pub fn is_staff_role(&self, role: RoleId) -> bool {
        self.in_group(role, GroupId::FacilityStaff) || self.in_group(role, GroupId::DivisionStaff)
    }

    /// Returns whether the held roles include a division-wide staff role.
    #[must_use]
    pub fn is_division_staff(&self, held_roles: &HeldRoles) -> bool {
        held_roles.iter().any(|(role, scope)| {
            scope == &RoleScope::Division && self.in_group(role, GroupId::DivisionStaff)
        })
    }

    /// Returns whether the held roles authorize granting `role` in `target`.
    ///
    /// A qualifying holding is a role listed in the target's `roles_can_add`
    /// or a role belonging to one of its `groups_can_add`. Facility-scoped
    /// holdings only authorize inside their own facility; a division-wide
    /// target needs a division-wide holding.
    #[must_use]
    pub fn can_grant(&self, held_roles: &HeldRoles, role: RoleId, target: &RoleScope) -> bool {
        let Some(definition) = self.catalog.definition(role) else {
            return false;
        };

        held_roles.iter().any(|(held_role, held_scope)| {
            let qualifies = definition.roles_can_add().contains(&held_role)
                || definition
                    .groups_can_add()
                    .iter()
                    .any(|group| self.catalog.in_group(held_role, *group));

            qualifies && scope_reaches(held_scope, target)
        })
    }

    /// Ensures the actor may grant or revoke `role` in `target`.
    pub fn require_grant(&self, actor: &Actor, role: RoleId, target: &RoleScope) -> AppResult<()> {
        if self.can_grant(actor.held_roles(), role, target) {
            return Ok(());
        }

        warn!(
            actor = %actor.cid(),
            role = role.as_str(),
            scope = %target,
            "role grant denied"
        );
        Err(AppError::Forbidden(format!(
            "cid '{}' may not grant role '{}' in scope '{target}'",
            actor.cid(),
            role.as_str()
        )))
    }

    /// Returns whether the held roles allow deciding roster requests and
    /// managing the roster of `facility_id`.
    #[must_use]
    pub fn can_manage_roster(&self, held_roles: &HeldRoles, facility_id: &FacilityId) -> bool {
        held_roles.iter().any(|(held_role, held_scope)| {
            held_scope.covers(facility_id)
                && self
                    .decision_policy
                    .decider_groups()
                    .iter()
                    .any(|group| self.catalog.in_group(held_role, *group))
        })
    }

    /// Ensures the actor may decide requests for and manage the roster of
    /// `facility_id`.
    pub fn require_roster_manager(&self, actor: &Actor, facility_id: &FacilityId) -> AppResult<()> {
        if self.can_manage_roster(actor.held_roles(), facility_id) {
            return Ok(());
        }

        warn!(
            actor = %actor.cid(),
            facility = %facility_id,
            "roster management denied"
        );
        Err(AppError::Forbidden(format!(
            "cid '{}' may not manage the roster of facility '{facility_id}'",
            actor.cid()
        )))
    }
}

fn scope_reaches(held_scope: &RoleScope, target: &RoleScope) -> bool {
    match target {
        RoleScope::Division => held_scope == &RoleScope::Division,
        RoleScope::Facility(facility_id) => held_scope.covers(facility_id),
    }
}

#[cfg(test)]
mod tests;
