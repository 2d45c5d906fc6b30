use serde::{Deserialize, Serialize};

/// Audit event action catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// Emitted when a role is granted to a controller.
    RoleAssigned,
    /// Emitted when a role is revoked from a controller.
    RoleUnassigned,
    /// Emitted when a controller submits a roster request.
    RosterRequestSubmitted,
    /// Emitted when a roster request is accepted.
    RosterRequestAccepted,
    /// Emitted when a roster request is rejected.
    RosterRequestRejected,
    /// Emitted when a controller is added to a facility roster.
    RosterEntryCreated,
    /// Emitted when a controller is removed from a facility roster.
    RosterEntryRemoved,
    /// Emitted when a roster entry switches between active and leave of absence.
    RosterEntryStatusChanged,
    /// Emitted when division staff change a controller's membership flags.
    UserFlagsUpdated,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleAssigned => "role.assigned",
            Self::RoleUnassigned => "role.unassigned",
            Self::RosterRequestSubmitted => "roster.request.submitted",
            Self::RosterRequestAccepted => "roster.request.accepted",
            Self::RosterRequestRejected => "roster.request.rejected",
            Self::RosterEntryCreated => "roster.entry.created",
            Self::RosterEntryRemoved => "roster.entry.removed",
            Self::RosterEntryStatusChanged => "roster.entry.status_changed",
            Self::UserFlagsUpdated => "user.flags.updated",
        }
    }
}
