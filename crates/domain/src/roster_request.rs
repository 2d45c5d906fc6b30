//! Roster request state machine.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use artcc_core::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::facility::FacilityId;
use crate::roster::MembershipKind;
use crate::user::Cid;

/// Stable roster request identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RosterRequestId(Uuid);

impl RosterRequestId {
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

impl Default for RosterRequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for RosterRequestId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| {
                AppError::Validation(format!("invalid roster request id '{value}': {error}"))
            })
    }
}

impl Display for RosterRequestId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// What the controller is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterRequestType {
    /// Join the facility as a visitor.
    Visiting,
    /// Move home membership to the facility.
    Transferring,
}

impl RosterRequestType {
    /// Returns the storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visiting => "visiting",
            Self::Transferring => "transferring",
        }
    }

    /// Returns the membership kind an accepted request admits with.
    #[must_use]
    pub fn membership_kind(&self) -> MembershipKind {
        match self {
            Self::Visiting => MembershipKind::Visiting,
            Self::Transferring => MembershipKind::Home,
        }
    }
}

impl FromStr for RosterRequestType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "visiting" => Ok(Self::Visiting),
            "transferring" => Ok(Self::Transferring),
            _ => Err(AppError::Validation(format!(
                "unknown roster request type '{value}'"
            ))),
        }
    }
}

/// Lifecycle status of a roster request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterRequestStatus {
    /// Awaiting a decision.
    Pending,
    /// Accepted; the controller was admitted.
    Accepted,
    /// Rejected.
    Rejected,
}

impl RosterRequestStatus {
    /// Returns the storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Returns whether the status can no longer change.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl FromStr for RosterRequestStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(AppError::Validation(format!(
                "unknown roster request status '{value}'"
            ))),
        }
    }
}

/// Decision taken on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterDecision {
    /// Accept and admit.
    Accept,
    /// Reject.
    Reject,
}

impl RosterDecision {
    /// Returns the terminal status the decision leads to.
    #[must_use]
    pub fn resulting_status(&self) -> RosterRequestStatus {
        match self {
            Self::Accept => RosterRequestStatus::Accepted,
            Self::Reject => RosterRequestStatus::Rejected,
        }
    }
}

impl FromStr for RosterDecision {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "accept" | "accepted" => Ok(Self::Accept),
            "reject" | "rejected" => Ok(Self::Reject),
            _ => Err(AppError::Validation(format!(
                "unknown roster decision '{value}'"
            ))),
        }
    }
}

/// Application to join or transfer into a facility roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRequest {
    /// Stable request identifier.
    pub id: RosterRequestId,
    /// Requesting controller.
    pub cid: Cid,
    /// Requested facility.
    pub facility_id: FacilityId,
    /// Visiting or transferring.
    pub request_type: RosterRequestType,
    /// Lifecycle status.
    pub status: RosterRequestStatus,
    /// Free-text reason supplied by the controller.
    pub reason: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl RosterRequest {
    /// Returns the status a decision moves this request to.
    ///
    /// Only pending requests can be decided.
    pub fn transition(&self, decision: RosterDecision) -> AppResult<RosterRequestStatus> {
        if self.status.is_terminal() {
            return Err(AppError::InvalidState(format!(
                "roster request '{}' is already {}",
                self.id,
                self.status.as_str()
            )));
        }

        Ok(decision.resulting_status())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{
        RosterDecision, RosterRequest, RosterRequestId, RosterRequestStatus, RosterRequestType,
    };
    use crate::facility::FacilityId;
    use crate::roster::MembershipKind;
    use crate::user::Cid;

    fn request(status: RosterRequestStatus) -> RosterRequest {
        RosterRequest {
            id: RosterRequestId::new(),
            cid: Cid::new(1_293_257).unwrap_or_else(|_| unreachable!()),
            facility_id: FacilityId::new("ZDV").unwrap_or_else(|_| unreachable!()),
            request_type: RosterRequestType::Transferring,
            status,
            reason: "moving to Denver".to_owned(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn pending_request_moves_to_decision_status() {
        let pending = request(RosterRequestStatus::Pending);
        assert!(matches!(
            pending.transition(RosterDecision::Accept),
            Ok(RosterRequestStatus::Accepted)
        ));
        assert!(matches!(
            pending.transition(RosterDecision::Reject),
            Ok(RosterRequestStatus::Rejected)
        ));
    }

    #[test]
    fn terminal_requests_cannot_be_decided_again() {
        for status in [RosterRequestStatus::Accepted, RosterRequestStatus::Rejected] {
            let decided = request(status);
            for decision in [RosterDecision::Accept, RosterDecision::Reject] {
                assert!(matches!(
                    decided.transition(decision),
                    Err(artcc_core::AppError::InvalidState(_))
                ));
            }
        }
    }

    #[test]
    fn request_type_maps_to_membership_kind() {
        assert_eq!(
            RosterRequestType::Visiting.membership_kind(),
            MembershipKind::Visiting
        );
        assert_eq!(
            RosterRequestType::Transferring.membership_kind(),
            MembershipKind::Home
        );
    }

    #[test]
    fn request_id_parse_rejects_garbage() {
        assert!("not-a-uuid".parse::<RosterRequestId>().is_err());
        let id = RosterRequestId::new();
        assert!(id.to_string().parse::<RosterRequestId>().is_ok_and(|value| value == id));
    }
}
