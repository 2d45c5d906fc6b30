use serde::{Deserialize, Serialize};

use crate::roster_request::RosterRequestType;

/// Membership restrictions placed on a controller by division staff.
///
/// A controller without a stored record carries no restrictions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFlags {
    /// Barred from roles in the staff groups.
    pub no_staff_role: bool,
    /// Barred from visiting other facilities.
    pub no_visiting: bool,
    /// Barred from transferring between facilities.
    pub no_transferring: bool,
    /// Barred from training. Stored for other systems; rosters ignore it.
    pub no_training: bool,
}

impl UserFlags {
    /// Returns whether these flags forbid submitting a request of this type.
    #[must_use]
    pub fn blocks_request(&self, request_type: RosterRequestType) -> bool {
        match request_type {
            RosterRequestType::Visiting => self.no_visiting,
            RosterRequestType::Transferring => self.no_transferring,
        }
    }

    /// Returns whether no restriction is set.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::UserFlags;
    use crate::roster_request::RosterRequestType;

    #[test]
    fn request_blocks_follow_request_type() {
        let no_visiting = UserFlags {
            no_visiting: true,
            ..UserFlags::default()
        };

        assert!(no_visiting.blocks_request(RosterRequestType::Visiting));
        assert!(!no_visiting.blocks_request(RosterRequestType::Transferring));
        assert!(!no_visiting.is_clear());
        assert!(UserFlags::default().is_clear());
    }

    #[test]
    fn training_flag_blocks_no_roster_request() {
        let no_training = UserFlags {
            no_training: true,
            ..UserFlags::default()
        };

        assert!(!no_training.blocks_request(RosterRequestType::Visiting));
        assert!(!no_training.blocks_request(RosterRequestType::Transferring));
    }
}
