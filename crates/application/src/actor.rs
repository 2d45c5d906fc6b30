use artcc_domain::{Cid, HeldRoles};

/// Authenticated controller acting on the roster core, with a snapshot of
/// the roles it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    cid: Cid,
    held_roles: HeldRoles,
}

impl Actor {
    /// Creates an actor from an authenticated CID and its role snapshot.
    #[must_use]
    pub fn new(cid: Cid, held_roles: HeldRoles) -> Self {
        Self { cid, held_roles }
    }

    /// Returns the acting controller's CID.
    #[must_use]
    pub fn cid(&self) -> Cid {
        self.cid
    }

    /// Returns the actor's held roles.
    #[must_use]
    pub fn held_roles(&self) -> &HeldRoles {
        &self.held_roles
    }
}
