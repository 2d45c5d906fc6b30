mod inputs;
mod repository;
mod transaction;

pub use inputs::{
    AdmitToRosterInput, RoleGrantInput, RosterRequestQuery, SubmitRosterRequestInput,
};
pub use repository::MembershipRepository;
pub use transaction::RosterTransaction;
