use std::str::FromStr;

use artcc_core::AppResult;
use artcc_domain::{Cid, FacilityId};

pub mod directory;
pub mod health;
pub mod roles;
pub mod roster;
pub mod roster_requests;

fn parse_cid(value: &str) -> AppResult<Cid> {
    Cid::from_str(value)
}

fn parse_facility(value: &str) -> AppResult<FacilityId> {
    FacilityId::new(value)
}
