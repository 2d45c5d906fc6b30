use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use artcc_application::{Actor, AdmitToRosterInput};
use artcc_domain::{Cid, MembershipKind, RosterStatus};

use crate::dto::{AdmitToRosterRequest, RosterEntryResponse, UpdateRosterStatusRequest};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{parse_cid, parse_facility};

pub async fn list_roster_handler(
    State(state): State<AppState>,
    Path(facility): Path<String>,
) -> ApiResult<Json<Vec<RosterEntryResponse>>> {
    let facility_id = parse_facility(facility.as_str())?;
    let entries = state
        .roster_service
        .list_roster(&facility_id)
        .await?
        .into_iter()
        .map(RosterEntryResponse::from)
        .collect();

    Ok(Json(entries))
}

pub async fn list_user_rosters_handler(
    State(state): State<AppState>,
    Path(cid): Path<String>,
) -> ApiResult<Json<Vec<RosterEntryResponse>>> {
    let cid = parse_cid(cid.as_str())?;
    let entries = state
        .roster_service
        .list_rosters_for_user(cid)
        .await?
        .into_iter()
        .map(RosterEntryResponse::from)
        .collect();

    Ok(Json(entries))
}

pub async fn admit_to_roster_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(facility): Path<String>,
    Json(payload): Json<AdmitToRosterRequest>,
) -> ApiResult<(StatusCode, Json<RosterEntryResponse>)> {
    let input = AdmitToRosterInput {
        cid: Cid::new(payload.cid)?,
        facility_id: parse_facility(facility.as_str())?,
        membership_kind: MembershipKind::from_flags(payload.home, payload.visiting)?,
        mentor: payload.mentor,
        instructor: payload.instructor,
    };

    let entry = state.roster_service.admit_to_roster(&actor, input).await?;

    Ok((StatusCode::CREATED, Json(RosterEntryResponse::from(entry))))
}

pub async fn remove_from_roster_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((facility, cid)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let facility_id = parse_facility(facility.as_str())?;
    let cid = parse_cid(cid.as_str())?;

    state
        .roster_service
        .remove_from_roster(&actor, cid, &facility_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_roster_status_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((facility, cid)): Path<(String, String)>,
    Json(payload): Json<UpdateRosterStatusRequest>,
) -> ApiResult<Json<RosterEntryResponse>> {
    let facility_id = parse_facility(facility.as_str())?;
    let cid = parse_cid(cid.as_str())?;
    let status = RosterStatus::from_str(payload.status.as_str())?;

    let entry = state
        .roster_service
        .set_roster_status(&actor, cid, &facility_id, status)
        .await?;

    Ok(Json(RosterEntryResponse::from(entry)))
}
