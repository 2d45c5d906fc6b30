use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;

use artcc_application::{Actor, RosterRequestQuery, SubmitRosterRequestInput};
use artcc_core::AppResult;
use artcc_domain::{
    Cid, RosterDecision, RosterRequestId, RosterRequestStatus, RosterRequestType,
};

use crate::dto::{
    RosterDecisionRequest, RosterRequestListQuery, RosterRequestResponse,
    SubmitRosterRequestRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::parse_facility;

pub async fn list_roster_requests_handler(
    State(state): State<AppState>,
    Query(query): Query<RosterRequestListQuery>,
) -> ApiResult<Json<Vec<RosterRequestResponse>>> {
    let query = roster_request_query(query)?;
    let requests = state
        .roster_service
        .list_roster_requests(&query)
        .await?
        .into_iter()
        .map(RosterRequestResponse::from)
        .collect();

    Ok(Json(requests))
}

pub async fn get_roster_request_handler(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> ApiResult<Json<RosterRequestResponse>> {
    let request_id = RosterRequestId::from_str(request_id.as_str())?;
    let request = state.roster_service.find_roster_request(request_id).await?;

    Ok(Json(RosterRequestResponse::from(request)))
}

pub async fn submit_roster_request_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<SubmitRosterRequestRequest>,
) -> ApiResult<(StatusCode, Json<RosterRequestResponse>)> {
    let cid = payload.cid.map(Cid::new).transpose()?.unwrap_or(actor.cid());
    let input = SubmitRosterRequestInput {
        cid,
        facility_id: parse_facility(payload.facility.as_str())?,
        request_type: RosterRequestType::from_str(payload.request_type.as_str())?,
        reason: payload.reason,
    };

    let request = state
        .roster_service
        .submit_roster_request(&actor, input)
        .await?;

    Ok((StatusCode::CREATED, Json(RosterRequestResponse::from(request))))
}

pub async fn decide_roster_request_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(request_id): Path<String>,
    Json(payload): Json<RosterDecisionRequest>,
) -> ApiResult<Json<RosterRequestResponse>> {
    let request_id = RosterRequestId::from_str(request_id.as_str())?;
    let decision = RosterDecision::from_str(payload.decision.as_str())?;

    let request = state
        .roster_service
        .decide_roster_request(&actor, request_id, decision)
        .await?;

    Ok(Json(RosterRequestResponse::from(request)))
}

fn roster_request_query(query: RosterRequestListQuery) -> AppResult<RosterRequestQuery> {
    Ok(RosterRequestQuery {
        facility_id: query
            .facility
            .as_deref()
            .map(parse_facility)
            .transpose()?,
        cid: query.cid.map(Cid::new).transpose()?,
        request_type: query
            .request_type
            .as_deref()
            .map(RosterRequestType::from_str)
            .transpose()?,
        status: query
            .status
            .as_deref()
            .map(RosterRequestStatus::from_str)
            .transpose()?,
    })
}
