use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use artcc_application::{Actor, RoleGrantInput};
use artcc_core::AppResult;
use artcc_domain::{Cid, FacilityId, RoleId, RoleScope};

use crate::dto::{RoleAssignmentRequest, RoleAssignmentResponse, RoleDefinitionResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{parse_cid, parse_facility};

pub async fn list_role_catalog_handler(
    State(state): State<AppState>,
) -> Json<Vec<RoleDefinitionResponse>> {
    let roles = state
        .authorization_service
        .catalog()
        .roles()
        .into_iter()
        .map(RoleDefinitionResponse::from)
        .collect();

    Json(roles)
}

pub async fn list_user_roles_handler(
    State(state): State<AppState>,
    Path(cid): Path<String>,
) -> ApiResult<Json<Vec<RoleAssignmentResponse>>> {
    let cid = parse_cid(cid.as_str())?;
    let assignments = state
        .role_assignment_service
        .list_assignments_for_user(cid)
        .await?
        .into_iter()
        .map(RoleAssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}

pub async fn list_facility_roles_handler(
    State(state): State<AppState>,
    Path(facility): Path<String>,
) -> ApiResult<Json<Vec<RoleAssignmentResponse>>> {
    let facility_id = parse_facility(facility.as_str())?;
    let assignments = state
        .role_assignment_service
        .list_assignments_for_facility(&facility_id)
        .await?
        .into_iter()
        .map(RoleAssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}

pub async fn assign_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<RoleAssignmentRequest>,
) -> ApiResult<(StatusCode, Json<RoleAssignmentResponse>)> {
    let input = role_grant_input(payload)?;
    let assignment = state
        .role_assignment_service
        .grant_role(&actor, input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RoleAssignmentResponse::from(assignment)),
    ))
}

pub async fn unassign_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<RoleAssignmentRequest>,
) -> ApiResult<StatusCode> {
    let input = role_grant_input(payload)?;
    state
        .role_assignment_service
        .revoke_role(&actor, input)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

fn role_grant_input(payload: RoleAssignmentRequest) -> AppResult<RoleGrantInput> {
    let facility_id = payload
        .facility
        .filter(|value| !value.trim().is_empty())
        .map(FacilityId::new)
        .transpose()?;

    Ok(RoleGrantInput {
        cid: Cid::new(payload.cid)?,
        role: RoleId::from_str(payload.role.as_str())?,
        scope: RoleScope::from_facility(facility_id),
    })
}
