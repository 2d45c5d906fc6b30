use axum::Json;
use axum::extract::{Extension, Path, State};

use artcc_application::Actor;
use artcc_domain::{OperatingInitials, User};

use crate::dto::{FacilityResponse, UpsertUserRequest, UserFlagsPayload, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{parse_cid, parse_facility};

pub async fn list_facilities_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<FacilityResponse>>> {
    let facilities = state
        .directory_service
        .list_facilities()
        .await?
        .into_iter()
        .map(FacilityResponse::from)
        .collect();

    Ok(Json(facilities))
}

pub async fn get_facility_handler(
    State(state): State<AppState>,
    Path(facility): Path<String>,
) -> ApiResult<Json<FacilityResponse>> {
    let facility_id = parse_facility(facility.as_str())?;
    let facility = state.directory_service.find_facility(&facility_id).await?;

    Ok(Json(FacilityResponse::from(facility)))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(cid): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let cid = parse_cid(cid.as_str())?;
    let user = state.directory_service.find_user(cid).await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn upsert_user_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(cid): Path<String>,
    Json(payload): Json<UpsertUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let cid = parse_cid(cid.as_str())?;
    let preferred_initials = payload
        .preferred_initials
        .filter(|value| !value.trim().is_empty())
        .map(OperatingInitials::new)
        .transpose()?;
    let user = User::new(
        cid,
        payload.first_name,
        payload.last_name,
        preferred_initials,
    )?;

    let user = state.directory_service.upsert_user(&actor, user).await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn get_user_flags_handler(
    State(state): State<AppState>,
    Path(cid): Path<String>,
) -> ApiResult<Json<UserFlagsPayload>> {
    let cid = parse_cid(cid.as_str())?;
    let flags = state.directory_service.find_user_flags(cid).await?;

    Ok(Json(UserFlagsPayload::from(flags)))
}

pub async fn update_user_flags_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(cid): Path<String>,
    Json(payload): Json<UserFlagsPayload>,
) -> ApiResult<Json<UserFlagsPayload>> {
    let cid = parse_cid(cid.as_str())?;
    let flags = state
        .directory_service
        .set_user_flags(&actor, cid, payload.into())
        .await?;

    Ok(Json(UserFlagsPayload::from(flags)))
}
