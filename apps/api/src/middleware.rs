use std::str::FromStr;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use artcc_application::Actor;
use artcc_core::AppError;
use artcc_domain::Cid;

use crate::error::ApiResult;
use crate::state::AppState;

/// Header carrying the CID authenticated by the upstream gateway.
pub const ACTOR_CID_HEADER: &str = "x-actor-cid";

/// Resolves the acting controller and their held roles for mutating routes.
pub async fn require_actor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let raw_cid = request
        .headers()
        .get(ACTOR_CID_HEADER)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("actor cid header is not valid text".to_owned()))?;
    let cid = Cid::from_str(raw_cid)
        .map_err(|_| AppError::Unauthorized(format!("actor cid '{raw_cid}' is invalid")))?;

    let held_roles = state.role_assignment_service.held_roles(cid).await?;
    request.extensions_mut().insert(Actor::new(cid, held_roles));
    Ok(next.run(request).await)
}
