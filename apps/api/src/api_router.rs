use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use artcc_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/api/roles", get(handlers::roles::list_role_catalog_handler))
        .route(
            "/api/facilities",
            get(handlers::directory::list_facilities_handler),
        )
        .route(
            "/api/facilities/{facility}",
            get(handlers::directory::get_facility_handler),
        )
        .route(
            "/api/facilities/{facility}/roles",
            get(handlers::roles::list_facility_roles_handler),
        )
        .route(
            "/api/facilities/{facility}/roster",
            get(handlers::roster::list_roster_handler),
        )
        .route(
            "/api/users/{cid}",
            get(handlers::directory::get_user_handler),
        )
        .route(
            "/api/users/{cid}/roles",
            get(handlers::roles::list_user_roles_handler),
        )
        .route(
            "/api/users/{cid}/flags",
            get(handlers::directory::get_user_flags_handler),
        )
        .route(
            "/api/users/{cid}/rosters",
            get(handlers::roster::list_user_rosters_handler),
        )
        .route(
            "/api/roster-requests",
            get(handlers::roster_requests::list_roster_requests_handler),
        )
        .route(
            "/api/roster-requests/{request_id}",
            get(handlers::roster_requests::get_roster_request_handler),
        );

    let protected_routes = Router::new()
        .route(
            "/api/users/{cid}",
            put(handlers::directory::upsert_user_handler),
        )
        .route(
            "/api/users/{cid}/flags",
            put(handlers::directory::update_user_flags_handler),
        )
        .route(
            "/api/role-assignments",
            post(handlers::roles::assign_role_handler),
        )
        .route(
            "/api/role-unassignments",
            post(handlers::roles::unassign_role_handler),
        )
        .route(
            "/api/roster-requests",
            post(handlers::roster_requests::submit_roster_request_handler),
        )
        .route(
            "/api/roster-requests/{request_id}/decision",
            post(handlers::roster_requests::decide_roster_request_handler),
        )
        .route(
            "/api/facilities/{facility}/roster",
            post(handlers::roster::admit_to_roster_handler),
        )
        .route(
            "/api/facilities/{facility}/roster/{cid}",
            delete(handlers::roster::remove_from_roster_handler),
        )
        .route(
            "/api/facilities/{facility}/roster/{cid}/status",
            put(handlers::roster::update_roster_status_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_actor,
        ));

    Ok(public_routes
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}

#[cfg(test)]
mod tests;
