use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use artcc_domain::Cid;
use serde_json::{Value, json};
use tower::ServiceExt;

use super::build_router;
use crate::api_config::BootstrapDirector;
use crate::api_services::{build_app_state, build_memory_storage};
use crate::bootstrap::seed_division_director;
use crate::middleware::ACTOR_CID_HEADER;

const DIRECTOR: u32 = 1_000_001;
const MANAGER: u32 = 1_000_002;
const CONTROLLER: u32 = 1_000_003;

async fn test_router() -> Router {
    let Ok(storage) = build_memory_storage() else {
        unreachable!()
    };
    let Ok(app_state) = build_app_state(storage, None) else {
        unreachable!()
    };
    let director = BootstrapDirector {
        cid: Cid::new(DIRECTOR).unwrap_or_else(|_| unreachable!()),
        first_name: "Dana".to_owned(),
        last_name: "Director".to_owned(),
    };
    assert!(seed_division_director(&app_state, &director).await.is_ok());

    build_router(app_state, "http://localhost:3000").unwrap_or_else(|_| unreachable!())
}

fn request(method: &str, uri: &str, actor: Option<u32>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header(ACTOR_CID_HEADER, actor.to_string());
    }
    let body = match body {
        Some(body) => {
            builder = builder.header("content-type", "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    builder.body(body).unwrap_or_else(|_| unreachable!())
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|_| unreachable!())
}

async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

async fn register_user(router: &Router, cid: u32, first_name: &str, last_name: &str) {
    let response = send(
        router,
        request(
            "PUT",
            &format!("/api/users/{cid}"),
            Some(cid),
            Some(json!({ "first_name": first_name, "last_name": last_name })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_and_catalog_are_public() {
    let router = test_router().await;

    let health = send(&router, request("GET", "/health", None, None)).await;
    assert_eq!(health.status(), StatusCode::OK);

    let catalog = send(&router, request("GET", "/api/roles", None, None)).await;
    assert_eq!(catalog.status(), StatusCode::OK);
    let body = read_json(catalog).await;
    assert!(body.as_array().is_some_and(|roles| {
        roles
            .iter()
            .any(|role| role["role"] == "ATM" && role["facility_based"] == true)
    }));
}

#[tokio::test]
async fn mutations_require_actor_header() {
    let router = test_router().await;

    let missing = send(
        &router,
        request(
            "POST",
            "/api/role-assignments",
            None,
            Some(json!({ "cid": MANAGER, "role": "ATM", "facility": "ZDV" })),
        ),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let malformed = send(
        &router,
        request(
            "POST",
            "/api/role-assignments",
            Some(0),
            Some(json!({ "cid": MANAGER, "role": "ATM", "facility": "ZDV" })),
        ),
    )
    .await;
    assert_eq!(malformed.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn request_is_submitted_accepted_and_rostered() {
    let router = test_router().await;
    register_user(&router, MANAGER, "Morgan", "Manager").await;
    register_user(&router, CONTROLLER, "Jane", "Doe").await;

    let grant = send(
        &router,
        request(
            "POST",
            "/api/role-assignments",
            Some(DIRECTOR),
            Some(json!({ "cid": MANAGER, "role": "ATM", "facility": "ZDV" })),
        ),
    )
    .await;
    assert_eq!(grant.status(), StatusCode::CREATED);

    let submitted = send(
        &router,
        request(
            "POST",
            "/api/roster-requests",
            Some(CONTROLLER),
            Some(json!({
                "facility": "ZDV",
                "request_type": "visiting",
                "reason": "visiting for events"
            })),
        ),
    )
    .await;
    assert_eq!(submitted.status(), StatusCode::CREATED);
    let submitted = read_json(submitted).await;
    let request_id = submitted["request_id"].as_str().unwrap_or_default().to_owned();

    let decision_uri = format!("/api/roster-requests/{request_id}/decision");
    let accepted = send(
        &router,
        request(
            "POST",
            &decision_uri,
            Some(MANAGER),
            Some(json!({ "decision": "accept" })),
        ),
    )
    .await;
    assert_eq!(accepted.status(), StatusCode::OK);
    assert_eq!(read_json(accepted).await["status"], "accepted");

    let roster = send(
        &router,
        request("GET", "/api/facilities/ZDV/roster", None, None),
    )
    .await;
    let roster = read_json(roster).await;
    assert!(roster.as_array().is_some_and(|entries| {
        entries.len() == 1
            && entries[0]["cid"] == CONTROLLER
            && entries[0]["operating_initials"] == "JD"
            && entries[0]["membership_kind"] == "visiting"
    }));

    let repeated = send(
        &router,
        request(
            "POST",
            &decision_uri,
            Some(MANAGER),
            Some(json!({ "decision": "reject" })),
        ),
    )
    .await;
    assert_eq!(repeated.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn controllers_without_roles_are_forbidden() {
    let router = test_router().await;
    register_user(&router, CONTROLLER, "Jane", "Doe").await;

    let grant = send(
        &router,
        request(
            "POST",
            "/api/role-assignments",
            Some(CONTROLLER),
            Some(json!({ "cid": CONTROLLER, "role": "ATM", "facility": "ZDV" })),
        ),
    )
    .await;
    assert_eq!(grant.status(), StatusCode::FORBIDDEN);

    let admission = send(
        &router,
        request(
            "POST",
            "/api/facilities/ZDV/roster",
            Some(CONTROLLER),
            Some(json!({ "cid": CONTROLLER, "home": true })),
        ),
    )
    .await;
    assert_eq!(admission.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_identifiers_are_bad_requests() {
    let router = test_router().await;

    let bad_request_id = send(
        &router,
        request("GET", "/api/roster-requests/not-a-uuid", None, None),
    )
    .await;
    assert_eq!(bad_request_id.status(), StatusCode::BAD_REQUEST);

    let bad_facility = send(
        &router,
        request("GET", "/api/facilities/denver/roster", None, None),
    )
    .await;
    assert_eq!(bad_facility.status(), StatusCode::BAD_REQUEST);

    let unknown_facility = send(
        &router,
        request("GET", "/api/facilities/ZZZ/roster", None, None),
    )
    .await;
    assert_eq!(unknown_facility.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn flagged_controller_cannot_request_visiting() {
    let router = test_router().await;
    register_user(&router, CONTROLLER, "Jane", "Doe").await;

    let flagged = send(
        &router,
        request(
            "PUT",
            &format!("/api/users/{CONTROLLER}/flags"),
            Some(DIRECTOR),
            Some(json!({ "no_visiting": true })),
        ),
    )
    .await;
    assert_eq!(flagged.status(), StatusCode::OK);

    let flags = send(
        &router,
        request("GET", &format!("/api/users/{CONTROLLER}/flags"), None, None),
    )
    .await;
    let flags = read_json(flags).await;
    assert_eq!(flags["no_visiting"], true);
    assert_eq!(flags["no_transferring"], false);

    let visiting = send(
        &router,
        request(
            "POST",
            "/api/roster-requests",
            Some(CONTROLLER),
            Some(json!({
                "facility": "ZDV",
                "request_type": "visiting",
                "reason": "visiting for events"
            })),
        ),
    )
    .await;
    assert_eq!(visiting.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_references_in_mutations_are_bad_requests() {
    let router = test_router().await;

    let unknown_user = send(
        &router,
        request(
            "POST",
            "/api/role-assignments",
            Some(DIRECTOR),
            Some(json!({ "cid": 4_242_424, "role": "ATM", "facility": "ZDV" })),
        ),
    )
    .await;
    assert_eq!(unknown_user.status(), StatusCode::BAD_REQUEST);

    let unknown_facility = send(
        &router,
        request(
            "POST",
            "/api/roster-requests",
            Some(DIRECTOR),
            Some(json!({
                "facility": "ZZZ",
                "request_type": "visiting",
                "reason": "visiting for events"
            })),
        ),
    )
    .await;
    assert_eq!(unknown_facility.status(), StatusCode::BAD_REQUEST);
}
