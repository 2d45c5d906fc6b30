use std::sync::Arc;

use artcc_core::AppError;
use artcc_domain::{AuditAction, RoleCatalog, RoleId, RoleScope, UserFlags};

use super::RoleAssignmentService;
use crate::test_support::{FakeAuditRepository, FakeMembershipRepository, actor, cid, facility};
use crate::{AuthorizationService, RoleGrantInput, RosterDecisionPolicy};

struct Harness {
    service: RoleAssignmentService,
    repository: Arc<FakeMembershipRepository>,
    audit: Arc<FakeAuditRepository>,
}

async fn harness() -> Harness {
    let repository = Arc::new(FakeMembershipRepository::with_facilities().await);
    repository.add_user(1_000_001, "Jane", "Doe", None).await;
    repository.add_user(1_000_002, "Rob", "Pike", None).await;
    let audit = Arc::new(FakeAuditRepository::default());
    let service = RoleAssignmentService::new(
        AuthorizationService::new(
            Arc::new(RoleCatalog::standard()),
            RosterDecisionPolicy::standard(),
        ),
        repository.clone(),
        audit.clone(),
    );

    Harness {
        service,
        repository,
        audit,
    }
}

fn grant(role: RoleId, scope: RoleScope) -> RoleGrantInput {
    RoleGrantInput {
        cid: cid(1_000_002),
        role,
        scope,
    }
}

#[tokio::test]
async fn director_grants_air_traffic_manager_and_audits() {
    let harness = harness().await;
    let director = actor(1_000_001, &[(RoleId::DivisionDirector, RoleScope::Division)]);

    let result = harness
        .service
        .grant_role(
            &director,
            grant(RoleId::AirTrafficManager, RoleScope::Facility(facility("ZDV"))),
        )
        .await;
    assert!(result.is_ok());

    let held = harness.service.held_roles(cid(1_000_002)).await;
    assert!(held.is_ok_and(|held| {
        held.contains(RoleId::AirTrafficManager, &RoleScope::Facility(facility("ZDV")))
    }));

    let events = harness.audit.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::RoleAssigned);
    assert_eq!(events[0].actor, Some(cid(1_000_001)));
}

#[tokio::test]
async fn mentor_cannot_grant_air_traffic_manager() {
    let harness = harness().await;
    let mentor = actor(
        1_000_001,
        &[(RoleId::Mentor, RoleScope::Facility(facility("ZDV")))],
    );

    let result = harness
        .service
        .grant_role(
            &mentor,
            grant(RoleId::AirTrafficManager, RoleScope::Facility(facility("ZDV"))),
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(harness.repository.assignments().await.is_empty());
    assert!(harness.audit.events.lock().await.is_empty());
}

#[tokio::test]
async fn facility_role_requires_facility_scope() {
    let harness = harness().await;
    let director = actor(1_000_001, &[(RoleId::DivisionDirector, RoleScope::Division)]);

    let facility_role = harness
        .service
        .grant_role(&director, grant(RoleId::Mentor, RoleScope::Division))
        .await;
    assert!(matches!(facility_role, Err(AppError::Validation(_))));

    let division_role = harness
        .service
        .grant_role(
            &director,
            grant(RoleId::DivisionStaff, RoleScope::Facility(facility("ZDV"))),
        )
        .await;
    assert!(matches!(division_role, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn grant_rejects_unknown_user_and_facility() {
    let harness = harness().await;
    let director = actor(1_000_001, &[(RoleId::DivisionDirector, RoleScope::Division)]);

    let unknown_user = harness
        .service
        .grant_role(
            &director,
            RoleGrantInput {
                cid: cid(9_999_999),
                role: RoleId::Mentor,
                scope: RoleScope::Facility(facility("ZDV")),
            },
        )
        .await;
    assert!(matches!(unknown_user, Err(AppError::Validation(_))));

    let unknown_facility = harness
        .service
        .grant_role(
            &director,
            grant(RoleId::Mentor, RoleScope::Facility(facility("ZZZ"))),
        )
        .await;
    assert!(matches!(unknown_facility, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn revoke_rejects_unknown_user_and_facility() {
    let harness = harness().await;
    let director = actor(1_000_001, &[(RoleId::DivisionDirector, RoleScope::Division)]);

    let unknown_user = harness
        .service
        .revoke_role(
            &director,
            RoleGrantInput {
                cid: cid(9_999_999),
                role: RoleId::Mentor,
                scope: RoleScope::Facility(facility("ZDV")),
            },
        )
        .await;
    assert!(matches!(unknown_user, Err(AppError::Validation(_))));

    let unknown_facility = harness
        .service
        .revoke_role(
            &director,
            grant(RoleId::Mentor, RoleScope::Facility(facility("ZZZ"))),
        )
        .await;
    assert!(matches!(unknown_facility, Err(AppError::Validation(_))));
    assert!(harness.audit.events.lock().await.is_empty());
}

#[tokio::test]
async fn duplicate_grant_conflicts() {
    let harness = harness().await;
    let director = actor(1_000_001, &[(RoleId::DivisionDirector, RoleScope::Division)]);
    let input = grant(RoleId::Instructor, RoleScope::Facility(facility("ZLA")));

    assert!(harness.service.grant_role(&director, input.clone()).await.is_ok());
    let second = harness.service.grant_role(&director, input).await;

    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert_eq!(harness.repository.assignments().await.len(), 1);
}

#[tokio::test]
async fn revoke_requires_existing_assignment() {
    let harness = harness().await;
    let manager = actor(
        1_000_001,
        &[(RoleId::AirTrafficManager, RoleScope::Facility(facility("ZDV")))],
    );
    let input = grant(RoleId::Mentor, RoleScope::Facility(facility("ZDV")));

    let missing = harness.service.revoke_role(&manager, input.clone()).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    assert!(harness.service.grant_role(&manager, input.clone()).await.is_ok());
    assert!(harness.service.revoke_role(&manager, input).await.is_ok());
    assert!(harness.repository.assignments().await.is_empty());

    let events = harness.audit.events.lock().await;
    assert_eq!(
        events.last().map(|event| event.action),
        Some(AuditAction::RoleUnassigned)
    );
}

#[tokio::test]
async fn revoke_outside_own_facility_is_forbidden() {
    let harness = harness().await;
    let director = actor(1_000_001, &[(RoleId::DivisionDirector, RoleScope::Division)]);
    let other_manager = actor(
        1_000_003,
        &[(RoleId::AirTrafficManager, RoleScope::Facility(facility("ZLA")))],
    );
    let input = grant(RoleId::Mentor, RoleScope::Facility(facility("ZDV")));

    assert!(harness.service.grant_role(&director, input.clone()).await.is_ok());
    let result = harness.service.revoke_role(&other_manager, input).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert_eq!(harness.repository.assignments().await.len(), 1);
}

#[tokio::test]
async fn seed_role_bypasses_grant_authority() {
    let harness = harness().await;

    let result = harness
        .service
        .seed_role(RoleGrantInput {
            cid: cid(1_000_001),
            role: RoleId::DivisionDirector,
            scope: RoleScope::Division,
        })
        .await;

    assert!(result.is_ok());
    let events = harness.audit.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].actor, None);
}

#[tokio::test]
async fn facility_listing_returns_scoped_assignments() {
    let harness = harness().await;
    let director = actor(1_000_001, &[(RoleId::DivisionDirector, RoleScope::Division)]);

    for (role, scope) in [
        (RoleId::Mentor, RoleScope::Facility(facility("ZDV"))),
        (RoleId::Instructor, RoleScope::Facility(facility("ZLA"))),
        (RoleId::DivisionStaff, RoleScope::Division),
    ] {
        assert!(harness.service.grant_role(&director, grant(role, scope)).await.is_ok());
    }

    let zdv = harness
        .service
        .list_assignments_for_facility(&facility("ZDV"))
        .await;
    assert!(zdv.is_ok_and(|assignments| {
        assignments.len() == 1 && assignments[0].role == RoleId::Mentor
    }));

    let user = harness
        .service
        .list_assignments_for_user(cid(1_000_002))
        .await;
    assert!(user.is_ok_and(|assignments| assignments.len() == 3));
}

#[tokio::test]
async fn no_staff_role_flag_blocks_only_staff_roles() {
    let harness = harness().await;
    harness
        .repository
        .add_flags(
            1_000_002,
            UserFlags {
                no_staff_role: true,
                ..UserFlags::default()
            },
        )
        .await;
    let director = actor(1_000_001, &[(RoleId::DivisionDirector, RoleScope::Division)]);

    let facility_staff = harness
        .service
        .grant_role(
            &director,
            grant(RoleId::AirTrafficManager, RoleScope::Facility(facility("ZDV"))),
        )
        .await;
    assert!(matches!(facility_staff, Err(AppError::Forbidden(_))));

    let division_staff = harness
        .service
        .grant_role(&director, grant(RoleId::DivisionStaff, RoleScope::Division))
        .await;
    assert!(matches!(division_staff, Err(AppError::Forbidden(_))));
    assert!(harness.repository.assignments().await.is_empty());

    let training = harness
        .service
        .grant_role(
            &director,
            grant(RoleId::Mentor, RoleScope::Facility(facility("ZDV"))),
        )
        .await;
    assert!(training.is_ok());
}
