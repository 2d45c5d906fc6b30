use std::sync::Arc;

use artcc_domain::{Cid, FacilityId, GroupId, HeldRoles, RoleCatalog, RoleId, RoleScope};

use super::{AuthorizationService, RosterDecisionPolicy};
use crate::Actor;

fn facility(code: &str) -> FacilityId {
    FacilityId::new(code).unwrap_or_else(|_| unreachable!())
}

fn service() -> AuthorizationService {
    AuthorizationService::new(
        Arc::new(RoleCatalog::standard()),
        RosterDecisionPolicy::standard(),
    )
}

fn held(pairs: &[(RoleId, RoleScope)]) -> HeldRoles {
    pairs.iter().cloned().collect()
}

fn actor(pairs: &[(RoleId, RoleScope)]) -> Actor {
    Actor::new(
        Cid::new(1_293_257).unwrap_or_else(|_| unreachable!()),
        held(pairs),
    )
}

#[test]
fn division_director_can_grant_air_traffic_manager() {
    let held_roles = held(&[(RoleId::DivisionDirector, RoleScope::Division)]);
    assert!(service().can_grant(
        &held_roles,
        RoleId::AirTrafficManager,
        &RoleScope::Facility(facility("ZDV"))
    ));
}

#[test]
fn mentor_cannot_grant_air_traffic_manager() {
    let held_roles = held(&[(RoleId::Mentor, RoleScope::Facility(facility("ZDV")))]);
    assert!(!service().can_grant(
        &held_roles,
        RoleId::AirTrafficManager,
        &RoleScope::Facility(facility("ZDV"))
    ));
}

#[test]
fn facility_scoped_grantor_only_reaches_own_facility() {
    let service = service();
    let held_roles = held(&[(
        RoleId::AirTrafficManager,
        RoleScope::Facility(facility("ZDV")),
    )]);

    assert!(service.can_grant(
        &held_roles,
        RoleId::Mentor,
        &RoleScope::Facility(facility("ZDV"))
    ));
    assert!(!service.can_grant(
        &held_roles,
        RoleId::Mentor,
        &RoleScope::Facility(facility("ZLA"))
    ));
    assert!(!service.can_grant(&held_roles, RoleId::Mentor, &RoleScope::Division));
}

#[test]
fn division_wide_grantor_reaches_every_facility() {
    let service = service();
    let held_roles = held(&[(RoleId::AirTrafficManager, RoleScope::Division)]);

    for code in ["ZDV", "ZLA", "ZNY"] {
        assert!(service.can_grant(
            &held_roles,
            RoleId::Instructor,
            &RoleScope::Facility(facility(code))
        ));
    }
}

#[test]
fn group_based_grant_follows_group_membership() {
    let service = service();
    let held_roles = held(&[(RoleId::DeveloperTeam, RoleScope::Division)]);

    assert!(service.can_grant(
        &held_roles,
        RoleId::EmailUser,
        &RoleScope::Facility(facility("ZDV"))
    ));
    assert!(!service.can_grant(
        &held_roles,
        RoleId::WebMaster,
        &RoleScope::Facility(facility("ZDV"))
    ));
}

#[test]
fn administratively_seeded_role_cannot_be_granted() {
    let held_roles = held(&[
        (RoleId::DivisionDirector, RoleScope::Division),
        (RoleId::DeputyDivisionDirector, RoleScope::Division),
    ]);
    assert!(!service().can_grant(&held_roles, RoleId::DivisionDirector, &RoleScope::Division));
}

#[test]
fn empty_holdings_grant_nothing() {
    let service = service();
    let held_roles = HeldRoles::new();

    for role in RoleId::all() {
        assert!(!service.can_grant(&held_roles, *role, &RoleScope::Division));
        assert!(!service.can_grant(&held_roles, *role, &RoleScope::Facility(facility("ZDV"))));
    }
}

#[test]
fn every_listed_grantor_can_grant_everywhere() {
    let service = service();
    let catalog = service.catalog();
    let targets = [
        RoleScope::Division,
        RoleScope::Facility(facility("ZDV")),
        RoleScope::Facility(facility("ZLA")),
        RoleScope::Facility(facility("ZNY")),
    ];

    for role in RoleId::all() {
        let Some(definition) = catalog.definition(*role) else {
            unreachable!()
        };
        let group_grantors = definition
            .groups_can_add()
            .iter()
            .flat_map(|group| catalog.roles_in_group(*group));
        let grantors: Vec<RoleId> = definition
            .roles_can_add()
            .iter()
            .copied()
            .chain(group_grantors)
            .collect();

        for grantor in grantors {
            let held_roles = held(&[(grantor, RoleScope::Division)]);
            for target in &targets {
                assert!(
                    service.can_grant(&held_roles, *role, target),
                    "{} should grant {} in {target}",
                    grantor.as_str(),
                    role.as_str()
                );
            }
        }
    }
}

#[test]
fn unrelated_roles_never_grant() {
    let service = service();
    let catalog = service.catalog();

    for role in RoleId::all() {
        let Some(definition) = catalog.definition(*role) else {
            unreachable!()
        };
        let unrelated = RoleId::all().iter().filter(|held_role| {
            !definition.roles_can_add().contains(*held_role)
                && !definition
                    .groups_can_add()
                    .iter()
                    .any(|group| catalog.in_group(**held_role, *group))
        });

        for held_role in unrelated {
            let held_roles = held(&[(*held_role, RoleScope::Division)]);
            assert!(
                !service.can_grant(&held_roles, *role, &RoleScope::Division),
                "{} must not grant {}",
                held_role.as_str(),
                role.as_str()
            );
            assert!(
                !service.can_grant(&held_roles, *role, &RoleScope::Facility(facility("ZDV"))),
                "{} must not grant {} at ZDV",
                held_role.as_str(),
                role.as_str()
            );
        }
    }
}

#[test]
fn role_missing_from_custom_catalog_is_never_grantable() {
    let catalog = RoleCatalog::from_definitions([(
        RoleId::DivisionDirector,
        artcc_domain::RoleDefinition::new("Division Director")
            .in_groups([GroupId::DivisionManagement]),
    )])
    .unwrap_or_else(|_| unreachable!());
    let service = AuthorizationService::new(Arc::new(catalog), RosterDecisionPolicy::standard());
    let held_roles = held(&[(RoleId::DivisionDirector, RoleScope::Division)]);

    assert!(!service.is_valid_role(RoleId::Mentor));
    assert!(!service.can_grant(
        &held_roles,
        RoleId::Mentor,
        &RoleScope::Facility(facility("ZDV"))
    ));
}

#[test]
fn require_grant_reports_forbidden_with_context() {
    let result = service().require_grant(
        &actor(&[(RoleId::Mentor, RoleScope::Facility(facility("ZDV")))]),
        RoleId::AirTrafficManager,
        &RoleScope::Facility(facility("ZDV")),
    );

    let Err(artcc_core::AppError::Forbidden(message)) = result else {
        unreachable!()
    };
    assert!(message.contains("ATM"));
    assert!(message.contains("ZDV"));
}

#[test]
fn roster_manager_follows_decision_policy() {
    let service = service();
    let air_traffic_manager = held(&[(
        RoleId::AirTrafficManager,
        RoleScope::Facility(facility("ZDV")),
    )]);
    let mentor = held(&[(RoleId::Mentor, RoleScope::Facility(facility("ZDV")))]);
    let director = held(&[(RoleId::DivisionDirector, RoleScope::Division)]);

    assert!(service.can_manage_roster(&air_traffic_manager, &facility("ZDV")));
    assert!(!service.can_manage_roster(&air_traffic_manager, &facility("ZLA")));
    assert!(!service.can_manage_roster(&mentor, &facility("ZDV")));
    assert!(service.can_manage_roster(&director, &facility("ZLA")));
}

#[test]
fn custom_decision_policy_widens_deciders() {
    let policy = RosterDecisionPolicy::new([GroupId::FacilityTraining])
        .unwrap_or_else(|_| unreachable!());
    let service = AuthorizationService::new(Arc::new(RoleCatalog::standard()), policy);
    let mentor = held(&[(RoleId::Mentor, RoleScope::Facility(facility("ZDV")))]);

    assert!(service.can_manage_roster(&mentor, &facility("ZDV")));
    assert!(RosterDecisionPolicy::new(Vec::<GroupId>::new()).is_err());
}
