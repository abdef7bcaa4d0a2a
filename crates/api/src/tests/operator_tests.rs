// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::auth::AuthenticationService;
use crate::error::ApiError;
use crate::handlers;
use crate::request_response::CreateOperatorRequest;
use crate::tests::helpers::{TestContext, setup};

#[test]
fn test_login_issues_session_and_validates_it() {
    let mut ctx: TestContext = setup();

    let (token, actor, operator) = AuthenticationService::login(
        &mut ctx.persistence,
        "officer.lee",
        "S3cure-Admin-Pass!",
    )
    .unwrap();

    assert_eq!(actor.id, "OFFICER.LEE");
    assert_eq!(operator.display_name, "Officer Lee");

    let (validated_actor, validated_operator) =
        AuthenticationService::validate_session(&mut ctx.persistence, &token).unwrap();
    assert_eq!(validated_actor, actor);
    assert_eq!(validated_operator.operator_id, operator.operator_id);
}

#[test]
fn test_login_rejects_wrong_password_without_detail() {
    let mut ctx: TestContext = setup();

    let result = AuthenticationService::login(&mut ctx.persistence, "officer.lee", "wrong");

    let err = result.unwrap_err();
    let message: String = err.to_string();
    assert!(message.contains("Invalid login name or password"));
    // Same message for an unknown operator: no account enumeration.
    let err2 = AuthenticationService::login(&mut ctx.persistence, "ghost", "wrong").unwrap_err();
    assert_eq!(err2.to_string(), message);
}

#[test]
fn test_logout_invalidates_session() {
    let mut ctx: TestContext = setup();
    let (token, _, _) = AuthenticationService::login(
        &mut ctx.persistence,
        "staff.iyer",
        "S3cure-Staff-Pass!",
    )
    .unwrap();

    AuthenticationService::logout(&mut ctx.persistence, &token).unwrap();

    let result = AuthenticationService::validate_session(&mut ctx.persistence, &token);
    assert!(result.is_err());
}

#[test]
fn test_disabled_operator_cannot_log_in() {
    let mut ctx: TestContext = setup();
    let staff_id: i64 = ctx.staff_operator.operator_id;

    handlers::disable_operator(&mut ctx.persistence, staff_id, &ctx.admin_actor).unwrap();

    let result = AuthenticationService::login(
        &mut ctx.persistence,
        "staff.iyer",
        "S3cure-Staff-Pass!",
    );
    assert!(result.is_err());
}

#[test]
fn test_operator_management_is_admin_only() {
    let mut ctx: TestContext = setup();

    let request: CreateOperatorRequest = CreateOperatorRequest {
        login_name: String::from("new.staff"),
        display_name: String::from("New Staff"),
        password: String::from("Str0ng-enough-pw!"),
        password_confirmation: String::from("Str0ng-enough-pw!"),
        role: String::from("Staff"),
    };

    let result = handlers::create_operator(&mut ctx.persistence, request.clone(), &ctx.staff_actor);
    assert!(matches!(result.unwrap_err(), ApiError::Unauthorized { .. }));

    let created = handlers::create_operator(&mut ctx.persistence, request, &ctx.admin_actor)
        .unwrap();
    assert_eq!(created.login_name, "NEW.STAFF");
    assert_eq!(created.role, "Staff");
}

#[test]
fn test_last_active_admin_cannot_be_disabled() {
    let mut ctx: TestContext = setup();
    let admin_id: i64 = ctx.admin_operator.operator_id;

    let result = handlers::disable_operator(&mut ctx.persistence, admin_id, &ctx.admin_actor);

    assert!(matches!(
        result.unwrap_err(),
        ApiError::DomainRuleViolation { rule, .. } if rule == "last_active_admin"
    ));
}

#[test]
fn test_second_admin_unlocks_disable() {
    let mut ctx: TestContext = setup();
    handlers::create_operator(
        &mut ctx.persistence,
        CreateOperatorRequest {
            login_name: String::from("second.admin"),
            display_name: String::from("Second Admin"),
            password: String::from("An0ther-long-pw!"),
            password_confirmation: String::from("An0ther-long-pw!"),
            role: String::from("Admin"),
        },
        &ctx.admin_actor,
    )
    .unwrap();

    let info = handlers::disable_operator(
        &mut ctx.persistence,
        ctx.admin_operator.operator_id,
        &ctx.admin_actor,
    )
    .unwrap();
    assert!(info.is_disabled);

    let reenabled = handlers::enable_operator(
        &mut ctx.persistence,
        ctx.admin_operator.operator_id,
        &ctx.admin_actor,
    )
    .unwrap();
    assert!(!reenabled.is_disabled);
}

#[test]
fn test_delete_operator_with_audit_history_is_blocked() {
    let mut ctx: TestContext = setup();
    // Staff operator has produced no audit events yet: deletable once a
    // second admin exists is not needed since target is staff.
    let fresh = handlers::create_operator(
        &mut ctx.persistence,
        CreateOperatorRequest {
            login_name: String::from("temp.staff"),
            display_name: String::from("Temp Staff"),
            password: String::from("Temp0rary-pass!"),
            password_confirmation: String::from("Temp0rary-pass!"),
            role: String::from("Staff"),
        },
        &ctx.admin_actor,
    )
    .unwrap();

    handlers::delete_operator(&mut ctx.persistence, fresh.operator_id, &ctx.admin_actor)
        .unwrap();

    // An operator with case history is protected.
    crate::tests::helpers::create_test_case(&mut ctx);
    let result = handlers::delete_operator(
        &mut ctx.persistence,
        ctx.staff_operator.operator_id,
        &ctx.admin_actor,
    );
    assert!(matches!(
        result.unwrap_err(),
        ApiError::DomainRuleViolation { rule, .. } if rule == "operator_referenced"
    ));
}
