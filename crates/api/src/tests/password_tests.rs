// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ApiError;
use crate::handlers;
use crate::password_policy::{PasswordPolicy, PasswordPolicyError};
use crate::request_response::{ChangePasswordRequest, CreateOperatorRequest, ResetPasswordRequest};
use crate::tests::helpers::{TestContext, setup};

#[test]
fn test_policy_accepts_strong_password() {
    let policy: PasswordPolicy = PasswordPolicy::default();
    assert!(
        policy
            .validate("Str0ng-enough-pw!", "Str0ng-enough-pw!", "USER", "User Name")
            .is_ok()
    );
}

#[test]
fn test_policy_rejects_short_password() {
    let policy: PasswordPolicy = PasswordPolicy::default();
    let result = policy.validate("Sh0rt!", "Sh0rt!", "USER", "User Name");
    assert_eq!(
        result.unwrap_err(),
        PasswordPolicyError::TooShort { min_length: 12 }
    );
}

#[test]
fn test_policy_rejects_low_complexity() {
    let policy: PasswordPolicy = PasswordPolicy::default();
    let result = policy.validate("aaaaaaaaaaaaaaa", "aaaaaaaaaaaaaaa", "USER", "User Name");
    assert_eq!(
        result.unwrap_err(),
        PasswordPolicyError::InsufficientComplexity {
            required: 3,
            found: 1
        }
    );
}

#[test]
fn test_policy_rejects_confirmation_mismatch() {
    let policy: PasswordPolicy = PasswordPolicy::default();
    let result = policy.validate("Str0ng-enough-pw!", "different", "USER", "User Name");
    assert_eq!(result.unwrap_err(), PasswordPolicyError::ConfirmationMismatch);
}

#[test]
fn test_policy_rejects_password_matching_login() {
    let policy: PasswordPolicy = PasswordPolicy::default();
    let result = policy.validate(
        "Officer.Lee-123",
        "Officer.Lee-123",
        "officer.lee-123",
        "Officer Lee",
    );
    assert_eq!(
        result.unwrap_err(),
        PasswordPolicyError::MatchesForbiddenField {
            field: String::from("login name")
        }
    );
}

#[test]
fn test_create_operator_enforces_policy() {
    let mut ctx: TestContext = setup();

    let result = handlers::create_operator(
        &mut ctx.persistence,
        CreateOperatorRequest {
            login_name: String::from("weak.pw"),
            display_name: String::from("Weak Password"),
            password: String::from("short"),
            password_confirmation: String::from("short"),
            role: String::from("Staff"),
        },
        &ctx.admin_actor,
    );

    assert!(matches!(
        result.unwrap_err(),
        ApiError::PasswordPolicyViolation { .. }
    ));
}

#[test]
fn test_change_password_requires_current_password() {
    let mut ctx: TestContext = setup();
    let operator = ctx.staff_operator.clone();

    let result = handlers::change_password(
        &mut ctx.persistence,
        ChangePasswordRequest {
            current_password: String::from("wrong"),
            new_password: String::from("Brand-new-Pass1"),
            new_password_confirmation: String::from("Brand-new-Pass1"),
        },
        &operator,
    );
    assert!(matches!(
        result.unwrap_err(),
        ApiError::AuthenticationFailed { .. }
    ));

    handlers::change_password(
        &mut ctx.persistence,
        ChangePasswordRequest {
            current_password: String::from("S3cure-Staff-Pass!"),
            new_password: String::from("Brand-new-Pass1"),
            new_password_confirmation: String::from("Brand-new-Pass1"),
        },
        &operator,
    )
    .unwrap();

    // The new password now authenticates.
    let login = crate::auth::AuthenticationService::login(
        &mut ctx.persistence,
        "staff.iyer",
        "Brand-new-Pass1",
    );
    assert!(login.is_ok());
}

#[test]
fn test_reset_password_is_admin_only_and_policy_checked() {
    let mut ctx: TestContext = setup();
    let staff_id: i64 = ctx.staff_operator.operator_id;

    let request: ResetPasswordRequest = ResetPasswordRequest {
        operator_id: staff_id,
        new_password: String::from("Reset-by-Adm1n"),
        new_password_confirmation: String::from("Reset-by-Adm1n"),
    };

    let result =
        handlers::reset_password(&mut ctx.persistence, request.clone(), &ctx.staff_actor);
    assert!(matches!(result.unwrap_err(), ApiError::Unauthorized { .. }));

    handlers::reset_password(&mut ctx.persistence, request, &ctx.admin_actor).unwrap();

    let login = crate::auth::AuthenticationService::login(
        &mut ctx.persistence,
        "staff.iyer",
        "Reset-by-Adm1n",
    );
    assert!(login.is_ok());
}
