// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::auth::{AuthenticatedActor, Role};
use crate::handlers;
use crate::request_response::{CaseDetailResponse, CreateCaseRequest};
use lyceum_visa_audit::Cause;
use lyceum_visa_domain::ConsulateDirectory;
use lyceum_visa_persistence::{OperatorData, Persistence};

pub struct TestContext {
    pub persistence: Persistence,
    pub consulates: ConsulateDirectory,
    pub admin_actor: AuthenticatedActor,
    pub admin_operator: OperatorData,
    pub staff_actor: AuthenticatedActor,
    pub staff_operator: OperatorData,
    pub contact_id: i64,
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Test request"))
}

/// Builds a context with one admin, one staff operator, and one
/// contact ("A. Sharma", USA).
pub fn setup() -> TestContext {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let admin_operator: OperatorData = persistence
        .create_operator("officer.lee", "Officer Lee", "S3cure-Admin-Pass!", "Admin")
        .unwrap();
    let staff_operator: OperatorData = persistence
        .create_operator("staff.iyer", "R. Iyer", "S3cure-Staff-Pass!", "Staff")
        .unwrap();
    let contact = persistence
        .create_contact("A. Sharma", "+91 98765 43210", "USA")
        .unwrap();

    TestContext {
        persistence,
        consulates: ConsulateDirectory::default(),
        admin_actor: AuthenticatedActor::new(admin_operator.login_name.clone(), Role::Admin),
        admin_operator,
        staff_actor: AuthenticatedActor::new(staff_operator.login_name.clone(), Role::Staff),
        staff_operator,
        contact_id: contact.contact_id,
    }
}

/// Creates a case for the context's contact via the API boundary.
pub fn create_test_case(ctx: &mut TestContext) -> CaseDetailResponse {
    handlers::create_case(
        &mut ctx.persistence,
        CreateCaseRequest {
            contact_id: ctx.contact_id,
        },
        &ctx.staff_actor,
        &ctx.staff_operator,
        create_test_cause(),
    )
    .unwrap()
}
