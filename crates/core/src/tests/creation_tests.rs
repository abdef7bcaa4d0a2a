// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_actor, create_test_cause};
use crate::{CoreError, CreationResult, create_case};
use lyceum_visa_domain::{ContactSnapshot, DomainError, VopNumber};
use time::macros::datetime;

#[test]
fn test_create_case_starts_with_all_sub_records_absent() {
    let result: Result<CreationResult, CoreError> = create_case(
        VopNumber::new(2026, 1),
        42,
        ContactSnapshot {
            name: String::from("A. Sharma"),
            phone: String::from("+91 98765 43210"),
            country: String::from("USA"),
        },
        datetime!(2026-03-01 09:30 UTC),
        create_test_actor(),
        create_test_cause(),
    );

    let creation: CreationResult = result.unwrap();
    assert_eq!(creation.case.vop_number.value(), "VOP-2026-00001");
    assert_eq!(creation.case.contact_id, 42);
    assert!(creation.case.op_id.is_none());
    assert!(creation.case.cgi_data.is_none());
    assert!(creation.case.slot_booking_data.is_none());
    assert!(creation.case.ds_data.is_none());
    assert!(creation.case.visa_interview_data.is_none());
}

#[test]
fn test_create_case_emits_creation_audit_event() {
    let creation: CreationResult = create_case(
        VopNumber::new(2026, 1),
        42,
        ContactSnapshot {
            name: String::from("A. Sharma"),
            phone: String::new(),
            country: String::from("USA"),
        },
        datetime!(2026-03-01 09:30 UTC),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(creation.audit_event.action.name, "CreateCase");
    assert_eq!(creation.audit_event.actor.id, "officer.lee");
    assert_eq!(creation.audit_event.before.data, "case=absent");
    assert!(creation.audit_event.after.data.contains("vop=VOP-2026-00001"));
    assert!(
        creation
            .audit_event
            .action
            .details
            .as_ref()
            .unwrap()
            .contains("A. Sharma")
    );
}

#[test]
fn test_create_case_rejects_empty_name() {
    let result: Result<CreationResult, CoreError> = create_case(
        VopNumber::new(2026, 1),
        42,
        ContactSnapshot {
            name: String::from("   "),
            phone: String::new(),
            country: String::new(),
        },
        datetime!(2026-03-01 09:30 UTC),
        create_test_actor(),
        create_test_cause(),
    );

    assert_eq!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::InvalidContactField { field: "name" })
    );
}
