// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ApprovalStatus, DomainError};

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidContactField { field: "name" };
    assert_eq!(format!("{err}"), "Contact field 'name' cannot be empty");

    let err: DomainError = DomainError::MissingCgiCredential { field: "username" };
    assert_eq!(
        format!("{err}"),
        "CGI credential field 'username' cannot be empty"
    );

    let err: DomainError = DomainError::TooManySecurityQuestions { count: 5 };
    assert_eq!(
        format!("{err}"),
        "At most 3 security question slots are supported, got 5"
    );

    let err: DomainError = DomainError::EmptySecurityQuestion { slot: 2 };
    assert_eq!(format!("{err}"), "Security question slot 2 has an empty question");

    let err: DomainError = DomainError::UnknownConsulate {
        name: String::from("Springfield"),
    };
    assert_eq!(
        format!("{err}"),
        "Consulate 'Springfield' is not a configured consulate"
    );

    let err: DomainError = DomainError::EmptyRejectionReason;
    assert_eq!(format!("{err}"), "A rejection requires a non-empty reason");

    let err: DomainError = DomainError::ApprovalAlreadyGranted { axis: "admin" };
    assert_eq!(format!("{err}"), "The admin decision is already accepted");

    let err: DomainError = DomainError::ApprovalGateNotSatisfied {
        student_status: ApprovalStatus::Accepted,
        admin_status: ApprovalStatus::Pending,
    };
    assert_eq!(
        format!("{err}"),
        "Approval gate not satisfied: student=accepted, admin=pending"
    );

    let err: DomainError = DomainError::DocumentNotReferenced { document_id: 12 };
    assert_eq!(format!("{err}"), "Document 12 is not referenced by this case");

    let err: DomainError = DomainError::PreferencesAlreadyLocked;
    assert_eq!(
        format!("{err}"),
        "Location preferences are locked and cannot be resubmitted"
    );

    let err: DomainError = DomainError::EmptyPreferenceSelection { kind: "VAC" };
    assert_eq!(
        format!("{err}"),
        "At least one VAC location preference is required"
    );
}

#[test]
fn test_error_messages_never_contain_answer_values() {
    // Every variant that touches credentials names the field, never the
    // value. This test pins that contract for the variants a caller can
    // trigger with sensitive input.
    let err: DomainError = DomainError::MissingCgiCredential { field: "password" };
    assert!(!format!("{err}").contains("hunter2"));
}
