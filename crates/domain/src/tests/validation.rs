// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CgiData, ConsulateDirectory, ContactSnapshot, DomainError, SecurityQa, SlotBookingFields,
    validate_cgi_data, validate_contact_snapshot, validate_preference_submission,
    validate_rejection_reason, validate_slot_fields,
};

fn create_test_cgi() -> CgiData {
    CgiData {
        username: String::from("sharma.a"),
        password: String::from("hunter2hunter2"),
        security_questions: vec![SecurityQa {
            question: String::from("Mother's maiden name?"),
            answer: String::from("Rao"),
        }],
    }
}

#[test]
fn test_contact_snapshot_requires_name() {
    let snapshot: ContactSnapshot = ContactSnapshot {
        name: String::from("  "),
        phone: String::from("123"),
        country: String::from("USA"),
    };

    let result = validate_contact_snapshot(&snapshot);
    assert_eq!(
        result,
        Err(DomainError::InvalidContactField { field: "name" })
    );
}

#[test]
fn test_contact_snapshot_allows_empty_phone_and_country() {
    let snapshot: ContactSnapshot = ContactSnapshot {
        name: String::from("A. Sharma"),
        phone: String::new(),
        country: String::new(),
    };

    assert!(validate_contact_snapshot(&snapshot).is_ok());
}

#[test]
fn test_valid_cgi_data_passes() {
    assert!(validate_cgi_data(&create_test_cgi()).is_ok());
}

#[test]
fn test_cgi_data_requires_username() {
    let mut cgi: CgiData = create_test_cgi();
    cgi.username = String::new();

    let result = validate_cgi_data(&cgi);
    assert_eq!(
        result,
        Err(DomainError::MissingCgiCredential { field: "username" })
    );
}

#[test]
fn test_cgi_data_requires_password() {
    let mut cgi: CgiData = create_test_cgi();
    cgi.password = String::new();

    let result = validate_cgi_data(&cgi);
    assert_eq!(
        result,
        Err(DomainError::MissingCgiCredential { field: "password" })
    );
}

#[test]
fn test_cgi_data_limits_security_question_slots() {
    let mut cgi: CgiData = create_test_cgi();
    let pair: SecurityQa = SecurityQa {
        question: String::from("Favorite teacher?"),
        answer: String::from("Mrs. Menon"),
    };
    cgi.security_questions = vec![pair.clone(), pair.clone(), pair.clone(), pair];

    let result = validate_cgi_data(&cgi);
    assert_eq!(result, Err(DomainError::TooManySecurityQuestions { count: 4 }));
}

#[test]
fn test_cgi_data_rejects_blank_question_in_used_slot() {
    let mut cgi: CgiData = create_test_cgi();
    cgi.security_questions.push(SecurityQa {
        question: String::from("   "),
        answer: String::from("anything"),
    });

    let result = validate_cgi_data(&cgi);
    assert_eq!(result, Err(DomainError::EmptySecurityQuestion { slot: 2 }));
}

#[test]
fn test_slot_fields_accept_configured_consulates() {
    let fields: SlotBookingFields = SlotBookingFields {
        vac_consulate: Some(String::from("Chennai")),
        vi_consulate: Some(String::from("New Delhi")),
        ..SlotBookingFields::default()
    };

    assert!(validate_slot_fields(&fields, &ConsulateDirectory::default()).is_ok());
}

#[test]
fn test_slot_fields_reject_unknown_consulate() {
    let fields: SlotBookingFields = SlotBookingFields {
        vi_consulate: Some(String::from("Springfield")),
        ..SlotBookingFields::default()
    };

    let result = validate_slot_fields(&fields, &ConsulateDirectory::default());
    assert_eq!(
        result,
        Err(DomainError::UnknownConsulate {
            name: String::from("Springfield")
        })
    );
}

#[test]
fn test_slot_fields_allow_everything_absent() {
    assert!(
        validate_slot_fields(&SlotBookingFields::default(), &ConsulateDirectory::default()).is_ok()
    );
}

#[test]
fn test_preference_submission_requires_both_sets() {
    let consulates: ConsulateDirectory = ConsulateDirectory::default();

    let result =
        validate_preference_submission(&[], &[String::from("Mumbai")], &consulates);
    assert_eq!(
        result,
        Err(DomainError::EmptyPreferenceSelection { kind: "VAC" })
    );

    let result =
        validate_preference_submission(&[String::from("Mumbai")], &[], &consulates);
    assert_eq!(
        result,
        Err(DomainError::EmptyPreferenceSelection { kind: "VI" })
    );
}

#[test]
fn test_preference_submission_validates_names() {
    let consulates: ConsulateDirectory = ConsulateDirectory::default();

    let result = validate_preference_submission(
        &[String::from("Mumbai")],
        &[String::from("Atlantis")],
        &consulates,
    );
    assert_eq!(
        result,
        Err(DomainError::UnknownConsulate {
            name: String::from("Atlantis")
        })
    );
}

#[test]
fn test_rejection_reason_must_not_be_blank() {
    assert_eq!(
        validate_rejection_reason("   "),
        Err(DomainError::EmptyRejectionReason)
    );
    assert!(validate_rejection_reason("wrong DOB").is_ok());
}
