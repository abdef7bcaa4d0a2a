// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_actor, create_test_case, create_test_cause};
use crate::{Command, CoreError, TransitionResult, apply};
use lyceum_visa_audit::Actor;
use lyceum_visa_domain::{
    CgiData, ConsulateDirectory, DomainError, DsDetails, SecurityQa, SlotBookingData,
    SlotBookingFields, VisaOperation, VisaOutcome,
};
use time::macros::date;

fn create_test_cgi() -> CgiData {
    CgiData {
        username: String::from("sharma.a"),
        password: String::from("hunter2hunter2"),
        security_questions: vec![SecurityQa {
            question: String::from("First school?"),
            answer: String::from("St. Mary's"),
        }],
    }
}

#[test]
fn test_set_cgi_data_overwrites_sub_record() {
    let case: VisaOperation = create_test_case();

    let result: TransitionResult = apply(
        &case,
        Command::SetCgiData {
            cgi: create_test_cgi(),
            show_on_portal: true,
        },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let cgi: &CgiData = result.new_case.cgi_data.as_ref().unwrap();
    assert_eq!(cgi.username, "sharma.a");
    assert_eq!(cgi.password, "hunter2hunter2");
    assert!(result.new_case.show_cgi_on_portal);
    assert!(result.new_case.cgi_configured());
    // Input case is untouched.
    assert!(case.cgi_data.is_none());
}

#[test]
fn test_set_cgi_data_requires_credentials() {
    let case: VisaOperation = create_test_case();
    let mut cgi: CgiData = create_test_cgi();
    cgi.password = String::new();

    let result = apply(
        &case,
        Command::SetCgiData {
            cgi,
            show_on_portal: false,
        },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    );

    assert_eq!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::MissingCgiCredential { field: "password" })
    );
}

#[test]
fn test_cgi_audit_details_never_contain_credentials() {
    let case: VisaOperation = create_test_case();

    let result: TransitionResult = apply(
        &case,
        Command::SetCgiData {
            cgi: create_test_cgi(),
            show_on_portal: false,
        },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let details: &str = result.audit_event.action.details.as_deref().unwrap();
    assert!(!details.contains("hunter2"));
    assert!(!details.contains("St. Mary's"));
    assert!(!result.audit_event.after.data.contains("hunter2"));
}

#[test]
fn test_set_slot_booking_preserves_applicant_preferences() {
    let mut case: VisaOperation = create_test_case();
    case.slot_booking_data = Some(SlotBookingData {
        vac_preferred: vec![String::from("Hyderabad")],
        vi_preferred: vec![String::from("Chennai")],
        preferences_locked: true,
        ..SlotBookingData::default()
    });

    let fields: SlotBookingFields = SlotBookingFields {
        vac_consulate: Some(String::from("Mumbai")),
        vac_date: Some(date!(2026 - 04 - 10)),
        vac_time: Some(String::from("09:15")),
        booked_by: Some(String::from("R. Iyer")),
        ..SlotBookingFields::default()
    };

    let result: TransitionResult = apply(
        &case,
        Command::SetSlotBooking { fields },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let booking: &SlotBookingData = result.new_case.slot_booking_data.as_ref().unwrap();
    assert_eq!(booking.vac_consulate.as_deref(), Some("Mumbai"));
    assert_eq!(booking.vac_date, Some(date!(2026 - 04 - 10)));
    assert_eq!(booking.vac_preferred, vec![String::from("Hyderabad")]);
    assert_eq!(booking.vi_preferred, vec![String::from("Chennai")]);
    assert!(booking.preferences_locked);
}

#[test]
fn test_set_slot_booking_twice_is_idempotent_for_preferences() {
    let mut case: VisaOperation = create_test_case();
    case.slot_booking_data = Some(SlotBookingData {
        vac_preferred: vec![String::from("Kolkata")],
        vi_preferred: vec![String::from("Kolkata")],
        preferences_locked: true,
        ..SlotBookingData::default()
    });

    let fields: SlotBookingFields = SlotBookingFields {
        vi_consulate: Some(String::from("New Delhi")),
        ..SlotBookingFields::default()
    };

    let first: TransitionResult = apply(
        &case,
        Command::SetSlotBooking {
            fields: fields.clone(),
        },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    let second: TransitionResult = apply(
        &first.new_case,
        Command::SetSlotBooking { fields },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(
        first.new_case.slot_booking_data,
        second.new_case.slot_booking_data
    );
}

#[test]
fn test_set_slot_booking_rejects_unknown_consulate() {
    let case: VisaOperation = create_test_case();

    let result = apply(
        &case,
        Command::SetSlotBooking {
            fields: SlotBookingFields {
                vac_consulate: Some(String::from("Springfield")),
                ..SlotBookingFields::default()
            },
        },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::UnknownConsulate { .. })
    ));
}

#[test]
fn test_submit_preferences_sets_and_locks() {
    let case: VisaOperation = create_test_case();

    let result: TransitionResult = apply(
        &case,
        Command::SubmitSlotPreferences {
            vac_preferred: vec![String::from("Hyderabad"), String::from("Chennai")],
            vi_preferred: vec![String::from("Mumbai")],
            lock: true,
        },
        &ConsulateDirectory::default(),
        Actor::new(String::from("portal:42"), String::from("student")),
        create_test_cause(),
    )
    .unwrap();

    let booking: &SlotBookingData = result.new_case.slot_booking_data.as_ref().unwrap();
    assert_eq!(booking.vac_preferred.len(), 2);
    assert!(booking.preferences_locked);
    assert_eq!(result.audit_event.action.name, "SubmitSlotPreferences");
}

#[test]
fn test_submit_preferences_rejected_once_locked() {
    let mut case: VisaOperation = create_test_case();
    case.slot_booking_data = Some(SlotBookingData {
        vac_preferred: vec![String::from("Hyderabad")],
        vi_preferred: vec![String::from("Chennai")],
        preferences_locked: true,
        ..SlotBookingData::default()
    });

    let result = apply(
        &case,
        Command::SubmitSlotPreferences {
            vac_preferred: vec![String::from("Mumbai")],
            vi_preferred: vec![String::from("Mumbai")],
            lock: true,
        },
        &ConsulateDirectory::default(),
        Actor::new(String::from("portal:42"), String::from("student")),
        create_test_cause(),
    );

    assert_eq!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::PreferencesAlreadyLocked)
    );
}

#[test]
fn test_interview_outcome_is_legal_without_booking() {
    let case: VisaOperation = create_test_case();

    let result: TransitionResult = apply(
        &case,
        Command::SetInterviewOutcome {
            outcome: Some(VisaOutcome::AdministrativeProcessing),
            remarks: String::from("Yellow slip"),
        },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let interview = result.new_case.visa_interview_data.as_ref().unwrap();
    assert_eq!(
        interview.visa_outcome,
        Some(VisaOutcome::AdministrativeProcessing)
    );
    assert_eq!(interview.remarks, "Yellow slip");
    assert!(result.new_case.slot_booking_data.is_none());
}

#[test]
fn test_set_ds_start_date_derives_expiry() {
    let case: VisaOperation = create_test_case();

    let result: TransitionResult = apply(
        &case,
        Command::SetDsStartDate {
            start_date: date!(2026 - 03 - 01),
        },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let ds = result.new_case.ds_data.as_ref().unwrap();
    assert_eq!(ds.start_date, Some(date!(2026 - 03 - 01)));
    assert_eq!(ds.expiry_date, Some(date!(2026 - 03 - 21)));
}

#[test]
fn test_expiry_survives_unrelated_updates() {
    let case: VisaOperation = create_test_case();

    let with_start: TransitionResult = apply(
        &case,
        Command::SetDsStartDate {
            start_date: date!(2026 - 03 - 01),
        },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let with_details: TransitionResult = apply(
        &with_start.new_case,
        Command::SetDsDetails {
            details: DsDetails {
                confirmation_number: Some(String::from("AA00B1C2D3")),
                basic_ds_box: Some(String::from("Waiting on transcripts")),
                ..DsDetails::default()
            },
        },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let with_cgi: TransitionResult = apply(
        &with_details.new_case,
        Command::SetCgiData {
            cgi: create_test_cgi(),
            show_on_portal: false,
        },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let ds = with_cgi.new_case.ds_data.as_ref().unwrap();
    assert_eq!(ds.start_date, Some(date!(2026 - 03 - 01)));
    assert_eq!(ds.expiry_date, Some(date!(2026 - 03 - 21)));
    assert_eq!(ds.confirmation_number.as_deref(), Some("AA00B1C2D3"));
}

#[test]
fn test_changing_start_date_recomputes_expiry() {
    let case: VisaOperation = create_test_case();

    let first: TransitionResult = apply(
        &case,
        Command::SetDsStartDate {
            start_date: date!(2026 - 03 - 01),
        },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    let second: TransitionResult = apply(
        &first.new_case,
        Command::SetDsStartDate {
            start_date: date!(2026 - 05 - 10),
        },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let ds = second.new_case.ds_data.as_ref().unwrap();
    assert_eq!(ds.expiry_date, Some(date!(2026 - 05 - 30)));
}

#[test]
fn test_transition_emits_audit_event_with_case_scope() {
    let case: VisaOperation = create_test_case();

    let result: TransitionResult = apply(
        &case,
        Command::SetDsDetails {
            details: DsDetails::default(),
        },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(result.audit_event.vop_number.value(), "VOP-2026-00001");
    assert_eq!(result.audit_event.op_id, Some(7));
    assert_eq!(result.audit_event.cause.id, "req-456");
}
