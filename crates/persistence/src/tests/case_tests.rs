// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    apply_and_persist, create_test_actor, create_test_cause, create_test_persistence,
    persist_test_case,
};
use crate::{PersistenceError, Persistence, StoredCase};
use lyceum_visa::{Command, TransitionResult, apply};
use lyceum_visa_domain::{ApprovalStatus, CgiData, ConsulateDirectory, SecurityQa};
use time::macros::date;

#[test]
fn test_persist_and_reload_new_case() {
    let mut persistence: Persistence = create_test_persistence();
    let stored: StoredCase = persist_test_case(&mut persistence);

    assert_eq!(stored.version, 1);
    assert_eq!(stored.case.name, "A. Sharma");
    assert_eq!(stored.case.vop_number.value(), "VOP-2026-00001");
    assert!(stored.case.cgi_data.is_none());
    assert!(stored.case.ds_data.is_none());
}

#[test]
fn test_case_sequence_is_dense() {
    let mut persistence: Persistence = create_test_persistence();
    assert_eq!(persistence.next_case_sequence().unwrap(), 1);

    persist_test_case(&mut persistence);
    assert_eq!(persistence.next_case_sequence().unwrap(), 2);

    persist_test_case(&mut persistence);
    assert_eq!(persistence.next_case_sequence().unwrap(), 3);
}

#[test]
fn test_cgi_sub_record_round_trips_exactly() {
    let mut persistence: Persistence = create_test_persistence();
    let stored: StoredCase = persist_test_case(&mut persistence);

    let cgi: CgiData = CgiData {
        username: String::from("sharma.a"),
        password: String::from("hunter2hunter2"),
        security_questions: vec![
            SecurityQa {
                question: String::from("First school?"),
                answer: String::from("St. Mary's"),
            },
            SecurityQa {
                question: String::from("Mother's maiden name?"),
                answer: String::from("Rao"),
            },
        ],
    };

    let reloaded: StoredCase = apply_and_persist(
        &mut persistence,
        &stored,
        Command::SetCgiData {
            cgi: cgi.clone(),
            show_on_portal: true,
        },
    );

    assert_eq!(reloaded.case.cgi_data, Some(cgi));
    assert!(reloaded.case.show_cgi_on_portal);
    assert_eq!(reloaded.version, 2);
}

#[test]
fn test_ds_dates_round_trip() {
    let mut persistence: Persistence = create_test_persistence();
    let stored: StoredCase = persist_test_case(&mut persistence);

    let reloaded: StoredCase = apply_and_persist(
        &mut persistence,
        &stored,
        Command::SetDsStartDate {
            start_date: date!(2026 - 03 - 01),
        },
    );

    let ds = reloaded.case.ds_data.as_ref().unwrap();
    assert_eq!(ds.start_date, Some(date!(2026 - 03 - 01)));
    assert_eq!(ds.expiry_date, Some(date!(2026 - 03 - 21)));
}

#[test]
fn test_stale_version_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let stored: StoredCase = persist_test_case(&mut persistence);
    let op_id: i64 = stored.case.op_id.unwrap();

    // First writer commits.
    let accept: TransitionResult = apply(
        &stored.case,
        Command::AdminAccept {
            admin_name: String::from("Officer Lee"),
        },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persistence
        .persist_case_transition(op_id, stored.version, &accept)
        .unwrap();

    // Second writer raced from the same read: its version is stale.
    let reject: TransitionResult = apply(
        &stored.case,
        Command::AdminReject {
            reason: String::from("photo rejected"),
        },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    let result = persistence.persist_case_transition(op_id, stored.version, &reject);

    assert_eq!(
        result.unwrap_err(),
        PersistenceError::ConcurrentModification {
            op_id,
            expected_version: 1,
        }
    );

    // The first writer's transition survived.
    let reloaded: StoredCase = persistence.get_case(op_id).unwrap().unwrap();
    assert_eq!(
        reloaded.case.ds_data.as_ref().unwrap().admin_status,
        ApprovalStatus::Accepted
    );
    assert_eq!(reloaded.version, 2);
}

#[test]
fn test_rejected_transition_persists_no_audit_event() {
    let mut persistence: Persistence = create_test_persistence();
    let stored: StoredCase = persist_test_case(&mut persistence);
    let op_id: i64 = stored.case.op_id.unwrap();

    let transition: TransitionResult = apply(
        &stored.case,
        Command::StudentAccept,
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let before: usize = persistence.get_audit_timeline(op_id).unwrap().len();
    let result = persistence.persist_case_transition(op_id, 99, &transition);
    assert!(result.is_err());

    let after: usize = persistence.get_audit_timeline(op_id).unwrap().len();
    assert_eq!(before, after);
}

#[test]
fn test_list_cases_newest_first() {
    let mut persistence: Persistence = create_test_persistence();
    persist_test_case(&mut persistence);
    persist_test_case(&mut persistence);
    persist_test_case(&mut persistence);

    let cases: Vec<StoredCase> = persistence.list_cases().unwrap();
    assert_eq!(cases.len(), 3);
    // Identical created_at timestamps in helpers, so just confirm all
    // three sequences are present and unique.
    let mut vops: Vec<String> = cases
        .iter()
        .map(|c| c.case.vop_number.value().to_string())
        .collect();
    vops.sort();
    assert_eq!(
        vops,
        vec![
            String::from("VOP-2026-00001"),
            String::from("VOP-2026-00002"),
            String::from("VOP-2026-00003"),
        ]
    );
}

#[test]
fn test_contact_history_excludes_current_case() {
    let mut persistence: Persistence = create_test_persistence();
    let first: StoredCase = persist_test_case(&mut persistence);
    let contact_id: i64 = first.case.contact_id;

    // Second case for the same contact.
    let sequence: i64 = persistence.next_case_sequence().unwrap();
    let creation = lyceum_visa::create_case(
        lyceum_visa_domain::VopNumber::new(2026, sequence),
        contact_id,
        lyceum_visa_domain::ContactSnapshot {
            name: String::from("A. Sharma"),
            phone: String::from("+91 98765 43210"),
            country: String::from("USA"),
        },
        time::macros::datetime!(2026-04-01 10:00 UTC),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    let second = persistence.persist_new_case(&creation).unwrap();

    let history: Vec<StoredCase> = persistence
        .list_cases_for_contact(contact_id, Some(second.op_id))
        .unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].case.op_id, first.case.op_id);
}

#[test]
fn test_get_unknown_case_returns_none() {
    let mut persistence: Persistence = create_test_persistence();
    assert!(persistence.get_case(999).unwrap().is_none());
}
