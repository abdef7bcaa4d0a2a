// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_actor, create_test_case, create_test_cause};
use crate::{Command, CoreError, TransitionResult, apply};
use lyceum_visa_domain::{
    ConsulateDirectory, DocumentRef, DomainError, DsData, VisaOperation,
};

fn doc(id: i64, name: &str) -> DocumentRef {
    DocumentRef {
        id,
        name: name.to_string(),
    }
}

fn apply_ok(case: &VisaOperation, command: Command) -> TransitionResult {
    apply(
        case,
        command,
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap()
}

#[test]
fn test_filling_documents_keep_upload_order() {
    let case: VisaOperation = create_test_case();

    let first: TransitionResult = apply_ok(
        &case,
        Command::AttachFillingDocument {
            document: doc(1, "ds160-draft.pdf"),
        },
    );
    let second: TransitionResult = apply_ok(
        &first.new_case,
        Command::AttachFillingDocument {
            document: doc(2, "passport-scan.pdf"),
        },
    );
    let third: TransitionResult = apply_ok(
        &second.new_case,
        Command::AttachFillingDocument {
            document: doc(3, "ds160-final.pdf"),
        },
    );

    let ds: &DsData = third.new_case.ds_data.as_ref().unwrap();
    let ids: Vec<i64> = ds.filling_documents.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_filling_attach_is_legal_regardless_of_gate_state() {
    let mut case: VisaOperation = create_test_case();
    case.ds_data = Some(DsData {
        student_status: lyceum_visa_domain::ApprovalStatus::Rejected,
        ..DsData::default()
    });

    let result: TransitionResult = apply_ok(
        &case,
        Command::AttachFillingDocument {
            document: doc(5, "revised.pdf"),
        },
    );

    assert_eq!(
        result.new_case.ds_data.as_ref().unwrap().filling_documents.len(),
        1
    );
}

#[test]
fn test_internal_document_upload_replaces() {
    let case: VisaOperation = create_test_case();

    let first: TransitionResult = apply_ok(
        &case,
        Command::AttachInternalDocument {
            document: doc(10, "notes-v1.pdf"),
        },
    );
    let second: TransitionResult = apply_ok(
        &first.new_case,
        Command::AttachInternalDocument {
            document: doc(11, "notes-v2.pdf"),
        },
    );

    let ds: &DsData = second.new_case.ds_data.as_ref().unwrap();
    assert_eq!(ds.internal_document.as_ref().unwrap().id, 11);
}

#[test]
fn test_delete_filling_document_removes_exactly_one_entry() {
    let mut case: VisaOperation = create_test_case();
    case.ds_data = Some(DsData {
        filling_documents: vec![
            doc(1, "a.pdf"),
            doc(2, "b.pdf"),
            doc(3, "c.pdf"),
        ],
        ..DsData::default()
    });

    let result: TransitionResult =
        apply_ok(&case, Command::DeleteDocument { document_id: 2 });

    let ds: &DsData = result.new_case.ds_data.as_ref().unwrap();
    let ids: Vec<i64> = ds.filling_documents.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn test_delete_internal_document() {
    let mut case: VisaOperation = create_test_case();
    case.ds_data = Some(DsData {
        internal_document: Some(doc(7, "internal.pdf")),
        ..DsData::default()
    });

    let result: TransitionResult =
        apply_ok(&case, Command::DeleteDocument { document_id: 7 });

    assert!(
        result
            .new_case
            .ds_data
            .as_ref()
            .unwrap()
            .internal_document
            .is_none()
    );
}

#[test]
fn test_delete_unreferenced_document_fails() {
    let mut case: VisaOperation = create_test_case();
    case.ds_data = Some(DsData {
        filling_documents: vec![doc(1, "a.pdf")],
        ..DsData::default()
    });

    let result = apply(
        &case,
        Command::DeleteDocument { document_id: 42 },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    );

    assert_eq!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::DocumentNotReferenced { document_id: 42 })
    );
}

#[test]
fn test_delete_on_case_without_ds_data_fails() {
    let case: VisaOperation = create_test_case();

    let result = apply(
        &case,
        Command::DeleteDocument { document_id: 1 },
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    );

    assert_eq!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::DocumentNotReferenced { document_id: 1 })
    );
}
