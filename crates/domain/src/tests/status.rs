// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ApprovalStatus, CaseBadge, ContactSnapshot, DocumentRef, DsData, VisaOperation, VopNumber,
    derive_badge_for_case, derive_case_badge,
};
use time::macros::datetime;

fn ds_with(student: ApprovalStatus, admin: ApprovalStatus) -> DsData {
    DsData {
        student_status: student,
        admin_status: admin,
        ..DsData::default()
    }
}

#[test]
fn test_no_badge_while_both_pending() {
    let ds: DsData = ds_with(ApprovalStatus::Pending, ApprovalStatus::Pending);
    assert_eq!(derive_case_badge(&ds), None);
}

#[test]
fn test_waiting_for_admin_after_student_accepts() {
    let ds: DsData = ds_with(ApprovalStatus::Accepted, ApprovalStatus::Pending);
    assert_eq!(
        derive_case_badge(&ds),
        Some(CaseBadge::WaitingForAdminApproval)
    );
}

#[test]
fn test_waiting_for_submission_after_admin_accepts() {
    let ds: DsData = ds_with(ApprovalStatus::Accepted, ApprovalStatus::Accepted);
    assert_eq!(
        derive_case_badge(&ds),
        Some(CaseBadge::WaitingForDsSubmission)
    );
}

#[test]
fn test_completed_once_confirmation_document_exists() {
    let mut ds: DsData = ds_with(ApprovalStatus::Accepted, ApprovalStatus::Accepted);
    ds.confirmation_document = Some(DocumentRef {
        id: 10,
        name: String::from("confirmation.pdf"),
    });
    assert_eq!(derive_case_badge(&ds), Some(CaseBadge::ProcessCompleted));
}

#[test]
fn test_no_badge_after_rejection() {
    let ds: DsData = ds_with(ApprovalStatus::Rejected, ApprovalStatus::Pending);
    assert_eq!(derive_case_badge(&ds), None);
}

#[test]
fn test_case_without_ds_data_has_no_badge() {
    let case: VisaOperation = VisaOperation::new(
        VopNumber::new(2026, 1),
        1,
        ContactSnapshot {
            name: String::from("A. Sharma"),
            phone: String::new(),
            country: String::from("USA"),
        },
        datetime!(2026-03-01 00:00 UTC),
    );
    assert_eq!(derive_badge_for_case(&case), None);
}
