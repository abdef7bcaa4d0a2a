// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use lyceum_visa_audit::{AuditEvent, StateSnapshot};
use lyceum_visa_domain::VisaOperation;

/// Builds a compact audit snapshot of a case.
///
/// The snapshot summarizes gate-relevant state only. It never contains
/// credential values or security answers.
#[must_use]
pub fn snapshot_case(case: &VisaOperation) -> StateSnapshot {
    let (student, admin, filling_count, confirmation) = case.ds_data.as_ref().map_or(
        ("absent", "absent", 0, false),
        |ds| {
            (
                ds.student_status.as_str(),
                ds.admin_status.as_str(),
                ds.filling_documents.len(),
                ds.confirmation_document.is_some(),
            )
        },
    );

    StateSnapshot::new(format!(
        "vop={},cgi={},slot={},student={student},admin={admin},filling_docs={filling_count},confirmation={confirmation}",
        case.vop_number.value(),
        if case.cgi_configured() { "configured" } else { "absent" },
        if case.slot_booking_data.is_some() { "present" } else { "absent" },
    ))
}

/// The result of a successful case transition.
///
/// Transitions are atomic: they either succeed completely or fail
/// without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new case state after the transition.
    pub new_case: VisaOperation,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// The result of creating a new case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationResult {
    /// The new case, not yet persisted (`op_id` is `None`).
    pub case: VisaOperation,
    /// The audit event recording the creation.
    pub audit_event: AuditEvent,
}
