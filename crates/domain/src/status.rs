// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Derived case status computation.
//!
//! Badges shown in list views are pure functions of the DS-160
//! sub-record. They are recomputed on every read and never stored, so
//! the badge can never drift out of sync with the gate state.

use crate::types::{ApprovalStatus, CaseBadge, DsData, VisaOperation};

/// Derives the list-view badge for a DS-160 sub-record.
///
/// Precedence: a completed process outranks a pending submission, which
/// outranks a pending administrator decision.
///
/// # Arguments
///
/// * `ds` - The DS-160 sub-record
///
/// # Returns
///
/// The badge to display, or `None` when no milestone is reached.
#[must_use]
pub const fn derive_case_badge(ds: &DsData) -> Option<CaseBadge> {
    if ds.confirmation_document.is_some() {
        return Some(CaseBadge::ProcessCompleted);
    }
    if matches!(ds.admin_status, ApprovalStatus::Accepted) {
        return Some(CaseBadge::WaitingForDsSubmission);
    }
    if matches!(ds.student_status, ApprovalStatus::Accepted)
        && matches!(ds.admin_status, ApprovalStatus::Pending)
    {
        return Some(CaseBadge::WaitingForAdminApproval);
    }
    None
}

/// Derives the list-view badge for a whole case.
///
/// A case with no DS-160 sub-record has no badge.
#[must_use]
pub fn derive_badge_for_case(case: &VisaOperation) -> Option<CaseBadge> {
    case.ds_data.as_ref().and_then(|ds| derive_case_badge(ds))
}
