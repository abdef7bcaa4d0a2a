// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{CreationResult, TransitionResult, snapshot_case};
use lyceum_visa_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use lyceum_visa_domain::{
    ApprovalStatus, ConsulateDirectory, ContactSnapshot, DomainError, DsData, SlotBookingData,
    VisaInterviewData, VisaOperation, VopNumber, compute_expiry_date, validate_cgi_data,
    validate_contact_snapshot, validate_preference_submission, validate_rejection_reason,
    validate_slot_fields,
};
use time::OffsetDateTime;

/// Creates a new case from a resolved contact snapshot.
///
/// The caller is responsible for resolving the contact and allocating
/// the case number; this function validates the snapshot, builds the
/// aggregate with all sub-records absent, and emits the creation audit
/// event.
///
/// # Arguments
///
/// * `vop_number` - The allocated case number
/// * `contact_id` - The external CRM contact reference
/// * `snapshot` - The contact identity snapshot taken at creation
/// * `created_at` - The creation timestamp
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if the contact snapshot violates domain rules.
pub fn create_case(
    vop_number: VopNumber,
    contact_id: i64,
    snapshot: ContactSnapshot,
    created_at: OffsetDateTime,
    actor: Actor,
    cause: Cause,
) -> Result<CreationResult, CoreError> {
    validate_contact_snapshot(&snapshot)?;

    let applicant_name: String = snapshot.name.clone();
    let case: VisaOperation =
        VisaOperation::new(vop_number.clone(), contact_id, snapshot, created_at);

    let before: StateSnapshot = StateSnapshot::new(String::from("case=absent"));
    let after: StateSnapshot = snapshot_case(&case);

    let action: Action = Action::new(
        String::from("CreateCase"),
        Some(format!(
            "Created case {} for contact {contact_id} ({applicant_name})",
            vop_number.value()
        )),
    );
    let audit_event: AuditEvent =
        AuditEvent::new(actor, cause, action, before, after, vop_number, None);

    Ok(CreationResult { case, audit_event })
}

/// Applies a command to a case, producing the new case state and the
/// audit event for the transition.
///
/// The function is pure: the input case is never mutated, and a failed
/// transition has no side effects.
///
/// # Arguments
///
/// * `case` - The current case state (immutable)
/// * `command` - The command to apply
/// * `consulates` - The configured consulate directory
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if the command violates domain rules: an
/// unsatisfied approval gate, a locked preference set, a missing
/// rejection reason, an unknown consulate, or a document id the case
/// does not reference.
#[allow(clippy::too_many_lines)]
pub fn apply(
    case: &VisaOperation,
    command: Command,
    consulates: &ConsulateDirectory,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let before: StateSnapshot = snapshot_case(case);

    let (new_case, action) = match command {
        Command::SetCgiData {
            cgi,
            show_on_portal,
        } => {
            validate_cgi_data(&cgi)?;

            let question_count: usize = cgi.security_questions.len();
            let mut new_case: VisaOperation = case.clone();
            new_case.cgi_data = Some(cgi);
            new_case.show_cgi_on_portal = show_on_portal;

            let action: Action = Action::new(
                String::from("SetCgiData"),
                Some(format!(
                    "Captured CGI credentials ({question_count} security questions, portal visibility: {show_on_portal})"
                )),
            );
            (new_case, action)
        }
        Command::SetSlotBooking { fields } => {
            validate_slot_fields(&fields, consulates)?;

            let booking: SlotBookingData = case
                .slot_booking_data
                .clone()
                .unwrap_or_default()
                .with_staff_fields(fields);

            let mut new_case: VisaOperation = case.clone();
            new_case.slot_booking_data = Some(booking);

            let action: Action = Action::new(
                String::from("SetSlotBooking"),
                Some(String::from("Updated slot booking details")),
            );
            (new_case, action)
        }
        Command::SubmitSlotPreferences {
            vac_preferred,
            vi_preferred,
            lock,
        } => {
            let mut booking: SlotBookingData =
                case.slot_booking_data.clone().unwrap_or_default();
            if booking.preferences_locked {
                return Err(CoreError::DomainViolation(
                    DomainError::PreferencesAlreadyLocked,
                ));
            }
            validate_preference_submission(&vac_preferred, &vi_preferred, consulates)?;

            let vac_count: usize = vac_preferred.len();
            let vi_count: usize = vi_preferred.len();
            booking.vac_preferred = vac_preferred;
            booking.vi_preferred = vi_preferred;
            booking.preferences_locked = lock;

            let mut new_case: VisaOperation = case.clone();
            new_case.slot_booking_data = Some(booking);

            let action: Action = Action::new(
                String::from("SubmitSlotPreferences"),
                Some(format!(
                    "Applicant submitted location preferences ({vac_count} VAC, {vi_count} VI, locked: {lock})"
                )),
            );
            (new_case, action)
        }
        Command::SetInterviewOutcome { outcome, remarks } => {
            let mut new_case: VisaOperation = case.clone();
            new_case.visa_interview_data = Some(VisaInterviewData {
                visa_outcome: outcome,
                remarks,
            });

            let action: Action = Action::new(
                String::from("SetInterviewOutcome"),
                Some(format!(
                    "Recorded interview outcome: {}",
                    outcome.map_or("pending", |o| o.as_str())
                )),
            );
            (new_case, action)
        }
        Command::SetDsDetails { details } => {
            let mut ds: DsData = case.ds_data.clone().unwrap_or_default();
            ds.confirmation_number = details.confirmation_number;
            ds.security_question = details.security_question;
            ds.security_answer = details.security_answer;
            ds.basic_ds_box = details.basic_ds_box;

            let mut new_case: VisaOperation = case.clone();
            new_case.ds_data = Some(ds);

            let action: Action = Action::new(
                String::from("SetDsDetails"),
                Some(String::from("Updated DS-160 form metadata")),
            );
            (new_case, action)
        }
        Command::SetDsStartDate { start_date } => {
            let expiry_date = compute_expiry_date(start_date)?;

            let mut ds: DsData = case.ds_data.clone().unwrap_or_default();
            ds.start_date = Some(start_date);
            ds.expiry_date = Some(expiry_date);

            let mut new_case: VisaOperation = case.clone();
            new_case.ds_data = Some(ds);

            let action: Action = Action::new(
                String::from("SetDsStartDate"),
                Some(format!(
                    "Set DS-160 start date {start_date}, expiry derived as {expiry_date}"
                )),
            );
            (new_case, action)
        }
        Command::StudentAccept => {
            let new_case: VisaOperation = accept_axis(case, Axis::Student, None)?;
            let action: Action = Action::new(
                String::from("StudentAccept"),
                Some(String::from("Applicant accepted the filling documents")),
            );
            (new_case, action)
        }
        Command::StaffAcceptOnBehalfOfStudent => {
            let new_case: VisaOperation = accept_axis(case, Axis::Student, None)?;
            let action: Action = Action::new(
                String::from("StaffAcceptOnBehalfOfStudent"),
                Some(String::from(
                    "Staff operator accepted the filling documents on the applicant's behalf",
                )),
            );
            (new_case, action)
        }
        Command::AdminAccept { admin_name } => {
            if admin_name.trim().is_empty() {
                return Err(CoreError::DomainViolation(DomainError::EmptyAdminName));
            }
            let new_case: VisaOperation =
                accept_axis(case, Axis::Admin, Some(admin_name.clone()))?;
            let action: Action = Action::new(
                String::from("AdminAccept"),
                Some(format!(
                    "Administrator '{admin_name}' accepted the filling documents"
                )),
            );
            (new_case, action)
        }
        Command::StudentReject { reason } => {
            let new_case: VisaOperation = reject_axis(case, Axis::Student, &reason)?;
            let action: Action = Action::new(
                String::from("StudentReject"),
                Some(String::from("Applicant rejected the filling documents")),
            );
            (new_case, action)
        }
        Command::AdminReject { reason } => {
            let new_case: VisaOperation = reject_axis(case, Axis::Admin, &reason)?;
            let action: Action = Action::new(
                String::from("AdminReject"),
                Some(String::from("Administrator rejected the filling documents")),
            );
            (new_case, action)
        }
        Command::AttachFillingDocument { document } => {
            let document_name: String = document.name.clone();
            let mut ds: DsData = case.ds_data.clone().unwrap_or_default();
            ds.filling_documents.push(document);

            let mut new_case: VisaOperation = case.clone();
            new_case.ds_data = Some(ds);

            let action: Action = Action::new(
                String::from("AttachFillingDocument"),
                Some(format!("Attached filling document '{document_name}'")),
            );
            (new_case, action)
        }
        Command::AttachInternalDocument { document } => {
            let document_name: String = document.name.clone();
            let mut ds: DsData = case.ds_data.clone().unwrap_or_default();
            ds.internal_document = Some(document);

            let mut new_case: VisaOperation = case.clone();
            new_case.ds_data = Some(ds);

            let action: Action = Action::new(
                String::from("AttachInternalDocument"),
                Some(format!("Attached internal document '{document_name}'")),
            );
            (new_case, action)
        }
        Command::AttachConfirmationDocument { document } => {
            let ds: DsData = case.ds_data.clone().unwrap_or_default();
            if !ds.is_submission_ready() {
                return Err(CoreError::DomainViolation(
                    DomainError::ApprovalGateNotSatisfied {
                        student_status: ds.student_status,
                        admin_status: ds.admin_status,
                    },
                ));
            }

            let document_name: String = document.name.clone();
            let mut ds: DsData = ds;
            ds.confirmation_document = Some(document);

            let mut new_case: VisaOperation = case.clone();
            new_case.ds_data = Some(ds);

            let action: Action = Action::new(
                String::from("AttachConfirmationDocument"),
                Some(format!("Attached confirmation document '{document_name}'")),
            );
            (new_case, action)
        }
        Command::DeleteDocument { document_id } => {
            let mut ds: DsData = case
                .ds_data
                .clone()
                .ok_or(DomainError::DocumentNotReferenced { document_id })?;
            let slot: &'static str = remove_document_reference(&mut ds, document_id)
                .ok_or(DomainError::DocumentNotReferenced { document_id })?;

            let mut new_case: VisaOperation = case.clone();
            new_case.ds_data = Some(ds);

            let action: Action = Action::new(
                String::from("DeleteDocument"),
                Some(format!("Removed {slot} document reference {document_id}")),
            );
            (new_case, action)
        }
    };

    let after: StateSnapshot = snapshot_case(&new_case);
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        before,
        after,
        case.vop_number.clone(),
        case.op_id,
    );

    Ok(TransitionResult {
        new_case,
        audit_event,
    })
}

/// The two independent axes of the approval gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Student,
    Admin,
}

impl Axis {
    const fn name(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Admin => "admin",
        }
    }
}

/// Moves one approval axis to `Accepted`.
///
/// Legal from `Pending` or `Rejected`; an accepted axis is final.
fn accept_axis(
    case: &VisaOperation,
    axis: Axis,
    admin_name: Option<String>,
) -> Result<VisaOperation, CoreError> {
    let mut ds: DsData = case.ds_data.clone().unwrap_or_default();
    let current: ApprovalStatus = match axis {
        Axis::Student => ds.student_status,
        Axis::Admin => ds.admin_status,
    };
    if current == ApprovalStatus::Accepted {
        return Err(CoreError::DomainViolation(
            DomainError::ApprovalAlreadyGranted { axis: axis.name() },
        ));
    }

    match axis {
        Axis::Student => ds.student_status = ApprovalStatus::Accepted,
        Axis::Admin => {
            ds.admin_status = ApprovalStatus::Accepted;
            ds.admin_name = admin_name;
        }
    }

    let mut new_case: VisaOperation = case.clone();
    new_case.ds_data = Some(ds);
    Ok(new_case)
}

/// Moves one approval axis to `Rejected`, storing the stated reason.
///
/// The rejection reason is a shared field; the last rejecting party
/// wins.
fn reject_axis(case: &VisaOperation, axis: Axis, reason: &str) -> Result<VisaOperation, CoreError> {
    validate_rejection_reason(reason)?;

    let mut ds: DsData = case.ds_data.clone().unwrap_or_default();
    let current: ApprovalStatus = match axis {
        Axis::Student => ds.student_status,
        Axis::Admin => ds.admin_status,
    };
    if current == ApprovalStatus::Accepted {
        return Err(CoreError::DomainViolation(
            DomainError::ApprovalAlreadyGranted { axis: axis.name() },
        ));
    }

    match axis {
        Axis::Student => ds.student_status = ApprovalStatus::Rejected,
        Axis::Admin => ds.admin_status = ApprovalStatus::Rejected,
    }
    ds.rejection_reason = Some(reason.to_string());

    let mut new_case: VisaOperation = case.clone();
    new_case.ds_data = Some(ds);
    Ok(new_case)
}

/// Removes a document reference from whichever slot holds it.
///
/// Returns the slot name, or `None` if the id is not referenced.
/// Sibling filling entries keep their relative order.
fn remove_document_reference(ds: &mut DsData, document_id: i64) -> Option<&'static str> {
    if ds
        .internal_document
        .as_ref()
        .is_some_and(|d| d.id == document_id)
    {
        ds.internal_document = None;
        return Some("internal");
    }
    if let Some(index) = ds.filling_documents.iter().position(|d| d.id == document_id) {
        ds.filling_documents.remove(index);
        return Some("filling");
    }
    if ds
        .confirmation_document
        .as_ref()
        .is_some_and(|d| d.id == document_id)
    {
        ds.confirmation_document = None;
        return Some("confirmation");
    }
    None
}
