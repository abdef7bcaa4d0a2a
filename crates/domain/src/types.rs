// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

/// A decision on one axis of the DS-160 approval gate.
///
/// The student and administrator axes move independently; both start
/// at `Pending`. Re-review after a rejection is permitted, so `Rejected`
/// is not terminal. `Accepted` is terminal for its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ApprovalStatus {
    /// No decision recorded yet.
    #[default]
    Pending,
    /// The reviewing party accepted the filling documents.
    Accepted,
    /// The reviewing party rejected the filling documents.
    Rejected,
}

impl FromStr for ApprovalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidApprovalStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ApprovalStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// The recorded outcome of the visa interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisaOutcome {
    /// Visa granted.
    Approved,
    /// Visa refused.
    Rejected,
    /// Administrative processing under section 221(g).
    #[serde(rename = "221g")]
    AdministrativeProcessing,
}

impl FromStr for VisaOutcome {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            "221g" => Ok(Self::AdministrativeProcessing),
            _ => Err(DomainError::InvalidVisaOutcome(s.to_string())),
        }
    }
}

impl std::fmt::Display for VisaOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl VisaOutcome {
    /// Converts this outcome to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::AdministrativeProcessing => "221g",
        }
    }
}

/// Derived list-view badge for a case.
///
/// Badges are recomputed from `DsData` on every read; they are never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseBadge {
    /// Student has accepted; administrator decision outstanding.
    WaitingForAdminApproval,
    /// Administrator has accepted; confirmation document outstanding.
    WaitingForDsSubmission,
    /// A confirmation document is attached.
    ProcessCompleted,
}

impl CaseBadge {
    /// Converts this badge to its display label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WaitingForAdminApproval => "Waiting for Admin Approval",
            Self::WaitingForDsSubmission => "Waiting for DS-160 Submission",
            Self::ProcessCompleted => "Process Completed",
        }
    }
}

impl std::fmt::Display for CaseBadge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Human-readable case number, unique within a tenant and immutable
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VopNumber {
    /// The formatted case number (e.g., `VOP-2026-00042`).
    value: String,
}

impl VopNumber {
    /// Formats a new case number from a creation year and an allocated
    /// sequence value.
    #[must_use]
    pub fn new(year: i32, sequence: i64) -> Self {
        Self {
            value: format!("VOP-{year}-{sequence:05}"),
        }
    }

    /// Wraps an already-formatted case number read back from storage.
    #[must_use]
    pub const fn from_value(value: String) -> Self {
        Self { value }
    }

    /// Returns the formatted case number.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for VopNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Contact identity resolved from the contact directory at case
/// creation.
///
/// The snapshot is intentionally denormalized: visa paperwork reflects
/// the facts at filing time, even if the live contact record later
/// diverges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSnapshot {
    /// The applicant's name.
    pub name: String,
    /// The applicant's phone number.
    pub phone: String,
    /// The country of application.
    pub country: String,
}

/// One security question/answer pair on the CGI portal account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityQa {
    /// The security question text.
    pub question: String,
    /// The answer. Never logged, never included in error messages.
    pub answer: String,
}

/// CGI portal credentials for one applicant.
///
/// At most three security pairs; each slot is independently optional
/// and order is preserved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CgiData {
    /// The CGI portal login name.
    pub username: String,
    /// The CGI portal password. Opaque to the engine.
    pub password: String,
    /// Up to three security question/answer pairs.
    pub security_questions: Vec<SecurityQa>,
}

/// Maximum number of CGI security question slots.
pub const MAX_SECURITY_QUESTIONS: usize = 3;

impl CgiData {
    /// Whether credentials have been captured for this case.
    ///
    /// Drives the "Start CGI" vs "View CGI" presentation state; derived,
    /// never stored.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty()
    }
}

/// Reference to a stored document blob.
///
/// The engine only holds references; bytes live in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// The document store identifier.
    pub id: i64,
    /// The original file name, kept for display.
    pub name: String,
}

/// The staff-editable booking fields of the slot booking sub-record.
///
/// This deliberately excludes the applicant-owned preference triple so a
/// staff save can never touch it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotBookingFields {
    /// Consulate for the Visa Application Center appointment.
    pub vac_consulate: Option<String>,
    /// Consulate for the Visa Interview appointment.
    pub vi_consulate: Option<String>,
    /// VAC appointment date.
    pub vac_date: Option<Date>,
    /// VAC appointment time (free text, e.g. `10:30`).
    pub vac_time: Option<String>,
    /// VI appointment date.
    pub vi_date: Option<Date>,
    /// VI appointment time.
    pub vi_time: Option<String>,
    /// When the booking was made (free-text provenance).
    pub booked_on: Option<String>,
    /// Who made the booking (free-text provenance).
    pub booked_by: Option<String>,
}

/// The slot booking sub-record: staff booking fields plus the
/// applicant-submitted location preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotBookingData {
    /// Consulate for the Visa Application Center appointment.
    pub vac_consulate: Option<String>,
    /// Consulate for the Visa Interview appointment.
    pub vi_consulate: Option<String>,
    /// VAC appointment date.
    pub vac_date: Option<Date>,
    /// VAC appointment time.
    pub vac_time: Option<String>,
    /// VI appointment date.
    pub vi_date: Option<Date>,
    /// VI appointment time.
    pub vi_time: Option<String>,
    /// When the booking was made.
    pub booked_on: Option<String>,
    /// Who made the booking.
    pub booked_by: Option<String>,
    /// Applicant-preferred VAC locations.
    pub vac_preferred: Vec<String>,
    /// Applicant-preferred VI locations.
    pub vi_preferred: Vec<String>,
    /// One-way flag: once set by the applicant portal, the preference
    /// sets are read-only and no staff action clears them.
    pub preferences_locked: bool,
}

impl SlotBookingData {
    /// Returns a copy with the staff booking fields replaced and the
    /// applicant preference triple preserved verbatim.
    #[must_use]
    pub fn with_staff_fields(&self, fields: SlotBookingFields) -> Self {
        Self {
            vac_consulate: fields.vac_consulate,
            vi_consulate: fields.vi_consulate,
            vac_date: fields.vac_date,
            vac_time: fields.vac_time,
            vi_date: fields.vi_date,
            vi_time: fields.vi_time,
            booked_on: fields.booked_on,
            booked_by: fields.booked_by,
            vac_preferred: self.vac_preferred.clone(),
            vi_preferred: self.vi_preferred.clone(),
            preferences_locked: self.preferences_locked,
        }
    }
}

/// The form-metadata subset of the DS-160 sub-record that staff
/// overwrite as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsDetails {
    /// Identifier of the external DS-160 submission.
    pub confirmation_number: Option<String>,
    /// DS-160 security question (single pair, unrelated to CGI's).
    pub security_question: Option<String>,
    /// DS-160 security answer. Never logged.
    pub security_answer: Option<String>,
    /// Staff-internal free-text note.
    pub basic_ds_box: Option<String>,
}

/// The DS-160 sub-record and its dual-approval gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsData {
    /// Identifier of the external DS-160 submission.
    pub confirmation_number: Option<String>,
    /// DS-160 security question.
    pub security_question: Option<String>,
    /// DS-160 security answer. Never logged.
    pub security_answer: Option<String>,
    /// Date the form session was started.
    pub start_date: Option<Date>,
    /// Derived: always `start_date + 20 days`. Never independently
    /// writable.
    pub expiry_date: Option<Date>,
    /// Staff-internal free-text note.
    pub basic_ds_box: Option<String>,
    /// Single internal-only attachment; upload replaces.
    pub internal_document: Option<DocumentRef>,
    /// Documents presented to the applicant for review, in upload order.
    pub filling_documents: Vec<DocumentRef>,
    /// Final proof-of-submission document. Must remain absent until the
    /// approval gate is satisfied.
    pub confirmation_document: Option<DocumentRef>,
    /// The applicant's decision on the filling documents.
    pub student_status: ApprovalStatus,
    /// The administrator's decision, an independent axis.
    pub admin_status: ApprovalStatus,
    /// Reason given by whichever party last rejected. Shared field;
    /// last writer wins.
    pub rejection_reason: Option<String>,
    /// Which administrator accepted, set only on the accepting
    /// transition.
    pub admin_name: Option<String>,
}

impl DsData {
    /// Whether the dual-approval gate is satisfied.
    #[must_use]
    pub fn is_submission_ready(&self) -> bool {
        self.student_status == ApprovalStatus::Accepted
            && self.admin_status == ApprovalStatus::Accepted
    }

    /// Whether the given document id is referenced anywhere in this
    /// sub-record.
    #[must_use]
    pub fn references_document(&self, document_id: i64) -> bool {
        self.internal_document
            .as_ref()
            .is_some_and(|d| d.id == document_id)
            || self.filling_documents.iter().any(|d| d.id == document_id)
            || self
                .confirmation_document
                .as_ref()
                .is_some_and(|d| d.id == document_id)
    }
}

/// Outcome recorded after the visa interview appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisaInterviewData {
    /// The interview outcome, if decided.
    pub visa_outcome: Option<VisaOutcome>,
    /// Free-text remarks (221(g) slip colors, officer notes, etc.).
    pub remarks: String,
}

/// One applicant's visa-processing case.
///
/// The aggregate owns at most one of each sub-record; each starts absent
/// and is created on first write. `vop_number` and `contact_id` never
/// change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisaOperation {
    /// Canonical identifier assigned by the database. `None` until the
    /// case has been persisted.
    pub op_id: Option<i64>,
    /// The human-readable case number. Immutable.
    pub vop_number: VopNumber,
    /// Reference to the external CRM contact. Immutable.
    pub contact_id: i64,
    /// Applicant name snapshot taken at creation.
    pub name: String,
    /// Applicant phone snapshot taken at creation.
    pub phone: String,
    /// Country of application snapshot taken at creation.
    pub country: String,
    /// Creation timestamp. Immutable.
    pub created_at: OffsetDateTime,
    /// Whether CGI credentials are shown on the applicant portal.
    pub show_cgi_on_portal: bool,
    /// Credential capture sub-record.
    pub cgi_data: Option<CgiData>,
    /// Slot booking sub-record.
    pub slot_booking_data: Option<SlotBookingData>,
    /// DS-160 sub-record.
    pub ds_data: Option<DsData>,
    /// Interview outcome sub-record.
    pub visa_interview_data: Option<VisaInterviewData>,
}

impl VisaOperation {
    /// Creates a new case with all sub-records absent.
    #[must_use]
    pub fn new(
        vop_number: VopNumber,
        contact_id: i64,
        snapshot: ContactSnapshot,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            op_id: None,
            vop_number,
            contact_id,
            name: snapshot.name,
            phone: snapshot.phone,
            country: snapshot.country,
            created_at,
            show_cgi_on_portal: false,
            cgi_data: None,
            slot_booking_data: None,
            ds_data: None,
            visa_interview_data: None,
        }
    }

    /// Returns a copy carrying the canonical database identifier.
    #[must_use]
    pub fn with_op_id(mut self, op_id: i64) -> Self {
        self.op_id = Some(op_id);
        self
    }

    /// Whether CGI credentials have been captured.
    #[must_use]
    pub fn cgi_configured(&self) -> bool {
        self.cgi_data.as_ref().is_some_and(CgiData::is_configured)
    }
}
