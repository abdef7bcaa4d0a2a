// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! DTOs are distinct from domain types and represent the API contract.
//! Dates cross the boundary as ISO 8601 strings. Case **summaries**
//! deliberately carry no credential material; only the detail response
//! exposes sub-record contents, and only to authenticated operators.

use serde::{Deserialize, Serialize};

/// API request to create a new case for a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCaseRequest {
    /// The contact to open the case for.
    pub contact_id: i64,
}

/// One security question/answer pair in a CGI payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityQaInfo {
    /// The security question text.
    pub question: String,
    /// The answer.
    pub answer: String,
}

/// API request to overwrite the CGI credential sub-record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetCgiDataRequest {
    /// The CGI portal login name.
    pub username: String,
    /// The CGI portal password.
    pub password: String,
    /// Up to three security question/answer pairs.
    #[serde(default)]
    pub security_questions: Vec<SecurityQaInfo>,
    /// Whether credentials are visible on the applicant portal.
    #[serde(default)]
    pub show_on_portal: bool,
}

/// API request to overwrite the staff slot booking fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetSlotBookingRequest {
    /// Consulate for the VAC appointment.
    pub vac_consulate: Option<String>,
    /// Consulate for the VI appointment.
    pub vi_consulate: Option<String>,
    /// VAC appointment date (ISO 8601).
    pub vac_date: Option<String>,
    /// VAC appointment time.
    pub vac_time: Option<String>,
    /// VI appointment date (ISO 8601).
    pub vi_date: Option<String>,
    /// VI appointment time.
    pub vi_time: Option<String>,
    /// When the booking was made.
    pub booked_on: Option<String>,
    /// Who made the booking.
    pub booked_by: Option<String>,
}

/// Applicant-portal request to submit preferred appointment locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitPreferencesRequest {
    /// The contact the portal authenticated.
    pub contact_id: i64,
    /// Preferred VAC locations.
    pub vac_preferred: Vec<String>,
    /// Preferred VI locations.
    pub vi_preferred: Vec<String>,
    /// Whether this submission locks the preference sets.
    #[serde(default)]
    pub lock: bool,
}

/// API request to record the visa interview outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetInterviewOutcomeRequest {
    /// The outcome (`Approved`, `Rejected`, `221g`), or `None` while
    /// pending.
    pub visa_outcome: Option<String>,
    /// Free-text remarks.
    #[serde(default)]
    pub remarks: String,
}

/// API request to overwrite the DS-160 form metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDsDetailsRequest {
    /// Identifier of the external DS-160 submission.
    pub confirmation_number: Option<String>,
    /// DS-160 security question.
    pub security_question: Option<String>,
    /// DS-160 security answer.
    pub security_answer: Option<String>,
    /// Staff-internal note.
    pub basic_ds_box: Option<String>,
}

/// API request to set the DS-160 session start date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDsStartDateRequest {
    /// The start date (ISO 8601 calendar date).
    pub start_date: String,
}

/// API request for a student (or admin) rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectRequest {
    /// The stated reason. Must be non-empty.
    pub reason: String,
}

/// API request for the administrator acceptance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAcceptRequest {
    /// Name to snapshot as the accepting administrator. Defaults to
    /// the authenticated operator's display name.
    pub acting_admin_name: Option<String>,
}

/// Reference to a stored document in API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRefInfo {
    /// The document store identifier.
    pub id: i64,
    /// The original file name.
    pub name: String,
}

/// CGI sub-record contents (detail fetch only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CgiDataInfo {
    /// The CGI portal login name.
    pub username: String,
    /// The CGI portal password.
    pub password: String,
    /// The security question/answer pairs.
    pub security_questions: Vec<SecurityQaInfo>,
}

/// Slot booking sub-record contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotBookingInfo {
    /// Consulate for the VAC appointment.
    pub vac_consulate: Option<String>,
    /// Consulate for the VI appointment.
    pub vi_consulate: Option<String>,
    /// VAC appointment date (ISO 8601).
    pub vac_date: Option<String>,
    /// VAC appointment time.
    pub vac_time: Option<String>,
    /// VI appointment date (ISO 8601).
    pub vi_date: Option<String>,
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
    /// Whether the preference sets are locked.
    pub preferences_locked: bool,
}

/// DS-160 sub-record contents (detail fetch only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsDataInfo {
    /// Identifier of the external DS-160 submission.
    pub confirmation_number: Option<String>,
    /// DS-160 security question.
    pub security_question: Option<String>,
    /// DS-160 security answer.
    pub security_answer: Option<String>,
    /// Session start date (ISO 8601).
    pub start_date: Option<String>,
    /// Derived session expiry date (ISO 8601).
    pub expiry_date: Option<String>,
    /// Staff-internal note.
    pub basic_ds_box: Option<String>,
    /// The internal-only document, if any.
    pub internal_document: Option<DocumentRefInfo>,
    /// Applicant-visible documents, in upload order.
    pub filling_documents: Vec<DocumentRefInfo>,
    /// The confirmation document, if attached.
    pub confirmation_document: Option<DocumentRefInfo>,
    /// The applicant's decision.
    pub student_status: String,
    /// The administrator's decision.
    pub admin_status: String,
    /// Reason from the last rejecting party, if any.
    pub rejection_reason: Option<String>,
    /// Which administrator accepted, if any.
    pub admin_name: Option<String>,
}

/// Interview outcome sub-record contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewInfo {
    /// The outcome (`Approved`, `Rejected`, `221g`), if decided.
    pub visa_outcome: Option<String>,
    /// Free-text remarks.
    pub remarks: String,
}

/// A case in list views.
///
/// Summaries never carry credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSummary {
    /// The canonical case id.
    pub op_id: i64,
    /// The case number.
    pub vop_number: String,
    /// Applicant name snapshot.
    pub name: String,
    /// Applicant phone snapshot.
    pub phone: String,
    /// Country of application snapshot.
    pub country: String,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Derived list badge, if any milestone is reached.
    pub badge: Option<String>,
    /// Whether CGI credentials are captured (drives "Start CGI" vs
    /// "View CGI").
    pub cgi_configured: bool,
    /// The interview outcome, if recorded.
    pub visa_outcome: Option<String>,
}

/// API response for listing cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCasesResponse {
    /// The matching cases, newest first.
    pub cases: Vec<CaseSummary>,
}

/// Full case detail for authenticated operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDetailResponse {
    /// The canonical case id.
    pub op_id: i64,
    /// The case number.
    pub vop_number: String,
    /// The CRM contact reference.
    pub contact_id: i64,
    /// Applicant name snapshot.
    pub name: String,
    /// Applicant phone snapshot.
    pub phone: String,
    /// Country of application snapshot.
    pub country: String,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Whether CGI credentials are visible on the applicant portal.
    pub show_cgi_on_portal: bool,
    /// Derived list badge, if any milestone is reached.
    pub badge: Option<String>,
    /// CGI sub-record, if captured.
    pub cgi_data: Option<CgiDataInfo>,
    /// Slot booking sub-record, if present.
    pub slot_booking_data: Option<SlotBookingInfo>,
    /// DS-160 sub-record, if present.
    pub ds_data: Option<DsDataInfo>,
    /// Interview outcome sub-record, if present.
    pub visa_interview_data: Option<InterviewInfo>,
}

/// API response for a case mutation: the updated case plus the
/// persisted audit event id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseUpdateResponse {
    /// The persisted audit event id for this transition.
    pub event_id: i64,
    /// The updated case.
    pub case: CaseDetailResponse,
}

/// API response for a document attachment: the stored reference plus
/// the updated case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachDocumentResponse {
    /// The stored document reference.
    pub document: DocumentRefInfo,
    /// The persisted audit event id for this transition.
    pub event_id: i64,
    /// The updated case.
    pub case: CaseDetailResponse,
}

/// Contact information from the mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// The canonical contact id.
    pub contact_id: i64,
    /// The contact's name.
    pub name: String,
    /// The contact's phone number.
    pub phone: String,
    /// The contact's country of application.
    pub country: String,
}

/// API request to add a contact to the mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateContactRequest {
    /// The contact's name.
    pub name: String,
    /// The contact's phone number.
    #[serde(default)]
    pub phone: String,
    /// The contact's country of application.
    #[serde(default)]
    pub country: String,
}

/// API response for listing contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListContactsResponse {
    /// The contacts in the mirror.
    pub contacts: Vec<ContactInfo>,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The operator login name.
    pub login_name: String,
    /// The operator password.
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The opaque session token.
    pub session_token: String,
    /// The operator login name.
    pub login_name: String,
    /// The operator display name.
    pub display_name: String,
    /// The operator role.
    pub role: String,
}

/// A single capability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is denied.
    Denied,
}

/// Global capabilities for an authenticated operator.
///
/// Advisory only: the UI uses these to hide controls, the server still
/// enforces every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalCapabilities {
    /// May create cases and edit sub-records.
    pub can_manage_cases: Capability,
    /// May record the administrator decision on the DS-160 gate.
    pub can_admin_decide: Capability,
    /// May manage operator accounts.
    pub can_manage_operators: Capability,
    /// May maintain the contact mirror.
    pub can_manage_contacts: Capability,
}

/// Per-case capabilities for an authenticated operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseCapabilities {
    /// May accept the filling documents on the applicant's behalf.
    pub can_accept_on_behalf: Capability,
    /// May record the administrator decision.
    pub can_admin_decide: Capability,
    /// May attach the confirmation document (gate satisfied).
    pub can_attach_confirmation: Capability,
    /// Whether the applicant may still submit location preferences.
    pub can_submit_preferences: Capability,
}

/// API response for whoami.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    /// The operator login name.
    pub login_name: String,
    /// The operator display name.
    pub display_name: String,
    /// The operator role.
    pub role: String,
    /// The operator's global capabilities.
    pub capabilities: GlobalCapabilities,
}

/// API request to create an operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOperatorRequest {
    /// The login name.
    pub login_name: String,
    /// The display name.
    pub display_name: String,
    /// The initial password.
    pub password: String,
    /// The password confirmation.
    pub password_confirmation: String,
    /// The role (`Admin` or `Staff`).
    pub role: String,
}

/// Operator information in API responses. Never includes the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorInfo {
    /// The canonical operator id.
    pub operator_id: i64,
    /// The login name.
    pub login_name: String,
    /// The display name.
    pub display_name: String,
    /// The role.
    pub role: String,
    /// Whether the operator is disabled.
    pub is_disabled: bool,
    /// Last successful login, if any.
    pub last_login_at: Option<String>,
}

/// API response for listing operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOperatorsResponse {
    /// All operator accounts.
    pub operators: Vec<OperatorInfo>,
}

/// API request for an operator changing their own password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    /// The current password.
    pub current_password: String,
    /// The new password.
    pub new_password: String,
    /// The new password confirmation.
    pub new_password_confirmation: String,
}

/// API request for an admin resetting another operator's password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    /// The target operator.
    pub operator_id: i64,
    /// The new password.
    pub new_password: String,
    /// The new password confirmation.
    pub new_password_confirmation: String,
}

/// Serializable representation of an audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventInfo {
    /// The persisted event id.
    pub event_id: i64,
    /// The actor id.
    pub actor_id: String,
    /// The actor type (`admin`, `staff`, `student`).
    pub actor_type: String,
    /// The cause id.
    pub cause_id: String,
    /// The cause description.
    pub cause_description: String,
    /// The action name.
    pub action_name: String,
    /// Optional action details.
    pub action_details: Option<String>,
    /// State summary before the transition.
    pub before_snapshot: String,
    /// State summary after the transition.
    pub after_snapshot: String,
    /// The case number.
    pub vop_number: String,
}

/// API response for a case audit timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTimelineResponse {
    /// The case id.
    pub op_id: i64,
    /// The ordered audit events.
    pub events: Vec<AuditEventInfo>,
}
