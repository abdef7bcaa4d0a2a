// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every state-changing handler follows the same shape: authorize the
//! actor, load the case, build a core command, apply it, persist the
//! transition with the version the case was read at, and translate any
//! error into the API taxonomy. Role checks happen here, at the
//! boundary, regardless of what the UI chose to show.

use time::{Date, OffsetDateTime};
use tracing::{info, warn};

use lyceum_visa::{Command, CreationResult, TransitionResult, apply};
use lyceum_visa_audit::{Actor, AuditEvent, Cause};
use lyceum_visa_domain::{
    CgiData, ConsulateDirectory, ContactSnapshot, DocumentRef, DsDetails, SecurityQa,
    SlotBookingFields, VisaOperation, VisaOutcome, VopNumber, derive_badge_for_case,
};
use lyceum_visa_persistence::{
    ContactData, DocumentMetadata, OperatorData, PersistCreationResult, PersistTransitionResult,
    Persistence, StoredCase,
};

use crate::auth::{AuthenticatedActor, AuthorizationService, portal_actor};
use crate::error::{
    ApiError, translate_core_error, translate_persistence_error,
};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AdminAcceptRequest, AttachDocumentResponse, AuditEventInfo, AuditTimelineResponse,
    CaseDetailResponse, CaseSummary, CaseUpdateResponse, CgiDataInfo, ContactInfo,
    CreateCaseRequest, CreateContactRequest, CreateOperatorRequest, DocumentRefInfo, DsDataInfo,
    InterviewInfo, ListCasesResponse, ListContactsResponse, ListOperatorsResponse, OperatorInfo,
    RejectRequest, SecurityQaInfo, SetCgiDataRequest, SetDsDetailsRequest, SetDsStartDateRequest,
    SetInterviewOutcomeRequest, SetSlotBookingRequest, SlotBookingInfo, SubmitPreferencesRequest,
    ChangePasswordRequest, ResetPasswordRequest,
};

/// Filter for the case list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    /// Free-text filter matched case-insensitively against name,
    /// case number, phone, and country (OR across fields).
    pub text: Option<String>,
    /// Inclusive start of the creation-day range (ISO 8601 date).
    pub date_from: Option<String>,
    /// Inclusive end of the creation-day range (ISO 8601 date).
    pub date_to: Option<String>,
}

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]");

fn parse_date(value: &str, field: &str) -> Result<Date, ApiError> {
    Date::parse(value, DATE_FORMAT).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: format!("Invalid date '{value}': {e}"),
    })
}

fn format_timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    value
        .format(&time::format_description::well_known::Iso8601::DEFAULT)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to format timestamp: {e}"),
        })
}

fn load_case(persistence: &mut Persistence, op_id: i64) -> Result<StoredCase, ApiError> {
    persistence
        .get_case(op_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Case"),
            message: format!("Case {op_id} does not exist"),
        })
}

fn case_op_id(case: &VisaOperation) -> Result<i64, ApiError> {
    case.op_id.ok_or_else(|| ApiError::Internal {
        message: String::from("Loaded case has no canonical id"),
    })
}

/// Converts a case to its detail response.
///
/// # Errors
///
/// Returns an error if timestamp formatting fails.
pub fn case_to_detail(case: &VisaOperation) -> Result<CaseDetailResponse, ApiError> {
    Ok(CaseDetailResponse {
        op_id: case.op_id.unwrap_or_default(),
        vop_number: case.vop_number.value().to_string(),
        contact_id: case.contact_id,
        name: case.name.clone(),
        phone: case.phone.clone(),
        country: case.country.clone(),
        created_at: format_timestamp(case.created_at)?,
        show_cgi_on_portal: case.show_cgi_on_portal,
        badge: derive_badge_for_case(case).map(|b| b.as_str().to_string()),
        cgi_data: case.cgi_data.as_ref().map(|cgi| CgiDataInfo {
            username: cgi.username.clone(),
            password: cgi.password.clone(),
            security_questions: cgi
                .security_questions
                .iter()
                .map(|qa| SecurityQaInfo {
                    question: qa.question.clone(),
                    answer: qa.answer.clone(),
                })
                .collect(),
        }),
        slot_booking_data: case.slot_booking_data.as_ref().map(|slot| SlotBookingInfo {
            vac_consulate: slot.vac_consulate.clone(),
            vi_consulate: slot.vi_consulate.clone(),
            vac_date: slot.vac_date.map(|d| d.to_string()),
            vac_time: slot.vac_time.clone(),
            vi_date: slot.vi_date.map(|d| d.to_string()),
            vi_time: slot.vi_time.clone(),
            booked_on: slot.booked_on.clone(),
            booked_by: slot.booked_by.clone(),
            vac_preferred: slot.vac_preferred.clone(),
            vi_preferred: slot.vi_preferred.clone(),
            preferences_locked: slot.preferences_locked,
        }),
        ds_data: case.ds_data.as_ref().map(|ds| DsDataInfo {
            confirmation_number: ds.confirmation_number.clone(),
            security_question: ds.security_question.clone(),
            security_answer: ds.security_answer.clone(),
            start_date: ds.start_date.map(|d| d.to_string()),
            expiry_date: ds.expiry_date.map(|d| d.to_string()),
            basic_ds_box: ds.basic_ds_box.clone(),
            internal_document: ds.internal_document.as_ref().map(|d| DocumentRefInfo {
                id: d.id,
                name: d.name.clone(),
            }),
            filling_documents: ds
                .filling_documents
                .iter()
                .map(|d| DocumentRefInfo {
                    id: d.id,
                    name: d.name.clone(),
                })
                .collect(),
            confirmation_document: ds.confirmation_document.as_ref().map(|d| DocumentRefInfo {
                id: d.id,
                name: d.name.clone(),
            }),
            student_status: ds.student_status.as_str().to_string(),
            admin_status: ds.admin_status.as_str().to_string(),
            rejection_reason: ds.rejection_reason.clone(),
            admin_name: ds.admin_name.clone(),
        }),
        visa_interview_data: case.visa_interview_data.as_ref().map(|iv| InterviewInfo {
            visa_outcome: iv.visa_outcome.map(|o| o.as_str().to_string()),
            remarks: iv.remarks.clone(),
        }),
    })
}

fn case_to_summary(case: &VisaOperation) -> Result<CaseSummary, ApiError> {
    Ok(CaseSummary {
        op_id: case.op_id.unwrap_or_default(),
        vop_number: case.vop_number.value().to_string(),
        name: case.name.clone(),
        phone: case.phone.clone(),
        country: case.country.clone(),
        created_at: format_timestamp(case.created_at)?,
        badge: derive_badge_for_case(case).map(|b| b.as_str().to_string()),
        cgi_configured: case.cgi_configured(),
        visa_outcome: case
            .visa_interview_data
            .as_ref()
            .and_then(|iv| iv.visa_outcome)
            .map(|o| o.as_str().to_string()),
    })
}

/// Applies a command to a loaded case and persists the transition.
fn run_transition(
    persistence: &mut Persistence,
    stored: &StoredCase,
    command: Command,
    consulates: &ConsulateDirectory,
    actor: Actor,
    cause: Cause,
) -> Result<(VisaOperation, i64), ApiError> {
    let transition: TransitionResult =
        apply(&stored.case, command, consulates, actor, cause).map_err(translate_core_error)?;

    let op_id: i64 = case_op_id(&stored.case)?;
    let persisted: PersistTransitionResult = persistence
        .persist_case_transition(op_id, stored.version, &transition)
        .map_err(translate_persistence_error)?;

    Ok((transition.new_case, persisted.event_id))
}

fn update_response(case: &VisaOperation, event_id: i64) -> Result<CaseUpdateResponse, ApiError> {
    Ok(CaseUpdateResponse {
        event_id,
        case: case_to_detail(case)?,
    })
}

// ============================================================================
// Registry
// ============================================================================

/// Creates a new case for a contact.
///
/// Resolves the contact from the directory, snapshots its identity,
/// allocates the case number, and persists the case with its creation
/// audit event.
///
/// # Errors
///
/// Returns an error if the contact does not resolve, the snapshot is
/// invalid, or persistence fails.
pub fn create_case(
    persistence: &mut Persistence,
    request: CreateCaseRequest,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CaseDetailResponse, ApiError> {
    AuthorizationService::authorize_manage_case(authenticated_actor)?;

    let contact: ContactData = persistence
        .get_contact(request.contact_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::InvalidInput {
            field: String::from("contact_id"),
            message: format!("Contact {} does not resolve", request.contact_id),
        })?;

    let created_at: OffsetDateTime = OffsetDateTime::now_utc();
    let sequence: i64 = persistence
        .next_case_sequence()
        .map_err(translate_persistence_error)?;
    let vop_number: VopNumber = VopNumber::new(created_at.year(), sequence);

    let creation: CreationResult = lyceum_visa::create_case(
        vop_number,
        contact.contact_id,
        ContactSnapshot {
            name: contact.name,
            phone: contact.phone,
            country: contact.country,
        },
        created_at,
        authenticated_actor.to_audit_actor(operator),
        cause,
    )
    .map_err(translate_core_error)?;

    let persisted: PersistCreationResult = persistence
        .persist_new_case(&creation)
        .map_err(translate_persistence_error)?;

    info!(op_id = persisted.op_id, "Created case");
    case_to_detail(&creation.case.with_op_id(persisted.op_id))
}

/// Lists cases matching a filter, newest first.
///
/// The free-text filter matches case-insensitively against name, case
/// number, phone, and country; the date range matches the creation
/// timestamp truncated to its calendar day, inclusive on both ends.
///
/// # Errors
///
/// Returns an error if a date filter fails to parse or the query
/// fails.
pub fn list_cases(
    persistence: &mut Persistence,
    filter: &CaseFilter,
    _authenticated_actor: &AuthenticatedActor,
) -> Result<ListCasesResponse, ApiError> {
    let date_from: Option<Date> = filter
        .date_from
        .as_deref()
        .map(|d| parse_date(d, "date_from"))
        .transpose()?;
    let date_to: Option<Date> = filter
        .date_to
        .as_deref()
        .map(|d| parse_date(d, "date_to"))
        .transpose()?;
    let needle: Option<String> = filter
        .text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(str::to_lowercase);

    let stored: Vec<StoredCase> = persistence
        .list_cases()
        .map_err(translate_persistence_error)?;

    let mut cases: Vec<CaseSummary> = Vec::new();
    for entry in &stored {
        let case: &VisaOperation = &entry.case;

        if let Some(needle) = &needle {
            let matches: bool = case.name.to_lowercase().contains(needle)
                || case.vop_number.value().to_lowercase().contains(needle)
                || case.phone.to_lowercase().contains(needle)
                || case.country.to_lowercase().contains(needle);
            if !matches {
                continue;
            }
        }

        let created_day: Date = case.created_at.date();
        if let Some(from) = date_from {
            if created_day < from {
                continue;
            }
        }
        if let Some(to) = date_to {
            if created_day > to {
                continue;
            }
        }

        cases.push(case_to_summary(case)?);
    }

    Ok(ListCasesResponse { cases })
}

/// Retrieves the full detail of a case.
///
/// # Errors
///
/// Returns an error if the case does not exist.
pub fn get_case_detail(
    persistence: &mut Persistence,
    op_id: i64,
    _authenticated_actor: &AuthenticatedActor,
) -> Result<CaseDetailResponse, ApiError> {
    let stored: StoredCase = load_case(persistence, op_id)?;
    case_to_detail(&stored.case)
}

/// Lists a contact's other cases, excluding the given one.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn cases_for_contact(
    persistence: &mut Persistence,
    contact_id: i64,
    exclude_op_id: Option<i64>,
    _authenticated_actor: &AuthenticatedActor,
) -> Result<ListCasesResponse, ApiError> {
    let stored: Vec<StoredCase> = persistence
        .list_cases_for_contact(contact_id, exclude_op_id)
        .map_err(translate_persistence_error)?;

    let cases: Vec<CaseSummary> = stored
        .iter()
        .map(|s| case_to_summary(&s.case))
        .collect::<Result<_, _>>()?;

    Ok(ListCasesResponse { cases })
}

// ============================================================================
// Contacts (directory mirror)
// ============================================================================

/// Adds a contact to the mirror.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the insert fails.
pub fn create_contact(
    persistence: &mut Persistence,
    request: CreateContactRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ContactInfo, ApiError> {
    AuthorizationService::authorize_manage_contacts(authenticated_actor)?;

    if request.name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("Contact name cannot be empty"),
        });
    }

    let contact: ContactData = persistence
        .create_contact(&request.name, &request.phone, &request.country)
        .map_err(translate_persistence_error)?;

    Ok(ContactInfo {
        contact_id: contact.contact_id,
        name: contact.name,
        phone: contact.phone,
        country: contact.country,
    })
}

/// Lists all contacts in the mirror.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_contacts(
    persistence: &mut Persistence,
    _authenticated_actor: &AuthenticatedActor,
) -> Result<ListContactsResponse, ApiError> {
    let contacts: Vec<ContactInfo> = persistence
        .list_contacts()
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|c| ContactInfo {
            contact_id: c.contact_id,
            name: c.name,
            phone: c.phone,
            country: c.country,
        })
        .collect();

    Ok(ListContactsResponse { contacts })
}

// ============================================================================
// CGI sub-record
// ============================================================================

/// Overwrites the CGI credential sub-record.
///
/// # Errors
///
/// Returns an error if the case does not exist, the credentials are
/// invalid, or persistence fails.
pub fn set_cgi_data(
    persistence: &mut Persistence,
    op_id: i64,
    request: SetCgiDataRequest,
    consulates: &ConsulateDirectory,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CaseUpdateResponse, ApiError> {
    AuthorizationService::authorize_manage_case(authenticated_actor)?;
    let stored: StoredCase = load_case(persistence, op_id)?;

    let cgi: CgiData = CgiData {
        username: request.username,
        password: request.password,
        security_questions: request
            .security_questions
            .into_iter()
            .map(|qa| SecurityQa {
                question: qa.question,
                answer: qa.answer,
            })
            .collect(),
    };

    let (new_case, event_id) = run_transition(
        persistence,
        &stored,
        Command::SetCgiData {
            cgi,
            show_on_portal: request.show_on_portal,
        },
        consulates,
        authenticated_actor.to_audit_actor(operator),
        cause,
    )?;

    update_response(&new_case, event_id)
}

// ============================================================================
// Slot booking sub-record
// ============================================================================

/// Overwrites the staff slot booking fields, preserving the applicant
/// preference triple.
///
/// # Errors
///
/// Returns an error if the case does not exist, a consulate is
/// unknown, a date fails to parse, or persistence fails.
pub fn set_slot_booking(
    persistence: &mut Persistence,
    op_id: i64,
    request: SetSlotBookingRequest,
    consulates: &ConsulateDirectory,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CaseUpdateResponse, ApiError> {
    AuthorizationService::authorize_manage_case(authenticated_actor)?;
    let stored: StoredCase = load_case(persistence, op_id)?;

    let fields: SlotBookingFields = SlotBookingFields {
        vac_consulate: request.vac_consulate,
        vi_consulate: request.vi_consulate,
        vac_date: request
            .vac_date
            .as_deref()
            .map(|d| parse_date(d, "vac_date"))
            .transpose()?,
        vac_time: request.vac_time,
        vi_date: request
            .vi_date
            .as_deref()
            .map(|d| parse_date(d, "vi_date"))
            .transpose()?,
        vi_time: request.vi_time,
        booked_on: request.booked_on,
        booked_by: request.booked_by,
    };

    let (new_case, event_id) = run_transition(
        persistence,
        &stored,
        Command::SetSlotBooking { fields },
        consulates,
        authenticated_actor.to_audit_actor(operator),
        cause,
    )?;

    update_response(&new_case, event_id)
}

/// Applicant-portal submission of preferred appointment locations.
///
/// The portal may only act on the contact's own case; once locked, the
/// preference sets cannot be resubmitted.
///
/// # Errors
///
/// Returns an error if the case does not exist, the case does not
/// belong to the contact, the sets are invalid, or the preferences are
/// already locked.
pub fn submit_slot_preferences(
    persistence: &mut Persistence,
    op_id: i64,
    request: SubmitPreferencesRequest,
    consulates: &ConsulateDirectory,
    cause: Cause,
) -> Result<CaseUpdateResponse, ApiError> {
    let stored: StoredCase = load_case(persistence, op_id)?;

    if stored.case.contact_id != request.contact_id {
        return Err(ApiError::Unauthorized {
            action: String::from("submit_slot_preferences"),
            required_role: String::from("case owner"),
        });
    }

    let (new_case, event_id) = run_transition(
        persistence,
        &stored,
        Command::SubmitSlotPreferences {
            vac_preferred: request.vac_preferred,
            vi_preferred: request.vi_preferred,
            lock: request.lock,
        },
        consulates,
        portal_actor(request.contact_id),
        cause,
    )?;

    update_response(&new_case, event_id)
}

/// Records the visa interview outcome.
///
/// Legal at any time; an outcome does not require a booked interview.
///
/// # Errors
///
/// Returns an error if the outcome string is invalid or persistence
/// fails.
pub fn set_interview_outcome(
    persistence: &mut Persistence,
    op_id: i64,
    request: SetInterviewOutcomeRequest,
    consulates: &ConsulateDirectory,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CaseUpdateResponse, ApiError> {
    AuthorizationService::authorize_manage_case(authenticated_actor)?;
    let stored: StoredCase = load_case(persistence, op_id)?;

    let outcome: Option<VisaOutcome> = request
        .visa_outcome
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<VisaOutcome>()
                .map_err(crate::error::translate_domain_error)
        })
        .transpose()?;

    let (new_case, event_id) = run_transition(
        persistence,
        &stored,
        Command::SetInterviewOutcome {
            outcome,
            remarks: request.remarks,
        },
        consulates,
        authenticated_actor.to_audit_actor(operator),
        cause,
    )?;

    update_response(&new_case, event_id)
}

// ============================================================================
// DS-160 sub-record
// ============================================================================

/// Overwrites the DS-160 form metadata.
///
/// # Errors
///
/// Returns an error if the case does not exist or persistence fails.
pub fn set_ds_details(
    persistence: &mut Persistence,
    op_id: i64,
    request: SetDsDetailsRequest,
    consulates: &ConsulateDirectory,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CaseUpdateResponse, ApiError> {
    AuthorizationService::authorize_manage_case(authenticated_actor)?;
    let stored: StoredCase = load_case(persistence, op_id)?;

    let (new_case, event_id) = run_transition(
        persistence,
        &stored,
        Command::SetDsDetails {
            details: DsDetails {
                confirmation_number: request.confirmation_number,
                security_question: request.security_question,
                security_answer: request.security_answer,
                basic_ds_box: request.basic_ds_box,
            },
        },
        consulates,
        authenticated_actor.to_audit_actor(operator),
        cause,
    )?;

    update_response(&new_case, event_id)
}

/// Sets the DS-160 session start date; the expiry date is derived
/// atomically.
///
/// # Errors
///
/// Returns an error if the date fails to parse or persistence fails.
pub fn set_ds_start_date(
    persistence: &mut Persistence,
    op_id: i64,
    request: SetDsStartDateRequest,
    consulates: &ConsulateDirectory,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CaseUpdateResponse, ApiError> {
    AuthorizationService::authorize_manage_case(authenticated_actor)?;
    let stored: StoredCase = load_case(persistence, op_id)?;

    let start_date: Date = parse_date(&request.start_date, "start_date")?;

    let (new_case, event_id) = run_transition(
        persistence,
        &stored,
        Command::SetDsStartDate { start_date },
        consulates,
        authenticated_actor.to_audit_actor(operator),
        cause,
    )?;

    update_response(&new_case, event_id)
}

// ============================================================================
// DS-160 approval gate
// ============================================================================

/// The applicant accepts the filling documents (portal channel).
///
/// # Errors
///
/// Returns an error if the case does not belong to the contact or the
/// transition is illegal.
pub fn student_accept(
    persistence: &mut Persistence,
    op_id: i64,
    contact_id: i64,
    consulates: &ConsulateDirectory,
    cause: Cause,
) -> Result<CaseUpdateResponse, ApiError> {
    let stored: StoredCase = load_case(persistence, op_id)?;

    if stored.case.contact_id != contact_id {
        return Err(ApiError::Unauthorized {
            action: String::from("student_accept"),
            required_role: String::from("case owner"),
        });
    }

    let (new_case, event_id) = run_transition(
        persistence,
        &stored,
        Command::StudentAccept,
        consulates,
        portal_actor(contact_id),
        cause,
    )?;

    update_response(&new_case, event_id)
}

/// The applicant rejects the filling documents (portal channel).
///
/// # Errors
///
/// Returns an error if the reason is empty, the case does not belong
/// to the contact, or the transition is illegal.
pub fn student_reject(
    persistence: &mut Persistence,
    op_id: i64,
    contact_id: i64,
    request: RejectRequest,
    consulates: &ConsulateDirectory,
    cause: Cause,
) -> Result<CaseUpdateResponse, ApiError> {
    let stored: StoredCase = load_case(persistence, op_id)?;

    if stored.case.contact_id != contact_id {
        return Err(ApiError::Unauthorized {
            action: String::from("student_reject"),
            required_role: String::from("case owner"),
        });
    }

    let (new_case, event_id) = run_transition(
        persistence,
        &stored,
        Command::StudentReject {
            reason: request.reason,
        },
        consulates,
        portal_actor(contact_id),
        cause,
    )?;

    update_response(&new_case, event_id)
}

/// A staff operator accepts the filling documents on the applicant's
/// behalf.
///
/// Stored effect matches the applicant's own acceptance; the audit
/// event records the override path under its own action name.
///
/// # Errors
///
/// Returns an error if the transition is illegal or persistence fails.
pub fn staff_accept_on_behalf(
    persistence: &mut Persistence,
    op_id: i64,
    consulates: &ConsulateDirectory,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CaseUpdateResponse, ApiError> {
    AuthorizationService::authorize_accept_on_behalf(authenticated_actor)?;
    let stored: StoredCase = load_case(persistence, op_id)?;

    let (new_case, event_id) = run_transition(
        persistence,
        &stored,
        Command::StaffAcceptOnBehalfOfStudent,
        consulates,
        authenticated_actor.to_audit_actor(operator),
        cause,
    )?;

    update_response(&new_case, event_id)
}

/// The administrator accepts the filling documents.
///
/// Admin role required; the acting admin's name is snapshotted on the
/// case.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` for non-Admin operators regardless
/// of case state.
pub fn admin_accept(
    persistence: &mut Persistence,
    op_id: i64,
    request: AdminAcceptRequest,
    consulates: &ConsulateDirectory,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CaseUpdateResponse, ApiError> {
    AuthorizationService::authorize_admin_decision(authenticated_actor)?;
    let stored: StoredCase = load_case(persistence, op_id)?;

    let admin_name: String = request
        .acting_admin_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| operator.display_name.clone());

    let (new_case, event_id) = run_transition(
        persistence,
        &stored,
        Command::AdminAccept { admin_name },
        consulates,
        authenticated_actor.to_audit_actor(operator),
        cause,
    )?;

    update_response(&new_case, event_id)
}

/// The administrator rejects the filling documents.
///
/// Admin role required; a non-empty reason is required.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` for non-Admin operators regardless
/// of case state.
pub fn admin_reject(
    persistence: &mut Persistence,
    op_id: i64,
    request: RejectRequest,
    consulates: &ConsulateDirectory,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CaseUpdateResponse, ApiError> {
    AuthorizationService::authorize_admin_decision(authenticated_actor)?;
    let stored: StoredCase = load_case(persistence, op_id)?;

    let (new_case, event_id) = run_transition(
        persistence,
        &stored,
        Command::AdminReject {
            reason: request.reason,
        },
        consulates,
        authenticated_actor.to_audit_actor(operator),
        cause,
    )?;

    update_response(&new_case, event_id)
}

// ============================================================================
// Documents
// ============================================================================

/// Which DS-160 slot a document attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Appends to the applicant-visible filling set.
    Filling,
    /// Replaces the single internal-only document.
    Internal,
    /// The final proof-of-submission document; gate-checked.
    Confirmation,
}

/// Attaches a document to a case.
///
/// The blob is stored first; if the case transition cannot be
/// persisted, the blob is deleted again so no dangling reference can
/// survive. For confirmation documents the approval gate is checked
/// before the blob is stored at all.
///
/// # Errors
///
/// Returns `ApiError::PreconditionFailed` for a confirmation document
/// while the gate is unsatisfied, or a storage error if blob or case
/// persistence fails.
#[allow(clippy::too_many_arguments)]
pub fn attach_document(
    persistence: &mut Persistence,
    op_id: i64,
    kind: AttachmentKind,
    file_name: &str,
    content_type: &str,
    bytes: Vec<u8>,
    consulates: &ConsulateDirectory,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<AttachDocumentResponse, ApiError> {
    AuthorizationService::authorize_manage_case(authenticated_actor)?;

    if file_name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("file_name"),
            message: String::from("Document file name cannot be empty"),
        });
    }

    let stored: StoredCase = load_case(persistence, op_id)?;

    // Check the gate before storing any bytes; a refused attach must
    // leave no blob behind.
    if kind == AttachmentKind::Confirmation {
        let ready: bool = stored
            .case
            .ds_data
            .as_ref()
            .is_some_and(lyceum_visa_domain::DsData::is_submission_ready);
        if !ready {
            let ds = stored.case.ds_data.clone().unwrap_or_default();
            return Err(ApiError::PreconditionFailed {
                message: format!(
                    "Approval gate not satisfied: student={}, admin={}",
                    ds.student_status, ds.admin_status
                ),
            });
        }
    }

    let metadata: DocumentMetadata = persistence
        .put_document(file_name, content_type, bytes)
        .map_err(translate_persistence_error)?;

    let document: DocumentRef = DocumentRef {
        id: metadata.document_id,
        name: metadata.file_name.clone(),
    };
    let command: Command = match kind {
        AttachmentKind::Filling => Command::AttachFillingDocument { document },
        AttachmentKind::Internal => Command::AttachInternalDocument { document },
        AttachmentKind::Confirmation => Command::AttachConfirmationDocument { document },
    };

    let transition_result = run_transition(
        persistence,
        &stored,
        command,
        consulates,
        authenticated_actor.to_audit_actor(operator),
        cause,
    );

    match transition_result {
        Ok((new_case, event_id)) => Ok(AttachDocumentResponse {
            document: DocumentRefInfo {
                id: metadata.document_id,
                name: metadata.file_name,
            },
            event_id,
            case: case_to_detail(&new_case)?,
        }),
        Err(err) => {
            // Roll the blob back; the case holds no reference to it.
            if let Err(cleanup_err) = persistence.delete_document(metadata.document_id) {
                warn!(
                    document_id = metadata.document_id,
                    error = %cleanup_err,
                    "Failed to roll back orphaned document blob"
                );
            }
            Err(err)
        }
    }
}

/// Removes a document reference from a case and deletes the blob.
///
/// The reference removal is persisted first; a blob deletion failure
/// after that surfaces as a storage error but can never leave a
/// dangling reference.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the id is not referenced by
/// this case, or a storage error if persistence or blob deletion
/// fails.
pub fn delete_document(
    persistence: &mut Persistence,
    op_id: i64,
    document_id: i64,
    consulates: &ConsulateDirectory,
    authenticated_actor: &AuthenticatedActor,
    operator: &OperatorData,
    cause: Cause,
) -> Result<CaseUpdateResponse, ApiError> {
    AuthorizationService::authorize_manage_case(authenticated_actor)?;
    let stored: StoredCase = load_case(persistence, op_id)?;

    let (new_case, event_id) = run_transition(
        persistence,
        &stored,
        Command::DeleteDocument { document_id },
        consulates,
        authenticated_actor.to_audit_actor(operator),
        cause,
    )?;

    persistence
        .delete_document(document_id)
        .map_err(translate_persistence_error)?;

    update_response(&new_case, event_id)
}

/// Fetches a document's metadata and bytes for preview or download.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if no blob has the given id.
pub fn fetch_document(
    persistence: &mut Persistence,
    document_id: i64,
    _authenticated_actor: &AuthenticatedActor,
) -> Result<(DocumentMetadata, Vec<u8>), ApiError> {
    persistence
        .get_document(document_id)
        .map_err(translate_persistence_error)
}

// ============================================================================
// Audit
// ============================================================================

fn event_to_info(event: &AuditEvent) -> AuditEventInfo {
    AuditEventInfo {
        event_id: event.event_id.unwrap_or_default(),
        actor_id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
        cause_id: event.cause.id.clone(),
        cause_description: event.cause.description.clone(),
        action_name: event.action.name.clone(),
        action_details: event.action.details.clone(),
        before_snapshot: event.before.data.clone(),
        after_snapshot: event.after.data.clone(),
        vop_number: event.vop_number.value().to_string(),
    }
}

/// Returns the ordered audit timeline for a case.
///
/// # Errors
///
/// Returns an error if the case does not exist or the query fails.
pub fn get_audit_timeline(
    persistence: &mut Persistence,
    op_id: i64,
    _authenticated_actor: &AuthenticatedActor,
) -> Result<AuditTimelineResponse, ApiError> {
    // Existence check keeps the not-found contract uniform.
    load_case(persistence, op_id)?;

    let events: Vec<AuditEventInfo> = persistence
        .get_audit_timeline(op_id)
        .map_err(translate_persistence_error)?
        .iter()
        .map(event_to_info)
        .collect();

    Ok(AuditTimelineResponse { op_id, events })
}

// ============================================================================
// Operator management
// ============================================================================

/// Creates an operator account.
///
/// Admin role required; the initial password must satisfy the policy.
///
/// # Errors
///
/// Returns an error if unauthorized, the role or password is invalid,
/// or the insert fails.
pub fn create_operator(
    persistence: &mut Persistence,
    request: CreateOperatorRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<OperatorInfo, ApiError> {
    AuthorizationService::authorize_manage_operators(authenticated_actor)?;

    crate::auth::Role::parse(&request.role).map_err(ApiError::from)?;
    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &request.login_name,
        &request.display_name,
    )?;

    let operator: OperatorData = persistence
        .create_operator(
            &request.login_name,
            &request.display_name,
            &request.password,
            &request.role,
        )
        .map_err(translate_persistence_error)?;

    info!(operator_id = operator.operator_id, "Created operator");
    Ok(operator_to_info(&operator))
}

fn operator_to_info(operator: &OperatorData) -> OperatorInfo {
    OperatorInfo {
        operator_id: operator.operator_id,
        login_name: operator.login_name.clone(),
        display_name: operator.display_name.clone(),
        role: operator.role.clone(),
        is_disabled: operator.is_disabled,
        last_login_at: operator.last_login_at.clone(),
    }
}

/// Lists all operator accounts.
///
/// # Errors
///
/// Returns an error if unauthorized or the query fails.
pub fn list_operators(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListOperatorsResponse, ApiError> {
    AuthorizationService::authorize_manage_operators(authenticated_actor)?;

    let operators: Vec<OperatorInfo> = persistence
        .list_operators()
        .map_err(translate_persistence_error)?
        .iter()
        .map(operator_to_info)
        .collect();

    Ok(ListOperatorsResponse { operators })
}

fn guard_last_active_admin(
    persistence: &mut Persistence,
    target: &OperatorData,
) -> Result<(), ApiError> {
    if target.role == "Admin" && !target.is_disabled {
        let active_admins: i64 = persistence
            .count_active_admins()
            .map_err(translate_persistence_error)?;
        if active_admins <= 1 {
            return Err(ApiError::DomainRuleViolation {
                rule: String::from("last_active_admin"),
                message: String::from("The last active Admin cannot be disabled or deleted"),
            });
        }
    }
    Ok(())
}

fn load_operator(
    persistence: &mut Persistence,
    operator_id: i64,
) -> Result<OperatorData, ApiError> {
    persistence
        .get_operator_by_id(operator_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Operator"),
            message: format!("Operator {operator_id} does not exist"),
        })
}

/// Disables an operator account.
///
/// # Errors
///
/// Returns an error if unauthorized, the target is the last active
/// Admin, or the target does not exist.
pub fn disable_operator(
    persistence: &mut Persistence,
    operator_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<OperatorInfo, ApiError> {
    AuthorizationService::authorize_manage_operators(authenticated_actor)?;

    let target: OperatorData = load_operator(persistence, operator_id)?;
    guard_last_active_admin(persistence, &target)?;

    persistence
        .disable_operator(operator_id)
        .map_err(translate_persistence_error)?;
    let reloaded: OperatorData = load_operator(persistence, operator_id)?;
    Ok(operator_to_info(&reloaded))
}

/// Re-enables a disabled operator account.
///
/// # Errors
///
/// Returns an error if unauthorized or the target does not exist.
pub fn enable_operator(
    persistence: &mut Persistence,
    operator_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<OperatorInfo, ApiError> {
    AuthorizationService::authorize_manage_operators(authenticated_actor)?;

    persistence
        .enable_operator(operator_id)
        .map_err(translate_persistence_error)?;
    let reloaded: OperatorData = load_operator(persistence, operator_id)?;
    Ok(operator_to_info(&reloaded))
}

/// Deletes an operator account.
///
/// # Errors
///
/// Returns an error if unauthorized, the target is the last active
/// Admin, or audit events reference the target.
pub fn delete_operator(
    persistence: &mut Persistence,
    operator_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_operators(authenticated_actor)?;

    let target: OperatorData = load_operator(persistence, operator_id)?;
    guard_last_active_admin(persistence, &target)?;

    persistence
        .delete_operator(operator_id)
        .map_err(translate_persistence_error)
}

/// Changes the authenticated operator's own password.
///
/// # Errors
///
/// Returns an error if the current password does not verify or the new
/// password violates the policy.
pub fn change_password(
    persistence: &mut Persistence,
    request: ChangePasswordRequest,
    operator: &OperatorData,
) -> Result<(), ApiError> {
    let verified: bool =
        Persistence::verify_operator_password(operator, &request.current_password)
            .map_err(translate_persistence_error)?;
    if !verified {
        return Err(ApiError::AuthenticationFailed {
            reason: String::from("Current password is incorrect"),
        });
    }

    PasswordPolicy::default().validate(
        &request.new_password,
        &request.new_password_confirmation,
        &operator.login_name,
        &operator.display_name,
    )?;

    persistence
        .update_password(operator.operator_id, &request.new_password)
        .map_err(translate_persistence_error)
}

/// Resets another operator's password (Admin only).
///
/// # Errors
///
/// Returns an error if unauthorized, the target does not exist, or the
/// new password violates the policy.
pub fn reset_password(
    persistence: &mut Persistence,
    request: ResetPasswordRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_operators(authenticated_actor)?;

    let target: OperatorData = load_operator(persistence, request.operator_id)?;
    PasswordPolicy::default().validate(
        &request.new_password,
        &request.new_password_confirmation,
        &target.login_name,
        &target.display_name,
    )?;

    persistence
        .update_password(request.operator_id, &request.new_password)
        .map_err(translate_persistence_error)
}
