// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Lyceum Visa Operations system.
//!
//! This crate owns the service contract: request/response DTOs, the
//! error taxonomy exposed to callers, session authentication,
//! role-based authorization for every transition, and the handler
//! functions that orchestrate core transitions against persistence.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod capabilities;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthenticatedActor, AuthenticationService, AuthorizationService, Role, portal_actor,
};
pub use capabilities::{compute_case_capabilities, compute_global_capabilities};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    AttachmentKind, CaseFilter, admin_accept, admin_reject, attach_document, case_to_detail,
    cases_for_contact, change_password, create_case, create_contact, create_operator,
    delete_document, delete_operator, disable_operator, enable_operator, fetch_document,
    get_audit_timeline, get_case_detail, list_cases, list_contacts, list_operators,
    reset_password, set_cgi_data, set_ds_details, set_ds_start_date, set_interview_outcome,
    set_slot_booking, staff_accept_on_behalf, student_accept, student_reject,
    submit_slot_preferences,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AdminAcceptRequest, AttachDocumentResponse, AuditEventInfo, AuditTimelineResponse,
    Capability, CaseCapabilities, CaseDetailResponse, CaseSummary, CaseUpdateResponse,
    CgiDataInfo, ChangePasswordRequest, ContactInfo, CreateCaseRequest, CreateContactRequest,
    CreateOperatorRequest, DocumentRefInfo, DsDataInfo, GlobalCapabilities, InterviewInfo,
    ListCasesResponse, ListContactsResponse, ListOperatorsResponse, LoginRequest, LoginResponse,
    OperatorInfo, RejectRequest, ResetPasswordRequest, SecurityQaInfo, SetCgiDataRequest,
    SetDsDetailsRequest, SetDsStartDateRequest, SetInterviewOutcomeRequest,
    SetSlotBookingRequest, SlotBookingInfo, SubmitPreferencesRequest, WhoAmIResponse,
};
