// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use lyceum_visa_api::{
    AdminAcceptRequest, ApiError, AttachDocumentResponse, AttachmentKind, AuditTimelineResponse,
    AuthenticationService, CaseCapabilities, CaseDetailResponse, CaseFilter, CaseUpdateResponse,
    ChangePasswordRequest, ContactInfo, CreateCaseRequest, CreateContactRequest,
    CreateOperatorRequest, ListCasesResponse, ListContactsResponse, ListOperatorsResponse,
    LoginRequest, LoginResponse, OperatorInfo, RejectRequest, ResetPasswordRequest,
    SetCgiDataRequest, SetDsDetailsRequest, SetDsStartDateRequest, SetInterviewOutcomeRequest,
    SetSlotBookingRequest, SubmitPreferencesRequest, WhoAmIResponse, compute_case_capabilities,
    compute_global_capabilities,
};
use lyceum_visa_audit::Cause;
use lyceum_visa_domain::ConsulateDirectory;
use lyceum_visa_persistence::Persistence;

mod session;
use session::SessionOperator;

/// Lyceum Visa Server - HTTP server for the visa operations workflow.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses an
    /// in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Login name for a bootstrap Admin, created only when no
    /// operators exist yet.
    #[arg(long)]
    admin_login: Option<String>,

    /// Display name for the bootstrap Admin.
    #[arg(long)]
    admin_display_name: Option<String>,

    /// Password for the bootstrap Admin.
    #[arg(long)]
    admin_password: Option<String>,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer, serialized behind a lock.
    persistence: Arc<Mutex<Persistence>>,
    /// The configured consulate directory.
    consulates: Arc<ConsulateDirectory>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::PreconditionFailed { .. } => StatusCode::PRECONDITION_FAILED,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DomainRuleViolation { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Storage { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %err, "Internal error");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Builds a request-scoped cause for audit attribution.
fn request_cause(action: &str) -> Cause {
    Cause::new(
        format!("req_{:016x}", rand::random::<u64>()),
        format!("HTTP {action}"),
    )
}

// ============================================================================
// Authentication endpoints
// ============================================================================

async fn handle_login(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let (session_token, actor, operator) =
        AuthenticationService::login(&mut persistence, &request.login_name, &request.password)
            .map_err(ApiError::from)?;
    drop(persistence);

    info!(login_name = %operator.login_name, "Operator logged in");
    Ok(Json(LoginResponse {
        session_token,
        login_name: operator.login_name,
        display_name: operator.display_name,
        role: actor.role.as_str().to_string(),
    }))
}

async fn handle_logout(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let token: &str = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: String::from("Missing Authorization header"),
        })?;

    let mut persistence = state.persistence.lock().await;
    AuthenticationService::logout(&mut persistence, token).map_err(ApiError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn handle_whoami(
    AxumState(_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
) -> Json<WhoAmIResponse> {
    let capabilities = compute_global_capabilities(&actor, &operator);
    Json(WhoAmIResponse {
        login_name: operator.login_name,
        display_name: operator.display_name,
        role: actor.role.as_str().to_string(),
        capabilities,
    })
}

// ============================================================================
// Contact endpoints
// ============================================================================

async fn handle_create_contact(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(request): Json<CreateContactRequest>,
) -> Result<Json<ContactInfo>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let contact = lyceum_visa_api::create_contact(&mut persistence, request, &actor)?;
    Ok(Json(contact))
}

async fn handle_list_contacts(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
) -> Result<Json<ListContactsResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let contacts = lyceum_visa_api::list_contacts(&mut persistence, &actor)?;
    Ok(Json(contacts))
}

// ============================================================================
// Case registry endpoints
// ============================================================================

async fn handle_create_case(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(request): Json<CreateCaseRequest>,
) -> Result<Json<CaseDetailResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let case = lyceum_visa_api::create_case(
        &mut persistence,
        request,
        &actor,
        &operator,
        request_cause("create_case"),
    )?;
    Ok(Json(case))
}

/// Query parameters for listing cases.
#[derive(Debug, Deserialize)]
struct ListCasesQuery {
    /// Free-text filter.
    text: Option<String>,
    /// Inclusive start of the creation-day range.
    date_from: Option<String>,
    /// Inclusive end of the creation-day range.
    date_to: Option<String>,
}

async fn handle_list_cases(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Query(query): Query<ListCasesQuery>,
) -> Result<Json<ListCasesResponse>, HttpError> {
    let filter: CaseFilter = CaseFilter {
        text: query.text,
        date_from: query.date_from,
        date_to: query.date_to,
    };

    let mut persistence = state.persistence.lock().await;
    let cases = lyceum_visa_api::list_cases(&mut persistence, &filter, &actor)?;
    Ok(Json(cases))
}

async fn handle_get_case(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Path(op_id): Path<i64>,
) -> Result<Json<CaseDetailResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let case = lyceum_visa_api::get_case_detail(&mut persistence, op_id, &actor)?;
    Ok(Json(case))
}

/// Query parameters for a contact's case history.
#[derive(Debug, Deserialize)]
struct HistoryQuery {
    /// Case id to exclude from the history.
    exclude: Option<i64>,
}

async fn handle_cases_for_contact(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Path(contact_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ListCasesResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let cases =
        lyceum_visa_api::cases_for_contact(&mut persistence, contact_id, query.exclude, &actor)?;
    Ok(Json(cases))
}

async fn handle_case_capabilities(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Path(op_id): Path<i64>,
) -> Result<Json<CaseCapabilities>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let stored = persistence
        .get_case(op_id)
        .map_err(lyceum_visa_api::translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Case"),
            message: format!("Case {op_id} does not exist"),
        })?;
    drop(persistence);

    Ok(Json(compute_case_capabilities(&actor, &stored.case)))
}

// ============================================================================
// Sub-record endpoints
// ============================================================================

async fn handle_set_cgi(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Path(op_id): Path<i64>,
    Json(request): Json<SetCgiDataRequest>,
) -> Result<Json<CaseUpdateResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let updated = lyceum_visa_api::set_cgi_data(
        &mut persistence,
        op_id,
        request,
        &state.consulates,
        &actor,
        &operator,
        request_cause("set_cgi_data"),
    )?;
    Ok(Json(updated))
}

async fn handle_set_slot_booking(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Path(op_id): Path<i64>,
    Json(request): Json<SetSlotBookingRequest>,
) -> Result<Json<CaseUpdateResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let updated = lyceum_visa_api::set_slot_booking(
        &mut persistence,
        op_id,
        request,
        &state.consulates,
        &actor,
        &operator,
        request_cause("set_slot_booking"),
    )?;
    Ok(Json(updated))
}

async fn handle_submit_preferences(
    AxumState(state): AxumState<AppState>,
    Path(op_id): Path<i64>,
    Json(request): Json<SubmitPreferencesRequest>,
) -> Result<Json<CaseUpdateResponse>, HttpError> {
    // Portal channel: the portal gateway authenticates the applicant
    // and forwards the contact id.
    let mut persistence = state.persistence.lock().await;
    let updated = lyceum_visa_api::submit_slot_preferences(
        &mut persistence,
        op_id,
        request,
        &state.consulates,
        request_cause("submit_slot_preferences"),
    )?;
    Ok(Json(updated))
}

async fn handle_set_interview_outcome(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Path(op_id): Path<i64>,
    Json(request): Json<SetInterviewOutcomeRequest>,
) -> Result<Json<CaseUpdateResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let updated = lyceum_visa_api::set_interview_outcome(
        &mut persistence,
        op_id,
        request,
        &state.consulates,
        &actor,
        &operator,
        request_cause("set_interview_outcome"),
    )?;
    Ok(Json(updated))
}

async fn handle_set_ds_details(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Path(op_id): Path<i64>,
    Json(request): Json<SetDsDetailsRequest>,
) -> Result<Json<CaseUpdateResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let updated = lyceum_visa_api::set_ds_details(
        &mut persistence,
        op_id,
        request,
        &state.consulates,
        &actor,
        &operator,
        request_cause("set_ds_details"),
    )?;
    Ok(Json(updated))
}

async fn handle_set_ds_start_date(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Path(op_id): Path<i64>,
    Json(request): Json<SetDsStartDateRequest>,
) -> Result<Json<CaseUpdateResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let updated = lyceum_visa_api::set_ds_start_date(
        &mut persistence,
        op_id,
        request,
        &state.consulates,
        &actor,
        &operator,
        request_cause("set_ds_start_date"),
    )?;
    Ok(Json(updated))
}

// ============================================================================
// Approval gate endpoints
// ============================================================================

/// Portal request body carrying the authenticated contact.
#[derive(Debug, Deserialize)]
struct StudentDecisionRequest {
    /// The contact the portal authenticated.
    contact_id: i64,
    /// Rejection reason (reject only).
    reason: Option<String>,
}

async fn handle_student_accept(
    AxumState(state): AxumState<AppState>,
    Path(op_id): Path<i64>,
    Json(request): Json<StudentDecisionRequest>,
) -> Result<Json<CaseUpdateResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let updated = lyceum_visa_api::student_accept(
        &mut persistence,
        op_id,
        request.contact_id,
        &state.consulates,
        request_cause("student_accept"),
    )?;
    Ok(Json(updated))
}

async fn handle_student_reject(
    AxumState(state): AxumState<AppState>,
    Path(op_id): Path<i64>,
    Json(request): Json<StudentDecisionRequest>,
) -> Result<Json<CaseUpdateResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let updated = lyceum_visa_api::student_reject(
        &mut persistence,
        op_id,
        request.contact_id,
        RejectRequest {
            reason: request.reason.unwrap_or_default(),
        },
        &state.consulates,
        request_cause("student_reject"),
    )?;
    Ok(Json(updated))
}

async fn handle_accept_on_behalf(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Path(op_id): Path<i64>,
) -> Result<Json<CaseUpdateResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let updated = lyceum_visa_api::staff_accept_on_behalf(
        &mut persistence,
        op_id,
        &state.consulates,
        &actor,
        &operator,
        request_cause("staff_accept_on_behalf"),
    )?;
    Ok(Json(updated))
}

async fn handle_admin_accept(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Path(op_id): Path<i64>,
    Json(request): Json<AdminAcceptRequest>,
) -> Result<Json<CaseUpdateResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let updated = lyceum_visa_api::admin_accept(
        &mut persistence,
        op_id,
        request,
        &state.consulates,
        &actor,
        &operator,
        request_cause("admin_accept"),
    )?;
    Ok(Json(updated))
}

async fn handle_admin_reject(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Path(op_id): Path<i64>,
    Json(request): Json<RejectRequest>,
) -> Result<Json<CaseUpdateResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let updated = lyceum_visa_api::admin_reject(
        &mut persistence,
        op_id,
        request,
        &state.consulates,
        &actor,
        &operator,
        request_cause("admin_reject"),
    )?;
    Ok(Json(updated))
}

// ============================================================================
// Document endpoints
// ============================================================================

/// Query parameters for a document upload.
#[derive(Debug, Deserialize)]
struct UploadQuery {
    /// Which DS-160 slot to attach to (`filling`, `internal`, or
    /// `confirmation`).
    kind: String,
    /// The original file name.
    file_name: String,
    /// The MIME content type.
    content_type: Option<String>,
}

fn parse_attachment_kind(kind: &str) -> Result<AttachmentKind, HttpError> {
    match kind {
        "filling" => Ok(AttachmentKind::Filling),
        "internal" => Ok(AttachmentKind::Internal),
        "confirmation" => Ok(AttachmentKind::Confirmation),
        _ => Err(HttpError {
            status: StatusCode::BAD_REQUEST,
            message: format!("Unknown attachment kind '{kind}'"),
        }),
    }
}

async fn handle_attach_document(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Path(op_id): Path<i64>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Json<AttachDocumentResponse>, HttpError> {
    let kind: AttachmentKind = parse_attachment_kind(&query.kind)?;

    let mut persistence = state.persistence.lock().await;
    let attached = lyceum_visa_api::attach_document(
        &mut persistence,
        op_id,
        kind,
        &query.file_name,
        query
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream"),
        body.to_vec(),
        &state.consulates,
        &actor,
        &operator,
        request_cause("attach_document"),
    )?;
    Ok(Json(attached))
}

async fn handle_delete_document(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Path((op_id, document_id)): Path<(i64, i64)>,
) -> Result<Json<CaseUpdateResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let updated = lyceum_visa_api::delete_document(
        &mut persistence,
        op_id,
        document_id,
        &state.consulates,
        &actor,
        &operator,
        request_cause("delete_document"),
    )?;
    Ok(Json(updated))
}

async fn document_response(
    state: &AppState,
    actor: &lyceum_visa_api::AuthenticatedActor,
    document_id: i64,
    disposition: &str,
) -> Result<Response, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let (metadata, bytes) = lyceum_visa_api::fetch_document(&mut persistence, document_id, actor)?;
    drop(persistence);

    let response: Response = (
        [
            (header::CONTENT_TYPE, metadata.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("{disposition}; filename=\"{}\"", metadata.file_name),
            ),
        ],
        bytes,
    )
        .into_response();
    Ok(response)
}

async fn handle_download_document(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Path(document_id): Path<i64>,
) -> Result<Response, HttpError> {
    document_response(&state, &actor, document_id, "attachment").await
}

async fn handle_preview_document(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Path(document_id): Path<i64>,
) -> Result<Response, HttpError> {
    document_response(&state, &actor, document_id, "inline").await
}

// ============================================================================
// Audit endpoints
// ============================================================================

async fn handle_audit_timeline(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Path(op_id): Path<i64>,
) -> Result<Json<AuditTimelineResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let timeline = lyceum_visa_api::get_audit_timeline(&mut persistence, op_id, &actor)?;
    Ok(Json(timeline))
}

// ============================================================================
// Operator endpoints
// ============================================================================

async fn handle_create_operator(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(request): Json<CreateOperatorRequest>,
) -> Result<Json<OperatorInfo>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let created = lyceum_visa_api::create_operator(&mut persistence, request, &actor)?;
    Ok(Json(created))
}

async fn handle_list_operators(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
) -> Result<Json<ListOperatorsResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let operators = lyceum_visa_api::list_operators(&mut persistence, &actor)?;
    Ok(Json(operators))
}

async fn handle_disable_operator(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Path(operator_id): Path<i64>,
) -> Result<Json<OperatorInfo>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let info = lyceum_visa_api::disable_operator(&mut persistence, operator_id, &actor)?;
    Ok(Json(info))
}

async fn handle_enable_operator(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Path(operator_id): Path<i64>,
) -> Result<Json<OperatorInfo>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let info = lyceum_visa_api::enable_operator(&mut persistence, operator_id, &actor)?;
    Ok(Json(info))
}

async fn handle_delete_operator(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Path(operator_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = state.persistence.lock().await;
    lyceum_visa_api::delete_operator(&mut persistence, operator_id, &actor)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn handle_change_password(
    AxumState(state): AxumState<AppState>,
    SessionOperator(_actor, operator): SessionOperator,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = state.persistence.lock().await;
    lyceum_visa_api::change_password(&mut persistence, request, &operator)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn handle_reset_password(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = state.persistence.lock().await;
    lyceum_visa_api::reset_password(&mut persistence, request, &actor)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/whoami", get(handle_whoami))
        .route("/contacts", post(handle_create_contact))
        .route("/contacts", get(handle_list_contacts))
        .route("/contacts/{contact_id}/cases", get(handle_cases_for_contact))
        .route("/cases", post(handle_create_case))
        .route("/cases", get(handle_list_cases))
        .route("/cases/{op_id}", get(handle_get_case))
        .route("/cases/{op_id}/capabilities", get(handle_case_capabilities))
        .route("/cases/{op_id}/cgi", put(handle_set_cgi))
        .route("/cases/{op_id}/slot_booking", put(handle_set_slot_booking))
        .route(
            "/cases/{op_id}/slot_preferences",
            post(handle_submit_preferences),
        )
        .route(
            "/cases/{op_id}/interview_outcome",
            put(handle_set_interview_outcome),
        )
        .route("/cases/{op_id}/ds/details", put(handle_set_ds_details))
        .route("/cases/{op_id}/ds/start_date", put(handle_set_ds_start_date))
        .route("/cases/{op_id}/ds/student_accept", post(handle_student_accept))
        .route("/cases/{op_id}/ds/student_reject", post(handle_student_reject))
        .route(
            "/cases/{op_id}/ds/accept_on_behalf",
            post(handle_accept_on_behalf),
        )
        .route("/cases/{op_id}/ds/admin_accept", post(handle_admin_accept))
        .route("/cases/{op_id}/ds/admin_reject", post(handle_admin_reject))
        .route("/cases/{op_id}/documents", post(handle_attach_document))
        .route(
            "/cases/{op_id}/documents/{document_id}",
            delete(handle_delete_document),
        )
        .route("/documents/{document_id}", get(handle_download_document))
        .route(
            "/documents/{document_id}/preview",
            get(handle_preview_document),
        )
        .route("/cases/{op_id}/audit", get(handle_audit_timeline))
        .route("/operators", post(handle_create_operator))
        .route("/operators", get(handle_list_operators))
        .route(
            "/operators/{operator_id}/disable",
            post(handle_disable_operator),
        )
        .route(
            "/operators/{operator_id}/enable",
            post(handle_enable_operator),
        )
        .route("/operators/{operator_id}", delete(handle_delete_operator))
        .route("/password/change", post(handle_change_password))
        .route("/password/reset", post(handle_reset_password))
        .with_state(app_state)
}

/// Creates the bootstrap Admin when the operator table is empty.
async fn bootstrap_admin(state: &AppState, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(login), Some(display), Some(password)) = (
        args.admin_login.as_deref(),
        args.admin_display_name.as_deref(),
        args.admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    let mut persistence = state.persistence.lock().await;
    if persistence.list_operators()?.is_empty() {
        persistence.create_operator(login, display, password, "Admin")?;
        info!(login_name = login, "Created bootstrap Admin");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Lyceum Visa Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        consulates: Arc::new(ConsulateDirectory::default()),
    };

    bootstrap_admin(&app_state, &args).await?;

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
