// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use lyceum_visa::CoreError;
use lyceum_visa_domain::DomainError;
use lyceum_visa_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API
/// contract. Messages never contain credential values or security
/// answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the operator does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A precondition for the transition is not satisfied (the
    /// approval gate).
    PreconditionFailed {
        /// A human-readable description of the unsatisfied
        /// precondition.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A storage-layer failure, treated as transient; the caller may
    /// retry the whole operation.
    Storage {
        /// A description of the storage failure.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::PreconditionFailed { message } => {
                write!(f, "Precondition failed: {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Storage { message } => write!(f, "Storage error: {message}"),
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// The translation is explicit so domain errors are never leaked
/// directly and the caller-facing taxonomy stays stable.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidContactField { field } => ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("Contact field '{field}' cannot be empty"),
        },
        DomainError::MissingCgiCredential { field } => ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("CGI credential field '{field}' cannot be empty"),
        },
        DomainError::TooManySecurityQuestions { count } => ApiError::InvalidInput {
            field: String::from("security_questions"),
            message: format!("At most 3 security question slots are supported, got {count}"),
        },
        DomainError::EmptySecurityQuestion { slot } => ApiError::InvalidInput {
            field: String::from("security_questions"),
            message: format!("Security question slot {slot} has an empty question"),
        },
        DomainError::UnknownConsulate { name } => ApiError::InvalidInput {
            field: String::from("consulate"),
            message: format!("Consulate '{name}' is not a configured consulate"),
        },
        DomainError::EmptyRejectionReason => ApiError::InvalidInput {
            field: String::from("reason"),
            message: String::from("A rejection requires a non-empty reason"),
        },
        DomainError::EmptyAdminName => ApiError::InvalidInput {
            field: String::from("admin_name"),
            message: String::from("An administrator acceptance requires the acting admin's name"),
        },
        DomainError::InvalidApprovalStatus(value) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Invalid approval status: {value}"),
        },
        DomainError::InvalidVisaOutcome(value) => ApiError::InvalidInput {
            field: String::from("visa_outcome"),
            message: format!("Invalid visa outcome: {value}"),
        },
        DomainError::ApprovalAlreadyGranted { axis } => ApiError::DomainRuleViolation {
            rule: String::from("approval_final"),
            message: format!("The {axis} decision is already accepted"),
        },
        DomainError::ApprovalGateNotSatisfied {
            student_status,
            admin_status,
        } => ApiError::PreconditionFailed {
            message: format!(
                "Approval gate not satisfied: student={student_status}, admin={admin_status}"
            ),
        },
        DomainError::DocumentNotReferenced { document_id } => ApiError::ResourceNotFound {
            resource_type: String::from("Document"),
            message: format!("Document {document_id} is not referenced by this case"),
        },
        DomainError::PreferencesAlreadyLocked => ApiError::DomainRuleViolation {
            rule: String::from("preferences_locked"),
            message: String::from("Location preferences are locked and cannot be resubmitted"),
        },
        DomainError::EmptyPreferenceSelection { kind } => ApiError::InvalidInput {
            field: String::from("preferences"),
            message: format!("At least one {kind} location preference is required"),
        },
        DomainError::DateArithmeticOverflow { operation } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Date arithmetic overflow while {operation}"),
        },
    }
}

/// Translates a core error into an API error.
///
/// # Arguments
///
/// * `err` - The core error to translate
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(msg) => ApiError::Internal {
            message: format!("Internal error: {msg}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Storage-layer failures (including optimistic-concurrency conflicts)
/// translate to the transient `Storage` variant so callers know a
/// retry is appropriate; missing resources keep their not-found
/// identity.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::CaseNotFound(op_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Case"),
            message: format!("Case {op_id} does not exist"),
        },
        PersistenceError::ContactNotFound(contact_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Contact"),
            message: format!("Contact {contact_id} does not exist"),
        },
        PersistenceError::DocumentNotFound(document_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Document"),
            message: format!("Document {document_id} does not exist"),
        },
        PersistenceError::EventNotFound(event_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Audit event"),
            message: format!("Audit event {event_id} does not exist"),
        },
        PersistenceError::OperatorNotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Operator"),
            message: msg,
        },
        PersistenceError::OperatorReferenced { operator_id } => ApiError::DomainRuleViolation {
            rule: String::from("operator_referenced"),
            message: format!(
                "Operator {operator_id} cannot be deleted: referenced by audit events"
            ),
        },
        PersistenceError::ConcurrentModification { op_id, .. } => ApiError::Storage {
            message: format!("Case {op_id} was modified concurrently; retry the operation"),
        },
        other => ApiError::Storage {
            message: other.to_string(),
        },
    }
}
