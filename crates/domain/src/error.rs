// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::ApprovalStatus;

/// Errors that can occur during domain validation.
///
/// Display implementations never include credential or security-answer
/// values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required contact snapshot field is empty.
    InvalidContactField {
        /// The field name.
        field: &'static str,
    },
    /// CGI username or password is missing.
    MissingCgiCredential {
        /// The field name (`username` or `password`).
        field: &'static str,
    },
    /// More security question slots were supplied than exist.
    TooManySecurityQuestions {
        /// The number of pairs supplied.
        count: usize,
    },
    /// A supplied security question slot has an empty question.
    EmptySecurityQuestion {
        /// The 1-based slot index.
        slot: usize,
    },
    /// A consulate name is not in the configured directory.
    UnknownConsulate {
        /// The unrecognized consulate name.
        name: String,
    },
    /// A rejection was recorded without a reason.
    EmptyRejectionReason,
    /// An administrator acceptance was recorded without an acting name.
    EmptyAdminName,
    /// An approval status string could not be parsed.
    InvalidApprovalStatus(String),
    /// A visa outcome string could not be parsed.
    InvalidVisaOutcome(String),
    /// The axis is already accepted; the decision is final.
    ApprovalAlreadyGranted {
        /// The axis (`student` or `admin`).
        axis: &'static str,
    },
    /// A confirmation document was attached before both parties
    /// accepted.
    ApprovalGateNotSatisfied {
        /// The applicant's current status.
        student_status: ApprovalStatus,
        /// The administrator's current status.
        admin_status: ApprovalStatus,
    },
    /// The document id is not referenced by this case.
    DocumentNotReferenced {
        /// The unknown document id.
        document_id: i64,
    },
    /// The applicant preference sets are locked and cannot be
    /// resubmitted.
    PreferencesAlreadyLocked,
    /// A preference submission left one of the location sets empty.
    EmptyPreferenceSelection {
        /// The appointment kind (`VAC` or `VI`).
        kind: &'static str,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidContactField { field } => {
                write!(f, "Contact field '{field}' cannot be empty")
            }
            Self::MissingCgiCredential { field } => {
                write!(f, "CGI credential field '{field}' cannot be empty")
            }
            Self::TooManySecurityQuestions { count } => {
                write!(
                    f,
                    "At most 3 security question slots are supported, got {count}"
                )
            }
            Self::EmptySecurityQuestion { slot } => {
                write!(f, "Security question slot {slot} has an empty question")
            }
            Self::UnknownConsulate { name } => {
                write!(f, "Consulate '{name}' is not a configured consulate")
            }
            Self::EmptyRejectionReason => {
                write!(f, "A rejection requires a non-empty reason")
            }
            Self::EmptyAdminName => {
                write!(f, "An administrator acceptance requires the acting admin's name")
            }
            Self::InvalidApprovalStatus(value) => {
                write!(f, "Invalid approval status: {value}")
            }
            Self::InvalidVisaOutcome(value) => {
                write!(f, "Invalid visa outcome: {value}")
            }
            Self::ApprovalAlreadyGranted { axis } => {
                write!(f, "The {axis} decision is already accepted")
            }
            Self::ApprovalGateNotSatisfied {
                student_status,
                admin_status,
            } => {
                write!(
                    f,
                    "Approval gate not satisfied: student={student_status}, admin={admin_status}"
                )
            }
            Self::DocumentNotReferenced { document_id } => {
                write!(f, "Document {document_id} is not referenced by this case")
            }
            Self::PreferencesAlreadyLocked => {
                write!(f, "Location preferences are locked and cannot be resubmitted")
            }
            Self::EmptyPreferenceSelection { kind } => {
                write!(f, "At least one {kind} location preference is required")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
