// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::consulates::ConsulateDirectory;
use crate::error::DomainError;
use crate::types::{CgiData, ContactSnapshot, MAX_SECURITY_QUESTIONS, SlotBookingFields};

/// Validates a contact snapshot captured at case creation.
///
/// The name is required; phone and country may legitimately be empty on
/// the source contact record.
///
/// # Arguments
///
/// * `snapshot` - The snapshot to validate
///
/// # Errors
///
/// Returns an error if the name is empty.
pub fn validate_contact_snapshot(snapshot: &ContactSnapshot) -> Result<(), DomainError> {
    if snapshot.name.trim().is_empty() {
        return Err(DomainError::InvalidContactField { field: "name" });
    }
    Ok(())
}

/// Validates a full CGI credential record before it overwrites the
/// sub-record.
///
/// # Arguments
///
/// * `cgi` - The credential record to validate
///
/// # Errors
///
/// Returns an error if:
/// - The username or password is empty
/// - More than three security pairs are supplied
/// - Any supplied pair has an empty question
pub fn validate_cgi_data(cgi: &CgiData) -> Result<(), DomainError> {
    if cgi.username.trim().is_empty() {
        return Err(DomainError::MissingCgiCredential { field: "username" });
    }
    if cgi.password.is_empty() {
        return Err(DomainError::MissingCgiCredential { field: "password" });
    }
    if cgi.security_questions.len() > MAX_SECURITY_QUESTIONS {
        return Err(DomainError::TooManySecurityQuestions {
            count: cgi.security_questions.len(),
        });
    }
    for (index, pair) in cgi.security_questions.iter().enumerate() {
        if pair.question.trim().is_empty() {
            return Err(DomainError::EmptySecurityQuestion { slot: index + 1 });
        }
    }
    Ok(())
}

/// Validates the staff-editable slot booking fields.
///
/// Consulate names, when present, must come from the configured
/// directory. Dates and times carry no cross-field ordering constraint.
///
/// # Arguments
///
/// * `fields` - The booking fields to validate
/// * `consulates` - The configured consulate directory
///
/// # Errors
///
/// Returns an error if a consulate name is not configured.
pub fn validate_slot_fields(
    fields: &SlotBookingFields,
    consulates: &ConsulateDirectory,
) -> Result<(), DomainError> {
    for name in [&fields.vac_consulate, &fields.vi_consulate]
        .into_iter()
        .flatten()
    {
        if !consulates.contains(name) {
            return Err(DomainError::UnknownConsulate { name: name.clone() });
        }
    }
    Ok(())
}

/// Validates an applicant preference submission.
///
/// Both location sets must be non-empty and every name must be a
/// configured consulate.
///
/// # Arguments
///
/// * `vac_preferred` - Preferred VAC locations
/// * `vi_preferred` - Preferred VI locations
/// * `consulates` - The configured consulate directory
///
/// # Errors
///
/// Returns an error if either set is empty or contains an unknown
/// consulate.
pub fn validate_preference_submission(
    vac_preferred: &[String],
    vi_preferred: &[String],
    consulates: &ConsulateDirectory,
) -> Result<(), DomainError> {
    if vac_preferred.is_empty() {
        return Err(DomainError::EmptyPreferenceSelection { kind: "VAC" });
    }
    if vi_preferred.is_empty() {
        return Err(DomainError::EmptyPreferenceSelection { kind: "VI" });
    }
    for name in vac_preferred.iter().chain(vi_preferred.iter()) {
        if !consulates.contains(name) {
            return Err(DomainError::UnknownConsulate { name: name.clone() });
        }
    }
    Ok(())
}

/// Validates a rejection reason.
///
/// # Arguments
///
/// * `reason` - The stated reason
///
/// # Errors
///
/// Returns `DomainError::EmptyRejectionReason` if the reason is empty
/// or whitespace.
pub fn validate_rejection_reason(reason: &str) -> Result<(), DomainError> {
    if reason.trim().is_empty() {
        return Err(DomainError::EmptyRejectionReason);
    }
    Ok(())
}
