// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use lyceum_visa_domain::{
    CgiData, DocumentRef, DsDetails, SlotBookingFields, VisaOutcome,
};
use time::Date;

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request case state changes. Role
/// enforcement happens at the API boundary before a command is built;
/// the transition rules themselves (gates, locks, derivations) are
/// enforced here regardless of caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Overwrite the CGI credential sub-record.
    SetCgiData {
        /// The complete credential record.
        cgi: CgiData,
        /// Whether the credentials are visible on the applicant portal.
        show_on_portal: bool,
    },
    /// Overwrite the staff-editable slot booking fields.
    ///
    /// The applicant preference triple is preserved verbatim.
    SetSlotBooking {
        /// The complete staff booking record.
        fields: SlotBookingFields,
    },
    /// Applicant-portal submission of preferred appointment locations.
    SubmitSlotPreferences {
        /// Preferred VAC locations.
        vac_preferred: Vec<String>,
        /// Preferred VI locations.
        vi_preferred: Vec<String>,
        /// Whether this submission locks the preference sets.
        lock: bool,
    },
    /// Record the visa interview outcome.
    SetInterviewOutcome {
        /// The outcome, or `None` while still pending.
        outcome: Option<VisaOutcome>,
        /// Free-text remarks.
        remarks: String,
    },
    /// Overwrite the DS-160 form metadata.
    SetDsDetails {
        /// The complete form-metadata record.
        details: DsDetails,
    },
    /// Set the DS-160 session start date; the expiry date is recomputed
    /// atomically.
    SetDsStartDate {
        /// The date the form session was started.
        start_date: Date,
    },
    /// The applicant accepts the filling documents.
    StudentAccept,
    /// The applicant rejects the filling documents.
    StudentReject {
        /// The stated reason. Must be non-empty.
        reason: String,
    },
    /// A staff operator accepts on the applicant's behalf.
    ///
    /// Stored effect is identical to `StudentAccept`; the audit event
    /// records the override path.
    StaffAcceptOnBehalfOfStudent,
    /// The administrator accepts the filling documents.
    AdminAccept {
        /// Name of the accepting administrator, snapshotted on the case.
        admin_name: String,
    },
    /// The administrator rejects the filling documents.
    AdminReject {
        /// The stated reason. Must be non-empty.
        reason: String,
    },
    /// Append a document to the applicant-visible filling set.
    AttachFillingDocument {
        /// Reference to the stored document.
        document: DocumentRef,
    },
    /// Set the single internal-only document, replacing any prior one.
    AttachInternalDocument {
        /// Reference to the stored document.
        document: DocumentRef,
    },
    /// Attach the final proof-of-submission document.
    ///
    /// Legal only when both approval axes are `accepted`.
    AttachConfirmationDocument {
        /// Reference to the stored document.
        document: DocumentRef,
    },
    /// Remove a document reference from whichever field holds it.
    DeleteDocument {
        /// The document store identifier.
        document_id: i64,
    },
}
