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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod consulates;
mod ds_schedule;
mod error;
mod status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use consulates::ConsulateDirectory;
pub use ds_schedule::{DS_FORM_VALIDITY_DAYS, compute_expiry_date};
pub use error::DomainError;
pub use status::{derive_badge_for_case, derive_case_badge};
pub use types::{
    ApprovalStatus, CaseBadge, CgiData, ContactSnapshot, DocumentRef, DsData, DsDetails,
    MAX_SECURITY_QUESTIONS, SecurityQa, SlotBookingData, SlotBookingFields, VisaInterviewData,
    VisaOperation, VisaOutcome, VopNumber,
};
pub use validation::{
    validate_cgi_data, validate_contact_snapshot, validate_preference_submission,
    validate_rejection_reason, validate_slot_fields,
};
