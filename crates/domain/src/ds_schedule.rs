// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! DS-160 form session schedule derivation.
//!
//! A DS-160 session expires a fixed number of days after it is started.
//! The expiry date is derived state: it is recomputed whenever the start
//! date changes and is never independently writable.

use crate::error::DomainError;
use time::{Date, Duration};

/// Number of days a DS-160 form session remains valid after its start
/// date.
pub const DS_FORM_VALIDITY_DAYS: i64 = 20;

/// Computes the expiry date for a DS-160 session started on `start_date`.
///
/// # Arguments
///
/// * `start_date` - The date the form session was started
///
/// # Returns
///
/// * `Ok(Date)` - `start_date + 20 days`
/// * `Err(DomainError)` if the addition overflows the representable
///   date range
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` if `start_date` is too
/// close to the end of the representable range.
pub fn compute_expiry_date(start_date: Date) -> Result<Date, DomainError> {
    start_date
        .checked_add(Duration::days(DS_FORM_VALIDITY_DAYS))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("computing DS-160 expiry from start date {start_date}"),
        })
}
