// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Timestamp column helpers.
//!
//! All timestamps are stored as ISO 8601 text; lexical order equals
//! chronological order, which the case list ordering relies on.

use crate::error::PersistenceError;
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if formatting fails.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .format(&Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::TimestampError(e.to_string()))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the stored text is not valid ISO 8601.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::TimestampError(format!("'{value}': {e}")))
}

/// Returns the current UTC time formatted for storage.
///
/// # Errors
///
/// Returns an error if formatting fails.
pub fn now_timestamp() -> Result<String, PersistenceError> {
    format_timestamp(OffsetDateTime::now_utc())
}
