// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case persistence mutations.
//!
//! Case transitions are persisted with a guarded update on the row
//! version. A zero-row update means another writer committed first; the
//! transition is rejected rather than silently overwritten, which is
//! what keeps a racing `AdminReject` from being lost to an
//! `AdminAccept`.

use diesel::SqliteConnection;
use diesel::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::backend::get_last_insert_rowid;
use crate::diesel_schema::visa_operations;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::timestamps::format_timestamp;
use lyceum_visa::{CreationResult, TransitionResult};
use lyceum_visa_domain::VisaOperation;

/// The result of persisting a new case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistCreationResult {
    /// The canonical case id.
    pub op_id: i64,
    /// The persisted creation audit event id.
    pub event_id: i64,
}

/// The result of persisting a case transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistTransitionResult {
    /// The persisted audit event id.
    pub event_id: i64,
    /// The row version after the update.
    pub new_version: i64,
}

#[derive(Insertable)]
#[diesel(table_name = visa_operations)]
struct NewCaseRow {
    vop_number: String,
    contact_id: i64,
    name: String,
    phone: String,
    country: String,
    created_at: String,
    show_cgi_on_portal: i32,
    version: i64,
    cgi_json: Option<String>,
    slot_booking_json: Option<String>,
    ds_json: Option<String>,
    interview_json: Option<String>,
}

fn sub_record_json<T: Serialize>(value: Option<&T>) -> Result<Option<String>, PersistenceError> {
    value
        .map(serde_json::to_string)
        .transpose()
        .map_err(Into::into)
}

/// Persists a freshly created case and its creation audit event in one
/// transaction.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `result` - The creation result from the core engine
///
/// # Errors
///
/// Returns an error if serialization or any insert fails.
pub fn persist_new_case(
    conn: &mut SqliteConnection,
    result: &CreationResult,
) -> Result<PersistCreationResult, PersistenceError> {
    conn.transaction::<PersistCreationResult, PersistenceError, _>(|conn| {
        let case: &VisaOperation = &result.case;
        let row: NewCaseRow = NewCaseRow {
            vop_number: case.vop_number.value().to_string(),
            contact_id: case.contact_id,
            name: case.name.clone(),
            phone: case.phone.clone(),
            country: case.country.clone(),
            created_at: format_timestamp(case.created_at)?,
            show_cgi_on_portal: i32::from(case.show_cgi_on_portal),
            version: 1,
            cgi_json: sub_record_json(case.cgi_data.as_ref())?,
            slot_booking_json: sub_record_json(case.slot_booking_data.as_ref())?,
            ds_json: sub_record_json(case.ds_data.as_ref())?,
            interview_json: sub_record_json(case.visa_interview_data.as_ref())?,
        };

        diesel::insert_into(visa_operations::table)
            .values(&row)
            .execute(conn)?;
        let op_id: i64 = get_last_insert_rowid(conn)?;

        let event_id: i64 = persist_audit_event(conn, &result.audit_event, Some(op_id))?;

        debug!(op_id, event_id, "Persisted new case");
        Ok(PersistCreationResult { op_id, event_id })
    })
}

/// Persists a case transition with a version-guarded update, together
/// with its audit event.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `op_id` - The case id
/// * `expected_version` - The row version the caller read
/// * `result` - The transition result from the core engine
///
/// # Errors
///
/// Returns `PersistenceError::ConcurrentModification` if the guarded
/// update matches no row, or another error if serialization or the
/// writes fail.
pub fn persist_case_transition(
    conn: &mut SqliteConnection,
    op_id: i64,
    expected_version: i64,
    result: &TransitionResult,
) -> Result<PersistTransitionResult, PersistenceError> {
    conn.transaction::<PersistTransitionResult, PersistenceError, _>(|conn| {
        let case: &VisaOperation = &result.new_case;
        let new_version: i64 = expected_version + 1;

        let updated: usize = diesel::update(
            visa_operations::table
                .filter(visa_operations::op_id.eq(op_id))
                .filter(visa_operations::version.eq(expected_version)),
        )
        .set((
            visa_operations::show_cgi_on_portal.eq(i32::from(case.show_cgi_on_portal)),
            visa_operations::version.eq(new_version),
            visa_operations::cgi_json.eq(sub_record_json(case.cgi_data.as_ref())?),
            visa_operations::slot_booking_json
                .eq(sub_record_json(case.slot_booking_data.as_ref())?),
            visa_operations::ds_json.eq(sub_record_json(case.ds_data.as_ref())?),
            visa_operations::interview_json
                .eq(sub_record_json(case.visa_interview_data.as_ref())?),
        ))
        .execute(conn)?;

        if updated == 0 {
            return Err(PersistenceError::ConcurrentModification {
                op_id,
                expected_version,
            });
        }

        let event_id: i64 = persist_audit_event(conn, &result.audit_event, Some(op_id))?;

        debug!(op_id, event_id, new_version, "Persisted case transition");
        Ok(PersistTransitionResult {
            event_id,
            new_version,
        })
    })
}
