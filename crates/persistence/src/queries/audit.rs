// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{ActionData, ActorData, CauseData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;
use lyceum_visa_audit::{AuditEvent, StateSnapshot};
use lyceum_visa_domain::VopNumber;

/// Diesel Queryable struct for audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    op_id: Option<i64>,
    vop_number: String,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot: String,
    after_snapshot: String,
}

fn row_to_event(row: AuditEventRow) -> Result<AuditEvent, PersistenceError> {
    let actor: ActorData = serde_json::from_str(&row.actor_json)?;
    let cause: CauseData = serde_json::from_str(&row.cause_json)?;
    let action: ActionData = serde_json::from_str(&row.action_json)?;

    let mut event: AuditEvent = AuditEvent::new(
        actor.into_actor(),
        cause.into_cause(),
        action.into_action(),
        StateSnapshot::new(row.before_snapshot),
        StateSnapshot::new(row.after_snapshot),
        VopNumber::from_value(row.vop_number),
        row.op_id,
    );
    event.event_id = Some(row.event_id);
    Ok(event)
}

/// Returns the ordered audit timeline for a case.
///
/// # Errors
///
/// Returns an error if the query or deserialization fails.
pub fn get_audit_timeline(
    conn: &mut SqliteConnection,
    op_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::op_id.eq(op_id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(row_to_event).collect()
}

/// Retrieves a specific audit event by id.
///
/// # Errors
///
/// Returns `PersistenceError::EventNotFound` if no event has the given
/// id.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<AuditEvent, PersistenceError> {
    let result: Result<AuditEventRow, diesel::result::Error> = audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row_to_event(row),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::EventNotFound(event_id)),
        Err(e) => Err(e.into()),
    }
}
