// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event persistence.
//!
//! Every successful transition writes exactly one row here, inside the
//! same transaction as the case mutation it records.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::backend::get_last_insert_rowid;
use crate::data_models::{ActionData, ActorData, CauseData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;
use crate::timestamps::now_timestamp;
use lyceum_visa_audit::AuditEvent;

#[derive(Insertable)]
#[diesel(table_name = audit_events)]
struct NewAuditEventRow {
    op_id: Option<i64>,
    vop_number: String,
    actor_operator_id: Option<i64>,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot: String,
    after_snapshot: String,
    created_at: String,
}

/// Persists an audit event and returns its event id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `event` - The audit event to persist
/// * `op_id` - The case id to scope the event to (overrides the
///   event's own, which is absent for creation events)
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
    op_id: Option<i64>,
) -> Result<i64, PersistenceError> {
    let row: NewAuditEventRow = NewAuditEventRow {
        op_id: op_id.or(event.op_id),
        vop_number: event.vop_number.value().to_string(),
        actor_operator_id: event.actor.operator_id,
        actor_json: serde_json::to_string(&ActorData::from_actor(&event.actor))?,
        cause_json: serde_json::to_string(&CauseData::from_cause(&event.cause))?,
        action_json: serde_json::to_string(&ActionData::from_action(&event.action))?,
        before_snapshot: event.before.data.clone(),
        after_snapshot: event.after.data.clone(),
        created_at: now_timestamp()?,
    };

    diesel::insert_into(audit_events::table)
        .values(&row)
        .execute(conn)?;

    get_last_insert_rowid(conn)
}
