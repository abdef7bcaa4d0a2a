// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator and session mutations.
//!
//! Passwords are hashed with bcrypt before they reach a row; plaintext
//! never leaves the call frame and is never logged.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::get_last_insert_rowid;
use crate::data_models::OperatorData;
use crate::diesel_schema::{audit_events, operators, sessions};
use crate::error::PersistenceError;
use crate::timestamps::now_timestamp;

#[derive(Insertable)]
#[diesel(table_name = operators)]
struct NewOperatorRow {
    login_name: String,
    display_name: String,
    password_hash: String,
    role: String,
    is_disabled: i32,
    created_at: String,
}

#[derive(Insertable)]
#[diesel(table_name = sessions)]
struct NewSessionRow {
    session_token: String,
    operator_id: i64,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

/// Creates an operator account.
///
/// The login name is normalized to uppercase for case-insensitive
/// lookup.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `login_name` - The login name
/// * `display_name` - The display name
/// * `password` - The plaintext password; hashed before storage
/// * `role` - The role (`Admin` or `Staff`)
///
/// # Errors
///
/// Returns an error if hashing or the insert fails.
pub fn create_operator(
    conn: &mut SqliteConnection,
    login_name: &str,
    display_name: &str,
    password: &str,
    role: &str,
) -> Result<OperatorData, PersistenceError> {
    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    let created_at: String = now_timestamp()?;

    let row: NewOperatorRow = NewOperatorRow {
        login_name: login_name.to_uppercase(),
        display_name: display_name.to_string(),
        password_hash: password_hash.clone(),
        role: role.to_string(),
        is_disabled: 0,
        created_at: created_at.clone(),
    };

    diesel::insert_into(operators::table)
        .values(&row)
        .execute(conn)?;
    let operator_id: i64 = get_last_insert_rowid(conn)?;

    debug!(operator_id, "Created operator");
    Ok(OperatorData {
        operator_id,
        login_name: login_name.to_uppercase(),
        display_name: display_name.to_string(),
        password_hash,
        role: role.to_string(),
        is_disabled: false,
        created_at,
        disabled_at: None,
        last_login_at: None,
    })
}

/// Updates an operator's password hash.
///
/// # Errors
///
/// Returns an error if hashing fails or the operator does not exist.
pub fn update_password(
    conn: &mut SqliteConnection,
    operator_id: i64,
    new_password: &str,
) -> Result<(), PersistenceError> {
    let password_hash: String = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)?;

    let updated: usize =
        diesel::update(operators::table.filter(operators::operator_id.eq(operator_id)))
            .set(operators::password_hash.eq(password_hash))
            .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::OperatorNotFound(operator_id.to_string()));
    }
    Ok(())
}

/// Records a successful login.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_last_login(
    conn: &mut SqliteConnection,
    operator_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(operators::table.filter(operators::operator_id.eq(operator_id)))
        .set(operators::last_login_at.eq(now_timestamp()?))
        .execute(conn)?;
    Ok(())
}

/// Disables an operator and deletes their active sessions.
///
/// # Errors
///
/// Returns an error if the operator does not exist.
pub fn disable_operator(
    conn: &mut SqliteConnection,
    operator_id: i64,
) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let updated: usize =
            diesel::update(operators::table.filter(operators::operator_id.eq(operator_id)))
                .set((
                    operators::is_disabled.eq(1),
                    operators::disabled_at.eq(now_timestamp()?),
                ))
                .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::OperatorNotFound(operator_id.to_string()));
        }

        diesel::delete(sessions::table.filter(sessions::operator_id.eq(operator_id)))
            .execute(conn)?;
        Ok(())
    })
}

/// Re-enables a disabled operator.
///
/// # Errors
///
/// Returns an error if the operator does not exist.
pub fn enable_operator(
    conn: &mut SqliteConnection,
    operator_id: i64,
) -> Result<(), PersistenceError> {
    let updated: usize =
        diesel::update(operators::table.filter(operators::operator_id.eq(operator_id)))
            .set((
                operators::is_disabled.eq(0),
                operators::disabled_at.eq(None::<String>),
            ))
            .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::OperatorNotFound(operator_id.to_string()));
    }
    Ok(())
}

/// Deletes an operator.
///
/// Deletion is refused while audit events reference the operator; the
/// audit trail is immutable.
///
/// # Errors
///
/// Returns `PersistenceError::OperatorReferenced` if audit events
/// reference the operator, or `OperatorNotFound` if it does not exist.
pub fn delete_operator(
    conn: &mut SqliteConnection,
    operator_id: i64,
) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let referencing: i64 = audit_events::table
            .filter(audit_events::actor_operator_id.eq(operator_id))
            .count()
            .get_result(conn)?;
        if referencing > 0 {
            return Err(PersistenceError::OperatorReferenced { operator_id });
        }

        diesel::delete(sessions::table.filter(sessions::operator_id.eq(operator_id)))
            .execute(conn)?;
        let deleted: usize =
            diesel::delete(operators::table.filter(operators::operator_id.eq(operator_id)))
                .execute(conn)?;
        if deleted == 0 {
            return Err(PersistenceError::OperatorNotFound(operator_id.to_string()));
        }
        Ok(())
    })
}

/// Creates a session for an operator.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    operator_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    let now: String = now_timestamp()?;
    let row: NewSessionRow = NewSessionRow {
        session_token: session_token.to_string(),
        operator_id,
        created_at: now.clone(),
        last_activity_at: now,
        expires_at: expires_at.to_string(),
    };

    diesel::insert_into(sessions::table)
        .values(&row)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Touches a session's last-activity timestamp.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table.filter(sessions::session_id.eq(session_id)))
        .set(sessions::last_activity_at.eq(now_timestamp()?))
        .execute(conn)?;
    Ok(())
}

/// Deletes a session by token (logout).
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    diesel::delete(sessions::table.filter(sessions::session_token.eq(session_token)))
        .execute(conn)?;
    Ok(())
}

/// Deletes all expired sessions.
///
/// Stored timestamps are ISO 8601 text, so lexical comparison is
/// chronological comparison.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_expired_sessions(conn: &mut SqliteConnection) -> Result<usize, PersistenceError> {
    Ok(
        diesel::delete(sessions::table.filter(sessions::expires_at.lt(now_timestamp()?)))
            .execute(conn)?,
    )
}
