// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator and session queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{OperatorData, SessionData};
use crate::diesel_schema::{operators, sessions};
use crate::error::PersistenceError;

/// Diesel Queryable struct for operator rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = operators)]
struct OperatorRow {
    operator_id: i64,
    login_name: String,
    display_name: String,
    password_hash: String,
    role: String,
    is_disabled: i32,
    created_at: String,
    disabled_at: Option<String>,
    last_login_at: Option<String>,
}

impl OperatorRow {
    fn into_data(self) -> OperatorData {
        OperatorData {
            operator_id: self.operator_id,
            login_name: self.login_name,
            display_name: self.display_name,
            password_hash: self.password_hash,
            role: self.role,
            is_disabled: self.is_disabled != 0,
            created_at: self.created_at,
            disabled_at: self.disabled_at,
            last_login_at: self.last_login_at,
        }
    }
}

/// Diesel Queryable struct for session rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
struct SessionRow {
    session_id: i64,
    session_token: String,
    operator_id: i64,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

/// Retrieves an operator by login name.
///
/// The login name is normalized to uppercase for case-insensitive
/// lookup.
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` if the
/// operator is not found.
pub fn get_operator_by_login(
    conn: &mut SqliteConnection,
    login_name: &str,
) -> Result<Option<OperatorData>, PersistenceError> {
    let normalized_login: String = login_name.to_uppercase();
    debug!(login_name = %normalized_login, "Looking up operator by login");

    let result: Result<OperatorRow, diesel::result::Error> = operators::table
        .filter(operators::login_name.eq(&normalized_login))
        .select(OperatorRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves an operator by id.
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` if the
/// operator is not found.
pub fn get_operator_by_id(
    conn: &mut SqliteConnection,
    operator_id: i64,
) -> Result<Option<OperatorData>, PersistenceError> {
    let result: Result<OperatorRow, diesel::result::Error> = operators::table
        .filter(operators::operator_id.eq(operator_id))
        .select(OperatorRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists all operators, ordered by login name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_operators(conn: &mut SqliteConnection) -> Result<Vec<OperatorData>, PersistenceError> {
    let rows: Vec<OperatorRow> = operators::table
        .order(operators::login_name.asc())
        .select(OperatorRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(OperatorRow::into_data).collect())
}

/// Counts enabled operators with the Admin role.
///
/// Used to refuse disabling or deleting the last active administrator.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_active_admins(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(operators::table
        .filter(operators::role.eq("Admin"))
        .filter(operators::is_disabled.eq(0))
        .count()
        .get_result(conn)?)
}

/// Retrieves a session by token.
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` if the
/// session is not found.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    let result: Result<SessionRow, diesel::result::Error> = sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(SessionData {
            session_id: row.session_id,
            session_token: row.session_token,
            operator_id: row.operator_id,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            expires_at: row.expires_at,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Verifies an operator's password against the stored bcrypt hash.
///
/// # Errors
///
/// Returns an error if hash verification fails structurally. A wrong
/// password is `Ok(false)`, not an error.
pub fn verify_operator_password(
    operator: &OperatorData,
    password: &str,
) -> Result<bool, PersistenceError> {
    Ok(bcrypt::verify(password, &operator.password_hash)?)
}
