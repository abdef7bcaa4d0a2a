// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Lyceum Visa Operations system.
//!
//! This crate provides `SQLite` persistence (via Diesel with embedded
//! migrations) for visa cases, document blobs, the contact mirror,
//! operators, sessions, and the audit log.
//!
//! ## Concurrency model
//!
//! Every case row carries a `version` column. Transitions are persisted
//! with a version-guarded update: the writer presents the version it
//! read, and a zero-row update surfaces as
//! [`PersistenceError::ConcurrentModification`] instead of silently
//! overwriting a concurrent writer's transition. Sub-record overwrites
//! and approval-gate transitions go through the same guarded path.
//!
//! ## Testing
//!
//! In-memory databases are isolated by an atomic counter, so tests are
//! deterministic and need no external infrastructure.

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use lyceum_visa::{CreationResult, TransitionResult};
use lyceum_visa_audit::AuditEvent;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod timestamps;

#[cfg(test)]
mod tests;

pub use data_models::{ContactData, DocumentMetadata, OperatorData, SessionData, StoredCase};
pub use error::PersistenceError;
pub use mutations::{PersistCreationResult, PersistTransitionResult};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID, so
/// tests never collide on a shared database.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the visa operations engine.
///
/// The adapter owns a single connection; the server serializes access
/// behind a lock, which also makes case-number allocation race-free.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a persistence adapter backed by a unique in-memory
    /// `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_visa_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::initialize_database(&shared_memory_url)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a persistence adapter backed by a `SQLite` file.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::initialize_database(path_str)?;
        backend::enable_wal_mode(&mut conn)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Cases
    // ========================================================================

    /// Returns the next case sequence number for `vop_number`
    /// allocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn next_case_sequence(&mut self) -> Result<i64, PersistenceError> {
        queries::cases::next_case_sequence(&mut self.conn)
    }

    /// Persists a freshly created case and its creation audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn persist_new_case(
        &mut self,
        result: &CreationResult,
    ) -> Result<PersistCreationResult, PersistenceError> {
        mutations::cases::persist_new_case(&mut self.conn, result)
    }

    /// Persists a case transition with a version-guarded update.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::ConcurrentModification`] if another
    /// writer committed first, or another error if persistence fails.
    pub fn persist_case_transition(
        &mut self,
        op_id: i64,
        expected_version: i64,
        result: &TransitionResult,
    ) -> Result<PersistTransitionResult, PersistenceError> {
        mutations::cases::persist_case_transition(&mut self.conn, op_id, expected_version, result)
    }

    /// Retrieves a case by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_case(&mut self, op_id: i64) -> Result<Option<StoredCase>, PersistenceError> {
        queries::cases::get_case(&mut self.conn, op_id)
    }

    /// Lists all cases, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_cases(&mut self) -> Result<Vec<StoredCase>, PersistenceError> {
        queries::cases::list_cases(&mut self.conn)
    }

    /// Lists the cases belonging to a contact, optionally excluding one
    /// case id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_cases_for_contact(
        &mut self,
        contact_id: i64,
        exclude_op_id: Option<i64>,
    ) -> Result<Vec<StoredCase>, PersistenceError> {
        queries::cases::list_cases_for_contact(&mut self.conn, contact_id, exclude_op_id)
    }

    // ========================================================================
    // Documents
    // ========================================================================

    /// Stores a document blob and returns its metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn put_document(
        &mut self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<DocumentMetadata, PersistenceError> {
        mutations::documents::insert_document(&mut self.conn, file_name, content_type, bytes)
    }

    /// Retrieves a document's metadata and bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::DocumentNotFound`] if no blob has
    /// the given id.
    pub fn get_document(
        &mut self,
        document_id: i64,
    ) -> Result<(DocumentMetadata, Vec<u8>), PersistenceError> {
        queries::documents::get_document(&mut self.conn, document_id)
    }

    /// Deletes a document blob.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::DocumentNotFound`] if no blob has
    /// the given id.
    pub fn delete_document(&mut self, document_id: i64) -> Result<(), PersistenceError> {
        mutations::documents::delete_document(&mut self.conn, document_id)
    }

    // ========================================================================
    // Contacts
    // ========================================================================

    /// Creates a contact in the local mirror.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_contact(
        &mut self,
        name: &str,
        phone: &str,
        country: &str,
    ) -> Result<ContactData, PersistenceError> {
        mutations::contacts::create_contact(&mut self.conn, name, phone, country)
    }

    /// Resolves a contact by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_contact(
        &mut self,
        contact_id: i64,
    ) -> Result<Option<ContactData>, PersistenceError> {
        queries::contacts::get_contact(&mut self.conn, contact_id)
    }

    /// Lists all contacts in the mirror.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_contacts(&mut self) -> Result<Vec<ContactData>, PersistenceError> {
        queries::contacts::list_contacts(&mut self.conn)
    }

    // ========================================================================
    // Operators & sessions
    // ========================================================================

    /// Creates an operator account.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing or the insert fails.
    pub fn create_operator(
        &mut self,
        login_name: &str,
        display_name: &str,
        password: &str,
        role: &str,
    ) -> Result<OperatorData, PersistenceError> {
        mutations::operators::create_operator(&mut self.conn, login_name, display_name, password, role)
    }

    /// Retrieves an operator by login name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_operator_by_login(
        &mut self,
        login_name: &str,
    ) -> Result<Option<OperatorData>, PersistenceError> {
        queries::operators::get_operator_by_login(&mut self.conn, login_name)
    }

    /// Retrieves an operator by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_operator_by_id(
        &mut self,
        operator_id: i64,
    ) -> Result<Option<OperatorData>, PersistenceError> {
        queries::operators::get_operator_by_id(&mut self.conn, operator_id)
    }

    /// Lists all operators.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_operators(&mut self) -> Result<Vec<OperatorData>, PersistenceError> {
        queries::operators::list_operators(&mut self.conn)
    }

    /// Counts enabled operators with the Admin role.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_active_admins(&mut self) -> Result<i64, PersistenceError> {
        queries::operators::count_active_admins(&mut self.conn)
    }

    /// Verifies an operator's password against the stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if hash verification fails structurally. A
    /// wrong password is `Ok(false)`.
    pub fn verify_operator_password(
        operator: &OperatorData,
        password: &str,
    ) -> Result<bool, PersistenceError> {
        queries::operators::verify_operator_password(operator, password)
    }

    /// Updates an operator's password hash.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing fails or the operator does not
    /// exist.
    pub fn update_password(
        &mut self,
        operator_id: i64,
        new_password: &str,
    ) -> Result<(), PersistenceError> {
        mutations::operators::update_password(&mut self.conn, operator_id, new_password)
    }

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_last_login(&mut self, operator_id: i64) -> Result<(), PersistenceError> {
        mutations::operators::update_last_login(&mut self.conn, operator_id)
    }

    /// Disables an operator and deletes their sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator does not exist.
    pub fn disable_operator(&mut self, operator_id: i64) -> Result<(), PersistenceError> {
        mutations::operators::disable_operator(&mut self.conn, operator_id)
    }

    /// Re-enables a disabled operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator does not exist.
    pub fn enable_operator(&mut self, operator_id: i64) -> Result<(), PersistenceError> {
        mutations::operators::enable_operator(&mut self.conn, operator_id)
    }

    /// Deletes an operator.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::OperatorReferenced`] if audit events
    /// reference the operator.
    pub fn delete_operator(&mut self, operator_id: i64) -> Result<(), PersistenceError> {
        mutations::operators::delete_operator(&mut self.conn, operator_id)
    }

    /// Creates a session for an operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        operator_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::operators::create_session(&mut self.conn, session_token, operator_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::operators::get_session_by_token(&mut self.conn, session_token)
    }

    /// Touches a session's last-activity timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::operators::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token (logout).
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::operators::delete_session(&mut self.conn, session_token)
    }

    /// Deletes all expired sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self) -> Result<usize, PersistenceError> {
        mutations::operators::delete_expired_sessions(&mut self.conn)
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Returns the ordered audit timeline for a case.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_audit_timeline(&mut self, op_id: i64) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_audit_timeline(&mut self.conn, op_id)
    }

    /// Retrieves a specific audit event by id.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::EventNotFound`] if no event has the
    /// given id.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, event_id)
    }
}
