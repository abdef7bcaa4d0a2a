// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// The requested case was not found.
    CaseNotFound(i64),
    /// The requested contact was not found.
    ContactNotFound(i64),
    /// The requested document was not found.
    DocumentNotFound(i64),
    /// The requested audit event was not found.
    EventNotFound(i64),
    /// A guarded case update matched no row: another writer committed
    /// first. The caller may reload and retry.
    ConcurrentModification {
        /// The case id.
        op_id: i64,
        /// The version the writer expected.
        expected_version: i64,
    },
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Timestamp formatting or parsing error.
    TimestampError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested operator was not found.
    OperatorNotFound(String),
    /// The requested session was not found.
    SessionNotFound(String),
    /// Password hashing failed.
    PasswordHashError(String),
    /// Operator cannot be deleted because it is referenced by audit
    /// events.
    OperatorReferenced {
        /// The operator id.
        operator_id: i64,
    },
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::CaseNotFound(op_id) => write!(f, "Case not found: {op_id}"),
            Self::ContactNotFound(contact_id) => {
                write!(f, "Contact not found: {contact_id}")
            }
            Self::DocumentNotFound(document_id) => {
                write!(f, "Document not found: {document_id}")
            }
            Self::EventNotFound(event_id) => write!(f, "Event not found: {event_id}"),
            Self::ConcurrentModification {
                op_id,
                expected_version,
            } => {
                write!(
                    f,
                    "Case {op_id} was modified concurrently (expected version {expected_version})"
                )
            }
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::TimestampError(msg) => write!(f, "Timestamp error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::OperatorNotFound(msg) => write!(f, "Operator not found: {msg}"),
            Self::SessionNotFound(msg) => write!(f, "Session not found: {msg}"),
            Self::PasswordHashError(msg) => write!(f, "Password hash error: {msg}"),
            Self::OperatorReferenced { operator_id } => {
                write!(
                    f,
                    "Operator {operator_id} cannot be deleted: referenced by audit events"
                )
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for PersistenceError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::PasswordHashError(err.to_string())
    }
}
