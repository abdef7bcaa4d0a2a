// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use lyceum_visa_audit::{Action, Actor, Cause};
use lyceum_visa_domain::VisaOperation;
use serde::{Deserialize, Serialize};

/// Serializable representation of an audit Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
    pub operator_id: Option<i64>,
    pub login_name: Option<String>,
    pub display_name: Option<String>,
}

impl ActorData {
    /// Builds the serializable form of an audit actor.
    #[must_use]
    pub fn from_actor(actor: &Actor) -> Self {
        Self {
            id: actor.id.clone(),
            actor_type: actor.actor_type.clone(),
            operator_id: actor.operator_id,
            login_name: actor.login_name.clone(),
            display_name: actor.display_name.clone(),
        }
    }

    /// Reconstructs the audit actor.
    #[must_use]
    pub fn into_actor(self) -> Actor {
        Actor {
            id: self.id,
            actor_type: self.actor_type,
            operator_id: self.operator_id,
            login_name: self.login_name,
            display_name: self.display_name,
        }
    }
}

/// Serializable representation of an audit Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

impl CauseData {
    /// Builds the serializable form of an audit cause.
    #[must_use]
    pub fn from_cause(cause: &Cause) -> Self {
        Self {
            id: cause.id.clone(),
            description: cause.description.clone(),
        }
    }

    /// Reconstructs the audit cause.
    #[must_use]
    pub fn into_cause(self) -> Cause {
        Cause::new(self.id, self.description)
    }
}

/// Serializable representation of an audit Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

impl ActionData {
    /// Builds the serializable form of an audit action.
    #[must_use]
    pub fn from_action(action: &Action) -> Self {
        Self {
            name: action.name.clone(),
            details: action.details.clone(),
        }
    }

    /// Reconstructs the audit action.
    #[must_use]
    pub fn into_action(self) -> Action {
        Action::new(self.name, self.details)
    }
}

/// A case as stored, paired with its optimistic-concurrency version.
///
/// Every transition must present the version it read; the guarded
/// update refuses to apply over a newer version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCase {
    /// The case aggregate.
    pub case: VisaOperation,
    /// The row version at read time.
    pub version: i64,
}

/// Canonical contact row data (the local mirror of the CRM directory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactData {
    /// The canonical contact id.
    pub contact_id: i64,
    /// The contact's name.
    pub name: String,
    /// The contact's phone number.
    pub phone: String,
    /// The contact's country of application.
    pub country: String,
}

/// Metadata for a stored document blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// The document store identifier.
    pub document_id: i64,
    /// The original file name.
    pub file_name: String,
    /// The MIME content type.
    pub content_type: String,
    /// The blob size in bytes.
    pub size_bytes: i64,
}

/// Canonical operator row data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorData {
    /// The canonical operator id.
    pub operator_id: i64,
    /// The operator login name (stored uppercase).
    pub login_name: String,
    /// The operator display name.
    pub display_name: String,
    /// The bcrypt password hash.
    pub password_hash: String,
    /// The operator role (`Admin` or `Staff`).
    pub role: String,
    /// Whether the operator is disabled.
    pub is_disabled: bool,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// When the operator was disabled, if ever.
    pub disabled_at: Option<String>,
    /// Last successful login, if any.
    pub last_login_at: Option<String>,
}

/// Canonical session row data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    /// The canonical session id.
    pub session_id: i64,
    /// The opaque session token.
    pub session_token: String,
    /// The owning operator.
    pub operator_id: i64,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Last request seen on this session.
    pub last_activity_at: String,
    /// Expiry timestamp (ISO 8601).
    pub expires_at: String,
}
