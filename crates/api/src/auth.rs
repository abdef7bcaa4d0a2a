// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use lyceum_visa_audit::Actor;
use lyceum_visa_persistence::{OperatorData, Persistence, SessionData};
use time::{Duration, OffsetDateTime};

use crate::error::AuthError;

/// Operator roles for authorization.
///
/// Roles apply to staff operators, never to applicants: the applicant
/// portal is a separate channel that can only reach the student-facing
/// transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: operators with approval and corrective authority.
    ///
    /// Admins may additionally perform:
    /// - the administrator decision on the DS-160 gate (accept/reject)
    /// - operator account management
    /// - contact mirror maintenance
    Admin,
    /// Staff role: operators who process cases day to day.
    ///
    /// Staff may:
    /// - create cases and edit every sub-record
    /// - attach and delete documents
    /// - accept filling documents on an applicant's behalf
    ///
    /// Staff may never record the administrator decision.
    Staff,
}

impl Role {
    /// Parses a stored role string.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a known role.
    pub fn parse(value: &str) -> Result<Self, AuthError> {
        match value {
            "Admin" => Ok(Self::Admin),
            "Staff" => Ok(Self::Staff),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {value}"),
            }),
        }
    }

    /// Converts this role to its stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Staff => "Staff",
        }
    }
}

/// An authenticated operator with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The operator's login name.
    pub id: String,
    /// The role assigned to this operator.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The operator's login name
    /// * `role` - The role assigned to this operator
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this authenticated actor into an audit Actor with
    /// operator attribution.
    ///
    /// # Arguments
    ///
    /// * `operator` - The operator data containing stable snapshot
    ///   fields
    #[must_use]
    pub fn to_audit_actor(&self, operator: &OperatorData) -> Actor {
        let actor_type: String = match self.role {
            Role::Admin => String::from("admin"),
            Role::Staff => String::from("staff"),
        };
        Actor::with_operator(
            self.id.clone(),
            actor_type,
            operator.operator_id,
            operator.login_name.clone(),
            operator.display_name.clone(),
        )
    }
}

/// Builds the audit actor for an applicant-portal request.
///
/// Portal requests carry no operator session; the actor is attributed
/// to the contact the portal authenticated.
#[must_use]
pub fn portal_actor(contact_id: i64) -> Actor {
    Actor::new(format!("portal:{contact_id}"), String::from("student"))
}

/// Authorization service for enforcing role-based access control.
///
/// Every state transition passes through one of these checks before a
/// command is built. UI-level gating is advisory only; these checks are
/// the enforcement boundary.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an operator may manage cases (create cases, edit
    /// sub-records, attach and delete documents).
    ///
    /// Both Admin and Staff may manage cases.
    ///
    /// # Errors
    ///
    /// Never fails for authenticated operators; present so every
    /// transition passes an explicit check.
    pub const fn authorize_manage_case(_actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Ok(())
    }

    /// Checks if an operator may accept filling documents on the
    /// applicant's behalf.
    ///
    /// Both Admin and Staff may use the override path; it is always
    /// recorded under its own audit action name.
    ///
    /// # Errors
    ///
    /// Never fails for authenticated operators.
    pub const fn authorize_accept_on_behalf(
        _actor: &AuthenticatedActor,
    ) -> Result<(), AuthError> {
        Ok(())
    }

    /// Checks if an operator may record the administrator decision on
    /// the DS-160 gate.
    ///
    /// Only Admin operators may accept or reject as administrator.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator does not have the Admin role.
    pub fn authorize_admin_decision(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Staff => Err(AuthError::Unauthorized {
                action: String::from("admin_decision"),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an operator may manage operator accounts.
    ///
    /// Only Admin operators may create, disable, enable, or delete
    /// operators and reset passwords.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator does not have the Admin role.
    pub fn authorize_manage_operators(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Staff => Err(AuthError::Unauthorized {
                action: String::from("manage_operators"),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an operator may maintain the contact mirror.
    ///
    /// Only Admin operators may add contacts.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator does not have the Admin role.
    pub fn authorize_manage_contacts(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Staff => Err(AuthError::Unauthorized {
                action: String::from("manage_contacts"),
                required_role: String::from("Admin"),
            }),
        }
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Authenticates an operator with a password and creates a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `login_name` - The operator login name
    /// * `password` - The plaintext password to verify
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`,
    /// `operator_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the operator is unknown or disabled, or the
    /// password does not verify. The caller-visible reason never
    /// distinguishes a wrong password from an unknown operator.
    pub fn login(
        persistence: &mut Persistence,
        login_name: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedActor, OperatorData), AuthError> {
        let invalid = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid login name or password"),
        };

        let operator: OperatorData = persistence
            .get_operator_by_login(login_name)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(invalid)?;

        if operator.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Operator is disabled"),
            });
        }

        let verified: bool = Persistence::verify_operator_password(&operator, password)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Password verification error: {e}"),
            })?;
        if !verified {
            return Err(invalid());
        }

        let role: Role = Role::parse(&operator.role)?;

        let session_token: String = Self::generate_session_token();
        let expires_at: OffsetDateTime =
            OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION;
        let expires_at_str: String = expires_at
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format expiration time: {e}"),
            })?;

        persistence
            .create_session(&session_token, operator.operator_id, &expires_at_str)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;
        persistence
            .update_last_login(operator.operator_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update last login: {e}"),
            })?;

        let authenticated_actor: AuthenticatedActor =
            AuthenticatedActor::new(operator.login_name.clone(), role);

        Ok((session_token, authenticated_actor, operator))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to validate
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or expired, or the
    /// operator is disabled.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, OperatorData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(
            &session.expires_at,
            &time::format_description::well_known::Iso8601::DEFAULT,
        )
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to parse session expiration: {e}"),
        })?;

        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let operator: OperatorData = persistence
            .get_operator_by_id(session.operator_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Operator not found"),
            })?;

        if operator.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Operator is disabled"),
            });
        }

        let role: Role = Role::parse(&operator.role)?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update session activity: {e}"),
            })?;

        let authenticated_actor: AuthenticatedActor =
            AuthenticatedActor::new(operator.login_name.clone(), role);

        Ok((authenticated_actor, operator))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })?;
        Ok(())
    }

    /// Generates an opaque session token.
    fn generate_session_token() -> String {
        format!(
            "session_{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }
}
