// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use lyceum_visa_domain::VopNumber;

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a state change:
/// a staff operator, an administrator, or the applicant portal channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "admin", "staff", "student").
    pub actor_type: String,
    /// The canonical operator id, when the actor is a staff operator.
    pub operator_id: Option<i64>,
    /// The operator login name snapshot, when applicable.
    pub login_name: Option<String>,
    /// The operator display name snapshot, when applicable.
    pub display_name: Option<String>,
}

impl Actor {
    /// Creates a new Actor without operator attribution.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self {
            id,
            actor_type,
            operator_id: None,
            login_name: None,
            display_name: None,
        }
    }

    /// Creates an Actor attributed to a staff operator.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    /// * `operator_id` - The canonical operator id
    /// * `login_name` - The operator login name snapshot
    /// * `display_name` - The operator display name snapshot
    #[must_use]
    pub const fn with_operator(
        id: String,
        actor_type: String,
        operator_id: i64,
        login_name: String,
        display_name: String,
    ) -> Self {
        Self {
            id,
            actor_type,
            operator_id: Some(operator_id),
            login_name: Some(login_name),
            display_name: Some(display_name),
        }
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
///
/// The action name distinguishes transition provenance: a staff
/// acceptance on behalf of the applicant carries a different name than
/// the applicant's own acceptance, even though the stored effect is the
/// same.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`AdminAccept`", "`SetCgiData`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A summary of case state at a point in time.
///
/// Snapshots are compact key=value summaries; they never contain
/// credential values or security answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    ///
    /// # Arguments
    ///
    /// * `data` - A string representation of the state
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable audit event recording one case transition.
///
/// Every successful state change produces exactly one audit event,
/// capturing who acted, why, what was done, and the state on either
/// side of the transition, scoped to a single case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The persisted event id. `None` until the event is stored.
    pub event_id: Option<i64>,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
    /// The case number this event is scoped to.
    pub vop_number: VopNumber,
    /// The canonical case id, when the case has been persisted.
    pub op_id: Option<i64>,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// Once created, an audit event is immutable (the persistence layer
    /// populates `event_id` on its own copy).
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    /// * `vop_number` - The case number this event is scoped to
    /// * `op_id` - The canonical case id, if persisted
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        vop_number: VopNumber,
        op_id: Option<i64>,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            cause,
            action,
            before,
            after,
            vop_number,
            op_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_event() -> AuditEvent {
        AuditEvent::new(
            Actor::new(String::from("officer.lee"), String::from("admin")),
            Cause::new(String::from("req-456"), String::from("Staff request")),
            Action::new(String::from("AdminAccept"), None),
            StateSnapshot::new(String::from("admin=pending")),
            StateSnapshot::new(String::from("admin=accepted")),
            VopNumber::new(2026, 1),
            Some(7),
        )
    }

    #[test]
    fn test_actor_creation_requires_all_fields() {
        let actor: Actor = Actor::new(String::from("officer.lee"), String::from("admin"));

        assert_eq!(actor.id, "officer.lee");
        assert_eq!(actor.actor_type, "admin");
        assert!(actor.operator_id.is_none());
    }

    #[test]
    fn test_actor_with_operator_attribution() {
        let actor: Actor = Actor::with_operator(
            String::from("officer.lee"),
            String::from("admin"),
            3,
            String::from("OFFICER.LEE"),
            String::from("Officer Lee"),
        );

        assert_eq!(actor.operator_id, Some(3));
        assert_eq!(actor.login_name.as_deref(), Some("OFFICER.LEE"));
        assert_eq!(actor.display_name.as_deref(), Some("Officer Lee"));
    }

    #[test]
    fn test_cause_creation_requires_all_fields() {
        let cause: Cause = Cause::new(String::from("req-456"), String::from("Staff request"));

        assert_eq!(cause.id, "req-456");
        assert_eq!(cause.description, "Staff request");
    }

    #[test]
    fn test_action_creation_with_details() {
        let action: Action = Action::new(
            String::from("StudentReject"),
            Some(String::from("Applicant rejected filling documents")),
        );

        assert_eq!(action.name, "StudentReject");
        assert!(action.details.is_some());
    }

    #[test]
    fn test_audit_event_is_scoped_to_a_case() {
        let event: AuditEvent = create_test_event();

        assert_eq!(event.vop_number.value(), "VOP-2026-00001");
        assert_eq!(event.op_id, Some(7));
        assert!(event.event_id.is_none());
    }

    #[test]
    fn test_audit_event_captures_before_and_after() {
        let event: AuditEvent = create_test_event();

        assert_eq!(event.before.data, "admin=pending");
        assert_eq!(event.after.data, "admin=accepted");
    }

    #[test]
    fn test_audit_event_equality() {
        let event1: AuditEvent = create_test_event();
        let event2: AuditEvent = create_test_event();

        assert_eq!(event1, event2);
    }
}
