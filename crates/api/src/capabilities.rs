// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what actions an operator is permitted to
//! perform without leaking domain internals. They are advisory only
//! and never replace the boundary authorization checks in `handlers`.

use crate::auth::{AuthenticatedActor, Role};
use crate::request_response::{Capability, CaseCapabilities, GlobalCapabilities};
use lyceum_visa_domain::{DsData, VisaOperation};
use lyceum_visa_persistence::OperatorData;

/// Computes global capabilities for an authenticated operator.
///
/// # Arguments
///
/// * `actor` - The authenticated actor
/// * `operator` - The operator data
#[must_use]
pub const fn compute_global_capabilities(
    actor: &AuthenticatedActor,
    operator: &OperatorData,
) -> GlobalCapabilities {
    if operator.is_disabled {
        return GlobalCapabilities {
            can_manage_cases: Capability::Denied,
            can_admin_decide: Capability::Denied,
            can_manage_operators: Capability::Denied,
            can_manage_contacts: Capability::Denied,
        };
    }

    match actor.role {
        Role::Admin => GlobalCapabilities {
            can_manage_cases: Capability::Allowed,
            can_admin_decide: Capability::Allowed,
            can_manage_operators: Capability::Allowed,
            can_manage_contacts: Capability::Allowed,
        },
        Role::Staff => GlobalCapabilities {
            can_manage_cases: Capability::Allowed,
            can_admin_decide: Capability::Denied,
            can_manage_operators: Capability::Denied,
            can_manage_contacts: Capability::Denied,
        },
    }
}

/// Computes per-case capabilities for an authenticated operator.
///
/// Gate-dependent flags mirror the transitions the engine would
/// actually permit on this case right now.
///
/// # Arguments
///
/// * `actor` - The authenticated actor
/// * `case` - The case being evaluated
#[must_use]
pub fn compute_case_capabilities(
    actor: &AuthenticatedActor,
    case: &VisaOperation,
) -> CaseCapabilities {
    let ds: DsData = case.ds_data.clone().unwrap_or_default();

    let can_admin_decide: Capability = match actor.role {
        Role::Admin => Capability::Allowed,
        Role::Staff => Capability::Denied,
    };

    // Any operator may attach the confirmation once the gate is
    // satisfied; the gate itself is the restriction.
    let can_attach_confirmation: Capability = if ds.is_submission_ready() {
        Capability::Allowed
    } else {
        Capability::Denied
    };

    let preferences_locked: bool = case
        .slot_booking_data
        .as_ref()
        .is_some_and(|slot| slot.preferences_locked);

    CaseCapabilities {
        can_accept_on_behalf: Capability::Allowed,
        can_admin_decide,
        can_attach_confirmation,
        can_submit_preferences: if preferences_locked {
            Capability::Denied
        } else {
            Capability::Allowed
        },
    }
}
