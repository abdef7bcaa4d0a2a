// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{PersistCreationResult, Persistence, StoredCase};
use lyceum_visa::{Command, CreationResult, TransitionResult, apply, create_case};
use lyceum_visa_audit::{Actor, Cause};
use lyceum_visa_domain::{ConsulateDirectory, ContactSnapshot, VopNumber};
use time::macros::datetime;

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("officer.lee"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Test request"))
}

/// Creates a contact and a persisted case for it, returning the stored
/// case.
pub fn persist_test_case(persistence: &mut Persistence) -> StoredCase {
    let contact = persistence
        .create_contact("A. Sharma", "+91 98765 43210", "USA")
        .unwrap();

    let sequence: i64 = persistence.next_case_sequence().unwrap();
    let creation: CreationResult = create_case(
        VopNumber::new(2026, sequence),
        contact.contact_id,
        ContactSnapshot {
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            country: contact.country.clone(),
        },
        datetime!(2026-03-01 09:30 UTC),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let persisted: PersistCreationResult = persistence.persist_new_case(&creation).unwrap();
    persistence.get_case(persisted.op_id).unwrap().unwrap()
}

/// Applies a command to a stored case and persists the transition,
/// returning the reloaded case.
pub fn apply_and_persist(
    persistence: &mut Persistence,
    stored: &StoredCase,
    command: Command,
) -> StoredCase {
    let result: TransitionResult = apply(
        &stored.case,
        command,
        &ConsulateDirectory::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let op_id: i64 = stored.case.op_id.unwrap();
    persistence
        .persist_case_transition(op_id, stored.version, &result)
        .unwrap();
    persistence.get_case(op_id).unwrap().unwrap()
}
