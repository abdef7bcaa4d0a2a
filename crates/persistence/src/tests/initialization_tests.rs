// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_persistence, persist_test_case};
use crate::Persistence;

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first: Persistence = create_test_persistence();
    let mut second: Persistence = create_test_persistence();

    persist_test_case(&mut first);

    assert_eq!(first.list_cases().unwrap().len(), 1);
    assert_eq!(second.list_cases().unwrap().len(), 0);
}

#[test]
fn test_foreign_key_enforcement_is_active() {
    let mut persistence: Persistence = create_test_persistence();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_migrations_produce_empty_registry() {
    let mut persistence: Persistence = create_test_persistence();

    assert!(persistence.list_cases().unwrap().is_empty());
    assert!(persistence.list_contacts().unwrap().is_empty());
    assert!(persistence.list_operators().unwrap().is_empty());
}
