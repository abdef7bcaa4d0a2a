// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use lyceum_visa_audit::{Actor, Cause};
use lyceum_visa_domain::{ContactSnapshot, VisaOperation, VopNumber};
use time::macros::datetime;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("officer.lee"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Staff request"))
}

pub fn create_test_case() -> VisaOperation {
    VisaOperation::new(
        VopNumber::new(2026, 1),
        42,
        ContactSnapshot {
            name: String::from("A. Sharma"),
            phone: String::from("+91 98765 43210"),
            country: String::from("USA"),
        },
        datetime!(2026-03-01 09:30 UTC),
    )
    .with_op_id(7)
}
