// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DS_FORM_VALIDITY_DAYS, compute_expiry_date};
use time::macros::date;

#[test]
fn test_expiry_is_twenty_days_after_start() {
    let expiry = compute_expiry_date(date!(2026 - 03 - 01)).unwrap();
    assert_eq!(expiry, date!(2026 - 03 - 21));
}

#[test]
fn test_expiry_crosses_month_boundary() {
    let expiry = compute_expiry_date(date!(2026 - 01 - 25)).unwrap();
    assert_eq!(expiry, date!(2026 - 02 - 14));
}

#[test]
fn test_expiry_crosses_year_boundary() {
    let expiry = compute_expiry_date(date!(2026 - 12 - 20)).unwrap();
    assert_eq!(expiry, date!(2027 - 01 - 09));
}

#[test]
fn test_expiry_handles_leap_day() {
    let expiry = compute_expiry_date(date!(2028 - 02 - 15)).unwrap();
    assert_eq!(expiry, date!(2028 - 03 - 06));
}

#[test]
fn test_validity_window_constant() {
    assert_eq!(DS_FORM_VALIDITY_DAYS, 20);
}
