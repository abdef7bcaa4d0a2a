// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contact mirror mutations.
//!
//! The CRM owns contacts; this table is the local mirror the engine
//! resolves case snapshots from.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::backend::get_last_insert_rowid;
use crate::data_models::ContactData;
use crate::diesel_schema::contacts;
use crate::error::PersistenceError;
use crate::timestamps::now_timestamp;

#[derive(Insertable)]
#[diesel(table_name = contacts)]
struct NewContactRow {
    name: String,
    phone: String,
    country: String,
    created_at: String,
}

/// Creates a contact in the local mirror.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `name` - The contact's name
/// * `phone` - The contact's phone number
/// * `country` - The country of application
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_contact(
    conn: &mut SqliteConnection,
    name: &str,
    phone: &str,
    country: &str,
) -> Result<ContactData, PersistenceError> {
    let row: NewContactRow = NewContactRow {
        name: name.to_string(),
        phone: phone.to_string(),
        country: country.to_string(),
        created_at: now_timestamp()?,
    };

    diesel::insert_into(contacts::table)
        .values(&row)
        .execute(conn)?;
    let contact_id: i64 = get_last_insert_rowid(conn)?;

    Ok(ContactData {
        contact_id,
        name: name.to_string(),
        phone: phone.to_string(),
        country: country.to_string(),
    })
}
