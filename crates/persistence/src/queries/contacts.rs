// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contact mirror queries.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::ContactData;
use crate::diesel_schema::contacts;
use crate::error::PersistenceError;

/// Diesel Queryable struct for contact rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = contacts)]
struct ContactRow {
    contact_id: i64,
    name: String,
    phone: String,
    country: String,
}

impl ContactRow {
    fn into_data(self) -> ContactData {
        ContactData {
            contact_id: self.contact_id,
            name: self.name,
            phone: self.phone,
            country: self.country,
        }
    }
}

/// Resolves a contact by id.
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` if the
/// contact does not exist.
pub fn get_contact(
    conn: &mut SqliteConnection,
    contact_id: i64,
) -> Result<Option<ContactData>, PersistenceError> {
    let result: Result<ContactRow, diesel::result::Error> = contacts::table
        .filter(contacts::contact_id.eq(contact_id))
        .select(ContactRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_data())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists all contacts in the mirror.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_contacts(conn: &mut SqliteConnection) -> Result<Vec<ContactData>, PersistenceError> {
    let rows: Vec<ContactRow> = contacts::table
        .order(contacts::name.asc())
        .select(ContactRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(ContactRow::into_data).collect())
}
