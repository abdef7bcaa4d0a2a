// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use serde::de::DeserializeOwned;

use crate::data_models::StoredCase;
use crate::diesel_schema::visa_operations;
use crate::error::PersistenceError;
use crate::timestamps::parse_timestamp;
use lyceum_visa_domain::{
    CgiData, DsData, SlotBookingData, VisaInterviewData, VisaOperation, VopNumber,
};

/// Diesel Queryable struct for case rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = visa_operations)]
struct CaseRow {
    op_id: i64,
    vop_number: String,
    contact_id: i64,
    name: String,
    phone: String,
    country: String,
    created_at: String,
    show_cgi_on_portal: i32,
    version: i64,
    cgi_json: Option<String>,
    slot_booking_json: Option<String>,
    ds_json: Option<String>,
    interview_json: Option<String>,
}

fn sub_record<T: DeserializeOwned>(json: Option<&String>) -> Result<Option<T>, PersistenceError> {
    json.map(|j| serde_json::from_str(j))
        .transpose()
        .map_err(Into::into)
}

fn row_to_stored_case(row: CaseRow) -> Result<StoredCase, PersistenceError> {
    let cgi_data: Option<CgiData> = sub_record(row.cgi_json.as_ref())?;
    let slot_booking_data: Option<SlotBookingData> = sub_record(row.slot_booking_json.as_ref())?;
    let ds_data: Option<DsData> = sub_record(row.ds_json.as_ref())?;
    let visa_interview_data: Option<VisaInterviewData> = sub_record(row.interview_json.as_ref())?;

    let case: VisaOperation = VisaOperation {
        op_id: Some(row.op_id),
        vop_number: VopNumber::from_value(row.vop_number),
        contact_id: row.contact_id,
        name: row.name,
        phone: row.phone,
        country: row.country,
        created_at: parse_timestamp(&row.created_at)?,
        show_cgi_on_portal: row.show_cgi_on_portal != 0,
        cgi_data,
        slot_booking_data,
        ds_data,
        visa_interview_data,
    };

    Ok(StoredCase {
        case,
        version: row.version,
    })
}

/// Retrieves a case by id.
///
/// # Errors
///
/// Returns an error if the query or deserialization fails. Returns
/// `Ok(None)` if no case has the given id.
pub fn get_case(
    conn: &mut SqliteConnection,
    op_id: i64,
) -> Result<Option<StoredCase>, PersistenceError> {
    let result: Result<CaseRow, diesel::result::Error> = visa_operations::table
        .filter(visa_operations::op_id.eq(op_id))
        .select(CaseRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row_to_stored_case(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists all cases, newest first.
///
/// Filtering happens at the API boundary; the registry stays a plain
/// ordered collection.
///
/// # Errors
///
/// Returns an error if the query or deserialization fails.
pub fn list_cases(conn: &mut SqliteConnection) -> Result<Vec<StoredCase>, PersistenceError> {
    let rows: Vec<CaseRow> = visa_operations::table
        .order(visa_operations::created_at.desc())
        .select(CaseRow::as_select())
        .load(conn)?;

    rows.into_iter().map(row_to_stored_case).collect()
}

/// Lists the cases belonging to a contact, excluding one case id,
/// newest first.
///
/// Used to surface the history of repeat applications by the same
/// person.
///
/// # Errors
///
/// Returns an error if the query or deserialization fails.
pub fn list_cases_for_contact(
    conn: &mut SqliteConnection,
    contact_id: i64,
    exclude_op_id: Option<i64>,
) -> Result<Vec<StoredCase>, PersistenceError> {
    let mut query = visa_operations::table
        .filter(visa_operations::contact_id.eq(contact_id))
        .order(visa_operations::created_at.desc())
        .into_boxed();

    if let Some(exclude) = exclude_op_id {
        query = query.filter(visa_operations::op_id.ne(exclude));
    }

    let rows: Vec<CaseRow> = query.select(CaseRow::as_select()).load(conn)?;
    rows.into_iter().map(row_to_stored_case).collect()
}

/// Returns the next case sequence number.
///
/// Case numbers are dense per tenant; the persistence adapter is the
/// single writer, so count-plus-one is race-free behind its lock.
///
/// # Errors
///
/// Returns an error if the count query fails.
pub fn next_case_sequence(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    let count: i64 = visa_operations::table.count().get_result(conn)?;
    Ok(count + 1)
}
