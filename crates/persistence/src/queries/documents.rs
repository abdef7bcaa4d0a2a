// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Document blob store queries.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::DocumentMetadata;
use crate::diesel_schema::documents;
use crate::error::PersistenceError;

/// Diesel Queryable struct for document rows, bytes included.
#[derive(Queryable, Selectable)]
#[diesel(table_name = documents)]
struct DocumentRow {
    document_id: i64,
    file_name: String,
    content_type: String,
    size_bytes: i64,
    data: Vec<u8>,
}

/// Retrieves a document's metadata and bytes.
///
/// # Errors
///
/// Returns `PersistenceError::DocumentNotFound` if no blob has the
/// given id.
pub fn get_document(
    conn: &mut SqliteConnection,
    document_id: i64,
) -> Result<(DocumentMetadata, Vec<u8>), PersistenceError> {
    let result: Result<DocumentRow, diesel::result::Error> = documents::table
        .filter(documents::document_id.eq(document_id))
        .select(DocumentRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok((
            DocumentMetadata {
                document_id: row.document_id,
                file_name: row.file_name,
                content_type: row.content_type,
                size_bytes: row.size_bytes,
            },
            row.data,
        )),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::DocumentNotFound(document_id))
        }
        Err(e) => Err(e.into()),
    }
}
