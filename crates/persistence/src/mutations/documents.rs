// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Document blob store mutations.
//!
//! The blob store is the local adapter for the external document store
//! collaborator: opaque bytes in, a reference id out.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::backend::get_last_insert_rowid;
use crate::data_models::DocumentMetadata;
use crate::diesel_schema::documents;
use crate::error::PersistenceError;
use crate::timestamps::now_timestamp;

#[derive(Insertable)]
#[diesel(table_name = documents)]
struct NewDocumentRow {
    file_name: String,
    content_type: String,
    size_bytes: i64,
    data: Vec<u8>,
    created_at: String,
}

/// Stores a document blob and returns its metadata.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `file_name` - The original file name
/// * `content_type` - The MIME content type
/// * `bytes` - The file contents
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_document(
    conn: &mut SqliteConnection,
    file_name: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> Result<DocumentMetadata, PersistenceError> {
    let size_bytes: i64 = i64::try_from(bytes.len())
        .map_err(|_| PersistenceError::SerializationError(String::from("document too large")))?;

    let row: NewDocumentRow = NewDocumentRow {
        file_name: file_name.to_string(),
        content_type: content_type.to_string(),
        size_bytes,
        data: bytes,
        created_at: now_timestamp()?,
    };

    diesel::insert_into(documents::table)
        .values(&row)
        .execute(conn)?;
    let document_id: i64 = get_last_insert_rowid(conn)?;

    Ok(DocumentMetadata {
        document_id,
        file_name: file_name.to_string(),
        content_type: content_type.to_string(),
        size_bytes,
    })
}

/// Deletes a document blob.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `document_id` - The document to delete
///
/// # Errors
///
/// Returns `PersistenceError::DocumentNotFound` if no blob has that id.
pub fn delete_document(
    conn: &mut SqliteConnection,
    document_id: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(documents::table.filter(documents::document_id.eq(document_id)))
            .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::DocumentNotFound(document_id));
    }
    Ok(())
}
