// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::create_test_persistence;
use crate::{DocumentMetadata, PersistenceError, Persistence};

#[test]
fn test_put_and_get_document() {
    let mut persistence: Persistence = create_test_persistence();

    let metadata: DocumentMetadata = persistence
        .put_document("ds160-draft.pdf", "application/pdf", vec![1, 2, 3, 4])
        .unwrap();

    assert_eq!(metadata.file_name, "ds160-draft.pdf");
    assert_eq!(metadata.content_type, "application/pdf");
    assert_eq!(metadata.size_bytes, 4);

    let (reloaded, bytes) = persistence.get_document(metadata.document_id).unwrap();
    assert_eq!(reloaded, metadata);
    assert_eq!(bytes, vec![1, 2, 3, 4]);
}

#[test]
fn test_delete_document_removes_blob() {
    let mut persistence: Persistence = create_test_persistence();

    let metadata: DocumentMetadata = persistence
        .put_document("notes.pdf", "application/pdf", vec![9, 9])
        .unwrap();
    persistence.delete_document(metadata.document_id).unwrap();

    let result = persistence.get_document(metadata.document_id);
    assert_eq!(
        result.unwrap_err(),
        PersistenceError::DocumentNotFound(metadata.document_id)
    );
}

#[test]
fn test_delete_unknown_document_fails() {
    let mut persistence: Persistence = create_test_persistence();

    let result = persistence.delete_document(404);
    assert_eq!(result.unwrap_err(), PersistenceError::DocumentNotFound(404));
}
