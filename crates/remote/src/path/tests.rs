// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test]
fn reject_invalid_segments() {
    assert!(UserId::new("").is_err());
    assert!(UserId::new("u1/tracks").is_err());
    assert!(matches!(
        "a/b".parse::<DocumentId>(),
        Err(Error::InvalidPath(_))
    ));
    assert_eq!("u1", UserId::new("u1").unwrap().as_str());
}

#[test]
fn record_id_as_document_id() {
    let id = DocumentId::from_record_id(42);
    assert_eq!("42", id.as_str());
    assert_eq!(Some(42), id.parse_record_id());
    assert_eq!(
        Some(-3),
        DocumentId::from_record_id(-3).parse_record_id()
    );
}

#[test]
fn parse_decimal_record_ids() {
    for id in ["7", "007", "+7"] {
        assert_eq!(
            Some(7),
            DocumentId::new(id).unwrap().parse_record_id(),
            "{id}"
        );
    }
    assert_eq!(Some(0), DocumentId::new("-0").unwrap().parse_record_id());
}

#[test]
fn reject_non_numeric_record_ids() {
    for id in ["abc", "7a", " 7", "7.0", "99999999999999999999"] {
        assert_eq!(
            None,
            DocumentId::new(id).unwrap().parse_record_id(),
            "{id}"
        );
    }
}

#[test]
fn user_table_paths() {
    let user_id = UserId::new("u1").unwrap();
    let collection = CollectionPath::for_user_table(&user_id, Table::Tracks);
    assert_eq!("users/u1/tracks", collection.as_str());

    let path = DocumentPath::for_user_record(&user_id, Table::Tracks, 7);
    assert_eq!("users/u1/tracks/7", path.to_string());
    assert_eq!(&collection, path.collection());
    assert_eq!("7", path.id().as_str());
}
