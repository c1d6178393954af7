//! Test projecting an entity's current attributes.

use std::collections::BTreeMap;

use crate::e2e_tests::helpers::*;
use crate::storage::NewFact;

#[test]
fn test_entity_projection() {
    let test = TestDb::new();
    test.write(&[
        ("0001", "name", "bob"),
        ("0001", "age", "34"),
        ("0002", "name", "jim"),
    ]);

    let entity = test.runtime.block_on(test.db.entity("0001")).expect("entity");
    assert_eq!(
        entity,
        BTreeMap::from([("age".to_string(), s("34")), ("name".to_string(), s("bob"))])
    );
}

#[test]
fn test_entity_reflects_latest_values() {
    let test = TestDb::new();
    test.write(&[("0001", "name", "bob"), ("0001", "age", "34")]);
    test.write(&[("0001", "age", "35")]);
    test.commit(&[NewFact::assert("0001", "name", "robert")], &[]);

    let entity = test.runtime.block_on(test.db.entity("0001")).expect("entity");
    assert_eq!(entity.get("age"), Some(&s("35")));
    assert_eq!(entity.get("name"), Some(&s("robert")));
    assert_eq!(entity.len(), 2);
}

#[test]
fn test_unknown_entity_is_empty() {
    let test = TestDb::new();
    test.write(&[("0001", "name", "bob")]);

    let entity = test.runtime.block_on(test.db.entity("0404")).expect("entity");
    assert!(entity.is_empty());
}
