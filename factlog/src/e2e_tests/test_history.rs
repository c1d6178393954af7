//! Test full-history queries: binding the transaction position.

use crate::e2e_tests::helpers::*;
use crate::storage::NewFact;

fn cool_history() -> TestDb {
    let test = TestDb::new();
    test.write(&[("bob", "is", "cool")]);
    test.write(&[("bob", "is", "NOT cool")]);
    test.write(&[("bob", "is", "cool")]);
    test
}

#[test]
fn test_transaction_variable_returns_every_version() {
    let test = cool_history();

    let result = test.q(vec![Pattern::from(["bob", "is", "?v", "?t"])]);

    // Versions of the same value sort by transaction.
    let position = |txn: u64| {
        result
            .iter()
            .position(|b| b.get("?t") == Some(&Value::from(txn)))
    };
    assert!(position(1) < position(3));

    assert_same_bindings(
        &result,
        &[
            binding(&[("?v", s("cool")), ("?t", Value::from(1u64))]),
            binding(&[("?v", s("NOT cool")), ("?t", Value::from(2u64))]),
            binding(&[("?v", s("cool")), ("?t", Value::from(3u64))]),
        ],
    );
}

#[test]
fn test_concrete_transaction() {
    let test = cool_history();

    let pattern = Pattern::new(vec![
        PatternElement::from("bob"),
        PatternElement::from("is"),
        PatternElement::var("v"),
        PatternElement::from(2u64),
    ]);
    let result = test.q(vec![pattern]);
    assert_eq!(result, vec![binding(&[("?v", s("NOT cool"))])]);
}

#[test]
fn test_transaction_not_yet_written() {
    let test = cool_history();

    let pattern = Pattern::new(vec![
        PatternElement::from("bob"),
        PatternElement::from("is"),
        PatternElement::var("v"),
        PatternElement::from(9u64),
    ]);
    assert!(test.q(vec![pattern]).is_empty());
}

#[test]
fn test_retraction_is_visible_through_operation() {
    let test = TestDb::new();
    test.write(&[("bob", "is", "cool")]);
    test.commit(&[NewFact::retract("bob", "is", "cool")], &[]);

    // Current state reports the retraction as the newest fact.
    let current = test.q(vec![Pattern::from(["bob", "is", "?v", "?_", "?o"])]);
    assert_eq!(
        current,
        vec![binding(&[("?v", s("cool")), ("?o", Value::from(false))])]
    );

    // Pinning the operation filters before collapsing.
    let asserted = Pattern::new(vec![
        PatternElement::from("bob"),
        PatternElement::from("is"),
        PatternElement::var("v"),
        PatternElement::var("t"),
        PatternElement::from(true),
    ]);
    assert_eq!(
        test.q(vec![asserted]),
        vec![binding(&[("?v", s("cool")), ("?t", Value::from(1u64))])]
    );
}

#[test]
fn test_transaction_metadata() {
    let test = TestDb::new();
    let txn = test.commit(
        &facts(&[("0001", "name", "bob")]),
        &[("user_id", "0001")],
    );
    assert_eq!(txn, 1);

    // The transaction entity is the padded base-36 id.
    let result = test.q(vec![Pattern::from(["?txn", "user_id", "?user"])]);
    assert_eq!(
        result,
        vec![binding(&[("?txn", s("000001")), ("?user", s("0001"))])]
    );

    // Join a fact to the user who wrote it.
    let joined = test.q(vec![
        Pattern::from(["?e", "name", "?name", "?t"]),
        Pattern::from(["000001", "user_id", "?user"]),
    ]);
    assert_eq!(
        joined,
        vec![binding(&[
            ("?e", s("0001")),
            ("?name", s("bob")),
            ("?t", Value::from(1u64)),
            ("?user", s("0001")),
        ])]
    );
}
