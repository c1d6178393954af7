//! Test that literals never written short-circuit to no matches.

use crate::e2e_tests::helpers::*;

#[test]
fn test_unknown_value_matches_nothing() {
    let test = TestDb::new();
    test.write(&[("0001", "name", "bob")]);

    let result = test.try_q(
        vec![Pattern::from(["?e", "name", "alice"])],
        vec![Binding::new()],
    );
    assert_eq!(result.expect("not an error"), Vec::<Binding>::new());
}

#[test]
fn test_unknown_attribute_matches_nothing() {
    let test = TestDb::new();
    test.write(&[("0001", "name", "bob")]);

    assert!(test.q(vec![Pattern::from(["?e", "email", "?v"])]).is_empty());
}

#[test]
fn test_unknown_literal_in_query_on_empty_database() {
    let test = TestDb::new();
    assert!(test.q(vec![Pattern::from(["0001", "name", "?v"])]).is_empty());
}

#[test]
fn test_only_the_affected_branch_is_dropped() {
    let test = TestDb::new();
    test.write(&[
        ("0001", "friend", "0002"),
        ("0001", "friend_name", "jim"),
        ("0002", "name", "jim"),
    ]);

    // The seed binding ?f to an unwritten entity yields nothing; the other
    // seed still produces its result.
    let result = test.q_with(
        vec![Pattern::from(["?f", "name", "?name"])],
        vec![
            binding(&[("?f", s("9999"))]),
            binding(&[("?f", s("0002"))]),
        ],
    );
    assert_eq!(
        result,
        vec![binding(&[("?f", s("0002")), ("?name", s("jim"))])]
    );
}

#[test]
fn test_unwritable_transaction_id_matches_nothing() {
    let test = TestDb::new();
    test.write(&[("bob", "is", "cool")]);

    let result = test.try_q(
        vec![Pattern::new(vec![
            PatternElement::from("bob"),
            PatternElement::from("is"),
            PatternElement::from("?v"),
            PatternElement::from(3_000_000_000u64),
        ])],
        vec![Binding::new()],
    );
    assert_eq!(result.expect("not an error"), Vec::<Binding>::new());
}
