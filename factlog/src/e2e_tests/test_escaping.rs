//! Test literals that look like variables.

use crate::e2e_tests::helpers::*;
use crate::query::escape;

#[test]
fn test_sigil_and_escape_literals_round_trip() {
    let test = TestDb::new();
    test.write(&[("0001", "symbol", "?"), ("0002", "symbol", "\\")]);

    for literal in ["?", "\\"] {
        let result = test.q(vec![Pattern::from(["?e", "symbol", escape(literal).as_str()])]);
        assert_eq!(result.len(), 1, "literal {literal:?}");

        let e = result[0].get("?e").expect("bound entity");
        let back = test.q(vec![Pattern::from([
            e.as_str().expect("string entity"),
            "symbol",
            "?v",
        ])]);
        assert_eq!(back, vec![binding(&[("?v", s(literal))])]);
    }
}

#[test]
fn test_unescaped_sigil_is_a_variable() {
    let test = TestDb::new();
    test.write(&[("0001", "symbol", "?")]);

    // "?" on its own names a variable, so it binds instead of filtering.
    let result = test.q(vec![Pattern::from(["0001", "symbol", "?"])]);
    assert_eq!(result, vec![binding(&[("?", s("?"))])]);
}

#[test]
fn test_variable_like_values_are_substituted_safely() {
    let test = TestDb::new();
    test.write(&[("?weird", "name", "bob"), ("?weird", "age", "34")]);

    // "?weird" comes back as a value and is substituted into the next clause
    // as a literal, never as a variable.
    let result = test.q(vec![
        Pattern::from(["?e", "name", "bob"]),
        Pattern::from(["?e", "age", "?age"]),
    ]);
    assert_eq!(
        result,
        vec![binding(&[("?e", s("?weird")), ("?age", s("34"))])]
    );

    let direct = test.q(vec![Pattern::from(["\\?weird", "age", "?age"])]);
    assert_eq!(direct, vec![binding(&[("?age", s("34"))])]);
}

#[test]
fn test_anonymous_variable_binds_nothing() {
    let test = TestDb::new();
    test.write(&[("0001", "name", "bob")]);

    let result = test.q(vec![Pattern::from(["?_", "name", "?_"])]);
    assert_eq!(result, vec![Binding::new()]);
}
