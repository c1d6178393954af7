//! Helpers shared by unit and end-to-end tests.

mod faulty_store;

pub use faulty_store::{FaultConfig, FaultyStore};

use crate::query::Binding;
use crate::storage::NewFact;
use crate::types::Value;

/// Build assertions from `(entity, attribute, value)` triples.
#[must_use]
pub fn facts(triples: &[(&str, &str, &str)]) -> Vec<NewFact> {
    triples.iter().copied().map(NewFact::from).collect()
}

/// Build a binding from name/value pairs, keeping their order.
#[must_use]
pub fn binding(entries: &[(&str, Value)]) -> Binding {
    entries.iter().cloned().collect()
}

/// Assert two binding lists hold the same bindings, ignoring order.
///
/// Scan order follows dictionary identifiers, not insertion order, so
/// tests over several entities compare this way.
#[track_caller]
pub fn assert_same_bindings(actual: &[Binding], expected: &[Binding]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "expected {expected:?}, got {actual:?}"
    );
    for binding in expected {
        assert!(
            actual.contains(binding),
            "missing {binding} in {actual:?}"
        );
    }
}
