//! Test that store failures abort queries and writes.

use std::sync::Arc;

use crate::e2e_tests::helpers::*;
use crate::storage::{StoreError, TransactError};
use crate::testing::{FaultConfig, FaultyStore};

fn seeded_faulty_db() -> (Arc<FaultyStore>, TestDb<FaultyStore>) {
    let store = Arc::new(FaultyStore::new(1));
    let test = TestDb::with_store(Arc::clone(&store));
    test.write(&[
        ("0001", "name", "bob"),
        ("0001", "age", "34"),
        ("0002", "name", "jim"),
    ]);
    (store, test)
}

#[test]
fn test_scan_error_aborts_query() {
    let (store, test) = seeded_faulty_db();
    store.set_fault_config(FaultConfig::failing_scans());

    let result = test.try_q(
        vec![Pattern::from(["?e", "name", "?v"])],
        vec![Binding::new()],
    );
    assert!(matches!(
        result,
        Err(QueryError::Store(StoreError::InjectedFault(_)))
    ));
}

#[test]
fn test_scan_error_returns_no_partial_results() {
    let (store, test) = seeded_faulty_db();
    store.set_fault_config(FaultConfig {
        scan_error_rate: 1.0,
        ..FaultConfig::default()
    });

    let result = test.try_q(
        vec![
            Pattern::from(["0001", "name", "?v"]),
            Pattern::from(["0001", "age", "?age"]),
        ],
        vec![Binding::new()],
    );
    assert!(result.is_err());
    assert!(store.injected_faults() >= 1);
}

#[test]
fn test_lookup_error_is_fatal_not_empty() {
    let (store, test) = seeded_faulty_db();
    store.set_fault_config(FaultConfig::failing_gets());

    // A failing dictionary read is a store error, not "literal not found".
    let result = test.try_q(
        vec![Pattern::from(["?e", "name", "bob"])],
        vec![Binding::new()],
    );
    assert!(matches!(
        result,
        Err(QueryError::Store(StoreError::InjectedFault(_)))
    ));
}

#[test]
fn test_reverse_lookup_store_error_is_a_store_error() {
    let (store, test) = seeded_faulty_db();
    store.set_fault_config(FaultConfig::failing_gets());

    // No literals to hash, so the first read is the reverse lookup of a
    // scanned identifier.
    let result = test.try_q(
        vec![Pattern::from(["?e", "?a", "?v"])],
        vec![Binding::new()],
    );
    assert!(matches!(
        result,
        Err(QueryError::Store(StoreError::InjectedFault(_)))
    ));
}

#[test]
fn test_write_error_does_not_consume_transaction_id() {
    let (store, test) = seeded_faulty_db();
    store.set_fault_config(FaultConfig {
        write_error_rate: 1.0,
        ..FaultConfig::default()
    });

    let result = test
        .runtime
        .block_on(test.db.transact(&facts(&[("0003", "name", "sue")]), &[]));
    assert!(matches!(
        result,
        Err(TransactError::Dictionary(_) | TransactError::Store(_))
    ));
    assert_eq!(test.last_txn(), 1);

    store.set_fault_config(FaultConfig::default());
    assert_eq!(test.write(&[("0003", "name", "sue")]), 2);
}

#[test]
fn test_random_faults_never_yield_wrong_results() {
    let (store, test) = seeded_faulty_db();
    store.set_fault_config(FaultConfig {
        scan_error_rate: 0.3,
        get_error_rate: 0.1,
        write_error_rate: 0.0,
    });

    let expected = [
        binding(&[("?e", s("0001")), ("?v", s("bob"))]),
        binding(&[("?e", s("0002")), ("?v", s("jim"))]),
    ];
    for _ in 0..50 {
        // Either the full answer or an error, never a partial one.
        if let Ok(result) = test.try_q(
            vec![Pattern::from(["?e", "name", "?v"])],
            vec![Binding::new()],
        ) {
            assert_same_bindings(&result, &expected);
        }
    }
}
