//! Test that results do not depend on write order or batching.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::e2e_tests::helpers::*;

const PEOPLE: [(&str, &str, &str); 8] = [
    ("0001", "name", "bob"),
    ("0001", "age", "34"),
    ("0002", "name", "jim"),
    ("0002", "age", "23"),
    ("0003", "name", "sue"),
    ("0003", "age", "41"),
    ("0004", "name", "ann"),
    ("0004", "age", "29"),
];

fn run_queries(test: &TestDb) -> Vec<Vec<Binding>> {
    vec![
        test.q(vec![Pattern::from(["?e", "name", "?v"])]),
        test.q(vec![Pattern::from(["0003", "?a", "?v"])]),
        test.q(vec![
            Pattern::from(["?e", "name", "ann"]),
            Pattern::from(["?e", "age", "?age"]),
        ]),
    ]
}

#[test]
fn test_deterministic_sequence() {
    let first = TestDb::new();
    first.write(&PEOPLE);
    let second = TestDb::new();
    second.write(&PEOPLE);

    assert_eq!(run_queries(&first), run_queries(&second));
}

#[test]
fn test_shuffled_write_order_gives_same_answers() {
    let baseline = TestDb::new();
    baseline.write(&PEOPLE);
    let expected = run_queries(&baseline);

    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..10 {
        let mut shuffled = PEOPLE;
        shuffled.shuffle(&mut rng);

        // One transaction per fact, in shuffled order.
        let test = TestDb::new();
        for fact in shuffled {
            test.write(&[fact]);
        }

        let actual = run_queries(&test);
        for (got, want) in actual.iter().zip(&expected) {
            assert_same_bindings(got, want);
        }
    }
}
