//! Fault-injecting store for testing error propagation.
//!
//! Wraps a `MemoryStore` and, driven by a seeded RNG, fails reads and writes
//! with `StoreError::InjectedFault`. The same seed always produces the same
//! sequence of faults.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::stream::{self, StreamExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::storage::{KeyRange, KeyStream, KeyValueStore, MemoryStore, StoreError};

/// Configuration for fault injection.
#[derive(Debug, Clone, Default)]
pub struct FaultConfig {
    /// Probability that a scan fails partway through (0.0 - 1.0).
    pub scan_error_rate: f64,
    /// Probability of a point lookup error (0.0 - 1.0).
    pub get_error_rate: f64,
    /// Probability of a batch write error (0.0 - 1.0).
    pub write_error_rate: f64,
}

impl FaultConfig {
    /// Fail every scan.
    #[must_use]
    pub fn failing_scans() -> Self {
        Self {
            scan_error_rate: 1.0,
            ..Self::default()
        }
    }

    /// Fail every point lookup.
    #[must_use]
    pub fn failing_gets() -> Self {
        Self {
            get_error_rate: 1.0,
            ..Self::default()
        }
    }
}

/// A store that injects faults.
pub struct FaultyStore {
    inner: MemoryStore,
    fault_config: Mutex<FaultConfig>,
    rng: Mutex<StdRng>,
    injected: AtomicU64,
}

impl FaultyStore {
    /// Create an empty store with no faults.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, FaultConfig::default())
    }

    /// Create an empty store with a fault configuration.
    #[must_use]
    pub fn with_config(seed: u64, fault_config: FaultConfig) -> Self {
        Self {
            inner: MemoryStore::new(),
            fault_config: Mutex::new(fault_config),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            injected: AtomicU64::new(0),
        }
    }

    /// Update the fault configuration.
    pub fn set_fault_config(&self, config: FaultConfig) {
        if let Ok(mut current) = self.fault_config.lock() {
            *current = config;
        }
    }

    /// Number of faults injected so far.
    #[must_use]
    pub fn injected_faults(&self) -> u64 {
        self.injected.load(Ordering::Relaxed)
    }

    fn config(&self) -> FaultConfig {
        self.fault_config
            .lock()
            .map(|config| config.clone())
            .unwrap_or_default()
    }

    /// Check if a fault should be injected based on the given rate.
    fn should_inject_fault(&self, rate: f64) -> bool {
        if rate <= 0.0 {
            return false;
        }
        let hit = self
            .rng
            .lock()
            .is_ok_and(|mut rng| rng.random::<f64>() < rate);
        if hit {
            self.injected.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }

    fn random_below(&self, bound: usize) -> usize {
        self.rng
            .lock()
            .map_or(0, |mut rng| rng.random_range(0..bound))
    }
}

impl KeyValueStore for FaultyStore {
    fn scan(&self, range: &KeyRange) -> KeyStream<'_> {
        if !self.should_inject_fault(self.config().scan_error_rate) {
            return self.inner.scan(range);
        }

        // Fail after yielding a few keys so consumers see a partial scan.
        let fail_after = self.random_below(4);
        self.inner
            .scan(range)
            .take(fail_after)
            .chain(stream::once(async {
                Err::<String, StoreError>(StoreError::InjectedFault(
                    "simulated scan error".to_string(),
                ))
            }))
            .boxed()
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.should_inject_fault(self.config().get_error_rate) {
            return Err(StoreError::InjectedFault("simulated read error".to_string()));
        }
        self.inner.get(key).await
    }

    async fn write_batch(&self, entries: Vec<(String, String)>) -> Result<(), StoreError> {
        if self.should_inject_fault(self.config().write_error_rate) {
            return Err(StoreError::InjectedFault(
                "simulated write error".to_string(),
            ));
        }
        self.inner.write_batch(entries).await
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;

    use super::*;

    async fn seeded(config: FaultConfig) -> FaultyStore {
        let store = FaultyStore::new(7);
        store
            .write_batch(vec![
                ("a".to_string(), String::new()),
                ("b".to_string(), String::new()),
            ])
            .await
            .expect("write");
        store.set_fault_config(config);
        store
    }

    #[tokio::test]
    async fn test_no_faults_by_default() {
        let store = seeded(FaultConfig::default()).await;
        let keys: Vec<String> = store
            .scan(&KeyRange::prefix(""))
            .try_collect()
            .await
            .expect("scan");
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(store.injected_faults(), 0);
    }

    #[tokio::test]
    async fn test_scan_fault_ends_stream_with_error() {
        let store = seeded(FaultConfig::failing_scans()).await;
        let result: Result<Vec<String>, StoreError> =
            store.scan(&KeyRange::prefix("")).try_collect().await;
        assert!(matches!(result, Err(StoreError::InjectedFault(_))));
        assert_eq!(store.injected_faults(), 1);
    }

    #[tokio::test]
    async fn test_get_fault() {
        let store = seeded(FaultConfig::failing_gets()).await;
        assert!(matches!(
            store.get("a").await,
            Err(StoreError::InjectedFault(_))
        ));
    }

    #[tokio::test]
    async fn test_same_seed_same_faults() {
        let config = FaultConfig {
            get_error_rate: 0.5,
            ..FaultConfig::default()
        };
        let first = FaultyStore::with_config(42, config.clone());
        let second = FaultyStore::with_config(42, config);

        for _ in 0..32 {
            assert_eq!(
                first.get("a").await.is_err(),
                second.get("a").await.is_err()
            );
        }
    }
}
