//! High-level database interface.
//!
//! Bundles a store, its hash dictionary, the transactor and an index
//! selector behind one handle for writing facts and querying them.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::query::{Binding, FixedIndexSelector, IndexSelector, Pattern, QueryEngine, QueryError};
use crate::storage::{
    KeyValueStore, LogStore, MemoryStore, NewFact, StoreDictionary, StoreError, TransactError,
    Transactor,
};
use crate::types::{TxnId, Value};

/// A database instance.
pub struct Database<S> {
    store: Arc<S>,
    dictionary: StoreDictionary<S>,
    transactor: Transactor<S>,
    selector: Box<dyn IndexSelector>,
}

impl Database<LogStore> {
    /// Open the log-backed database named by the configuration.
    ///
    /// The log file is created if missing; its parent directory must exist.
    pub async fn open(config: &EngineConfig) -> Result<Self, DatabaseError> {
        let store = LogStore::open(&config.data_file, config.sync_writes)?;
        Self::with_store(Arc::new(store)).await
    }
}

impl Database<MemoryStore> {
    /// Create an empty in-memory database.
    pub async fn in_memory() -> Result<Self, DatabaseError> {
        Self::with_store(Arc::new(MemoryStore::new())).await
    }
}

impl<S: KeyValueStore> Database<S> {
    /// Open a database over an existing store, recovering the last
    /// transaction id from it.
    pub async fn with_store(store: Arc<S>) -> Result<Self, DatabaseError> {
        let transactor = Transactor::open(Arc::clone(&store)).await?;
        Ok(Self {
            dictionary: StoreDictionary::new(Arc::clone(&store)),
            transactor,
            store,
            selector: Box::new(FixedIndexSelector),
        })
    }

    /// Replace the index selection strategy.
    #[must_use]
    pub fn with_selector(mut self, selector: impl IndexSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Write facts as one transaction and return its id.
    pub async fn transact(
        &self,
        facts: &[NewFact],
        metadata: &[(&str, &str)],
    ) -> Result<TxnId, TransactError> {
        self.transactor.transact(facts, metadata).await
    }

    /// Get the last committed transaction id (0 if none).
    pub async fn last_txn(&self) -> TxnId {
        self.transactor.last_txn().await
    }

    /// Evaluate patterns in order, starting from the seed bindings.
    pub async fn q(
        &self,
        patterns: &[Pattern],
        seeds: Vec<Binding>,
    ) -> Result<Vec<Binding>, QueryError> {
        self.engine().evaluate(patterns, seeds).await
    }

    /// Evaluate a single pattern under one binding.
    pub async fn q_pattern(
        &self,
        pattern: &Pattern,
        binding: &Binding,
    ) -> Result<Vec<Binding>, QueryError> {
        pattern.validate()?;
        self.engine().match_pattern(pattern, binding).await
    }

    /// Get the current attribute values of an entity.
    pub async fn entity(&self, id: &str) -> Result<BTreeMap<String, Value>, QueryError> {
        self.engine().entity(id).await
    }

    fn engine(&self) -> QueryEngine<'_, S, StoreDictionary<S>> {
        QueryEngine::new(self.store.as_ref(), &self.dictionary, self.selector.as_ref())
    }
}

/// Errors that can occur while opening a database.
#[derive(Debug)]
pub enum DatabaseError {
    /// Store error.
    Store(StoreError),
    /// Transaction id recovery failed.
    Transact(TransactError),
}

impl std::fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(e) => write!(f, "store error: {e}"),
            Self::Transact(e) => write!(f, "transaction error: {e}"),
        }
    }
}

impl std::error::Error for DatabaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Transact(e) => Some(e),
        }
    }
}

impl From<StoreError> for DatabaseError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<TransactError> for DatabaseError {
    fn from(e: TransactError) -> Self {
        Self::Transact(e)
    }
}
