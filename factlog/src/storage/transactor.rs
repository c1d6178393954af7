//! Fact writer.
//!
//! The transactor is the only component that appends facts. It assigns
//! transaction ids, registers every entity, attribute and value literal with
//! the hash dictionary, and writes one index key per fact per maintained
//! index.
//!
//! # Transaction Ids
//!
//! Ids start at 1 and increase by one per committed transaction. On open the
//! transactor scans the persisted index keys and resumes after the highest id
//! it finds, so a restarted writer neither reuses nor skips ids.

use std::sync::Arc;

use futures::{TryStreamExt, future};
use tokio::sync::Mutex;
use tracing::info;

use crate::storage::dictionary::{DictionaryError, StoreDictionary};
use crate::storage::key::{IndexName, KeyError, KeySegments, decode_key, encode_key, encode_txn};
use crate::storage::store::{KeyRange, KeyValueStore, StoreError};
use crate::types::TxnId;

/// A fact to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFact {
    pub entity: String,
    pub attribute: String,
    pub value: String,
    /// `true` asserts the fact, `false` retracts it.
    pub operation: bool,
}

impl NewFact {
    /// An assertion.
    #[must_use]
    pub fn assert(
        entity: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            entity: entity.into(),
            attribute: attribute.into(),
            value: value.into(),
            operation: true,
        }
    }

    /// A retraction.
    #[must_use]
    pub fn retract(
        entity: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            operation: false,
            ..Self::assert(entity, attribute, value)
        }
    }
}

impl From<(&str, &str, &str)> for NewFact {
    fn from((entity, attribute, value): (&str, &str, &str)) -> Self {
        Self::assert(entity, attribute, value)
    }
}

/// Appends facts to a store.
pub struct Transactor<S> {
    store: Arc<S>,
    dictionary: StoreDictionary<S>,
    indexes: Vec<IndexName>,
    /// Last committed transaction id; held for the whole of a commit.
    last_txn: Mutex<TxnId>,
}

impl<S: KeyValueStore> Transactor<S> {
    /// Open a transactor, recovering the last used transaction id.
    pub async fn open(store: Arc<S>) -> Result<Self, TransactError> {
        let indexes = vec![IndexName::EAVTO];
        let last_txn = recover_last_txn(store.as_ref(), &indexes).await?;
        info!(last_txn, "transactor recovered last transaction id");

        Ok(Self {
            dictionary: StoreDictionary::new(Arc::clone(&store)),
            store,
            indexes,
            last_txn: Mutex::new(last_txn),
        })
    }

    /// Get the last committed transaction id (0 if none).
    pub async fn last_txn(&self) -> TxnId {
        *self.last_txn.lock().await
    }

    /// The entity id transaction metadata is recorded on.
    pub fn transaction_entity(txn: TxnId) -> Result<String, KeyError> {
        encode_txn(txn)
    }

    /// Write facts as one transaction and return its id.
    ///
    /// Each `(attribute, value)` pair in `metadata` is asserted on the
    /// transaction's own entity (see `transaction_entity`).
    pub async fn transact(
        &self,
        facts: &[NewFact],
        metadata: &[(&str, &str)],
    ) -> Result<TxnId, TransactError> {
        if facts.is_empty() && metadata.is_empty() {
            return Err(TransactError::EmptyTransaction);
        }

        let mut last_txn = self.last_txn.lock().await;
        let txn = *last_txn + 1;
        let txn_segment = encode_txn(txn)?;

        let rows = facts
            .iter()
            .map(|f| (f.entity.as_str(), f.attribute.as_str(), f.value.as_str(), f.operation))
            .chain(
                metadata
                    .iter()
                    .map(|&(attribute, value)| (txn_segment.as_str(), attribute, value, true)),
            );

        let mut entries = Vec::with_capacity((facts.len() + metadata.len()) * self.indexes.len());
        for (entity, attribute, value, operation) in rows {
            let segments = KeySegments::concrete(
                &self.dictionary.register(entity).await?,
                &self.dictionary.register(attribute).await?,
                &self.dictionary.register(value).await?,
                &txn_segment,
                operation,
            );
            for index in &self.indexes {
                entries.push((encode_key(index, &segments), String::new()));
            }
        }

        let key_count = entries.len();
        self.store.write_batch(entries).await?;
        *last_txn = txn;

        info!(
            txn,
            facts = facts.len(),
            metadata = metadata.len(),
            keys = key_count,
            "committed transaction"
        );
        Ok(txn)
    }
}

/// Find the highest transaction id among the keys of the given indexes.
async fn recover_last_txn<S: KeyValueStore>(
    store: &S,
    indexes: &[IndexName],
) -> Result<TxnId, TransactError> {
    let mut last_txn = 0;
    for index in indexes {
        let highest = store
            .scan(&KeyRange::prefix(&index.prefix()))
            .map_err(TransactError::Store)
            .try_fold(0, |highest: TxnId, key| {
                future::ready(
                    decode_key(&key)
                        .map(|fact| highest.max(fact.txn))
                        .map_err(TransactError::Key),
                )
            })
            .await?;
        last_txn = last_txn.max(highest);
    }
    Ok(last_txn)
}

/// Errors that can occur while writing facts.
#[derive(Debug)]
pub enum TransactError {
    /// Neither facts nor metadata were given.
    EmptyTransaction,
    /// Key encoding or decoding failed.
    Key(KeyError),
    /// Registering a literal failed.
    Dictionary(DictionaryError),
    /// Store error.
    Store(StoreError),
}

impl std::fmt::Display for TransactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTransaction => write!(f, "transaction has no facts"),
            Self::Key(e) => write!(f, "key error: {e}"),
            Self::Dictionary(e) => write!(f, "dictionary error: {e}"),
            Self::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for TransactError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EmptyTransaction => None,
            Self::Key(e) => Some(e),
            Self::Dictionary(e) => Some(e),
            Self::Store(e) => Some(e),
        }
    }
}

impl From<KeyError> for TransactError {
    fn from(e: KeyError) -> Self {
        Self::Key(e)
    }
}

impl From<DictionaryError> for TransactError {
    fn from(e: DictionaryError) -> Self {
        Self::Dictionary(e)
    }
}

impl From<StoreError> for TransactError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
