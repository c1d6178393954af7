//! Content-addressed hash dictionary.
//!
//! Maps literal strings to fixed-width `HashId`s and back. Entries live in the
//! same store as the indexes, under `hash!<id>` keys whose value is the
//! literal.
//!
//! # Identifiers
//!
//! The first candidate for a literal is the CRC32 of its bytes. If that slot
//! is held by a different literal the next candidate hashes the literal
//! followed by the little-endian probe counter, and so on for up to
//! `MAX_PROBES` candidates. Lookups walk the same chain and stop at the first
//! empty slot, so a literal that was never registered is reported as
//! `NotFound` rather than guessed at.

use std::sync::Arc;

use crate::storage::store::{KeyValueStore, StoreError};
use crate::types::HashId;

/// Key prefix of dictionary entries.
pub const HASH_PREFIX: &str = "hash!";

/// Number of candidate identifiers tried for one literal.
pub const MAX_PROBES: u32 = 16;

/// Read access to a hash dictionary.
#[allow(async_fn_in_trait)]
pub trait HashDictionary: Send + Sync {
    /// Get the identifier of a registered literal.
    ///
    /// Fails with `DictionaryError::NotFound` if the literal was never registered.
    async fn get_hash(&self, value: &str) -> Result<HashId, DictionaryError>;

    /// Get the literal an identifier was issued for.
    ///
    /// Fails with `DictionaryError::NotFound` if the identifier is unknown.
    async fn get(&self, id: &HashId) -> Result<String, DictionaryError>;
}

/// A dictionary persisted in a key-value store.
pub struct StoreDictionary<S> {
    store: Arc<S>,
}

impl<S: KeyValueStore> StoreDictionary<S> {
    /// Create a dictionary over a store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Get the identifier of a literal, registering it if needed.
    ///
    /// Only the writer registers literals; callers must serialize registration.
    pub async fn register(&self, value: &str) -> Result<HashId, DictionaryError> {
        for attempt in 0..MAX_PROBES {
            let id = candidate(value, attempt);
            match self.store.get(&slot_key(&id)).await? {
                Some(existing) if existing == value => return Ok(id),
                Some(_) => {}
                None => {
                    self.store
                        .write_batch(vec![(slot_key(&id), value.to_owned())])
                        .await?;
                    return Ok(id);
                }
            }
        }
        Err(DictionaryError::ProbeLimit(value.to_owned()))
    }
}

impl<S: KeyValueStore> HashDictionary for StoreDictionary<S> {
    async fn get_hash(&self, value: &str) -> Result<HashId, DictionaryError> {
        for attempt in 0..MAX_PROBES {
            let id = candidate(value, attempt);
            match self.store.get(&slot_key(&id)).await? {
                Some(existing) if existing == value => return Ok(id),
                Some(_) => {}
                None => break,
            }
        }
        Err(DictionaryError::NotFound(value.to_owned()))
    }

    async fn get(&self, id: &HashId) -> Result<String, DictionaryError> {
        self.store
            .get(&slot_key(id))
            .await?
            .ok_or_else(|| DictionaryError::NotFound(id.to_string()))
    }
}

/// The identifier tried for `value` on probe `attempt`.
fn candidate(value: &str, attempt: u32) -> HashId {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(value.as_bytes());
    if attempt > 0 {
        hasher.update(&attempt.to_le_bytes());
    }
    HashId::from_digest(hasher.finalize())
}

fn slot_key(id: &HashId) -> String {
    format!("{HASH_PREFIX}{id}")
}

/// Errors that can occur during dictionary operations.
#[derive(Debug)]
pub enum DictionaryError {
    /// The literal or identifier is not in the dictionary.
    NotFound(String),
    /// Every candidate slot for the literal is held by another literal.
    ProbeLimit(String),
    /// Store error.
    Store(StoreError),
}

impl std::fmt::Display for DictionaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(s) => write!(f, "not found in hash dictionary: {s:?}"),
            Self::ProbeLimit(s) => {
                write!(f, "no free identifier for {s:?} after {MAX_PROBES} probes")
            }
            Self::Store(e) => write!(f, "dictionary store error: {e}"),
        }
    }
}

impl std::error::Error for DictionaryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for DictionaryError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
