//! Fact storage.
//!
//! Facts live in a sorted key-value store as index keys. Literals are kept
//! out of the keys: each entity, attribute and value is registered with a
//! hash dictionary and the key carries its fixed-width identifier.
//!
//! # Key Format
//!
//! ```text
//! eavto!<entity id>!<attribute id>!<value id>!<txn base36>!<1|0>
//! hash!<id>  ->  <literal>
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use storage::{MemoryStore, NewFact, Transactor};
//!
//! let store = Arc::new(MemoryStore::new());
//! let transactor = Transactor::open(Arc::clone(&store)).await?;
//! let txn = transactor.transact(&[NewFact::from(("0001", "name", "bob"))], &[]).await?;
//! ```

pub mod dictionary;
pub mod key;
mod log_store;
mod memory;
mod store;
mod transactor;

pub use dictionary::{DictionaryError, HashDictionary, StoreDictionary};
pub use key::{IndexName, IndexedFact, KeyError, KeySegments};
pub use log_store::LogStore;
pub use memory::MemoryStore;
pub use store::{KeyRange, KeyStream, KeyValueStore, StoreError};
pub use transactor::{NewFact, TransactError, Transactor};
