// Life of a query:
// 1. Each pattern position is parsed into a term; literals are hashed
// 2. An index is selected and a matcher built: scan prefix + residual check
// 3. The prefix range is scanned and keys are filtered
// 4. Keys are resolved into bindings (newest fact per entity/attribute
//    unless the transaction is bound)
// 5. Hashed values are looked up and merged into the incoming binding
// 6. The next clause runs once per binding
//
// Life of a write:
// 1. Literals are registered with the hash dictionary
// 2. One index key per fact is appended under the next transaction id

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod database;
pub mod query;
pub mod storage;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, EngineConfig};
pub use database::{Database, DatabaseError};
pub use query::{Binding, Pattern, PatternElement, QueryError};
pub use storage::{NewFact, TransactError};
pub use types::{TxnId, Value};
