//! Types shared by the storage layer and the query engine.

pub mod ids;
pub mod position;
pub mod term;
pub mod value;

pub use ids::{HashId, TxnId};
pub use position::Position;
pub use term::{QueryFact, Term};
pub use value::Value;
