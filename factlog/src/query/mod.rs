//! Query engine for the fact log.
//!
//! This module evaluates datalog-style patterns against the stored facts.
//! It supports:
//! - Pattern matching with variables, wildcards and escaped literals
//! - Current-state queries (transaction left as a wildcard)
//! - Full-history queries (transaction bound to a variable)
//! - Conjunctions of patterns, joined left to right
//!
//! # Example
//!
//! ```ignore
//! use query::{Binding, Pattern, QueryEngine, FixedIndexSelector};
//!
//! let engine = QueryEngine::new(&store, &dictionary, &FixedIndexSelector);
//! let bindings = engine
//!     .evaluate(&[Pattern::from(["?e", "name", "?name"])], vec![Binding::new()])
//!     .await?;
//! for binding in &bindings {
//!     println!("{binding}");
//! }
//! ```

mod binding;
mod engine;
mod error;
mod matcher;
mod parse;
mod resolve;
mod scan;
mod types;

pub use binding::Binding;
pub use engine::QueryEngine;
pub use error::QueryError;
pub use matcher::{FixedIndexSelector, IndexSelector, Matcher};
pub use parse::{parse_element, parse_pattern};
pub use resolve::{RawBinding, Resolved, resolve_bindings};
pub use scan::find_matching_keys;
pub use types::{
    ANONYMOUS, ESCAPE, MAX_ELEMENTS, Pattern, PatternElement, VARIABLE_SIGIL, escape, unescape,
};
