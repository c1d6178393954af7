//! Query errors.

use crate::storage::{DictionaryError, KeyError, StoreError};
use crate::types::Position;

/// Errors that can occur while evaluating a query.
#[derive(Debug)]
pub enum QueryError {
    /// Malformed pattern or binding, rejected before any I/O.
    InvalidArgument(String),
    /// A literal whose type is not allowed at its position.
    InvalidType(Position),
    /// A literal was never registered with the dictionary.
    ///
    /// Recovered inside the join as "this clause matches nothing".
    NotFound(String),
    /// Reverse lookup of a stored identifier failed.
    Dictionary(DictionaryError),
    /// A scanned key could not be decoded.
    Key(KeyError),
    /// Store error during a scan or lookup.
    Store(StoreError),
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::InvalidType(position) => write!(f, "invalid type at {position}"),
            Self::NotFound(value) => write!(f, "not found: {value}"),
            Self::Dictionary(e) => write!(f, "dictionary error: {e}"),
            Self::Key(e) => write!(f, "key error: {e}"),
            Self::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Dictionary(e) => Some(e),
            Self::Key(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::InvalidArgument(_) | Self::InvalidType(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<DictionaryError> for QueryError {
    fn from(e: DictionaryError) -> Self {
        match e {
            DictionaryError::NotFound(value) => Self::NotFound(value),
            DictionaryError::Store(e) => Self::Store(e),
            e @ DictionaryError::ProbeLimit(_) => Self::Dictionary(e),
        }
    }
}

impl QueryError {
    /// Classify a failed reverse lookup.
    ///
    /// Store faults stay store errors; a missing identifier is a broken
    /// dictionary, never an empty match.
    pub(crate) fn from_reverse_lookup(e: DictionaryError) -> Self {
        match e {
            DictionaryError::Store(e) => Self::Store(e),
            e => Self::Dictionary(e),
        }
    }
}

impl From<KeyError> for QueryError {
    fn from(e: KeyError) -> Self {
        Self::Key(e)
    }
}

impl From<StoreError> for QueryError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
