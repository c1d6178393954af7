//! Ordered key-value substrate.
//!
//! The query engine only ever reads through this trait, and only through
//! prefix-bounded range scans and point lookups. Writes belong to the
//! transactor and the hash dictionary.
//!
//! # Contract
//!
//! Implementations must ensure:
//! - `scan` yields every key in `[lower, upper]` (inclusive, byte order) in
//!   ascending order, and nothing outside it
//! - `get` returns the last value written for a key
//! - a batch passed to `write_batch` becomes visible to later scans as a whole

use futures::stream::BoxStream;

/// A finite, non-restartable stream of keys produced by a range scan.
pub type KeyStream<'a> = BoxStream<'a, Result<String, StoreError>>;

/// An inclusive range of keys in byte order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRange {
    /// Smallest key in the range.
    pub lower: String,
    /// Largest key in the range.
    pub upper: String,
}

impl KeyRange {
    /// Lowest byte appended to a prefix to form the lower bound.
    pub const LOWEST: char = '\u{0}';
    /// Highest character appended to a prefix to form the upper bound.
    ///
    /// Encodes as `0xC3 0xBF`, which sorts above every ASCII byte.
    pub const HIGHEST: char = '\u{ff}';

    /// Create a range from explicit bounds.
    #[must_use]
    pub fn new(lower: impl Into<String>, upper: impl Into<String>) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    /// The range of all ASCII keys that start with `prefix`.
    #[must_use]
    pub fn prefix(prefix: &str) -> Self {
        Self {
            lower: format!("{prefix}{}", Self::LOWEST),
            upper: format!("{prefix}{}", Self::HIGHEST),
        }
    }

    /// Check if a key falls inside the range.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.lower.as_str() <= key && key <= self.upper.as_str()
    }

    /// Check if the range cannot contain any key.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower > self.upper
    }
}

/// Sorted key-value storage with range iteration.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore: Send + Sync {
    /// Scan every key in the range in ascending order.
    ///
    /// I/O failures are yielded as stream items; consumers stop at the first one.
    fn scan(&self, range: &KeyRange) -> KeyStream<'_>;

    /// Look up the value stored under a key.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a batch of entries, overwriting existing keys.
    async fn write_batch(&self, entries: Vec<(String, String)>) -> Result<(), StoreError>;
}

/// Errors that can occur during store operations.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error.
    Io(std::io::Error),
    /// A lock guarding store state was poisoned by a panicking writer.
    LockPoisoned,
    /// An entry is too large to be framed as a log record.
    RecordTooLarge { size: usize },
    /// Injected fault for simulation.
    InjectedFault(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::LockPoisoned => write!(f, "store lock poisoned"),
            Self::RecordTooLarge { size } => {
                write!(f, "record too large: {size} bytes does not fit a log frame")
            }
            Self::InjectedFault(msg) => write!(f, "injected fault: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
