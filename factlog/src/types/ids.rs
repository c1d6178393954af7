//! Identifier types for stored facts.
//!
//! Entity, attribute and value literals never appear in index keys directly.
//! They are replaced by a `HashId`, the fixed-width identifier handed out by
//! the hash dictionary. Transactions are identified by a `TxnId`.

use std::fmt;

/// A transaction identifier.
///
/// Assigned exclusively by the writer; strictly increasing and never reused.
pub type TxnId = u64;

/// A content-addressed identifier for an entity, attribute or value literal.
///
/// # Invariants
///
/// - Identifiers produced by the dictionary are exactly `HashId::WIDTH`
///   lowercase hex digits, so they never contain the key separator.
/// - Identifiers decoded from a key are treated as opaque until reverse lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct HashId(String);

impl HashId {
    /// Number of characters in a dictionary-issued identifier.
    pub const WIDTH: usize = 8;

    /// Create an identifier from a 32-bit digest.
    ///
    /// # Examples
    ///
    /// ```
    /// use factlog::types::HashId;
    /// let id = HashId::from_digest(0xbeef);
    /// assert_eq!(id.as_str(), "0000beef");
    /// ```
    #[must_use]
    pub fn from_digest(digest: u32) -> Self {
        Self(format!("{digest:08x}"))
    }

    /// Wrap a key segment without validating it.
    #[must_use]
    pub fn from_segment(segment: &str) -> Self {
        Self(segment.to_owned())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier, returning the underlying string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for HashId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
