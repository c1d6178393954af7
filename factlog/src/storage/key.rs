//! Index key encoding.
//!
//! # Key Format
//!
//! ```text
//! <index-name>!<seg0>!<seg1>!<seg2>!<seg3>!<seg4>
//! ```
//!
//! `<index-name>` is a permutation of `eavto` naming the order the segments
//! appear in. Entity, attribute and value segments are `HashId`s, the
//! transaction segment is a six digit zero-padded base-36 number and the
//! operation segment is `1` (assert) or `0` (retract).
//!
//! Every segment is fixed width or separator-free, so byte order of whole keys
//! follows segment order: all keys sharing a run of leading segments are
//! contiguous, and transactions sort numerically within a group.

use std::fmt;

use crate::types::{HashId, Position, TxnId};

/// Separates the index name and segments of a key.
pub const SEPARATOR: char = '!';

/// Stands in for a non-concrete segment when a partial key is rendered.
///
/// Never persisted.
pub const WILDCARD: &str = "*";

/// Number of base-36 digits in a transaction segment.
pub const TXN_WIDTH: usize = TXN_DIGITS as usize;

const TXN_DIGITS: u32 = 6;

/// Largest transaction id that fits in a transaction segment.
pub const MAX_TXN_ID: TxnId = 36_u64.pow(TXN_DIGITS) - 1;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// The component order of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexName([Position; 5]);

impl IndexName {
    /// Entity, attribute, value, transaction, operation.
    pub const EAVTO: Self = Self(Position::ALL);

    /// Parse an index name such as `"eavto"`.
    pub fn parse(name: &str) -> Result<Self, KeyError> {
        let mut positions = [Position::Entity; 5];
        let mut seen = [false; 5];
        let mut count = 0;

        for c in name.chars() {
            let position = Position::from_char(c)
                .filter(|p| count < 5 && !seen[p.index()])
                .ok_or_else(|| KeyError::UnknownIndex(name.to_owned()))?;
            seen[position.index()] = true;
            positions[count] = position;
            count += 1;
        }

        if count != 5 {
            return Err(KeyError::UnknownIndex(name.to_owned()));
        }
        Ok(Self(positions))
    }

    /// The positions in key order.
    #[must_use]
    pub const fn positions(&self) -> [Position; 5] {
        self.0
    }

    /// The key prefix shared by every key in this index.
    #[must_use]
    pub fn prefix(&self) -> String {
        format!("{self}{SEPARATOR}")
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for position in self.0 {
            write!(f, "{}", position.as_char())?;
        }
        Ok(())
    }
}

/// Key segments by logical position; `None` marks a non-concrete position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeySegments([Option<String>; 5]);

impl KeySegments {
    /// Segments for a fully concrete fact.
    #[must_use]
    pub fn concrete(
        entity: &HashId,
        attribute: &HashId,
        value: &HashId,
        txn_segment: &str,
        operation: bool,
    ) -> Self {
        Self([
            Some(entity.as_str().to_owned()),
            Some(attribute.as_str().to_owned()),
            Some(value.as_str().to_owned()),
            Some(txn_segment.to_owned()),
            Some(encode_operation(operation).to_owned()),
        ])
    }

    /// Set the segment for a position.
    pub fn set(&mut self, position: Position, segment: impl Into<String>) {
        self.0[position.index()] = Some(segment.into());
    }

    /// Get the segment for a position.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<&str> {
        self.0[position.index()].as_deref()
    }
}

/// A stored key decoded back into its logical positions.
///
/// Entity, attribute and value stay as identifiers pending reverse lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFact {
    pub entity: HashId,
    pub attribute: HashId,
    pub value: HashId,
    pub txn: TxnId,
    pub operation: bool,
}

/// Encode a key, writing `WILDCARD` for non-concrete segments.
#[must_use]
pub fn encode_key(index: &IndexName, segments: &KeySegments) -> String {
    let mut key = index.to_string();
    for position in index.positions() {
        key.push(SEPARATOR);
        key.push_str(segments.get(position).unwrap_or(WILDCARD));
    }
    key
}

/// Split a key into its index name and its segments by logical position.
pub fn split_key(key: &str) -> Result<(IndexName, [&str; 5]), KeyError> {
    let mut parts = key.split(SEPARATOR);
    let index = IndexName::parse(parts.next().unwrap_or_default())?;

    let mut segments = [""; 5];
    for position in index.positions() {
        segments[position.index()] = parts
            .next()
            .ok_or_else(|| KeyError::Malformed(key.to_owned()))?;
    }
    if parts.next().is_some() {
        return Err(KeyError::Malformed(key.to_owned()));
    }
    Ok((index, segments))
}

/// Decode a stored key.
pub fn decode_key(key: &str) -> Result<IndexedFact, KeyError> {
    let (_, segments) = split_key(key)?;
    Ok(IndexedFact {
        entity: HashId::from_segment(segments[Position::Entity.index()]),
        attribute: HashId::from_segment(segments[Position::Attribute.index()]),
        value: HashId::from_segment(segments[Position::Value.index()]),
        txn: decode_txn(segments[Position::Transaction.index()])?,
        operation: decode_operation(segments[Position::Operation.index()])?,
    })
}

/// Encode a transaction id as a fixed-width base-36 segment.
///
/// # Examples
///
/// ```
/// use factlog::storage::key::encode_txn;
/// assert_eq!(encode_txn(1).unwrap(), "000001");
/// assert_eq!(encode_txn(36).unwrap(), "000010");
/// ```
pub fn encode_txn(txn: TxnId) -> Result<String, KeyError> {
    if txn > MAX_TXN_ID {
        return Err(KeyError::TransactionOutOfRange(txn));
    }

    let mut digits = [b'0'; TXN_WIDTH];
    let mut rest = txn;
    for slot in digits.iter_mut().rev() {
        #[allow(clippy::cast_possible_truncation)] // always < 36
        let digit = (rest % 36) as usize;
        *slot = BASE36_DIGITS[digit];
        rest /= 36;
    }
    Ok(digits.iter().map(|&b| char::from(b)).collect())
}

/// Decode a transaction segment.
pub fn decode_txn(segment: &str) -> Result<TxnId, KeyError> {
    let well_formed = segment.len() == TXN_WIDTH
        && segment
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase());
    if !well_formed {
        return Err(KeyError::InvalidTransaction(segment.to_owned()));
    }
    TxnId::from_str_radix(segment, 36).map_err(|_| KeyError::InvalidTransaction(segment.to_owned()))
}

/// Encode an operation flag.
#[must_use]
pub const fn encode_operation(operation: bool) -> &'static str {
    if operation { "1" } else { "0" }
}

/// Decode an operation segment.
pub fn decode_operation(segment: &str) -> Result<bool, KeyError> {
    match segment {
        "1" => Ok(true),
        "0" => Ok(false),
        _ => Err(KeyError::InvalidOperation(segment.to_owned())),
    }
}

/// Errors that can occur while encoding or decoding keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The key does not have an index name followed by five segments.
    Malformed(String),
    /// The index name is not a permutation of `eavto`.
    UnknownIndex(String),
    /// The transaction segment is not a six digit base-36 number.
    InvalidTransaction(String),
    /// The operation segment is not `1` or `0`.
    InvalidOperation(String),
    /// The transaction id does not fit in a transaction segment.
    TransactionOutOfRange(TxnId),
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(key) => write!(f, "malformed index key: {key}"),
            Self::UnknownIndex(name) => write!(f, "unknown index name: {name}"),
            Self::InvalidTransaction(s) => write!(f, "invalid transaction segment: {s}"),
            Self::InvalidOperation(s) => write!(f, "invalid operation segment: {s}"),
            Self::TransactionOutOfRange(txn) => write!(
                f,
                "transaction id {txn} exceeds the largest encodable id {MAX_TXN_ID}"
            ),
        }
    }
}

impl std::error::Error for KeyError {}
