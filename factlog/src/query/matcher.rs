//! Index selection and key matching.
//!
//! A `Matcher` turns a parsed pattern into one range scan plus a residual
//! check. Walking the index's position order, concrete keys are appended to
//! the scan prefix until the first non-concrete position. Everything after
//! that gap is verified per key.
//!
//! # Invariants
//!
//! - Every key matching the pattern shares the prefix, so the scan never
//!   misses a match.
//! - `matches` compares decoded segments for equality; segment text is never
//!   interpreted as a pattern.

use std::fmt;

use crate::storage::key::{IndexName, KeySegments, SEPARATOR, encode_key, split_key};
use crate::storage::KeyRange;
use crate::types::QueryFact;

/// Chooses the index a pattern is scanned on.
pub trait IndexSelector: Send + Sync {
    /// Select an index for a parsed pattern.
    fn select(&self, fact: &QueryFact) -> IndexName;
}

/// Always selects `eavto`, the only index the writer maintains.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedIndexSelector;

impl IndexSelector for FixedIndexSelector {
    // TODO: pick aevto/vaeto/aveto from the attribute's schema once the
    // writer maintains those indexes.
    fn select(&self, _fact: &QueryFact) -> IndexName {
        IndexName::EAVTO
    }
}

/// A scan prefix plus the concrete segments every key must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    index: IndexName,
    prefix: String,
    segments: KeySegments,
}

impl Matcher {
    /// Build a matcher for a pattern on an index.
    #[must_use]
    pub fn build(index: IndexName, fact: &QueryFact) -> Self {
        let mut segments = KeySegments::default();
        for position in index.positions() {
            if let Some(key) = fact.term(position).concrete_key() {
                segments.set(position, key);
            }
        }

        let mut prefix = index.prefix();
        let leading = index
            .positions()
            .into_iter()
            .map_while(|position| segments.get(position));
        for (i, key) in leading.enumerate() {
            if i > 0 {
                prefix.push(SEPARATOR);
            }
            prefix.push_str(key);
        }

        Self {
            index,
            prefix,
            segments,
        }
    }

    /// The index being scanned.
    #[must_use]
    pub const fn index(&self) -> &IndexName {
        &self.index
    }

    /// The scan prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The range covering every key with the scan prefix.
    ///
    /// The lower bound is the prefix itself: a fully concrete pattern's key
    /// equals its prefix.
    #[must_use]
    pub fn range(&self) -> KeyRange {
        KeyRange::new(
            self.prefix.as_str(),
            format!("{}{}", self.prefix, KeyRange::HIGHEST),
        )
    }

    /// Check a scanned key against every concrete segment.
    ///
    /// Keys from another index or with the wrong shape never match.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        let Ok((index, found)) = split_key(key) else {
            return false;
        };
        index == self.index
            && self.index.positions().into_iter().all(|position| {
                self.segments
                    .get(position)
                    .is_none_or(|expected| found[position.index()] == expected)
            })
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_key(&self.index, &self.segments))
    }
}
