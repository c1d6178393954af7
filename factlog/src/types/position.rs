//! The five positions of a fact tuple.

use std::fmt;

/// One position of an `(entity, attribute, value, transaction, operation)` tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    /// E: the entity identifier.
    Entity,
    /// A: the attribute name.
    Attribute,
    /// V: the value.
    Value,
    /// T: the transaction identifier.
    Transaction,
    /// O: the operation flag (`true` asserts, `false` retracts).
    Operation,
}

impl Position {
    /// All positions in tuple order.
    pub const ALL: [Self; 5] = [
        Self::Entity,
        Self::Attribute,
        Self::Value,
        Self::Transaction,
        Self::Operation,
    ];

    /// Index of this position within a tuple.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Entity => 0,
            Self::Attribute => 1,
            Self::Value => 2,
            Self::Transaction => 3,
            Self::Operation => 4,
        }
    }

    /// The single-letter name used in index names.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Entity => 'e',
            Self::Attribute => 'a',
            Self::Value => 'v',
            Self::Transaction => 't',
            Self::Operation => 'o',
        }
    }

    /// Parse a single-letter position name.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'e' => Some(Self::Entity),
            'a' => Some(Self::Attribute),
            'v' => Some(Self::Value),
            't' => Some(Self::Transaction),
            'o' => Some(Self::Operation),
            _ => None,
        }
    }

    /// Whether literals at this position are stored as dictionary identifiers.
    #[must_use]
    pub const fn is_hashed(self) -> bool {
        matches!(self, Self::Entity | Self::Attribute | Self::Value)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Entity => "entity",
            Self::Attribute => "attribute",
            Self::Value => "value",
            Self::Transaction => "transaction",
            Self::Operation => "operation",
        };
        write!(f, "{name} ({})", self.index())
    }
}
