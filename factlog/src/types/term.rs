//! Parsed pattern positions.
//!
//! A `Term` is what one tuple position becomes after parsing: a wildcard, a
//! variable to capture, or a concrete literal paired with the key segment it
//! is stored under. A `QueryFact` holds one term per position and is the unit
//! handed to index selection, matcher construction and binding resolution.

use crate::types::{Position, Value};

/// One parsed tuple position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Term {
    /// Matches anything and binds nothing.
    #[default]
    Blank,
    /// Captured under the given name (including its sigil).
    Variable(String),
    /// A literal and the key segment it is stored under.
    Concrete {
        /// The literal as written in the pattern.
        value: Value,
        /// Dictionary identifier (E/A/V), padded base-36 (T) or `1`/`0` (O).
        key: String,
    },
}

impl Term {
    /// Check if this term is the wildcard.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    /// Get the variable name if this term is a variable.
    #[must_use]
    pub fn variable_name(&self) -> Option<&str> {
        match self {
            Self::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// Get the key segment if this term is concrete.
    #[must_use]
    pub fn concrete_key(&self) -> Option<&str> {
        match self {
            Self::Concrete { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// A pattern with every position parsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryFact {
    pub entity: Term,
    pub attribute: Term,
    pub value: Term,
    pub transaction: Term,
    pub operation: Term,
}

impl QueryFact {
    /// Get the term at a position.
    #[must_use]
    pub const fn term(&self, position: Position) -> &Term {
        match position {
            Position::Entity => &self.entity,
            Position::Attribute => &self.attribute,
            Position::Value => &self.value,
            Position::Transaction => &self.transaction,
            Position::Operation => &self.operation,
        }
    }

    /// Iterate the variables of this fact in tuple order.
    pub fn variables(&self) -> impl Iterator<Item = (Position, &str)> {
        Position::ALL
            .into_iter()
            .filter_map(|position| self.term(position).variable_name().map(|n| (position, n)))
    }

    /// Whether resolution should collapse history to the newest fact per
    /// `(entity, attribute)`.
    ///
    /// Only a wildcard transaction asks for current state. A transaction
    /// variable asks for full history, and a concrete transaction can only
    /// ever match one transaction anyway.
    #[must_use]
    pub const fn is_latest_only(&self) -> bool {
        self.transaction.is_blank()
    }
}
