//! Query pattern types.
//!
//! A pattern is a sequence of up to five elements in `(entity, attribute,
//! value, transaction, operation)` order. Each element is a wildcard, a
//! variable, or a literal. Missing trailing elements are wildcards.
//!
//! # Textual Surface
//!
//! Patterns are usually written as strings:
//!
//! - `?_` is the anonymous wildcard
//! - `?name` is a variable
//! - a literal beginning with `?` or `\` is written with a leading `\`
//! - anything else is a literal
//!
//! Integers and booleans are always literals.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::binding::Binding;
use super::error::QueryError;
use crate::types::{Position, Value};

/// Prefix that marks a variable.
pub const VARIABLE_SIGIL: char = '?';

/// Prefix that marks an escaped literal.
pub const ESCAPE: char = '\\';

/// The anonymous variable.
pub const ANONYMOUS: &str = "?_";

/// Maximum number of elements in a pattern.
pub const MAX_ELEMENTS: usize = 5;

/// Escape a literal string so it can't be read as a variable.
///
/// # Examples
///
/// ```
/// use factlog::query::escape;
///
/// assert_eq!(escape("bob"), "bob");
/// assert_eq!(escape("?"), "\\?");
/// assert_eq!(escape("\\"), "\\\\");
/// ```
#[must_use]
pub fn escape(literal: &str) -> String {
    if literal.starts_with(VARIABLE_SIGIL) || literal.starts_with(ESCAPE) {
        format!("{ESCAPE}{literal}")
    } else {
        literal.to_owned()
    }
}

/// Strip one leading escape character, if present.
#[must_use]
pub fn unescape(text: &str) -> &str {
    text.strip_prefix(ESCAPE).unwrap_or(text)
}

/// One element of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum PatternElement {
    /// Matches anything and binds nothing.
    #[default]
    Blank,
    /// A variable, named with its sigil (`?e`).
    Variable(String),
    /// A literal, already unescaped.
    Literal(Value),
}

impl PatternElement {
    /// Classify surface text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text == ANONYMOUS {
            Self::Blank
        } else if text.starts_with(VARIABLE_SIGIL) {
            Self::Variable(text.to_owned())
        } else {
            Self::Literal(Value::string(unescape(text)))
        }
    }

    /// Create a variable element. The sigil is added if missing.
    #[must_use]
    pub fn var(name: &str) -> Self {
        if name.starts_with(VARIABLE_SIGIL) {
            Self::parse(name)
        } else {
            Self::parse(&format!("{VARIABLE_SIGIL}{name}"))
        }
    }

    /// Create a literal element. No escaping is applied.
    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Get the variable name if this element is a variable.
    #[must_use]
    pub fn variable_name(&self) -> Option<&str> {
        match self {
            Self::Variable(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for PatternElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => f.write_str(ANONYMOUS),
            Self::Variable(name) => f.write_str(name),
            Self::Literal(Value::String(s)) => write!(f, "{:?}", escape(s)),
            Self::Literal(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for PatternElement {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<String> for PatternElement {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<u64> for PatternElement {
    fn from(n: u64) -> Self {
        Self::Literal(Value::Integer(n))
    }
}

impl From<bool> for PatternElement {
    fn from(b: bool) -> Self {
        Self::Literal(Value::Boolean(b))
    }
}

impl From<Value> for PatternElement {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::parse(&text),
            other => Self::Literal(other),
        }
    }
}

impl From<PatternElement> for Value {
    fn from(element: PatternElement) -> Self {
        match element {
            PatternElement::Blank => Self::string(ANONYMOUS),
            PatternElement::Variable(name) => Self::String(name),
            PatternElement::Literal(Self::String(s)) => Self::String(escape(&s)),
            PatternElement::Literal(value) => value,
        }
    }
}

/// A query pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern {
    elements: Vec<PatternElement>,
}

impl Pattern {
    /// Create a pattern from its elements.
    #[must_use]
    pub const fn new(elements: Vec<PatternElement>) -> Self {
        Self { elements }
    }

    /// Get the element at a position. Missing trailing elements are blank.
    #[must_use]
    pub fn element(&self, position: Position) -> &PatternElement {
        static BLANK: PatternElement = PatternElement::Blank;
        self.elements.get(position.index()).unwrap_or(&BLANK)
    }

    /// Get the elements as written.
    #[must_use]
    pub fn elements(&self) -> &[PatternElement] {
        &self.elements
    }

    /// Reject patterns with more elements than a fact has positions.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.elements.len() > MAX_ELEMENTS {
            return Err(QueryError::InvalidArgument(format!(
                "pattern has {} elements, at most {MAX_ELEMENTS} allowed",
                self.elements.len()
            )));
        }
        Ok(())
    }

    /// Substitute every variable bound in `binding` with its value.
    #[must_use]
    pub fn bind(&self, binding: &Binding) -> Self {
        let elements = self
            .elements
            .iter()
            .map(|element| match element {
                PatternElement::Variable(name) => binding
                    .get(name)
                    .map_or_else(|| element.clone(), |value| PatternElement::Literal(value.clone())),
                other => other.clone(),
            })
            .collect();
        Self { elements }
    }
}

impl<T: Into<PatternElement>, const N: usize> From<[T; N]> for Pattern {
    fn from(elements: [T; N]) -> Self {
        Self::new(elements.into_iter().map(Into::into).collect())
    }
}

impl FromIterator<PatternElement> for Pattern {
    fn from_iter<I: IntoIterator<Item = PatternElement>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{element}")?;
        }
        write!(f, "]")
    }
}
