//! Term parsing.
//!
//! Turns each position of a pattern into a `Term`, resolving literals to the
//! key segments they are stored under. Entity, attribute and value literals
//! need a dictionary lookup, so the five positions are parsed concurrently.

use futures::try_join;

use super::error::QueryError;
use super::types::{Pattern, PatternElement};
use crate::storage::HashDictionary;
use crate::storage::key::{encode_operation, encode_txn};
use crate::types::{Position, QueryFact, Term, Value};

/// Parse every position of a pattern.
///
/// Fails with `QueryError::NotFound` if an entity, attribute or value literal
/// was never written.
pub async fn parse_pattern<D: HashDictionary>(
    pattern: &Pattern,
    dictionary: &D,
) -> Result<QueryFact, QueryError> {
    pattern.validate()?;

    let (entity, attribute, value, transaction, operation) = try_join!(
        parse_element(pattern, Position::Entity, dictionary),
        parse_element(pattern, Position::Attribute, dictionary),
        parse_element(pattern, Position::Value, dictionary),
        parse_element(pattern, Position::Transaction, dictionary),
        parse_element(pattern, Position::Operation, dictionary),
    )?;

    Ok(QueryFact {
        entity,
        attribute,
        value,
        transaction,
        operation,
    })
}

/// Parse the element at one position.
pub async fn parse_element<D: HashDictionary>(
    pattern: &Pattern,
    position: Position,
    dictionary: &D,
) -> Result<Term, QueryError> {
    match pattern.element(position) {
        PatternElement::Blank => Ok(Term::Blank),
        PatternElement::Variable(name) => Ok(Term::Variable(name.clone())),
        PatternElement::Literal(value) => parse_literal(position, value, dictionary).await,
    }
}

async fn parse_literal<D: HashDictionary>(
    position: Position,
    value: &Value,
    dictionary: &D,
) -> Result<Term, QueryError> {
    let key = match (position, value) {
        (Position::Entity | Position::Attribute | Position::Value, Value::String(s)) => {
            dictionary.get_hash(s).await?.into_string()
        }
        (Position::Transaction, Value::Integer(txn)) => {
            // No writer can produce an id past the segment width.
            encode_txn(*txn).map_err(|_| QueryError::NotFound(txn.to_string()))?
        }
        (Position::Operation, Value::Boolean(op)) => encode_operation(*op).to_owned(),
        _ => return Err(QueryError::InvalidType(position)),
    };

    Ok(Term::Concrete {
        value: value.clone(),
        key,
    })
}
