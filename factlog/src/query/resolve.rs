//! Binding resolution.
//!
//! Converts the keys a scan accepted into one raw binding per distinct
//! result. When the pattern leaves the transaction as a wildcard the caller
//! wants current state: keys are grouped by `(entity, attribute)` and only
//! the newest fact of each group survives. Otherwise every key is its own
//! group and the full history comes back.
//!
//! # Invariants
//!
//! - Output follows the order groups were first seen in the scan.
//! - Two groups producing the same bound values yield one binding.
//! - Resolution state lives only for one call.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::storage::key::{IndexedFact, KeyError, SEPARATOR, decode_key, encode_operation};
use crate::types::{HashId, Position, QueryFact, TxnId, Value};

/// A bound value before reverse lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Entity, attribute or value identifier, still to be looked up.
    Hashed(HashId),
    /// Transaction id or operation flag.
    Native(Value),
}

impl Resolved {
    fn from_fact(fact: &IndexedFact, position: Position) -> Self {
        match position {
            Position::Entity => Self::Hashed(fact.entity.clone()),
            Position::Attribute => Self::Hashed(fact.attribute.clone()),
            Position::Value => Self::Hashed(fact.value.clone()),
            Position::Transaction => Self::Native(Value::Integer(fact.txn)),
            Position::Operation => Self::Native(Value::Boolean(fact.operation)),
        }
    }

    fn push_segment(&self, out: &mut String) {
        match self {
            Self::Hashed(id) => out.push_str(id.as_str()),
            Self::Native(Value::Boolean(op)) => out.push_str(encode_operation(*op)),
            Self::Native(value) => out.push_str(&value.to_string()),
        }
    }
}

/// Variable names paired with their unresolved values, in tuple order.
pub type RawBinding = Vec<(String, Resolved)>;

#[derive(Debug, PartialEq, Eq, Hash)]
enum GroupKey {
    /// Current state: one group per entity and attribute.
    Latest(HashId, HashId),
    /// Full history: one group per scanned key.
    Scanned(usize),
}

#[derive(Debug)]
struct Group {
    txn: TxnId,
    dedup_key: String,
}

/// Resolve scanned keys into raw bindings for the pattern's variables.
pub fn resolve_bindings(keys: &[String], query: &QueryFact) -> Result<Vec<RawBinding>, KeyError> {
    let latest_only = query.is_latest_only();
    let variables: Vec<(Position, &str)> = query.variables().collect();

    let mut groups: Vec<Group> = Vec::new();
    let mut group_index: HashMap<GroupKey, usize> = HashMap::new();
    let mut candidates: HashMap<String, RawBinding> = HashMap::new();

    for (i, key) in keys.iter().enumerate() {
        let fact = decode_key(key)?;
        let group_key = if latest_only {
            GroupKey::Latest(fact.entity.clone(), fact.attribute.clone())
        } else {
            GroupKey::Scanned(i)
        };

        let superseded = group_index
            .get(&group_key)
            .is_some_and(|&slot| groups[slot].txn > fact.txn);
        if superseded {
            continue;
        }

        let mut dedup_key = String::new();
        let mut binding = RawBinding::with_capacity(variables.len());
        for (n, &(position, name)) in variables.iter().enumerate() {
            let resolved = Resolved::from_fact(&fact, position);
            if n > 0 {
                dedup_key.push(SEPARATOR);
            }
            resolved.push_segment(&mut dedup_key);
            binding.push((name.to_owned(), resolved));
        }
        candidates.insert(dedup_key.clone(), binding);

        let group = Group {
            txn: fact.txn,
            dedup_key,
        };
        match group_index.entry(group_key) {
            Entry::Occupied(slot) => groups[*slot.get()] = group,
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                groups.push(group);
            }
        }
    }

    Ok(groups
        .iter()
        .filter_map(|group| candidates.remove(&group.dedup_key))
        .collect())
}
