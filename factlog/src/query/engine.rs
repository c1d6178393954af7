//! Query engine implementation.
//!
//! The `QueryEngine` evaluates a list of patterns as a left-to-right
//! nested-loop join. Each clause is evaluated once per binding produced by
//! the clauses before it, with the binding's values substituted into the
//! pattern first. Clause order is join order.
//!
//! Within a clause, bindings are expanded concurrently and reassembled in
//! their original order, so output order only depends on scan order.

use std::collections::BTreeMap;

use futures::future::try_join_all;
use tracing::debug;

use super::binding::Binding;
use super::error::QueryError;
use super::matcher::{IndexSelector, Matcher};
use super::parse::parse_pattern;
use super::resolve::{RawBinding, Resolved, resolve_bindings};
use super::scan::find_matching_keys;
use super::types::Pattern;
use crate::storage::{HashDictionary, KeyValueStore};
use crate::types::Value;

/// The query engine evaluates patterns against a store and its dictionary.
pub struct QueryEngine<'a, S, D> {
    store: &'a S,
    dictionary: &'a D,
    selector: &'a dyn IndexSelector,
}

impl<'a, S: KeyValueStore, D: HashDictionary> QueryEngine<'a, S, D> {
    /// Create a new query engine.
    pub const fn new(store: &'a S, dictionary: &'a D, selector: &'a dyn IndexSelector) -> Self {
        Self {
            store,
            dictionary,
            selector,
        }
    }

    /// Evaluate patterns in order, starting from the seed bindings.
    ///
    /// Every pattern is validated before any I/O. A literal that was never
    /// written empties its branch instead of failing the query.
    pub async fn evaluate(
        &self,
        patterns: &[Pattern],
        seeds: Vec<Binding>,
    ) -> Result<Vec<Binding>, QueryError> {
        for pattern in patterns {
            pattern.validate()?;
        }

        let mut bindings = seeds;
        for (clause, pattern) in patterns.iter().enumerate() {
            let expansions =
                try_join_all(bindings.iter().map(|b| self.match_pattern(pattern, b))).await?;
            let inputs = bindings.len();
            bindings = expansions.into_iter().flatten().collect();

            debug!(
                clause,
                %pattern,
                inputs,
                outputs = bindings.len(),
                "evaluated clause"
            );
        }

        Ok(bindings)
    }

    /// Evaluate one pattern under one binding.
    ///
    /// Each result is `binding` extended with the pattern's variables.
    pub async fn match_pattern(
        &self,
        pattern: &Pattern,
        binding: &Binding,
    ) -> Result<Vec<Binding>, QueryError> {
        let bound = pattern.bind(binding);
        let fact = match parse_pattern(&bound, self.dictionary).await {
            Ok(fact) => fact,
            Err(QueryError::NotFound(value)) => {
                debug!(%bound, %value, "literal never written, no matches");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let matcher = Matcher::build(self.selector.select(&fact), &fact);
        let keys = find_matching_keys(self.store, &matcher).await?;
        let resolved = resolve_bindings(&keys, &fact)?;

        debug!(
            %matcher,
            prefix = matcher.prefix(),
            keys = keys.len(),
            bindings = resolved.len(),
            "matched pattern"
        );

        try_join_all(resolved.into_iter().map(|raw| async move {
            let mut merged = binding.clone();
            merged.merge(self.dehash(raw).await?);
            Ok::<_, QueryError>(merged)
        }))
        .await
    }

    /// Get the current attribute values of an entity.
    ///
    /// Attributes are assumed single-valued: if several values survive, the
    /// last one wins.
    pub async fn entity(&self, id: &str) -> Result<BTreeMap<String, Value>, QueryError> {
        let seed: Binding = [("?e", Value::from(id))].into_iter().collect();
        let bindings = self
            .evaluate(&[Pattern::from(["?e", "?a", "?v"])], vec![seed])
            .await?;

        let mut attributes = BTreeMap::new();
        for binding in bindings {
            if let (Some(Value::String(attribute)), Some(value)) =
                (binding.get("?a"), binding.get("?v"))
            {
                attributes.insert(attribute.clone(), value.clone());
            }
        }
        Ok(attributes)
    }

    /// Look up every hashed value of a raw binding.
    async fn dehash(&self, raw: RawBinding) -> Result<Binding, QueryError> {
        let entries = try_join_all(raw.into_iter().map(|(name, resolved)| async move {
            let value = match resolved {
                Resolved::Hashed(id) => Value::String(
                    self.dictionary
                        .get(&id)
                        .await
                        .map_err(QueryError::from_reverse_lookup)?,
                ),
                Resolved::Native(value) => value,
            };
            Ok::<_, QueryError>((name, value))
        }))
        .await?;

        Ok(entries.into_iter().collect())
    }
}
