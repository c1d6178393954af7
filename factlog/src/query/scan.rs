//! Range scanning.

use futures::{TryStreamExt, future};

use super::matcher::Matcher;
use crate::storage::{KeyValueStore, StoreError};

/// Scan the matcher's range and keep the keys that pass its residual check.
///
/// Keys come back in store order. The first store error aborts the scan.
pub async fn find_matching_keys<S: KeyValueStore>(
    store: &S,
    matcher: &Matcher,
) -> Result<Vec<String>, StoreError> {
    store
        .scan(&matcher.range())
        .try_filter(|key| future::ready(matcher.matches(key)))
        .try_collect()
        .await
}
