//! Cache key generators for consistent key naming.
//!
//! Single entities live under `{kind}:{id}` and listings under
//! `{collection}`, with non-default ranges suffixed by `:take=..:skip=..`.

use orderly_core::{History, HistoryId, ListRange, Resource};

/// Key for a single entity.
#[must_use]
pub fn entity<R: Resource>(id: R::Id) -> String {
    format!("{}:{}", R::KIND, id)
}

/// Key for a listing over `range`.
///
/// The unbounded listing uses the bare collection name.
#[must_use]
pub fn collection<R: Resource>(range: ListRange) -> String {
    if range == ListRange::all() {
        R::COLLECTION.to_string()
    } else {
        format!("{}take={}:skip={}", collection_prefix::<R>(), range.take, range.skip)
    }
}

/// Prefix shared by every ranged listing of `R`.
#[must_use]
pub fn collection_prefix<R: Resource>() -> String {
    format!("{}:", R::COLLECTION)
}

/// Key for a single history.
#[must_use]
pub fn history(id: HistoryId) -> String {
    entity::<History>(id)
}
