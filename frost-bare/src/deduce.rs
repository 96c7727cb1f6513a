#![cfg(feature = "build")]

//! Capacity deduction from fixed-size key lists.

use super::{hash::PortableHash, BuildError, Map, Set};

/// Build a set from an array, deducing the capacity from its length.
///
/// The capacity is [`Planner::min_capacity`](crate::planner::Planner::min_capacity) of the default
/// planner.
///
/// ```rust
/// # extern crate frost_bare as frost;
/// let set = frost::make_set([1, 2, 3]);
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.capacity(), 3);
/// assert_eq!(set.count(&1), 1);
/// ```
///
/// # Panics
///
/// Panics if the elements contain duplicates or no seed was found.
#[inline]
#[must_use]
pub fn make_set<T: PortableHash + Eq, const N: usize>(elements: [T; N]) -> Set<T> {
    Set::from_elements(elements.into())
}

/// Build a set from an array, deducing the capacity from its length.
///
/// # Errors
///
/// Fails if the elements contain duplicates or no seed was found.
#[inline]
pub fn try_make_set<T: PortableHash + Eq, const N: usize>(
    elements: [T; N],
) -> Result<Set<T>, BuildError> {
    Set::try_from_elements(elements.into())
}

/// Build a map from an array of entries, deducing the capacity from its length.
///
/// ```rust
/// # extern crate frost_bare as frost;
/// let map = frost::make_map([("red", 0xff0000), ("green", 0x00ff00), ("blue", 0x0000ff)]);
/// assert_eq!(map.get("green"), Some(&0x00ff00));
/// ```
///
/// # Panics
///
/// Panics if the keys contain duplicates or no seed was found.
#[inline]
#[must_use]
pub fn make_map<K: PortableHash + Eq, V, const N: usize>(entries: [(K, V); N]) -> Map<K, V> {
    Map::from_entries(entries.into())
}

/// Build a map from an array of entries, deducing the capacity from its length.
///
/// # Errors
///
/// Fails if the keys contain duplicates or no seed was found.
#[inline]
pub fn try_make_map<K: PortableHash + Eq, V, const N: usize>(
    entries: [(K, V); N],
) -> Result<Map<K, V>, BuildError> {
    Map::try_from_entries(entries.into())
}
