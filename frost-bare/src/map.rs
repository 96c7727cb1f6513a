//! Frozen hash maps.

use super::{
    hash::{DefaultEq, DefaultHasher, KeyEq, KeyHasher, Seed},
    storage::Storage,
    table::RawTable,
};
use core::borrow::Borrow;
use core::fmt;

/// An immutable hash map with a layout fixed at construction.
///
/// Entries are stored contiguously as `(key, value)` pairs, grouped by the bucket of the key.
///
/// ```rust
/// # extern crate frost_bare as frost;
/// let map = frost::Map::from_entries(vec![("GET", 1), ("PUT", 2), ("POST", 3)]);
/// assert_eq!(map.get("PUT"), Some(&2));
/// assert_eq!(map.get("DELETE"), None);
/// ```
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        bound(
            deserialize = "K: serde::Deserialize<'de>, V: serde::Deserialize<'de>, H: serde::Deserialize<'de> + KeyHasher<K>, E: serde::Deserialize<'de> + KeyEq<K>"
        ),
        try_from = "MapInner<K, V, H, E>"
    )
)]
#[cfg_attr(
    feature = "serde",
    allow(
        clippy::unsafe_derive_deserialize,
        reason = "safety requirements are validated using TryFrom"
    )
)]
pub struct Map<K, V, H = DefaultHasher, E = DefaultEq> {
    /// The actual map.
    inner: MapInner<K, V, H, E>,
}

/// The actual map.
///
/// This needs to be a separate type so that `serde` can convert from this type to [`Map`] with
/// [`TryFrom`] during deserialization, so that we can validate the map.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct MapInner<K, V, H, E> {
    /// Bucket layout.
    table: RawTable,

    /// The entries, sorted by the bucket of the key.
    data: Storage<(K, V)>,

    /// Hashing policy.
    hasher: H,

    /// Equality policy.
    eq: E,
}

#[cfg(feature = "build")]
impl<K, V, H: KeyHasher<K>, E: KeyEq<K>> Map<K, V, H, E> {
    /// Build a map with custom policies and planner configuration.
    ///
    /// If `capacity` is `None`, [`Planner::min_capacity`](crate::planner::Planner::min_capacity) is
    /// used.
    ///
    /// # Errors
    ///
    /// Fails if the keys contain duplicates, the capacity is too small, or the planner could not
    /// find a seed. See [`Planner::plan`](crate::planner::Planner::plan).
    #[inline] // heavy, but monomorphized anyway
    pub fn try_build<G: Iterator<Item = u64> + Clone>(
        entries: alloc::vec::Vec<(K, V)>,
        capacity: Option<usize>,
        planner: &crate::planner::Planner<G>,
        hasher: H,
        eq: E,
    ) -> Result<Self, crate::BuildError> {
        let capacity = capacity.unwrap_or_else(|| planner.min_capacity(entries.len()));
        let plan = {
            let keys: alloc::vec::Vec<&K> = entries.iter().map(|(key, _)| key).collect();
            planner.plan::<K, &K, H, E>(&keys, capacity, &hasher, &eq)?
        };
        let data = super::scatter::scatter(entries, plan.positions());
        Ok(Self {
            inner: MapInner {
                table: RawTable::from_plan(&plan),
                data: Storage::from_vec(data),
                hasher,
                eq,
            },
        })
    }
}

#[cfg(feature = "build")]
impl<K: crate::hash::PortableHash + Eq, V> Map<K, V> {
    /// Build a map with a given number of buckets.
    ///
    /// # Errors
    ///
    /// Fails if the keys contain duplicates, `capacity < entries.len()`, or no seed was found.
    #[inline]
    pub fn try_with_capacity(
        entries: alloc::vec::Vec<(K, V)>,
        capacity: usize,
    ) -> Result<Self, crate::BuildError> {
        Self::try_build(
            entries,
            Some(capacity),
            &crate::planner::Planner::new(),
            DefaultHasher,
            DefaultEq,
        )
    }

    /// Build a map, deducing the capacity from the number of entries.
    ///
    /// # Errors
    ///
    /// Fails if the keys contain duplicates or no seed was found.
    #[inline]
    pub fn try_from_entries(entries: alloc::vec::Vec<(K, V)>) -> Result<Self, crate::BuildError> {
        Self::try_build(
            entries,
            None,
            &crate::planner::Planner::new(),
            DefaultHasher,
            DefaultEq,
        )
    }

    /// Build a map, deducing the capacity from the number of entries.
    ///
    /// # Panics
    ///
    /// Panics if the keys contain duplicates or no seed was found.
    #[inline]
    #[must_use]
    pub fn from_entries(entries: alloc::vec::Vec<(K, V)>) -> Self {
        Self::try_from_entries(entries).expect("failed to build a frozen map")
    }
}

impl<K, V, H, E> Map<K, V, H, E> {
    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn __from_raw_parts(
        table: RawTable,
        data: Storage<(K, V)>,
        hasher: H,
        eq: E,
    ) -> Self {
        Self {
            inner: MapInner {
                table,
                data,
                hasher,
                eq,
            },
        }
    }

    /// Get the storage position of the entry with a given key, if present.
    ///
    /// Positions index into [`as_slice`](Self::as_slice) and [`iter`](Self::iter).
    #[inline]
    pub fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        let hash = self.inner.hasher.hash_key(self.inner.table.seed(), key);
        let range = self.inner.table.candidates(hash);
        let start = range.start;
        // SAFETY: Offsets are non-decreasing and end at `data.len()`, so every bucket range is in
        // bounds.
        let bucket = unsafe { self.inner.data.get_unchecked(range) };
        bucket
            .iter()
            .position(|(k, _)| self.inner.eq.equivalent(Borrow::<Q>::borrow(k), key))
            .map(|index| start.wrapping_add(index))
    }

    /// Get a key-value pair by key.
    #[inline]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        self.find(key)
            .and_then(|index| self.inner.data.get(index))
            .map(|(k, v)| (k, v))
    }

    /// Get a value by key.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Check if the map contains a key.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        self.find(key).is_some()
    }

    /// Count entries with a given key. This is always 0 or 1.
    #[inline]
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        usize::from(self.contains_key(key))
    }

    /// Get the entries with a given key, as a subslice of [`as_slice`](Self::as_slice).
    ///
    /// The result has length 0 or 1.
    #[inline]
    pub fn equal_range<Q>(&self, key: &Q) -> &[(K, V)]
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        self.find(key)
            .and_then(|index| self.inner.data.get(index..=index))
            .unwrap_or(&[])
    }

    /// Get number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.data.len()
    }

    /// Get the number of buckets.
    ///
    /// This is fixed at construction and is at least [`len`](Self::len).
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.inner.table.capacity()
    }

    /// Check if the map is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate through entries.
    ///
    /// Entries are visited in storage order, i.e. grouped by bucket. The order is fixed for a given
    /// map.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.inner.data.iter().map(|(k, v)| (k, v))
    }

    /// Iterate through keys in storage order.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.inner.data.iter().map(|(k, _)| k)
    }

    /// Iterate through values in storage order.
    #[inline]
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.inner.data.iter().map(|(_, v)| v)
    }

    /// Get the entries in storage order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[(K, V)] {
        &self.inner.data
    }

    /// Get the hashing policy.
    #[inline]
    #[must_use]
    pub const fn hash_function(&self) -> &H {
        &self.inner.hasher
    }

    /// Get the equality policy.
    #[inline]
    #[must_use]
    pub const fn key_eq(&self) -> &E {
        &self.inner.eq
    }

    /// Get the seed selecting the hash function.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> &Seed {
        self.inner.table.seed()
    }
}

impl<'a, K, V, H, E> IntoIterator for &'a Map<K, V, H, E> {
    type Item = &'a (K, V);
    type IntoIter = core::slice::Iter<'a, (K, V)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.inner.data.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, H, E> fmt::Debug for Map<K, V, H, E> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Scope for `serde`-related code.
#[cfg(feature = "serde")]
mod serde_support {
    use super::{KeyEq, KeyHasher, Map, MapInner};
    use crate::table::serde_support::Error;
    use serde::ser::{Serialize, Serializer};

    impl<K: Serialize, V: Serialize, H: Serialize, E: Serialize> Serialize for Map<K, V, H, E> {
        #[inline]
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.inner.serialize(serializer)
        }
    }

    impl<K, V, H: KeyHasher<K>, E: KeyEq<K>> TryFrom<MapInner<K, V, H, E>> for Map<K, V, H, E> {
        type Error = Error;

        #[inline]
        fn try_from(inner: MapInner<K, V, H, E>) -> Result<Self, Error> {
            let seed = inner.table.seed();
            inner.table.validate(
                inner.data.len(),
                inner
                    .data
                    .iter()
                    .map(|(key, _)| inner.hasher.hash_key(seed, key)),
            )?;
            inner
                .table
                .check_distinct(&inner.data, |a, b| inner.eq.equivalent(&a.0, &b.0))?;
            Ok(Self { inner })
        }
    }
}

#[cfg(feature = "codegen")]
impl<
        K: super::codegen::Codegen,
        V: super::codegen::Codegen,
        H: super::codegen::Codegen,
        E: super::codegen::Codegen,
    > super::codegen::Codegen for Map<K, V, H, E>
{
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let map = gen.path("frost::Map");
        let table = gen.piece(&self.inner.table);
        let data = gen.piece(&self.inner.data);
        let hasher = gen.piece(&self.inner.hasher);
        let eq = gen.piece(&self.inner.eq);
        quote::quote!(#map::__from_raw_parts(#table, #data, #hasher, #eq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BuildError;
    use alloc::{format, string::String, vec, vec::Vec};
    use rapidhash::RapidRng;

    fn generate_entries(rng: &mut RapidRng) -> Vec<(u64, usize)> {
        let n_entries = usize::try_from(rng.next() % 100).unwrap();
        (0..n_entries).map(|i| (rng.next(), i)).collect()
    }

    #[test]
    fn map() {
        let mut rng = RapidRng::new(0x243f_6a88_85a3_08d3);
        for _ in 0..50 {
            let mut entries = generate_entries(&mut rng);
            let map: Map<u64, usize> = Map::from_entries(entries.clone());

            for (key, value) in &entries {
                assert_eq!(map.get_key_value(key), Some((key, value)));
                assert_eq!(map.get(key), Some(value));
                assert!(map.contains_key(key));
                assert_eq!(map.count(key), 1);
                assert_eq!(map.equal_range(key), [(*key, *value)]);
                assert_eq!(map.as_slice()[map.find(key).unwrap()], (*key, *value));
            }
            assert_eq!(map.len(), entries.len());
            assert_eq!(map.is_empty(), entries.is_empty());

            assert_eq!(map.get_key_value(&0), None);
            assert_eq!(map.get(&0), None);
            assert!(!map.contains_key(&0));
            assert_eq!(map.count(&0), 0);

            let mut entries2: Vec<(u64, usize)> =
                map.iter().map(|(key, value)| (*key, *value)).collect();
            entries.sort_unstable();
            entries2.sort_unstable();
            assert_eq!(entries, entries2);

            let keys: Vec<u64> = map.keys().copied().collect();
            let values: Vec<usize> = map.values().copied().collect();
            let pairs: Vec<(u64, usize)> = keys.into_iter().zip(values).collect();
            assert_eq!(pairs, map.as_slice());
        }
    }

    #[test]
    fn borrowed_keys() {
        let map = Map::from_entries(vec![
            (String::from("alpha"), 1),
            (String::from("beta"), 2),
            (String::from("gamma"), 3),
        ]);
        assert_eq!(map.get("beta"), Some(&2));
        assert_eq!(map.get(&String::from("gamma")), Some(&3));
        assert_eq!(map.get_key_value("alpha").map(|(k, _)| k.as_str()), Some("alpha"));
        assert_eq!(map.get("delta"), None);

        let refs: Map<&u64, usize> = Map::from_entries(vec![(&123, 0), (&456, 1)]);
        assert_eq!(refs.get(&&123), Some(&0));
        assert_eq!(refs.get(&&456), Some(&1));
    }

    #[test]
    fn duplicate_keys() {
        let result = Map::try_from_entries(vec![("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(
            result.err(),
            Some(BuildError::DuplicateKey {
                first: 0,
                second: 2
            }),
        );
    }

    #[test]
    fn empty() {
        let map: Map<u32, ()> = Map::from_entries(Vec::new());
        assert!(map.is_empty());
        assert_eq!(map.capacity(), 0);
        assert_eq!(map.get(&0), None);
        assert_eq!(map.iter().count(), 0);
        assert_eq!(format!("{map:?}"), "{}");
    }
}
