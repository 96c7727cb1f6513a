//! Frozen hash sets.

use super::{
    hash::{DefaultEq, DefaultHasher, KeyEq, KeyHasher, Seed},
    storage::Storage,
    table::RawTable,
};
use core::borrow::Borrow;
use core::fmt;

/// An immutable hash set with a layout fixed at construction.
///
/// Elements are stored contiguously, grouped by bucket. A lookup hashes the probe, finds its bucket,
/// and compares it against the few elements stored there.
///
/// Sets are usually built ahead of time with the `set!` macro or in `build.rs`, in which case
/// construction is free at runtime. They can also be built at runtime:
///
/// ```rust
/// # extern crate frost_bare as frost;
/// let set = frost::Set::from_elements(vec!["if", "else", "while"]);
/// assert!(set.contains("else"));
/// assert!(!set.contains("for"));
/// assert_eq!(set.len(), 3);
/// ```
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        bound(
            deserialize = "T: serde::Deserialize<'de>, H: serde::Deserialize<'de> + KeyHasher<T>, E: serde::Deserialize<'de> + KeyEq<T>"
        ),
        try_from = "SetInner<T, H, E>"
    )
)]
#[cfg_attr(
    feature = "serde",
    allow(
        clippy::unsafe_derive_deserialize,
        reason = "safety requirements are validated using TryFrom"
    )
)]
pub struct Set<T, H = DefaultHasher, E = DefaultEq> {
    /// The actual set.
    inner: SetInner<T, H, E>,
}

/// The actual set.
///
/// This needs to be a separate type so that `serde` can convert from this type to [`Set`] with
/// [`TryFrom`] during deserialization, so that we can validate the set.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct SetInner<T, H, E> {
    /// Bucket layout.
    table: RawTable,

    /// The elements, sorted by bucket.
    data: Storage<T>,

    /// Hashing policy.
    hasher: H,

    /// Equality policy.
    eq: E,
}

#[cfg(feature = "build")]
impl<T, H: KeyHasher<T>, E: KeyEq<T>> Set<T, H, E> {
    /// Build a set with custom policies and planner configuration.
    ///
    /// If `capacity` is `None`, [`Planner::min_capacity`](crate::planner::Planner::min_capacity) is
    /// used.
    ///
    /// # Errors
    ///
    /// Fails if the elements contain duplicates, the capacity is too small, or the planner could
    /// not find a seed. See [`Planner::plan`](crate::planner::Planner::plan).
    #[inline] // heavy, but monomorphized anyway
    pub fn try_build<G: Iterator<Item = u64> + Clone>(
        elements: alloc::vec::Vec<T>,
        capacity: Option<usize>,
        planner: &crate::planner::Planner<G>,
        hasher: H,
        eq: E,
    ) -> Result<Self, crate::BuildError> {
        let capacity = capacity.unwrap_or_else(|| planner.min_capacity(elements.len()));
        let plan = planner.plan::<T, T, H, E>(&elements, capacity, &hasher, &eq)?;
        let data = super::scatter::scatter(elements, plan.positions());
        Ok(Self {
            inner: SetInner {
                table: RawTable::from_plan(&plan),
                data: Storage::from_vec(data),
                hasher,
                eq,
            },
        })
    }
}

#[cfg(feature = "build")]
impl<T: crate::hash::PortableHash + Eq> Set<T> {
    /// Build a set with a given number of buckets.
    ///
    /// # Errors
    ///
    /// Fails if the elements contain duplicates, `capacity < elements.len()`, or no seed was found.
    #[inline]
    pub fn try_with_capacity(
        elements: alloc::vec::Vec<T>,
        capacity: usize,
    ) -> Result<Self, crate::BuildError> {
        Self::try_build(
            elements,
            Some(capacity),
            &crate::planner::Planner::new(),
            DefaultHasher,
            DefaultEq,
        )
    }

    /// Build a set, deducing the capacity from the number of elements.
    ///
    /// # Errors
    ///
    /// Fails if the elements contain duplicates or no seed was found.
    #[inline]
    pub fn try_from_elements(elements: alloc::vec::Vec<T>) -> Result<Self, crate::BuildError> {
        Self::try_build(
            elements,
            None,
            &crate::planner::Planner::new(),
            DefaultHasher,
            DefaultEq,
        )
    }

    /// Build a set, deducing the capacity from the number of elements.
    ///
    /// # Panics
    ///
    /// Panics if the elements contain duplicates or no seed was found.
    #[inline]
    #[must_use]
    pub fn from_elements(elements: alloc::vec::Vec<T>) -> Self {
        Self::try_from_elements(elements).expect("failed to build a frozen set")
    }
}

impl<T, H, E> Set<T, H, E> {
    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn __from_raw_parts(table: RawTable, data: Storage<T>, hasher: H, eq: E) -> Self {
        Self {
            inner: SetInner {
                table,
                data,
                hasher,
                eq,
            },
        }
    }

    /// Get the storage position of an element, if present.
    ///
    /// Positions index into [`as_slice`](Self::as_slice) and [`iter`](Self::iter).
    #[inline]
    pub fn find<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        let hash = self.inner.hasher.hash_key(self.inner.table.seed(), value);
        let range = self.inner.table.candidates(hash);
        let start = range.start;
        // SAFETY: Offsets are non-decreasing and end at `data.len()`, so every bucket range is in
        // bounds.
        let bucket = unsafe { self.inner.data.get_unchecked(range) };
        bucket
            .iter()
            .position(|element| self.inner.eq.equivalent(Borrow::<Q>::borrow(element), value))
            .map(|index| start.wrapping_add(index))
    }

    /// Get a reference to the element if present.
    #[inline]
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        self.find(value).and_then(|index| self.inner.data.get(index))
    }

    /// Check if the set contains a value.
    #[inline]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        self.find(value).is_some()
    }

    /// Count elements equal to a value. This is always 0 or 1.
    #[inline]
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        usize::from(self.contains(value))
    }

    /// Get the elements equal to a value, as a subslice of [`as_slice`](Self::as_slice).
    ///
    /// The result has length 0 or 1.
    #[inline]
    pub fn equal_range<Q>(&self, value: &Q) -> &[T]
    where
        T: Borrow<Q>,
        Q: ?Sized,
        H: KeyHasher<Q>,
        E: KeyEq<Q>,
    {
        self.find(value)
            .and_then(|index| self.inner.data.get(index..=index))
            .unwrap_or(&[])
    }

    /// Get the number of elements.
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

    /// Check if the set is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate through elements.
    ///
    /// Elements are visited in storage order, i.e. grouped by bucket, not in insertion order. The
    /// order is fixed for a given set.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.inner.data.iter()
    }

    /// Get the elements in storage order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
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

impl<'a, T, H, E> IntoIterator for &'a Set<T, H, E> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug, H, E> fmt::Debug for Set<T, H, E> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Scope for `serde`-related code.
#[cfg(feature = "serde")]
mod serde_support {
    use super::{KeyEq, KeyHasher, Set, SetInner};
    use crate::table::serde_support::Error;
    use serde::ser::{Serialize, Serializer};

    impl<T: Serialize, H: Serialize, E: Serialize> Serialize for Set<T, H, E> {
        #[inline]
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.inner.serialize(serializer)
        }
    }

    impl<T, H: KeyHasher<T>, E: KeyEq<T>> TryFrom<SetInner<T, H, E>> for Set<T, H, E> {
        type Error = Error;

        #[inline]
        fn try_from(inner: SetInner<T, H, E>) -> Result<Self, Error> {
            let seed = inner.table.seed();
            inner.table.validate(
                inner.data.len(),
                inner
                    .data
                    .iter()
                    .map(|element| inner.hasher.hash_key(seed, element)),
            )?;
            inner
                .table
                .check_distinct(&inner.data, |a, b| inner.eq.equivalent(a, b))?;
            Ok(Self { inner })
        }
    }
}

#[cfg(feature = "codegen")]
impl<T: super::codegen::Codegen, H: super::codegen::Codegen, E: super::codegen::Codegen>
    super::codegen::Codegen for Set<T, H, E>
{
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let set = gen.path("frost::Set");
        let table = gen.piece(&self.inner.table);
        let data = gen.piece(&self.inner.data);
        let hasher = gen.piece(&self.inner.hasher);
        let eq = gen.piece(&self.inner.eq);
        quote::quote!(#set::__from_raw_parts(#table, #data, #hasher, #eq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{hash::PortableHash, planner::Planner, BuildError};
    use alloc::{string::String, vec, vec::Vec};

    /// ASCII case-insensitive string policies.
    #[derive(Clone, Copy)]
    struct CaseInsensitive;

    impl KeyHasher<str> for CaseInsensitive {
        fn hash_key(&self, seed: &Seed, key: &str) -> u64 {
            key.to_ascii_lowercase().hash_one(seed)
        }
    }

    impl KeyHasher<String> for CaseInsensitive {
        fn hash_key(&self, seed: &Seed, key: &String) -> u64 {
            self.hash_key(seed, key.as_str())
        }
    }

    impl KeyEq<str> for CaseInsensitive {
        fn equivalent(&self, a: &str, b: &str) -> bool {
            a.eq_ignore_ascii_case(b)
        }
    }

    impl KeyEq<String> for CaseInsensitive {
        fn equivalent(&self, a: &String, b: &String) -> bool {
            a.eq_ignore_ascii_case(b)
        }
    }

    #[test]
    fn queries() {
        let elements: Vec<u64> = (0..300).map(|i| i * i * 7919).collect();
        let set = Set::from_elements(elements.clone());
        assert_eq!(set.len(), 300);
        assert!(set.capacity() >= 300);
        assert!(!set.is_empty());

        for element in &elements {
            let index = set.find(element).unwrap();
            assert_eq!(set.as_slice()[index], *element);
            assert_eq!(set.get(element), Some(element));
            assert_eq!(set.count(element), 1);
            assert_eq!(set.equal_range(element), [*element]);
        }

        for absent in [1, 2, 3, 7918, u64::MAX] {
            assert_eq!(set.find(&absent), None);
            assert_eq!(set.get(&absent), None);
            assert_eq!(set.count(&absent), 0);
            assert!(set.equal_range(&absent).is_empty());
        }

        let mut iterated: Vec<u64> = set.iter().copied().collect();
        iterated.sort_unstable();
        assert_eq!(iterated, elements);
    }

    #[test]
    fn custom_policies() {
        let set = Set::try_build(
            vec![String::from("Select"), String::from("FROM"), String::from("where")],
            None,
            &Planner::new(),
            CaseInsensitive,
            CaseInsensitive,
        )
        .unwrap();
        assert!(set.contains("select"));
        assert!(set.contains("WHERE"));
        assert_eq!(set.get("from").map(String::as_str), Some("FROM"));
        assert!(!set.contains("group"));

        let duplicate = Set::try_build(
            vec![String::from("Select"), String::from("SELECT")],
            None,
            &Planner::new(),
            CaseInsensitive,
            CaseInsensitive,
        );
        assert_eq!(
            duplicate.err(),
            Some(BuildError::DuplicateKey {
                first: 0,
                second: 1
            }),
        );
    }

    #[test]
    fn errors() {
        assert_eq!(
            Set::try_from_elements(vec![1, 2, 1]).err(),
            Some(BuildError::DuplicateKey {
                first: 0,
                second: 2
            }),
        );
        assert_eq!(
            Set::try_with_capacity(vec![1, 2, 3], 2).err(),
            Some(BuildError::CapacityTooSmall {
                len: 3,
                capacity: 2
            }),
        );
    }

    #[test]
    #[should_panic(expected = "failed to build a frozen set")]
    fn from_elements_panics() {
        let _ = Set::from_elements(vec!["a", "a"]);
    }

    #[test]
    fn debug() {
        let set = Set::try_with_capacity(vec![1, 2, 3], 3).unwrap();
        assert_eq!(alloc::format!("{set:?}"), "{1, 2, 3}");
    }
}
