//! Bucket index shared by [`Set`](crate::Set) and [`Map`](crate::Map).

use super::{hash::Seed, storage::Storage};
use core::ops::Range;

/// The layout of a frozen table, without the entries themselves.
///
/// Entries are stored contiguously, sorted by bucket. Bucket `b` owns storage positions
/// `offsets[b]..offsets[b + 1]`.
///
/// # Invariants
///
/// - `offsets.len() == max(capacity, 1) + 1`.
/// - `offsets` is non-decreasing and starts at zero.
/// - The last offset equals the number of stored entries.
/// - Every entry lies in the bucket its key hashes to under `seed`.
///
/// Lookups rely on the first three invariants without checking them. Tables are only produced by
/// the planner, by codegen from a planned table, or by validated deserialization.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawTable {
    /// The hash function used to address buckets.
    seed: Seed,
    /// Number of buckets, as requested by the user.
    capacity: usize,
    /// Prefix sums of bucket occupancy.
    offsets: Storage<u32>,
}

/// Map a 64-bit hash to a bucket in `0..max(capacity, 1)`.
///
/// This is `floor(hash * capacity / 2^64)`, which plays the role of `hash mod capacity` but is
/// driven by the high bits of the hash. Multiplicative hashes put their entropy there.
#[inline]
#[must_use]
#[expect(clippy::cast_possible_truncation, reason = "result is below capacity")]
#[allow(clippy::arithmetic_side_effects, reason = "cannot overflow u128")]
pub(crate) const fn reduce(hash: u64, capacity: usize) -> usize {
    ((hash as u128 * capacity as u128) >> 64u32) as usize
}

impl RawTable {
    /// Initialize from saved data.
    ///
    /// Meant for codegen, not for public use. The caller is responsible for upholding the type
    /// invariants.
    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn __from_raw_parts(seed: Seed, capacity: usize, offsets: Storage<u32>) -> Self {
        Self {
            seed,
            capacity,
            offsets,
        }
    }

    /// Build from a successful plan.
    #[cfg(feature = "build")]
    #[inline]
    pub(crate) fn from_plan(plan: &crate::planner::Plan) -> Self {
        Self {
            seed: *plan.seed(),
            capacity: plan.capacity(),
            offsets: Storage::from_vec(plan.offsets().into()),
        }
    }

    /// The seed selecting the hash function.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> &Seed {
        &self.seed
    }

    /// The number of buckets requested at construction.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Storage positions of the entries that may match a key with this hash.
    #[inline]
    #[must_use]
    pub(crate) fn candidates(&self, hash: u64) -> Range<usize> {
        let bucket = reduce(hash, self.capacity);
        // SAFETY: `bucket < max(capacity, 1) < offsets.len()` by the length invariant.
        let start = unsafe { *self.offsets.get_unchecked(bucket) };
        // SAFETY: `bucket + 1 <= max(capacity, 1) < offsets.len()` by the length invariant.
        let end = unsafe { *self.offsets.get_unchecked(bucket.wrapping_add(1)) };
        start as usize..end as usize
    }

    /// Check the invariants against `len` entries with the given hashes.
    ///
    /// `hashes` yields the hash of each stored key, in storage order.
    #[cfg(feature = "serde")]
    pub(crate) fn validate(
        &self,
        len: usize,
        hashes: impl Iterator<Item = u64>,
    ) -> Result<(), serde_support::Error> {
        use serde_support::Error;

        if self.offsets.len() != self.capacity.max(1).saturating_add(1) {
            return Err(Error::WrongOffsetCount);
        }
        if self.offsets.first() != Some(&0) || self.offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::DecreasingOffsets);
        }
        if self.offsets.last().map(|&last| last as usize) != Some(len) {
            return Err(Error::WrongLen);
        }
        for (position, hash) in hashes.enumerate() {
            if !self.candidates(hash).contains(&position) {
                return Err(Error::MisplacedEntry);
            }
        }
        Ok(())
    }

    /// Check that no bucket holds two entries with the same key.
    ///
    /// Must run after [`validate`](Self::validate) succeeded for `entries`.
    #[cfg(feature = "serde")]
    pub(crate) fn check_distinct<T>(
        &self,
        entries: &[T],
        same_key: impl Fn(&T, &T) -> bool,
    ) -> Result<(), serde_support::Error> {
        use serde_support::Error;

        for w in self.offsets.windows(2) {
            let bucket = entries
                .get(w[0] as usize..w[1] as usize)
                .ok_or(Error::WrongLen)?;
            for (i, a) in bucket.iter().enumerate() {
                if bucket.iter().skip(i.saturating_add(1)).any(|b| same_key(a, b)) {
                    return Err(Error::DuplicateEntry);
                }
            }
        }
        Ok(())
    }
}

/// Scope for `serde`-related code.
#[cfg(feature = "serde")]
pub(crate) mod serde_support {
    use displaydoc::Display;
    use thiserror::Error;

    /// Deserialization validation failures.
    #[derive(Debug, Display, Error)]
    #[non_exhaustive]
    pub enum Error {
        /// wrong number of bucket offsets
        WrongOffsetCount,

        /// bucket offsets are not sorted
        DecreasingOffsets,

        /// number of entries does not match the last offset
        WrongLen,

        /// entry stored outside of its bucket
        MisplacedEntry,

        /// two entries in one bucket have equal keys
        DuplicateEntry,
    }
}

#[cfg(feature = "codegen")]
impl super::codegen::Codegen for RawTable {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let raw_table = gen.path("frost::low_level::RawTable");
        let seed = gen.piece(&self.seed);
        let capacity = gen.piece(&self.capacity);
        let offsets = gen.piece(&self.offsets);
        quote::quote!(#raw_table::__from_raw_parts(#seed, #capacity, #offsets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduce_stays_in_range() {
        for capacity in [1, 2, 3, 129, 1000] {
            for hash in [0, 1, u64::MAX / 2, u64::MAX - 1, u64::MAX] {
                assert!(reduce(hash, capacity) < capacity);
            }
        }
        assert_eq!(reduce(u64::MAX, 0), 0);
        assert_eq!(reduce(u64::MAX, 4), 3);
        assert_eq!(reduce(1 << 63, 4), 2);
    }

    #[test]
    fn empty_table() {
        let table = RawTable::__from_raw_parts(
            Seed::from_draw(0),
            0,
            Storage::from_static(&[0, 0]),
        );
        assert_eq!(table.capacity(), 0);
        assert_eq!(table.candidates(12_345), 0..0);
    }

    #[test]
    fn candidates_follow_offsets() {
        let table = RawTable::__from_raw_parts(
            Seed::from_draw(0),
            4,
            Storage::from_static(&[0, 1, 1, 3, 4]),
        );
        assert_eq!(table.candidates(0), 0..1);
        assert_eq!(table.candidates(1 << 62), 1..1);
        assert_eq!(table.candidates(1 << 63), 1..3);
        assert_eq!(table.candidates(u64::MAX), 3..4);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn distinct_entries_per_bucket() {
        use serde_support::Error;

        let table = RawTable::__from_raw_parts(
            Seed::from_draw(0),
            3,
            Storage::from_static(&[0, 2, 2, 4]),
        );
        let same = |a: &u8, b: &u8| a == b;
        assert!(table.check_distinct(&[1, 2, 1, 3], same).is_ok());
        assert!(matches!(
            table.check_distinct(&[1, 2, 3, 3], same),
            Err(Error::DuplicateEntry),
        ));
        assert!(matches!(
            table.check_distinct(&[1, 2, 3], same),
            Err(Error::WrongLen),
        ));
    }
}
