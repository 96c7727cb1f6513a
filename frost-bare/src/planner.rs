//! Seed search and bucket assignment.
//!
//! Given a fixed list of keys and a capacity, the [`Planner`] looks for a seed under which no bucket
//! holds more than `probe_width` keys. Candidate seeds come from a deterministic generator, and the
//! first acceptable one wins, so planning the same keys twice yields the same table.
//!
//! With `probe_width == 1` ([`Planner::strict`]) the result is a perfect hash. Wider buckets
//! ([`Planner::new`], [`Planner::relaxed`]) accept many more seeds and work with capacities close
//! to the number of keys, at the cost of a short linear scan during lookups.

use super::{
    error::BuildError,
    hash::{KeyEq, KeyHasher, Seed},
    lcg::MinStdRand,
    table::reduce,
};
use alloc::{vec, vec::Vec};
use core::{borrow::Borrow, mem::size_of};

/// Maximum number of keys per bucket used by [`Planner::new`].
pub const DEFAULT_PROBE_WIDTH: usize = 4;

/// Number of seeds tried by default before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 2048;

/// Configuration of the seed search.
///
/// `G` is the source of candidate seeds. It is cloned for each [`plan`](Self::plan) call, so
/// planning never mutates the planner and is a pure function of its inputs.
///
/// ```rust
/// # extern crate frost_bare as frost;
/// use frost::{hash::{DefaultEq, DefaultHasher}, planner::Planner};
///
/// let keys = [10, 20, 30, 40];
/// let plan = Planner::strict()
///     .plan::<i32, _, _, _>(&keys, 8, &DefaultHasher::new(), &DefaultEq)
///     .unwrap();
/// assert_eq!(plan.capacity(), 8);
/// assert_eq!(plan.positions().len(), 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Planner<G = MinStdRand> {
    /// Source of seed draws.
    generator: G,
    /// A draw to try before consulting the generator.
    first_draw: Option<u64>,
    /// Maximum number of keys per bucket.
    probe_width: usize,
    /// Maximum number of seeds to try.
    max_attempts: usize,
}

impl Planner {
    /// A planner with the default probe width and the default generator.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::relaxed(DEFAULT_PROBE_WIDTH)
    }

    /// A planner that only accepts perfect hashes, i.e. at most one key per bucket.
    ///
    /// This needs much larger capacities than the relaxed policy; see
    /// [`min_capacity`](Self::min_capacity).
    #[inline]
    #[must_use]
    pub const fn strict() -> Self {
        Self::relaxed(1)
    }

    /// A planner that accepts up to `probe_width` keys per bucket.
    ///
    /// # Panics
    ///
    /// Panics if `probe_width` is zero.
    #[inline]
    #[must_use]
    pub const fn relaxed(probe_width: usize) -> Self {
        assert!(probe_width > 0, "probe width must be positive");
        Self {
            generator: MinStdRand::new(MinStdRand::DEFAULT_SEED),
            first_draw: None,
            probe_width,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Default for Planner {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<G> Planner<G> {
    /// Replace the source of seed draws.
    #[inline]
    #[must_use]
    pub fn with_generator<G2>(self, generator: G2) -> Planner<G2> {
        Planner {
            generator,
            first_draw: self.first_draw,
            probe_width: self.probe_width,
            max_attempts: self.max_attempts,
        }
    }

    /// Try `draw` before any generator output.
    ///
    /// Counts towards the attempt limit like any other draw.
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, draw: u64) -> Self {
        self.first_draw = Some(draw);
        self
    }

    /// Limit the number of seeds tried.
    #[inline]
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Maximum number of keys per bucket.
    #[inline]
    #[must_use]
    pub const fn probe_width(&self) -> usize {
        self.probe_width
    }

    /// Maximum number of seeds tried.
    #[inline]
    #[must_use]
    pub const fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// The smallest capacity this planner is expected to handle `len` keys with.
    ///
    /// This is the smallest capacity, at least `len`, at which the expected number of over-full
    /// buckets under a random seed is at most one. Each attempt then succeeds with constant
    /// probability, and the default attempt limit is practically never reached. For the default
    /// probe width this equals `len` for up to a few hundred keys and grows slowly beyond that.
    /// For the strict policy it's roughly `len^2 / 2`.
    #[inline]
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, reason = "low < high")]
    pub fn min_capacity(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        if overfull_estimate(len, len, self.probe_width) <= 1.0 {
            return len;
        }

        // The estimate is decreasing in capacity: find an upper bound, then bisect.
        let mut low = len;
        let mut high = len;
        while overfull_estimate(len, high, self.probe_width) > 1.0 {
            if high == usize::MAX {
                return high;
            }
            low = high;
            high = high.saturating_mul(2);
        }
        while low < high {
            let mid = low + (high - low) / 2;
            if overfull_estimate(len, mid, self.probe_width) <= 1.0 {
                high = mid;
            } else {
                low = mid.saturating_add(1);
            }
        }
        high
    }
}

/// Expected number of buckets holding more than `width` of `len` keys, out of `capacity` buckets.
///
/// Approximated by `C(len, width + 1) / capacity^width`, the expected number of `(width + 1)`-sets
/// of keys that share a bucket.
#[allow(clippy::cast_precision_loss, reason = "an estimate")]
#[allow(clippy::arithmetic_side_effects, reason = "float arithmetic")]
fn overfull_estimate(len: usize, capacity: usize, width: usize) -> f64 {
    let capacity = capacity as f64;
    let mut estimate = capacity;
    for j in 0..=width {
        if j >= len {
            return 0.0;
        }
        estimate *= (len - j) as f64 / ((j + 1) as f64 * capacity);
    }
    estimate
}

impl<G: Iterator<Item = u64> + Clone> Planner<G> {
    /// Find a seed and a bucket assignment for `keys`.
    ///
    /// Keys are hashed with `hasher` and compared with `eq`. The same inputs always produce the
    /// same plan.
    ///
    /// # Errors
    ///
    /// - [`BuildError::TooManyKeys`] if there are more than `u32::MAX` keys.
    /// - [`BuildError::CapacityTooSmall`] if `capacity < keys.len()`.
    /// - [`BuildError::CapacityTooLarge`] if the bucket table for `capacity` can't be allocated.
    /// - [`BuildError::DuplicateKey`] if two keys are equal under `eq`. This is checked before the
    ///   search proper and doesn't depend on the capacity, the probe width, the attempt limit, or
    ///   the generator.
    /// - [`BuildError::SeedSearchExhausted`] if no acceptable seed was found within the attempt
    ///   limit, or the generator ran dry.
    #[inline] // heavy, but monomorphized anyway
    pub fn plan<T, K, H, E>(
        &self,
        keys: &[K],
        capacity: usize,
        hasher: &H,
        eq: &E,
    ) -> Result<Plan, BuildError>
    where
        T: ?Sized,
        K: Borrow<T>,
        H: KeyHasher<T>,
        E: KeyEq<T>,
    {
        let len = keys.len();
        if u32::try_from(len).is_err() {
            return Err(BuildError::TooManyKeys { len });
        }
        if capacity < len {
            return Err(BuildError::CapacityTooSmall { len, capacity });
        }
        let n_buckets = capacity.max(1);
        let n_offsets = n_buckets
            .checked_add(1)
            .filter(|&n| {
                n.checked_mul(size_of::<u32>())
                    .is_some_and(|bytes| bytes <= isize::MAX.unsigned_abs())
            })
            .ok_or(BuildError::CapacityTooLarge { capacity })?;

        if len == 0 {
            return Ok(Plan {
                seed: Seed::from_draw(0),
                capacity,
                attempts: 0,
                probe_width: self.probe_width,
                offsets: vec![0; n_offsets],
                positions: Vec::new(),
            });
        }

        let mut buckets = vec![0; len];
        let mut lay_out = |seed: &Seed| {
            for (bucket, key) in buckets.iter_mut().zip(keys) {
                *bucket = reduce(hasher.hash_key(seed, <K as Borrow<T>>::borrow(key)), capacity);
            }
            Layout::new(&buckets, n_offsets)
        };

        let mut draws = self.first_draw.into_iter().chain(self.generator.clone());
        let first_draw = draws.next();

        // Equal keys share a bucket under any seed, so one layout is enough to find them.
        let mut layout = lay_out(&Seed::from_draw(first_draw.unwrap_or(0)));
        if let Some((first, second)) = layout.find_duplicate(keys, eq) {
            #[cfg(feature = "tracing")]
            tracing::warn!(first, second, "duplicate keys");
            return Err(BuildError::DuplicateKey { first, second });
        }

        let mut attempts: usize = 0;
        for draw in first_draw.into_iter().chain(draws).take(self.max_attempts) {
            let seed = Seed::from_draw(draw);
            if attempts > 0 {
                layout = lay_out(&seed);
            }
            attempts = attempts.wrapping_add(1);

            let fullest = layout.fullest_bucket();
            if fullest <= self.probe_width {
                #[cfg(feature = "tracing")]
                tracing::debug!(len, capacity, attempts, fullest, "planned table");
                return Ok(Plan {
                    seed,
                    capacity,
                    attempts,
                    probe_width: self.probe_width,
                    offsets: layout.offsets,
                    positions: layout.positions,
                });
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(draw, fullest, "rejected seed");
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(len, capacity, attempts, "seed search exhausted");
        Err(BuildError::SeedSearchExhausted { attempts, capacity })
    }
}

/// Keys grouped by bucket under one seed.
struct Layout {
    /// Bucket `b` owns storage positions `offsets[b]..offsets[b + 1]`.
    offsets: Vec<u32>,
    /// Storage position of each key, indexed by input position.
    positions: Vec<u32>,
    /// Input position of each stored key, indexed by storage position.
    order: Vec<u32>,
}

impl Layout {
    /// Counting sort of key indices by bucket, stable with respect to input order.
    #[expect(clippy::cast_possible_truncation, reason = "at most u32::MAX keys")]
    #[allow(clippy::arithmetic_side_effects, reason = "bounded by the key count")]
    fn new(buckets: &[usize], n_offsets: usize) -> Self {
        let mut offsets = vec![0u32; n_offsets];
        for &bucket in buckets {
            offsets[bucket + 1] += 1;
        }
        for i in 1..offsets.len() {
            offsets[i] += offsets[i - 1];
        }

        let mut cursor = offsets.clone();
        let mut positions = Vec::with_capacity(buckets.len());
        let mut order = vec![0u32; buckets.len()];
        for (index, &bucket) in buckets.iter().enumerate() {
            let position = cursor[bucket];
            cursor[bucket] += 1;
            positions.push(position);
            order[position as usize] = index as u32;
        }

        Self {
            offsets,
            positions,
            order,
        }
    }

    /// Number of keys in the most populated bucket.
    fn fullest_bucket(&self) -> usize {
        self.offsets
            .windows(2)
            .map(|w| w[1].abs_diff(w[0]) as usize)
            .max()
            .unwrap_or(0)
    }

    /// Find two equal keys, reported as input positions in increasing order.
    ///
    /// Equal keys hash equally, so they always share a bucket and only pairs within a bucket need
    /// to be compared. Buckets are scanned in order, so the result is deterministic.
    fn find_duplicate<T, K, E>(&self, keys: &[K], eq: &E) -> Option<(usize, usize)>
    where
        T: ?Sized,
        K: Borrow<T>,
        E: KeyEq<T>,
    {
        for w in self.offsets.windows(2) {
            let bucket = &self.order[w[0] as usize..w[1] as usize];
            for (i, &a) in bucket.iter().enumerate() {
                for &b in &bucket[i + 1..] {
                    let (a, b) = (a as usize, b as usize);
                    if eq.equivalent(
                        <K as Borrow<T>>::borrow(&keys[a]),
                        <K as Borrow<T>>::borrow(&keys[b]),
                    ) {
                        return Some((a, b));
                    }
                }
            }
        }
        None
    }
}

/// A successful seed search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    /// The accepted seed.
    seed: Seed,
    /// Number of buckets.
    capacity: usize,
    /// Number of seeds tried, including the accepted one.
    attempts: usize,
    /// The width the plan was accepted under.
    probe_width: usize,
    /// Prefix sums of bucket occupancy, `max(capacity, 1) + 1` entries long.
    offsets: Vec<u32>,
    /// Storage position of each key, indexed by input position.
    positions: Vec<u32>,
}

impl Plan {
    /// The accepted seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Number of buckets.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of seeds tried, including the accepted one. Zero for an empty key list.
    #[inline]
    #[must_use]
    pub const fn attempts(&self) -> usize {
        self.attempts
    }

    /// Maximum number of keys per bucket the plan was accepted under.
    #[inline]
    #[must_use]
    pub const fn probe_width(&self) -> usize {
        self.probe_width
    }

    /// Bucket `b` owns storage positions `offsets()[b]..offsets()[b + 1]`.
    #[inline]
    #[must_use]
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Storage position of each key, indexed by its position in the input.
    ///
    /// Within a bucket, keys keep their input order.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[u32] {
        &self.positions
    }
}
