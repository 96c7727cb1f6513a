//! Deterministic pseudo-random sequences.
//!
//! Table construction needs a stream of trial seeds that is identical on every machine and every
//! build, so that rebuilding a table is a no-op. [`LinearCongruential`] provides exactly that:
//! `x' = (A * x + C) mod M`, with all parameters fixed at the type level.
//!
//! The two classic Park-Miller parameter sets are provided as [`MinStdRand0`] and [`MinStdRand`].
//! Their output matches the reference engines bit-for-bit, including the seeding rules.
//!
//! The generator is *not* suitable for cryptography.

/// A linear congruential generator `x' = (A * x + C) mod M`.
///
/// Two generators of the same type compare equal if and only if they will produce the same
/// infinite output sequence.
///
/// All methods are `const`, so sequences can be computed in a `const` context:
///
/// ```rust
/// # extern crate frost_bare as frost;
/// use frost::lcg::MinStdRand0;
///
/// const FIRST: u64 = MinStdRand0::new(1).advance();
/// assert_eq!(FIRST, 16_807);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearCongruential<const A: u64, const C: u64, const M: u64> {
    /// The value the next call to [`advance`](Self::advance) returns. Always below `M`.
    value: u64,
}

/// The original Park-Miller "minimal standard" generator (`A = 16807`).
pub type MinStdRand0 = LinearCongruential<16_807, 0, 2_147_483_647>;

/// The revised Park-Miller generator (`A = 48271`).
///
/// This is the generator the [`Planner`](crate::planner::Planner) draws trial seeds from by default.
pub type MinStdRand = LinearCongruential<48_271, 0, 2_147_483_647>;

impl<const A: u64, const C: u64, const M: u64> LinearCongruential<A, C, M> {
    /// The seed used by [`Default`].
    pub const DEFAULT_SEED: u64 = 1;

    /// The smallest value the generator can produce.
    ///
    /// Without an increment, zero is a fixed point and is never produced.
    pub const MIN: u64 = if C == 0 { 1 } else { 0 };

    /// The largest value the generator can produce.
    pub const MAX: u64 = M - 1;

    /// Post-monomorphization check of the parameters.
    const VALID: () = {
        assert!(M != 0, "modulus must be nonzero");
        assert!(A < M, "multiplier must be below the modulus");
        assert!(C < M, "increment must be below the modulus");
    };

    /// Create a generator from a seed.
    ///
    /// The seed is reduced modulo `M`. If the increment is zero and the reduced seed is zero, the
    /// seed `1` is used instead, as zero would make the sequence constant.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        #[allow(clippy::let_unit_value, reason = "forces the parameter check")]
        let () = Self::VALID;
        Self {
            value: Self::step(Self::normalize(seed)),
        }
    }

    /// Reset the generator to the state [`new`](Self::new) would produce for `seed`.
    #[inline]
    pub const fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    /// Return the current value and move to the next one.
    #[inline]
    pub const fn advance(&mut self) -> u64 {
        let out = self.value;
        self.value = Self::step(out);
        out
    }

    /// Return the value the next call to [`advance`](Self::advance) will produce.
    #[inline]
    #[must_use]
    pub const fn peek(&self) -> u64 {
        self.value
    }

    /// Discard `n` values.
    ///
    /// Equivalent to calling [`advance`](Self::advance) `n` times, but takes `O(log n)` time.
    #[inline]
    #[expect(clippy::arithmetic_side_effects, reason = "operands are below M <= 2^64")]
    pub const fn discard(&mut self, mut n: u64) {
        let modulus = M as u128;

        // `x -> mul * x + add`, accumulated over the set bits of `n`. All powers of one affine map
        // commute, so the composition order doesn't matter.
        let (mut mul, mut add) = (1 % modulus, 0);
        let (mut base_mul, mut base_add) = (A as u128, C as u128);
        while n != 0 {
            if n & 1 == 1 {
                mul = mul * base_mul % modulus;
                add = (add * base_mul + base_add) % modulus;
            }
            base_add = (base_add * base_mul + base_add) % modulus;
            base_mul = base_mul * base_mul % modulus;
            n >>= 1u32;
        }

        #[expect(clippy::cast_possible_truncation, reason = "reduced modulo M")]
        {
            self.value = ((mul * self.value as u128 + add) % modulus) as u64;
        }
    }

    /// The smallest value the generator can produce.
    #[inline]
    #[must_use]
    pub const fn min() -> u64 {
        Self::MIN
    }

    /// The largest value the generator can produce.
    #[inline]
    #[must_use]
    pub const fn max() -> u64 {
        Self::MAX
    }

    /// Apply the recurrence once.
    #[expect(clippy::arithmetic_side_effects, reason = "operands are below M <= 2^64")]
    #[expect(clippy::cast_possible_truncation, reason = "reduced modulo M")]
    const fn step(x: u64) -> u64 {
        ((A as u128 * x as u128 + C as u128) % M as u128) as u64
    }

    /// Reduce a user-supplied seed into the state space.
    const fn normalize(seed: u64) -> u64 {
        let seed = seed % M;
        if C == 0 && seed == 0 {
            1
        } else {
            seed
        }
    }
}

impl<const A: u64, const C: u64, const M: u64> Default for LinearCongruential<A, C, M> {
    #[inline]
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

/// An infinite stream of [`advance`](LinearCongruential::advance) outputs.
impl<const A: u64, const C: u64, const M: u64> Iterator for LinearCongruential<A, C, M> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        Some(self.advance())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<u64> {
        self.discard(n as u64);
        self.next()
    }
}
