//! Hashing and equality policies.
//!
//! A frozen table is addressed by `hash(seed, key)`, where the seed is picked during construction.
//! The table layout is computed ahead of time, possibly on a different machine than the one that
//! performs lookups, so hashes must be portable. The standard [`Hash`](core::hash::Hash) trait
//! doesn't guarantee that, so this module provides [`PortableHash`].
//!
//! Containers don't call [`PortableHash`] directly. They go through two policy traits:
//!
//! - [`KeyHasher`] maps `(seed, key)` to a 64-bit hash. [`DefaultHasher`] forwards to
//!   [`PortableHash::hash_one`].
//! - [`KeyEq`] decides whether two keys are the same. [`DefaultEq`] uses [`Eq`].
//!
//! Custom policies can be passed to the constructors to, say, compare strings case-insensitively.
//! They affect which seed the construction settles on, but never the container's contract.

use core::hash::Hasher;

/// Parameters of one hash function from the family.
///
/// Seeds are derived from a single generator draw with [`Seed::from_draw`], so the sequence of
/// candidate hash functions is as reproducible as the generator itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seed {
    /// Multiplier for 64-bit keys and for the low half of a 128-bit key. Also dupes as a rapidhash
    /// seed. Always odd.
    low: u64,
    /// Multiplier for the high half of a 128-bit key. Always odd.
    high: u64,
}

impl Seed {
    /// Initialize from saved data.
    ///
    /// Meant for codegen, not for public use.
    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn __from_raw_parts(low: u64, high: u64) -> Self {
        Self { low, high }
    }

    /// Expand a generator output into a seed.
    ///
    /// Generator outputs are small and highly correlated (consecutive LCG values), so they are
    /// passed through a bijective mixer before being used as multipliers.
    #[inline]
    #[must_use]
    pub const fn from_draw(draw: u64) -> Self {
        let low = mix64(draw) | 1;
        let high = mix64(low) | 1;
        Self { low, high }
    }

    /// Get 64 bits of the seed.
    #[inline]
    #[must_use]
    pub const fn get_u64(&self) -> u64 {
        self.low
    }
}

/// The `splitmix64` finalizer.
const fn mix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30u32)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27u32)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31u32)
}

/// Portable alternative to [`Hash`](core::hash::Hash).
///
/// # Requirements
///
/// - `Eq`-equal objects must write equal data into the hasher. If `T: Borrow<U>` and both
///   implement [`PortableHash`], a value and its borrowed form must write the same data. This is
///   what lets a `Map<String, V>` be queried with a `&str`.
///
/// - The written data must not depend on the platform. Don't write `usize` directly, say.
///
/// - Unequal objects must produce different sequences of `write_*` calls. The first differing call
///   must be the same method with different arguments, and for `write`, neither byte string may be
///   a prefix of the other.
pub trait PortableHash {
    /// Write a value into the hasher.
    fn hash<H: Hasher>(&self, state: &mut H);

    /// Write a slice of values into the hasher.
    ///
    /// Semantically equivalent to calling [`PortableHash::hash`] for each element, but not
    /// guaranteed to produce the same hash. The length is not written.
    #[inline]
    fn hash_slice<H: Hasher>(data: &[Self], state: &mut H)
    where
        Self: Sized,
    {
        for piece in data {
            piece.hash(state);
        }
    }

    /// Compute the hash of a single value.
    ///
    /// By default, this feeds [`hash`](Self::hash) into a rapidhash hasher seeded with
    /// [`Seed::get_u64`]. Overrides must keep the hash equal for equal values and their borrowed
    /// forms, identical across platforms, and almost universal: for `a != b`, the hashes must
    /// differ for almost all seeds. A seed-independent collision makes every table containing
    /// both keys unbuildable under the strict policy.
    ///
    /// Integers up to 64 bits, `bool`, and `char` are hashed as `(key as u64) * seed.low`. 128-bit
    /// integers combine both halves with both multipliers. This is an implementation detail.
    #[inline]
    fn hash_one(&self, seed: &Seed) -> u64 {
        let mut state = rapidhash::RapidHasher::new(seed.low);
        self.hash(&mut state);
        state.finish()
    }
}

impl<T: ?Sized + PortableHash> PortableHash for &T {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }

    #[inline]
    fn hash_one(&self, seed: &Seed) -> u64 {
        (**self).hash_one(seed)
    }
}

/// Implement [`PortableHash`] for integers that fit in 64 bits.
macro_rules! impl_integer {
    ($($ty:ty => $method:ident,)*) => {
        $(
            impl PortableHash for $ty {
                #[inline]
                fn hash<H: Hasher>(&self, state: &mut H) {
                    state.$method(*self);
                }

                #[inline]
                fn hash_one(&self, seed: &Seed) -> u64 {
                    #[allow(clippy::cast_lossless, reason = "generic code")]
                    #[allow(clippy::cast_sign_loss, reason = "sign-extension is intentional")]
                    (*self as u64).wrapping_mul(seed.low)
                }
            }
        )*
    };
}
impl_integer! {
    u8 => write_u8,
    u16 => write_u16,
    u32 => write_u32,
    u64 => write_u64,
    i8 => write_i8,
    i16 => write_i16,
    i32 => write_i32,
    i64 => write_i64,
}

/// Implement [`PortableHash`] for 128-bit integers.
macro_rules! impl_wide_integer {
    ($($ty:ty => $method:ident,)*) => {
        $(
            impl PortableHash for $ty {
                #[inline]
                fn hash<H: Hasher>(&self, state: &mut H) {
                    state.$method(*self);
                }

                #[inline]
                #[expect(clippy::cast_possible_truncation, reason = "splitting into halves")]
                #[allow(clippy::cast_sign_loss, reason = "sign-extension is intentional")]
                fn hash_one(&self, seed: &Seed) -> u64 {
                    let low = *self as u64;
                    let high = (*self >> 64i32) as u64;
                    low.wrapping_mul(seed.low) ^ high.wrapping_mul(seed.high)
                }
            }
        )*
    };
}
impl_wide_integer! {
    u128 => write_u128,
    i128 => write_i128,
}

impl PortableHash for usize {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(*self as u64);
    }

    #[inline]
    fn hash_one(&self, seed: &Seed) -> u64 {
        (*self as u64).wrapping_mul(seed.low)
    }
}

impl PortableHash for isize {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i64(*self as i64);
    }

    #[inline]
    fn hash_one(&self, seed: &Seed) -> u64 {
        #[expect(clippy::cast_sign_loss, reason = "sign-extension is intentional")]
        (*self as u64).wrapping_mul(seed.low)
    }
}

impl PortableHash for bool {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(u8::from(*self));
    }

    #[inline]
    fn hash_one(&self, seed: &Seed) -> u64 {
        u64::from(*self).wrapping_mul(seed.low)
    }
}

impl PortableHash for char {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(u32::from(*self));
    }

    #[inline]
    fn hash_one(&self, seed: &Seed) -> u64 {
        u64::from(*self).wrapping_mul(seed.low)
    }
}

/// Implement [`PortableHash`] for UTF-8 strings.
///
/// `0xff` never occurs in UTF-8, so it terminates the string unambiguously.
macro_rules! impl_str {
    ($ty:ty) => {
        impl PortableHash for $ty {
            #[inline]
            fn hash<H: Hasher>(&self, state: &mut H) {
                state.write(self.as_bytes());
                state.write(&[0xff]);
            }
        }
    };
}
impl_str!(str);
#[cfg(feature = "alloc")]
impl_str!(alloc::string::String);

impl<T: PortableHash> PortableHash for [T] {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.len() as u64);
        T::hash_slice(self, state);
    }
}

impl<T: PortableHash, const N: usize> PortableHash for [T; N] {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        <[T] as PortableHash>::hash(self, state);
    }
}

#[cfg(feature = "alloc")]
impl<T: PortableHash> PortableHash for alloc::vec::Vec<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        <[T] as PortableHash>::hash(self, state);
    }
}

/// Hashing policy: maps a key to a 64-bit hash under a given seed.
///
/// # Requirements
///
/// Keys that the accompanying [`KeyEq`] policy considers equal must hash equally under every seed.
/// Otherwise lookups can miss keys that are present.
///
/// For keys stored as `T` and looked up as `Q`, where `T: Borrow<Q>`, the container hashes the
/// stored key through `KeyHasher<Q>`, so a policy only needs to be implemented for the forms it
/// will be queried with.
pub trait KeyHasher<T: ?Sized> {
    /// Hash `key` with the hash function selected by `seed`.
    fn hash_key(&self, seed: &Seed, key: &T) -> u64;
}

/// Equality policy: decides whether two keys denote the same entry.
pub trait KeyEq<T: ?Sized> {
    /// Check whether `a` and `b` are the same key.
    fn equivalent(&self, a: &T, b: &T) -> bool;
}

/// The default hashing policy, forwarding to [`PortableHash`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::exhaustive_structs, reason = "stateless, usable as a value")]
pub struct DefaultHasher;

impl DefaultHasher {
    /// Create the policy.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<T: ?Sized + PortableHash> KeyHasher<T> for DefaultHasher {
    #[inline]
    fn hash_key(&self, seed: &Seed, key: &T) -> u64 {
        key.hash_one(seed)
    }
}

/// The default equality policy, using [`Eq`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::exhaustive_structs, reason = "stateless, usable as a value")]
pub struct DefaultEq;

impl DefaultEq {
    /// Create the policy.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<T: ?Sized + Eq> KeyEq<T> for DefaultEq {
    #[inline]
    fn equivalent(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

#[cfg(feature = "codegen")]
impl super::codegen::Codegen for Seed {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let seed = gen.path("frost::hash::Seed");
        let low = gen.piece(&self.low);
        let high = gen.piece(&self.high);
        quote::quote!(#seed::__from_raw_parts(#low, #high))
    }
}

#[cfg(feature = "codegen")]
impl super::codegen::Codegen for DefaultHasher {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let hasher = gen.path("frost::hash::DefaultHasher");
        quote::quote!(#hasher::new())
    }
}

#[cfg(feature = "codegen")]
impl super::codegen::Codegen for DefaultEq {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let eq = gen.path("frost::hash::DefaultEq");
        quote::quote!(#eq::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    #[test]
    fn seeds_are_odd_and_distinct() {
        let mut previous = Seed::from_draw(0);
        for draw in 1..1000 {
            let seed = Seed::from_draw(draw);
            assert_eq!(seed.low & 1, 1);
            assert_eq!(seed.high & 1, 1);
            assert_ne!(seed, previous);
            previous = seed;
        }
    }

    #[test]
    fn seed_derivation_is_stable() {
        // Pinned so that tables generated by older builds keep working.
        assert_eq!(mix64(0), 0xe220_a839_7b1d_cdaf);
        assert_eq!(Seed::from_draw(0).get_u64(), 0xe220_a839_7b1d_cdaf);
    }

    #[test]
    fn borrowed_forms_agree() {
        let seed = Seed::from_draw(48_271);
        let owned = String::from("keyword");
        assert_eq!(owned.hash_one(&seed), "keyword".hash_one(&seed));
        assert_eq!((&&5u32).hash_one(&seed), 5u32.hash_one(&seed));
        assert_eq!(
            DefaultHasher.hash_key(&seed, &owned),
            DefaultHasher.hash_key(&seed, "keyword"),
        );
    }

    #[test]
    fn narrow_integers_extend() {
        let seed = Seed::from_draw(7);
        assert_eq!((-1i8).hash_one(&seed), (-1i64).hash_one(&seed));
        assert_eq!(200u8.hash_one(&seed), 200u64.hash_one(&seed));
        assert_eq!('a'.hash_one(&seed), 97u32.hash_one(&seed));
        assert_eq!(true.hash_one(&seed), 1u8.hash_one(&seed));
    }

    #[test]
    fn strings_are_prefix_free() {
        let seed = Seed::from_draw(1);
        assert_ne!("ab".hash_one(&seed), "a".hash_one(&seed));
        assert_ne!(["ab", "c"].hash_one(&seed), ["a", "bc"].hash_one(&seed));
    }

    #[test]
    fn default_eq() {
        assert!(DefaultEq.equivalent("a", "a"));
        assert!(!DefaultEq.equivalent(&1, &2));
    }
}
