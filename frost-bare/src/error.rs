//! Construction failures.

use displaydoc::Display;
use thiserror::Error;

/// A reason why a frozen container could not be built.
///
/// Construction either produces a complete container or one of these errors. No partially built
/// container is ever observable.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BuildError {
    /// keys at positions {first} and {second} are equal
    DuplicateKey {
        /// Position of the earlier key in the input.
        first: usize,
        /// Position of the later key in the input.
        second: usize,
    },

    /// no acceptable seed found in {attempts} attempts for capacity {capacity}
    SeedSearchExhausted {
        /// The number of seeds tried.
        attempts: usize,
        /// The capacity the search was run for.
        capacity: usize,
    },

    /// capacity {capacity} cannot fit {len} keys
    CapacityTooSmall {
        /// The number of keys.
        len: usize,
        /// The requested capacity.
        capacity: usize,
    },

    /// capacity {capacity} is too large to allocate a bucket table for
    CapacityTooLarge {
        /// The requested capacity.
        capacity: usize,
    },

    /// too many keys ({len}), at most 2^32 - 1 are supported
    TooManyKeys {
        /// The number of keys.
        len: usize,
    },
}
