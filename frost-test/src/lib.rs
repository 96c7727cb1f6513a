//! Tables generated by `build.rs`, used by the integration tests.

pub mod data;

/// [`data::INIT_SEQ`], default layout.
pub const INIT_SEQ: &frost::Set<i32> = &include!(concat!(env!("OUT_DIR"), "/init_seq.rs"));

/// Keyword to its position in [`data::KEYWORDS`].
pub const KEYWORDS: &frost::Map<&str, usize> =
    &include!(concat!(env!("OUT_DIR"), "/keywords.rs"));

/// [`data::KEYWORDS`], collision-free layout.
pub const STRICT_KEYWORDS: &frost::Set<&str> =
    &include!(concat!(env!("OUT_DIR"), "/strict_keywords.rs"));

/// [`data::PRIMES`], default layout.
pub const PRIMES: &frost::Set<u16> = &include!(concat!(env!("OUT_DIR"), "/primes.rs"));
