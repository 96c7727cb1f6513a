//! Frozen hash sets and maps.
//!
//! A frozen container is an immutable hash table whose layout (the hash function seed and the
//! bucket of every key) is computed once, possibly before the program runs. Lookups hash the key,
//! find its bucket, and compare against at most a handful of keys stored there. Nothing is ever
//! inserted or removed after construction.
//!
//!
//! # Usage
//!
//! `frost` implements a hash [`Set`] and a hash [`Map`].
//!
//! These types can be initialized in several ways:
//!
//! 1. They can be built in runtime by calling `from_*` or `try_*` methods. This runs a seed search,
//!    so consider [`HashMap`](std::collections::HashMap) if the keys are only known in runtime.
//! 2. They can be built in compile time with macros, such as [`set!`]. Zero-cost in runtime.
//! 3. They can be built in `build.rs`, translated to code with [`codegen`] and then `include!`d.
//!    Zero-cost in runtime and supports programmatic generation.
//! 4. They can be serialized with `serde` and loaded back, which validates the layout.
//!
//! ```rust
//! const KEYWORDS: &frost::Set<&str> = frost::set!("fn", "let", "match", "loop");
//!
//! assert!(KEYWORDS.contains("match"));
//! assert!(!KEYWORDS.contains("while"));
//!
//! let squares = frost::make_map([(1, 1), (2, 4), (3, 9)]);
//! assert_eq!(squares.get(&3), Some(&9));
//! ```
//!
//!
//! # Layout
//!
//! The [`planner`] picks the capacity (number of buckets) and searches for a seed under which no
//! bucket holds more than a few keys. The default policy allows up to 4 keys per bucket, and
//! [`Planner::strict`](planner::Planner::strict) demands a collision-free layout at the cost of
//! more buckets. The search is driven by a [`lcg`] generator, so the same keys always produce the
//! same table on any platform.
//!
//! Hashing goes through [`hash::PortableHash`] rather than [`Hash`](core::hash::Hash), since
//! tables built on one machine are queried on another.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "macros")]
pub mod macros;

#[cfg(feature = "codegen")]
pub use frost_bare::codegen;
#[cfg(feature = "build")]
pub use frost_bare::planner;
#[cfg(feature = "build")]
pub use frost_bare::{make_map, make_set, try_make_map, try_make_set};
pub use frost_bare::{hash, lcg, BuildError, Map, Set};

#[doc(hidden)]
pub use frost_bare::low_level;
