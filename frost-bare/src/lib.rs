//! This crate provides types for [`frost`](https://docs.rs/frost). Use that crate instead.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod codegen;
mod deduce;
mod error;
pub mod hash;
pub mod lcg;
mod map;
#[cfg(feature = "build")]
pub mod planner;
pub(crate) mod scatter;
mod set;
mod storage;
mod table;

#[cfg(feature = "build")]
pub use deduce::{make_map, make_set, try_make_map, try_make_set};
pub use error::BuildError;
pub use map::Map;
pub use set::Set;

/// Public (but hidden) reexports for codegen to access.
#[doc(hidden)]
pub mod low_level {
    pub use super::storage::Storage;
    pub use super::table::RawTable;
}

#[cfg(test)]
mod tests;
