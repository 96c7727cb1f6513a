//! Macros for compile time generation.
//!
//! Unlike [`Set::from_elements`] and similar methods, these macros are zero-cost in runtime. They
//! run the planner during compilation and expand to a reference to a container with `'static`
//! storage, so the result can be put in a `const`.
//!
//!
//! # Keys
//!
//! Keys must be literals: integers (optionally negated), `bool`, `char`, or strings. The macro has
//! to hash the keys itself, so it can't evaluate arbitrary expressions. If other key types are
//! needed, build the container in `build.rs` and use [`codegen`](crate::codegen) instead.
//!
//! This limitation applies only to keys. Values of a [`Map`] are copied to the output verbatim and
//! can be any expression that is allowed in the surrounding context.
//!
//!
//! # Type inference
//!
//! The macros infer the key type from string, `char`, and `bool` literals and from integer
//! suffixes. Macros cannot participate in type inference, so unsuffixed integers are ambiguous:
//!
//! ```compile_fail
//! const SET: &frost::Set<u64> = frost::set!(1, 2, 3);
//! ```
//!
//! In this case, the type has to be specified explicitly:
//!
//! ```rust
//! const SET: &frost::Set<u64> = frost::set! {
//!     for u64;  // type annotation
//!     1, 2, 3
//! };
//! ```
//!
//! Suffixing a single key (`1u64, 2, 3`) works too.
//!
//!
//! # Capacity
//!
//! The number of buckets is deduced from the number of keys. To override it, add `capacity = N;`
//! after the type annotation:
//!
//! ```rust
//! const SET: &frost::Set<u8> = frost::set!(for u8; capacity = 16; 1, 2, 3);
//! assert_eq!(SET.capacity(), 16);
//! ```
//!
//!
//! # Errors
//!
//! Duplicate keys are a compile error pointing at both keys:
//!
//! ```compile_fail
//! const SET: &frost::Set<&str> = frost::set!("a", "b", "a");
//! ```
use super::*;

#[doc(hidden)]
pub use frost_macros;

// Two reasons for `macro_rules!` instead of a direct reexport:
// 1. Document the accepted syntax.
// 2. Pass `$crate` to the macro.

/// Create a [`Map`] in compile time.
///
/// See [module-level documentation](self) for more information.
///
///
/// # Example
///
/// [`map!`] returns a reference to a map. Maps should be put in a `const`:
///
/// ```rust
/// const STATUS: &frost::Map<u16, &str> = frost::map! {
///     for u16;
///     200 => "OK",
///     404 => "Not Found",
///     418 => "I'm a teapot",
/// };
///
/// assert_eq!(STATUS.get(&404), Some(&"Not Found"));
/// assert_eq!(STATUS.get(&500), None);
/// ```
#[cfg(doc)]
#[macro_export]
macro_rules! map {
    // Not actually valid/usable macro rules, but close enough for docs.
    (
        $(for $key_type:ty;)?
        $(capacity = $capacity:literal;)?
        $($key:expr => $value:expr),* $(,)?
    ) => {
        // Doesn't need to typecheck, but needs to parse.
        ()
    };
}

/// Create a [`Set`] in compile time.
///
/// See [module-level documentation](self) for more information.
///
///
/// # Example
///
/// [`set!`] returns a reference to a set. Sets should be put in a `const`:
///
/// ```rust
/// const SET: &frost::Set<&str> = frost::set!("hello", "world");
///
/// assert!(SET.contains("hello"));
/// assert!(SET.contains("world"));
/// assert!(!SET.contains("other"));
/// ```
#[cfg(doc)]
#[macro_export]
macro_rules! set {
    // Not actually valid/usable macro rules, but close enough for docs.
    (
        $(for $element_type:ty;)?
        $(capacity = $capacity:literal;)?
        $($element:expr),* $(,)?
    ) => {
        // Doesn't need to typecheck, but needs to parse.
        ()
    };
}

#[cfg(not(doc))]
#[macro_export]
macro_rules! map {
    ($($tt:tt)*) => {
        $crate::macros::frost_macros::map!(crate $crate; $($tt)*)
    };
}

#[cfg(not(doc))]
#[macro_export]
macro_rules! set {
    ($($tt:tt)*) => {
        $crate::macros::frost_macros::set!(crate $crate; $($tt)*)
    };
}

pub use map;
pub use set;

#[cfg(test)]
mod tests {
    use crate::{make_map, make_set, Map, Set};

    #[test]
    fn macros() {
        const MAP: &Map<u64, usize> = map! {
            for u64;
            123 => 0,
            456 => 1,
        };
        assert_eq!(MAP.get(&123), Some(&0));
        assert_eq!(MAP.get(&456), Some(&1));
        assert_eq!(MAP.get(&789), None);

        const SET: &Set<u64> = set!(for u64; 123, 456);
        assert!(SET.contains(&123));
        assert!(SET.contains(&456));
        assert!(!SET.contains(&789));
    }

    #[test]
    fn matches_runtime_construction() {
        const SET: &Set<i32> = set!(1i32, -2, 30, 400, -5000);
        let runtime = make_set([1, -2, 30, 400, -5000]);
        assert_eq!(SET.seed(), runtime.seed());
        assert_eq!(SET.capacity(), runtime.capacity());
        assert_eq!(SET.as_slice(), runtime.as_slice());

        const MAP: &Map<&str, char> = map! {
            "alpha" => 'a',
            "beta" => 'b',
            "gamma" => 'g',
        };
        let runtime = make_map([("alpha", 'a'), ("beta", 'b'), ("gamma", 'g')]);
        assert_eq!(MAP.seed(), runtime.seed());
        assert_eq!(MAP.as_slice(), runtime.as_slice());
    }

    #[test]
    fn options() {
        const SET: &Set<char> = set!(capacity = 10; 'x', 'y');
        assert_eq!(SET.capacity(), 10);
        assert_eq!(SET.len(), 2);
        assert!(SET.contains(&'y'));

        const FLAGS: &Map<bool, &str> = map!(true => "on", false => "off");
        assert_eq!(FLAGS.get(&false), Some(&"off"));

        const EMPTY: &Set<u32> = set!();
        assert!(EMPTY.is_empty());
        assert!(!EMPTY.contains(&0));

        const EXTREMES: &Set<i8> = set!(for i8; -128, 127, 0);
        assert!(EXTREMES.contains(&-128));
        assert!(EXTREMES.contains(&127));
        assert!(!EXTREMES.contains(&1));
    }
}
