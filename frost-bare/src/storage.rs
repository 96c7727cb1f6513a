//! Fixed-size backing storage for frozen containers.

use core::fmt;
use core::ops::Deref;

/// An immutable slice that either lives in a `static` or is owned by the container.
///
/// This is effectively a `Cow<'static, [T]>` that works for non-`'static` `T`s at runtime:
///
/// - Tables emitted by the proc-macros or by `build.rs` reference `'static` data and can be built
///   in a `const` context.
/// - Tables built at runtime own a boxed slice.
///
/// Unlike `Vec`, the length never changes and the contents are never handed out mutably, so
/// a constructed container stays frozen no matter how it was built.
#[non_exhaustive]
pub enum Storage<T> {
    /// Semantically `&'static [T]`. That doesn't compile without `T: 'static`, and bounds cannot be
    /// placed on individual variants, so we have to use pointers.
    Static(*const [T]),

    /// Runtime-allocated data.
    #[cfg(feature = "alloc")]
    Owned(alloc::boxed::Box<[T]>),
}

// Necessary due to use of `*const [T]`.
// SAFETY: For `Owned`, `T: Send` implies `Box<[T]>: Send`. `Static` can only be constructed given
// `T: Sync`, so naturally `&'static [T]: Send`.
unsafe impl<T: Send> Send for Storage<T> {}
// SAFETY: For `Owned`, `T: Sync` implies `Box<[T]>: Sync`. For `Static`, `T: Sync` implies
// `&'static [T]: Sync`.
unsafe impl<T: Sync> Sync for Storage<T> {}

impl<T> Storage<T> {
    /// Reference static data.
    ///
    /// `T: Sync` is required because the same slice can be wrapped several times, and
    /// `Storage<T>: Send` only asks for `T: Send`. Sending one wrapper to another thread would
    /// otherwise share a `!Sync` value between threads.
    #[inline]
    #[must_use]
    pub const fn from_static(data: &'static [T]) -> Self
    where
        T: Sync,
    {
        Self::Static(data)
    }

    /// Take ownership of runtime data.
    #[cfg(feature = "alloc")]
    #[inline]
    #[must_use]
    pub const fn from_boxed(data: alloc::boxed::Box<[T]>) -> Self {
        Self::Owned(data)
    }

    /// Take ownership of runtime data, dropping excess capacity.
    #[cfg(feature = "alloc")]
    #[inline]
    #[must_use]
    pub fn from_vec(data: alloc::vec::Vec<T>) -> Self {
        Self::Owned(data.into_boxed_slice())
    }

    /// Check whether the data lives in a `static`.
    #[inline]
    #[must_use]
    pub const fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }
}

impl<T> Deref for Storage<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        match self {
            // SAFETY: `ptr` is semantically `&'static [T]`.
            Self::Static(ptr) => unsafe { &**ptr },
            #[cfg(feature = "alloc")]
            Self::Owned(data) => data,
        }
    }
}

impl<T: Clone> Clone for Storage<T> {
    #[inline]
    fn clone(&self) -> Self {
        match self {
            Self::Static(ptr) => Self::Static(*ptr),
            #[cfg(feature = "alloc")]
            Self::Owned(data) => Self::Owned(data.clone()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Storage<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(feature = "alloc")]
impl<T> From<alloc::vec::Vec<T>> for Storage<T> {
    #[inline]
    fn from(data: alloc::vec::Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

#[cfg(feature = "codegen")]
impl<T: super::codegen::Codegen> super::codegen::Codegen for Storage<T> {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let storage = gen.path("frost::low_level::Storage");
        let data = gen.array(&**self);
        quote::quote!(#storage::from_static(&#data))
    }
}

/// Scope for `serde`-related code.
#[cfg(feature = "serde")]
mod serde_support {
    use super::Storage;
    use serde::ser::{Serialize, SerializeSeq, Serializer};

    impl<T: Serialize> Serialize for Storage<T> {
        #[inline]
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for e in &**self {
                seq.serialize_element(e)?;
            }
            seq.end()
        }
    }

    #[cfg(feature = "alloc")]
    impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Storage<T> {
        #[inline]
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            alloc::vec::Vec::<T>::deserialize(deserializer).map(Into::into)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_data() {
        let values = const { Storage::from_static(&["if", "else", "while"]) };
        assert!(values.is_static());
        assert_eq!(values.len(), 3);
        assert_eq!(values.get(1), Some(&"else"));
        assert_eq!(values.get(3), None);
    }

    #[test]
    fn owned_data() {
        let values = Storage::from_vec(alloc::vec!["if", "else", "while"]);
        assert!(!values.is_static());
        assert_eq!(&*values, ["if", "else", "while"]);
        assert_eq!(&*values.clone(), &*values);
    }

    #[test]
    fn debug_lists_contents() {
        let values = const { Storage::from_static(&[1, 2]) };
        assert_eq!(alloc::format!("{values:?}"), "[1, 2]");
    }
}
