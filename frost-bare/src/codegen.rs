#![cfg(feature = "codegen")]

//! Code generation.
//!
//! This module turns built tables into Rust expressions that rebuild them from `'static` data, so
//! that they can be computed in `build.rs` or in a proc-macro and embedded into the binary. The
//! generated expressions are usable in a `const` context.
//!
//! Scalars, string slices, tuples, arrays, and the containers from this crate can be codegen-ed.
//! For custom types, implement the [`Codegen`] trait manually. Keep in mind that values can be
//! generated on one platform and compiled on another (in case of cross-compilation).
//!
//! The output is deterministic: the same value always produces the same tokens, so regenerated
//! files don't cause spurious rebuilds or diffs.
//!
//!
//! # Typing
//!
//! The generated values are not guaranteed to contain enough type annotations to infer the exact
//! type that was generated. For example, `1u64` will be generated as just `1`. Similarly, the
//! expressions are only guaranteed to be correct up to
//! [coercions](https://doc.rust-lang.org/reference/type-coercions.html). Add type annotations at the
//! call site if necessary.
//!
//!
//! # Example
//!
//! ```rust
//! # extern crate frost_bare as frost;
//! let set: frost::Set<i32> = frost::Set::from_elements(vec![1, 2, 3]);
//! let code = frost::codegen::CodeGenerator::new().generate(&set);
//! assert!(code.to_string().contains("from_static"));
//! ```
//!
//! ```ignore
//! // in build.rs
//! std::fs::write(out_dir.join("set.rs"), code.to_string())?;
//!
//! // in the crate
//! const SET: &frost::Set<i32> = &include!(concat!(env!("OUT_DIR"), "/set.rs"));
//! ```

use alloc::{borrow::ToOwned, collections::BTreeMap, format, string::String};
use proc_macro2::{Ident, Literal, TokenStream, TokenTree};
use quote::{format_ident, quote};

/// Code generator.
pub struct CodeGenerator {
    /// Mapping from crate names to paths, as provided with [`set_crate`](Self::set_crate).
    crate_paths: BTreeMap<String, TokenStream>,

    /// Mapping from paths (as passed to [`path`](Self::path)) to identifiers (as aliased with
    /// `use {path} as {ident};`).
    path_to_alias: BTreeMap<String, Ident>,

    /// Aliases already handed out, mapped to the path they stand for.
    aliases: BTreeMap<String, String>,
}

impl CodeGenerator {
    /// *This method is a hack to add private documentation to public items.*
    ///
    /// We generate code of the following format:
    ///
    /// ```ignore
    /// { // wrap in braces to add scope to an expression
    ///     use ::frost::Set as __Set;
    ///     use ::frost::low_level::Storage as __Storage;
    ///     // other imports, sorted by path...
    ///     {piece} // the code returned by `Codegen::generate_piece`
    /// }
    /// ```
    ///
    /// Items are imported with `use` and then used by alias instead of directly. This keeps the
    /// output readable while debugging. Aliases are mangled to avoid colliding with user items.
    #[allow(dead_code, clippy::missing_const_for_fn, reason = "docs hack")]
    fn __private_docs() {}

    /// Create a code generator with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            crate_paths: BTreeMap::new(),
            path_to_alias: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }

    /// Configure name-to-path mapping for crates.
    ///
    /// By default, `frost` is mapped to `::frost`. Reconfiguring this is necessary when generating
    /// code from a proc-macro, which receives the crate path as `$crate`.
    #[inline]
    pub fn set_crate(&mut self, name: &str, path: TokenStream) {
        self.crate_paths.insert(name.into(), path);
    }

    /// Turn a value into code.
    #[inline]
    pub fn generate<T: Codegen>(mut self, value: &T) -> TokenStream {
        let value = self.piece(value);

        let uses = self.path_to_alias.iter().map(|(path, alias)| {
            let mut components = path.split("::");
            let crate_name = components.next().unwrap_or_default();
            let crate_path = self.crate_paths.get(crate_name).map_or_else(
                || {
                    let ident = format_ident!("{crate_name}");
                    quote!(:: #ident)
                },
                Clone::clone,
            );
            let components = components.map(|component| format_ident!("{component}"));
            quote!(use #crate_path #(:: #components)* as #alias;)
        });

        quote!(
            {
                #(#uses)*
                #value
            }
        )
    }

    /// Turn a value into a recursively useable piece of code.
    #[inline]
    pub fn piece<T: Codegen>(&mut self, piece: &T) -> TokenStream {
        piece.generate_piece(self)
    }

    /// Produce code for an array from an iterator.
    #[inline]
    pub fn array<'a, T: 'a + Codegen>(
        &mut self,
        elements: impl IntoIterator<Item = &'a T>,
    ) -> TokenStream {
        let elements = elements.into_iter().map(|element| self.piece(element));
        quote!([#(#elements),*])
    }

    /// Resolve a path.
    ///
    /// The input string must look like `crate::path::inside::it`. Semantically, this path must be
    /// `use`able. This is different from using the path directly for two reasons:
    ///
    /// - This method resolves crates according to the paths configured by
    ///   [`CodeGenerator::set_crate`].
    /// - This method replaces long paths with short aliases imported just once with `use`, reducing
    ///   code size.
    #[inline]
    pub fn path(&mut self, path: &str) -> TokenStream {
        if let Some(alias) = self.path_to_alias.get(path) {
            return quote!(#alias);
        }

        let base = format!("__{}", path.rsplit_once("::").map_or(path, |(_, name)| name));
        let mut alias = base.clone();
        let mut suffix = 2usize;
        while self.aliases.contains_key(&alias) {
            alias = format!("{base}{suffix}");
            suffix = suffix.saturating_add(1);
        }
        self.aliases.insert(alias.clone(), path.to_owned());

        let alias = format_ident!("{alias}");
        self.path_to_alias.insert(path.to_owned(), alias.clone());
        quote!(#alias)
    }
}

impl Default for CodeGenerator {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Values that can be turned into code.
///
/// This trait is a subtrait of `Sized`, as Rust expressions can only evaluate to sized objects.
///
///
/// # Private constructors
///
/// Tables don't have public constructors that take a precomputed layout. Such constructors exist
/// with mangled names and `#[doc(hidden)]`, like `Set::__from_raw_parts`, and implementations for
/// custom types can follow the same convention. They are not `unsafe` even if semantically they
/// are, as invoking them would make all generated code nested under the call inherit the
/// permissions of the `unsafe` block.
pub trait Codegen: Sized {
    /// Emit a piece of code corresponding to this value.
    ///
    /// This method is only supposed to be called recursively from [`Codegen`] implementations. Call
    /// [`CodeGenerator::generate`] to produce the complete code output for a single value.
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream;
}

/// Implement [`Codegen`] for types by calling methods on [`Literal`].
macro_rules! literal {
    ($($ty:ty => $method:ident,)*) => {
        $(
            impl Codegen for $ty {
                #[inline]
                fn generate_piece(&self, _gen: &mut CodeGenerator) -> TokenStream {
                    TokenTree::Literal(Literal::$method(*self)).into()
                }
            }
        )*
    };
}

literal! {
    u8 => u8_unsuffixed,
    u16 => u16_unsuffixed,
    u32 => u32_unsuffixed,
    u64 => u64_unsuffixed,
    u128 => u128_unsuffixed,
    usize => usize_unsuffixed,
    i8 => i8_unsuffixed,
    i16 => i16_unsuffixed,
    i32 => i32_unsuffixed,
    i64 => i64_unsuffixed,
    i128 => i128_unsuffixed,
    isize => isize_unsuffixed,
    f32 => f32_unsuffixed,
    f64 => f64_unsuffixed,
    char => character,
    // We can't codegen `str` itself, as it's `!Sized`, so do the next best thing.
    &'_ str => string,
}

impl Codegen for bool {
    #[inline]
    fn generate_piece(&self, _gen: &mut CodeGenerator) -> TokenStream {
        TokenTree::Ident(format_ident!("{self}")).into()
    }
}

impl<T: Codegen, const N: usize> Codegen for [T; N] {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        gen.array(self)
    }
}

impl<T: Codegen> Codegen for &T {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        let target = gen.piece(*self);
        quote!(&#target)
    }
}

impl<T: Codegen> Codegen for &[T] {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        if let Some(bytes) = as_byte_slice(*self) {
            TokenTree::Literal(Literal::byte_string(bytes)).into()
        } else {
            let array = gen.array(*self);
            quote!(&#array)
        }
    }
}

/// If `T` is `[u8]`, returns `Some(value)`. Otherwise, returns `None`.
///
/// This is a form of specialization for codegening byte slices with `b".."` instead of `[..]`.
fn as_byte_slice<T: ?Sized>(value: &T) -> Option<&[u8]> {
    if typeid::of::<T>() == typeid::of::<[u8]>() {
        // SAFETY: `T` and `[u8]` have the same type ID. `[u8]` doesn't contain lifetimes, so `T`
        // must be the same type, thus `transmute_copy` is a no-op.
        Some(unsafe { core::mem::transmute_copy::<&T, &[u8]>(&value) })
    } else {
        None
    }
}

impl<T: Codegen> Codegen for Option<T> {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        match &self {
            None => gen.path("core::option::Option::None"),
            Some(value) => {
                let some = gen.path("core::option::Option::Some");
                let value = gen.piece(value);
                quote!(#some(#value))
            }
        }
    }
}

impl Codegen for () {
    #[inline]
    fn generate_piece(&self, _gen: &mut CodeGenerator) -> TokenStream {
        quote!(())
    }
}

impl<A: Codegen> Codegen for (A,) {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        let value = gen.piece(&self.0);
        quote!((#value,))
    }
}

/// Implement [`Codegen`] for tuples of size 2 or greater.
macro_rules! tuple {
    ($(($name:tt $index:tt))*) => {
        impl<$($name: Codegen),*> Codegen for ($($name,)*) {
            #[inline]
            #[allow(non_snake_case, reason = "codegen")]
            fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
                $(let $name = gen.piece(&self.$index);)*
                quote!(($(#$name),*))
            }
        }
    }
}

tuple!((A 0) (B 1));
tuple!((A 0) (B 1) (C 2));
tuple!((A 0) (B 1) (C 2) (D 3));
tuple!((A 0) (B 1) (C 2) (D 3) (E 4));
tuple!((A 0) (B 1) (C 2) (D 3) (E 4) (F 5));
tuple!((A 0) (B 1) (C 2) (D 3) (E 4) (F 5) (G 6));
tuple!((A 0) (B 1) (C 2) (D 3) (E 4) (F 5) (G 6) (H 7));
