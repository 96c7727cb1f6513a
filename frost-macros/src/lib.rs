//! Procedural macros for [`frost`](https://docs.rs/frost). Use that crate instead.
//!
//! The macros run the same construction as the runtime constructors, then codegen the result. The
//! key type has to be known inside the macro to hash the keys, so keys are restricted to literals.

#![allow(clippy::std_instead_of_alloc, reason = "we're not in #[no_std]")]
#![allow(clippy::wildcard_enum_match_arm, reason = "too many false positives")]

mod codegen;
mod keys;
mod parse;

use self::{
    codegen::PassThrough,
    keys::{infer_type, with_typed_keys, Callback, Key, KeyType},
    parse::{Context, MapArm, WithContext},
};
use frost::{
    codegen::{CodeGenerator, Codegen},
    hash::PortableHash,
    BuildError, Map, Set,
};
use proc_macro2::TokenStream;
use proc_macro_error2::{emit_call_site_error, emit_error, set_dummy};
use quote::{quote, ToTokens};
use syn::{parse_macro_input, Expr};

/// Parse keys and settle their type. Diagnostics are emitted on failure.
fn parse_keys<'a>(
    context: &Context,
    exprs: impl Iterator<Item = &'a Expr>,
) -> Result<(Vec<Key>, Option<KeyType>), ()> {
    let mut keys = Vec::new();
    let mut failed = false;
    for expr in exprs {
        match Key::from_expr(expr) {
            Ok(key) => keys.push(key),
            Err(error) => {
                emit_error!(error.span(), "{}", error);
                failed = true;
            }
        }
    }
    if failed {
        return Err(());
    }
    let key_type = infer_type(context.key_type.as_ref(), &keys)?;
    Ok((keys, key_type))
}

fn parse_capacity(context: &Context) -> Result<Option<usize>, ()> {
    let Some(lit) = &context.capacity else {
        return Ok(None);
    };
    lit.base10_parse().map(Some).map_err(|error| {
        emit_error!(lit, "{}", error);
    })
}

/// Translate a construction failure into diagnostics pointing at the offending input.
fn report(error: &BuildError, keys: &[Key], context: &Context) {
    match *error {
        BuildError::DuplicateKey { first, second } => {
            if let (Some(first), Some(second)) = (keys.get(first), keys.get(second)) {
                emit_error!(first.span, "this key is equivalent to...");
                emit_error!(second.span, "...this key");
            } else {
                emit_call_site_error!("{}", error);
            }
        }
        BuildError::CapacityTooSmall { .. } | BuildError::CapacityTooLarge { .. } => {
            if let Some(lit) = &context.capacity {
                emit_error!(lit, "{}", error);
            } else {
                emit_call_site_error!("{}", error);
            }
        }
        _ => emit_call_site_error!("{}", error),
    }
}

fn generator(context: &Context) -> CodeGenerator {
    let mut gen = CodeGenerator::new();
    gen.set_crate("frost", context.frost_crate.clone());
    gen
}

fn set_dummy_expr() {
    set_dummy(quote!(::core::unreachable!()));
}

/// Builds the set once the element type is known.
struct SetBuilder<'a> {
    context: &'a Context,
    keys: &'a [Key],
    capacity: Option<usize>,
    element_type: TokenStream,
}

impl Callback for SetBuilder<'_> {
    type Output = TokenStream;

    fn call_once<K: PortableHash + Eq + Codegen>(self, elements: Vec<K>) -> TokenStream {
        let Self {
            context,
            keys,
            capacity,
            element_type,
        } = self;

        let result = match capacity {
            Some(capacity) => Set::try_with_capacity(elements, capacity),
            None => Set::try_from_elements(elements),
        };
        let set = match result {
            Ok(set) => set,
            Err(error) => {
                report(&error, keys, context);
                return quote!(::core::unreachable!());
            }
        };

        let frost_crate = &context.frost_crate;
        let set = generator(context).generate(&set);
        quote! {
            &{
                let set: #frost_crate::Set<#element_type> = #set;
                set
            }
        }
    }
}

/// Builds the map once the key type is known.
struct MapBuilder<'a> {
    input: &'a WithContext<MapArm>,
    keys: &'a [Key],
    capacity: Option<usize>,
    key_type: TokenStream,
}

impl Callback for MapBuilder<'_> {
    type Output = TokenStream;

    fn call_once<K: PortableHash + Eq + Codegen>(self, keys: Vec<K>) -> TokenStream {
        let Self {
            input,
            keys: parsed_keys,
            capacity,
            key_type,
        } = self;
        let context = &input.context;

        let entries = keys
            .into_iter()
            .zip(
                input
                    .elements
                    .iter()
                    .map(|arm| PassThrough(arm.value.to_token_stream())),
            )
            .collect();
        let result = match capacity {
            Some(capacity) => Map::try_with_capacity(entries, capacity),
            None => Map::try_from_entries(entries),
        };
        let map = match result {
            Ok(map) => map,
            Err(error) => {
                report(&error, parsed_keys, context);
                return quote!(::core::unreachable!());
            }
        };

        let frost_crate = &context.frost_crate;
        let map = generator(context).generate(&map);
        quote! {
            &{
                let map: #frost_crate::Map<#key_type, _> = #map;
                map
            }
        }
    }
}

// This option does not enable the `proc_macro_hack` crate. It only tweaks the error output to be
// valid in expression position.
#[proc_macro_error2::proc_macro_error(proc_macro_hack)]
#[proc_macro]
pub fn set(item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    set_dummy_expr();

    let input = parse_macro_input!(item as WithContext<Expr>);
    let Ok((keys, key_type)) = parse_keys(&input.context, input.elements.iter()) else {
        return quote!(::core::unreachable!()).into();
    };
    let Ok(capacity) = parse_capacity(&input.context) else {
        return quote!(::core::unreachable!()).into();
    };

    let builder = SetBuilder {
        context: &input.context,
        keys: &keys,
        capacity,
        element_type: key_type.map_or_else(|| quote!(_), KeyType::to_tokens),
    };
    // An empty set can be built with any element type.
    with_typed_keys(&keys, key_type.unwrap_or(KeyType::U8), builder)
        .unwrap_or_else(|()| quote!(::core::unreachable!()))
        .into()
}

// This option does not enable the `proc_macro_hack` crate. It only tweaks the error output to be
// valid in expression position.
#[proc_macro_error2::proc_macro_error(proc_macro_hack)]
#[proc_macro]
pub fn map(item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    set_dummy_expr();

    let input = parse_macro_input!(item as WithContext<MapArm>);
    let Ok((keys, key_type)) = parse_keys(&input.context, input.elements.iter().map(|arm| &arm.key))
    else {
        return quote!(::core::unreachable!()).into();
    };
    let Ok(capacity) = parse_capacity(&input.context) else {
        return quote!(::core::unreachable!()).into();
    };

    let builder = MapBuilder {
        input: &input,
        keys: &keys,
        capacity,
        key_type: key_type.map_or_else(|| quote!(_), KeyType::to_tokens),
    };
    with_typed_keys(&keys, key_type.unwrap_or(KeyType::U8), builder)
        .unwrap_or_else(|()| quote!(::core::unreachable!()))
        .into()
}
