//! Key literals and their types.

use frost::{codegen::Codegen, hash::PortableHash};
use proc_macro2::{Span, TokenStream};
use proc_macro_error2::{emit_call_site_error, emit_error};
use quote::quote;
use syn::{spanned::Spanned, Expr, ExprLit, ExprUnary, Lit, Type, TypeReference, UnOp};

/// Types a key literal can have.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyType {
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    Bool,
    Char,
    Str,
}

impl KeyType {
    /// Parse a primitive type name or an integer literal suffix.
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "u128" => Self::U128,
            "usize" => Self::Usize,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "i128" => Self::I128,
            "isize" => Self::Isize,
            "bool" => Self::Bool,
            "char" => Self::Char,
            _ => return None,
        })
    }

    /// Recognize a `for Type;` annotation.
    pub fn from_syn_type(ty: &Type) -> Option<Self> {
        match ty {
            Type::Path(path) if path.qself.is_none() => {
                let ident = path.path.get_ident()?.to_string();
                Self::from_name(&ident)
            }
            Type::Reference(TypeReference {
                mutability: None,
                elem,
                ..
            }) => match &**elem {
                Type::Path(path) if path.path.is_ident("str") => Some(Self::Str),
                _ => None,
            },
            Type::Group(group) => Self::from_syn_type(&group.elem),
            Type::Paren(paren) => Self::from_syn_type(&paren.elem),
            _ => None,
        }
    }

    const fn is_integer(self) -> bool {
        !matches!(self, Self::Bool | Self::Char | Self::Str)
    }

    /// The type as written in generated code.
    pub fn to_tokens(self) -> TokenStream {
        match self {
            Self::U8 => quote!(u8),
            Self::U16 => quote!(u16),
            Self::U32 => quote!(u32),
            Self::U64 => quote!(u64),
            Self::U128 => quote!(u128),
            Self::Usize => quote!(usize),
            Self::I8 => quote!(i8),
            Self::I16 => quote!(i16),
            Self::I32 => quote!(i32),
            Self::I64 => quote!(i64),
            Self::I128 => quote!(i128),
            Self::Isize => quote!(isize),
            Self::Bool => quote!(bool),
            Self::Char => quote!(char),
            Self::Str => quote!(&'static str),
        }
    }
}

impl core::fmt::Display for KeyType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::Usize => "usize",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::Isize => "isize",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Str => "&str",
        };
        f.write_str(name)
    }
}

/// A parsed key literal.
#[derive(Debug)]
pub enum KeyValue {
    Integer {
        negative: bool,
        /// Decimal digits, without sign or suffix.
        digits: String,
        suffix: Option<KeyType>,
    },
    Bool(bool),
    Char(char),
    Str(String),
}

#[derive(Debug)]
pub struct Key {
    pub value: KeyValue,
    pub span: Span,
}

impl Key {
    /// Parse a key expression. Only literals and negated integer literals are accepted.
    pub fn from_expr(expr: &Expr) -> syn::Result<Self> {
        let value = match expr {
            Expr::Lit(ExprLit { lit, .. }) => Self::from_lit(lit, false)?,
            Expr::Unary(ExprUnary {
                op: UnOp::Neg(_),
                expr: inner,
                ..
            }) => match &**inner {
                Expr::Lit(ExprLit {
                    lit: lit @ Lit::Int(_),
                    ..
                }) => Self::from_lit(lit, true)?,
                _ => return Err(unsupported(expr)),
            },
            Expr::Group(group) => return Self::from_expr(&group.expr),
            Expr::Paren(paren) => return Self::from_expr(&paren.expr),
            _ => return Err(unsupported(expr)),
        };
        Ok(Self {
            value,
            span: expr.span(),
        })
    }

    fn from_lit(lit: &Lit, negative: bool) -> syn::Result<KeyValue> {
        Ok(match lit {
            Lit::Int(int) => {
                let suffix = match int.suffix() {
                    "" => None,
                    suffix => Some(KeyType::from_name(suffix).ok_or_else(|| {
                        syn::Error::new_spanned(int, format!("invalid suffix `{suffix}`"))
                    })?),
                };
                KeyValue::Integer {
                    negative,
                    digits: int.base10_digits().to_owned(),
                    suffix,
                }
            }
            Lit::Bool(value) => KeyValue::Bool(value.value),
            Lit::Char(value) => KeyValue::Char(value.value()),
            Lit::Str(value) => KeyValue::Str(value.value()),
            _ => return Err(syn::Error::new_spanned(lit, "unsupported literal type")),
        })
    }

    /// The type the literal has on its own, if any. Unsuffixed integers don't have one.
    const fn literal_type(&self) -> Option<KeyType> {
        match self.value {
            KeyValue::Integer { suffix, .. } => suffix,
            KeyValue::Bool(_) => Some(KeyType::Bool),
            KeyValue::Char(_) => Some(KeyType::Char),
            KeyValue::Str(_) => Some(KeyType::Str),
        }
    }
}

fn unsupported(expr: &Expr) -> syn::Error {
    syn::Error::new_spanned(
        expr,
        "expected a literal key\nnote: keys must be integer, `bool`, `char`, or string literals",
    )
}

/// Settle the key type, emitting diagnostics on failure.
///
/// Returns `Ok(None)` if there are no keys and no annotation, in which case any type will do.
pub fn infer_type(annotation: Option<&Type>, keys: &[Key]) -> Result<Option<KeyType>, ()> {
    let mut inferred = match annotation {
        Some(ty) => {
            let Some(key_type) = KeyType::from_syn_type(ty) else {
                emit_error!(
                    ty,
                    "unsupported key type\nnote: keys must be integers, `bool`, `char`, or `&str`"
                );
                return Err(());
            };
            Some(key_type)
        }
        None => None,
    };

    let mut failed = false;
    for key in keys {
        let Some(key_type) = key.literal_type() else {
            continue;
        };
        match inferred {
            None => inferred = Some(key_type),
            Some(expected) if expected != key_type => {
                emit_error!(
                    key.span,
                    "mismatched key types\nexpected `{}`, found `{}`",
                    expected,
                    key_type
                );
                failed = true;
            }
            Some(_) => {}
        }
    }
    if failed {
        return Err(());
    }

    let Some(key_type) = inferred else {
        if keys.is_empty() {
            return Ok(None);
        }
        emit_call_site_error!(
            "type annotations needed\nspecify the key type manually by prepending `for Type;` to the macro input\nnote: integer sizes need to be specified exactly"
        );
        return Err(());
    };

    if !key_type.is_integer() {
        for key in keys {
            if key.literal_type().is_none() {
                emit_error!(
                    key.span,
                    "mismatched key types\nexpected `{}`, found integer",
                    key_type
                );
                failed = true;
            }
        }
    }
    if failed {
        Err(())
    } else {
        Ok(Some(key_type))
    }
}

/// Conversion from a key literal to a typed value.
trait FromKey<'a>: Sized {
    fn from_key(value: &'a KeyValue) -> Option<Self>;
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl FromKey<'_> for $ty {
                fn from_key(value: &KeyValue) -> Option<Self> {
                    match value {
                        KeyValue::Integer { negative: false, digits, .. } => digits.parse().ok(),
                        KeyValue::Integer { negative: true, digits, .. } => {
                            format!("-{digits}").parse().ok()
                        }
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_integer!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl FromKey<'_> for bool {
    fn from_key(value: &KeyValue) -> Option<Self> {
        match *value {
            KeyValue::Bool(value) => Some(value),
            _ => None,
        }
    }
}

impl FromKey<'_> for char {
    fn from_key(value: &KeyValue) -> Option<Self> {
        match *value {
            KeyValue::Char(value) => Some(value),
            _ => None,
        }
    }
}

impl<'a> FromKey<'a> for &'a str {
    fn from_key(value: &'a KeyValue) -> Option<Self> {
        match value {
            KeyValue::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// Generic code to run once the key type is known.
pub trait Callback {
    type Output;

    fn call_once<K: PortableHash + Eq + Codegen>(self, keys: Vec<K>) -> Self::Output;
}

fn convert<'a, K: FromKey<'a>>(keys: &'a [Key], key_type: KeyType) -> Result<Vec<K>, ()> {
    let mut failed = false;
    let converted = keys
        .iter()
        .filter_map(|key| {
            let value = K::from_key(&key.value);
            if value.is_none() {
                emit_error!(
                    key.span,
                    "literal out of range for `{}`\nnote: the literal does not fit into the key type",
                    key_type
                );
                failed = true;
            }
            value
        })
        .collect();
    if failed {
        Err(())
    } else {
        Ok(converted)
    }
}

/// Convert keys to their Rust type and invoke the callback with them.
pub fn with_typed_keys<C: Callback>(
    keys: &[Key],
    key_type: KeyType,
    callback: C,
) -> Result<C::Output, ()> {
    Ok(match key_type {
        KeyType::U8 => callback.call_once(convert::<u8>(keys, key_type)?),
        KeyType::U16 => callback.call_once(convert::<u16>(keys, key_type)?),
        KeyType::U32 => callback.call_once(convert::<u32>(keys, key_type)?),
        KeyType::U64 => callback.call_once(convert::<u64>(keys, key_type)?),
        KeyType::U128 => callback.call_once(convert::<u128>(keys, key_type)?),
        KeyType::Usize => callback.call_once(convert::<usize>(keys, key_type)?),
        KeyType::I8 => callback.call_once(convert::<i8>(keys, key_type)?),
        KeyType::I16 => callback.call_once(convert::<i16>(keys, key_type)?),
        KeyType::I32 => callback.call_once(convert::<i32>(keys, key_type)?),
        KeyType::I64 => callback.call_once(convert::<i64>(keys, key_type)?),
        KeyType::I128 => callback.call_once(convert::<i128>(keys, key_type)?),
        KeyType::Isize => callback.call_once(convert::<isize>(keys, key_type)?),
        KeyType::Bool => callback.call_once(convert::<bool>(keys, key_type)?),
        KeyType::Char => callback.call_once(convert::<char>(keys, key_type)?),
        KeyType::Str => callback.call_once(convert::<&str>(keys, key_type)?),
    })
}
