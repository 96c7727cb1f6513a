use proc_macro2::TokenStream;
use syn::{
    parse::{Parse, ParseStream, Result},
    punctuated::Punctuated,
    Expr, LitInt, Token, Type,
};

mod kw {
    syn::custom_keyword!(capacity);
}

#[derive(Debug)]
pub struct MapArm {
    pub key: Expr,
    pub value: Expr,
}

impl Parse for MapArm {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let key = input.parse::<Expr>()?;
        input.parse::<Token![=>]>()?;
        let value = input.parse::<Expr>()?;
        Ok(Self { key, value })
    }
}

/// Everything that precedes the elements: `crate $crate; for Type; capacity = N;`.
#[derive(Debug)]
pub struct Context {
    /// Path to the facade crate, passed by the `macro_rules!` wrapper.
    pub frost_crate: TokenStream,
    pub key_type: Option<Type>,
    pub capacity: Option<LitInt>,
}

impl Parse for Context {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        input.parse::<Token![crate]>()?;
        let mut frost_crate = TokenStream::new();
        while !input.peek(Token![;]) {
            frost_crate.extend([input.parse::<proc_macro2::TokenTree>()?]);
        }
        input.parse::<Token![;]>()?;

        let key_type = if input.peek(Token![for]) {
            input.parse::<Token![for]>()?;
            let ty = input.parse::<Type>()?;
            input.parse::<Token![;]>()?;
            Some(ty)
        } else {
            None
        };

        let capacity = if input.peek(kw::capacity) && input.peek2(Token![=]) {
            input.parse::<kw::capacity>()?;
            input.parse::<Token![=]>()?;
            let capacity = input.parse::<LitInt>()?;
            input.parse::<Token![;]>()?;
            Some(capacity)
        } else {
            None
        };

        Ok(Self {
            frost_crate,
            key_type,
            capacity,
        })
    }
}

type Comma = Token![,];

#[derive(Debug)]
pub struct WithContext<Element> {
    pub context: Context,
    // Using `Token![,]` directly here leads to "`derive` cannot be used on items with type macros".
    pub elements: Punctuated<Element, Comma>,
}

impl<Element: Parse> Parse for WithContext<Element> {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        Ok(Self {
            context: input.parse::<Context>()?,
            elements: Punctuated::parse_terminated(input)?,
        })
    }
}
