//! Implementation of the `#[signature]` attribute macro.
//!
//! Applied to a free function, the attribute keeps the function as written
//! and adds a sibling `<name>_function()` that returns it as a
//! `sig_rewrite::Function` with the declared parameter names:
//!
//! ```text
//! #[signature]
//! fn area(width: Option<Value>, height: Option<Value>) -> Value { .. }
//!
//! // generates, next to `area`:
//! fn area_function() -> ::sig_rewrite::Function<Value> {
//!     ::sig_rewrite::Function::new(["width", "height"], |arguments| {
//!         let mut slots = arguments.into_iter();
//!         area(slots.next().flatten(), slots.next().flatten())
//!     })
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{FnArg, ItemFn, ReturnType, parse_macro_input};

use crate::parameter::named_parameter;

pub fn signature_impl(attribute: TokenStream, item: TokenStream) -> TokenStream {
    let attribute = TokenStream2::from(attribute);
    if !attribute.is_empty() {
        return syn::Error::new_spanned(attribute, "#[signature] takes no arguments")
            .into_compile_error()
            .into();
    }

    let function = parse_macro_input!(item as ItemFn);

    let expanded = match generate_constructor(&function) {
        Ok(constructor) => quote! {
            #function
            #constructor
        },
        Err(error) => {
            let error = error.into_compile_error();
            quote! {
                #function
                #error
            }
        }
    };

    TokenStream::from(expanded)
}

fn generate_constructor(function: &ItemFn) -> syn::Result<TokenStream2> {
    let signature = &function.sig;

    if let Some(asyncness) = &signature.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "#[signature] does not support async functions",
        ));
    }
    if !signature.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &signature.generics,
            "#[signature] does not support generic functions",
        ));
    }
    if let Some(variadic) = &signature.variadic {
        return Err(syn::Error::new_spanned(
            variadic,
            "#[signature] does not support variadic functions",
        ));
    }

    let names = signature
        .inputs
        .iter()
        .map(|input| match input {
            FnArg::Receiver(receiver) => Err(syn::Error::new_spanned(
                receiver,
                "#[signature] only supports free functions",
            )),
            FnArg::Typed(typed) => named_parameter(&typed.pat, "#[signature]").map(|parameter| parameter.name()),
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let visibility = &function.vis;
    let name = &signature.ident;
    let constructor = format_ident!("{}_function", name);
    let return_type = match &signature.output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, return_type) => quote! { #return_type },
    };
    let count = names.len();
    let slots = names
        .iter()
        .map(|_| quote! { __sig_rewrite_slots.next().flatten() });
    let documentation = format!(
        "Returns [`{name}`] as a `sig_rewrite::Function` with parameters `({})`.",
        names.join(", ")
    );

    Ok(quote! {
        #[doc = #documentation]
        #[must_use]
        #[allow(unused_mut)]
        #visibility fn #constructor() -> ::sig_rewrite::Function<#return_type> {
            let names: [&'static str; #count] = [#(#names),*];
            ::sig_rewrite::Function::new(names, |__sig_rewrite_arguments: ::sig_rewrite::Arguments| {
                let mut __sig_rewrite_slots = __sig_rewrite_arguments.into_iter();
                #name(#(#slots),*)
            })
        }
    })
}
