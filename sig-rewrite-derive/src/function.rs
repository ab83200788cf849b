//! Implementation of the `function!` procedural macro.
//!
//! The macro turns a closure into a `sig_rewrite::Function` whose signature
//! lists the closure's parameter names.
//!
//! # Generated Code Structure
//!
//! For `function!(|width, height| body)` the macro generates:
//!
//! ```text
//! ::sig_rewrite::Function::new(
//!     ["width", "height"], // typed as [&'static str; 2]
//!     move |__sig_rewrite_arguments: ::sig_rewrite::Arguments| {
//!         let mut __sig_rewrite_slots = __sig_rewrite_arguments.into_iter();
//!         let width: Option<Value> = __sig_rewrite_slots.next().flatten();
//!         let height: Option<Value> = __sig_rewrite_slots.next().flatten();
//!         body
//!     },
//! )
//! ```
//!
//! The body is expanded in place rather than called as a closure, so the
//! parameter types never have to be inferred from a later call.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{ExprClosure, ReturnType, parse_macro_input};

use crate::parameter::named_parameter;

pub fn function_impl(input: TokenStream) -> TokenStream {
    let closure = parse_macro_input!(input as ExprClosure);

    let expanded = generate_function(&closure).unwrap_or_else(syn::Error::into_compile_error);

    TokenStream::from(expanded)
}

fn generate_function(closure: &ExprClosure) -> syn::Result<TokenStream2> {
    if let Some(asyncness) = &closure.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "function! does not support async closures",
        ));
    }

    let parameters = closure
        .inputs
        .iter()
        .map(|pattern| named_parameter(pattern, "function!"))
        .collect::<syn::Result<Vec<_>>>()?;

    let names = parameters.iter().map(crate::parameter::NamedParameter::name);
    let bindings = parameters.iter().map(|parameter| {
        let binding = &parameter.binding;
        let declared_type = parameter.declared_type.as_ref().map_or_else(
            || quote! { ::core::option::Option<::sig_rewrite::Value> },
            |declared_type| quote! { #declared_type },
        );
        quote! {
            let #binding: #declared_type = __sig_rewrite_slots.next().flatten();
        }
    });

    let body = &closure.body;
    let output = match &closure.output {
        ReturnType::Default => quote! {},
        ReturnType::Type(arrow, return_type) => quote! { #arrow #return_type },
    };

    let slots = if parameters.is_empty() {
        quote! {}
    } else {
        quote! { let mut __sig_rewrite_slots = __sig_rewrite_arguments.into_iter(); }
    };

    let count = parameters.len();

    Ok(quote! {{
        let __sig_rewrite_names: [&'static str; #count] = [#(#names),*];
        ::sig_rewrite::Function::new(
            __sig_rewrite_names,
            move |__sig_rewrite_arguments: ::sig_rewrite::Arguments| #output {
                #slots
                #(#bindings)*
                #body
            },
        )
    }})
}
