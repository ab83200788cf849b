//! Extraction of parameter names from patterns.

use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Pat, PatIdent, Type};

/// A parameter whose name can be recorded in a signature.
pub struct NamedParameter {
    /// The binding, `mut` included.
    pub binding: PatIdent,
    /// The declared type, if any.
    pub declared_type: Option<Type>,
}

impl NamedParameter {
    /// The parameter name as it appears in the signature, without `r#`.
    pub fn name(&self) -> String {
        self.binding.ident.unraw().to_string()
    }
}

/// Accepts `name`, `mut name` and `name: Type`; rejects destructuring and `_`.
pub fn named_parameter(pattern: &Pat, macro_name: &str) -> syn::Result<NamedParameter> {
    match pattern {
        Pat::Ident(binding) if binding.subpat.is_none() && binding.by_ref.is_none() => {
            Ok(NamedParameter {
                binding: binding.clone(),
                declared_type: None,
            })
        }
        Pat::Type(typed) => {
            let mut parameter = named_parameter(&typed.pat, macro_name)?;
            parameter.declared_type = Some((*typed.ty).clone());
            Ok(parameter)
        }
        other => Err(syn::Error::new(
            other.span(),
            format!("{macro_name} parameters must be plain identifiers so their names can be recorded"),
        )),
    }
}
