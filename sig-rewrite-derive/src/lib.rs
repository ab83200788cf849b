//! Procedural macros that record parameter names for sig-rewrite.
//!
//! Rust does not keep parameter names at runtime, yet every wrapper in
//! sig-rewrite maps names to positions. These macros capture the names from
//! the source at compile time.
//!
//! # Available Function-like Macros
//!
//! - [`function!`]: Turns a closure into a `Function` named after its parameters
//!
//! # Available Attribute Macros
//!
//! - [`macro@signature`]: Adds a `<name>_function()` constructor next to a free function
//!
//! # Example: function!
//!
//! ```rust,ignore
//! use sig_rewrite::{Introspect, function};
//!
//! let area = function!(|width, height| {
//!     let width = width.and_then(|value| value.as_f64()).unwrap_or(0.0);
//!     let height = height.and_then(|value| value.as_f64()).unwrap_or(0.0);
//!     width * height
//! });
//!
//! assert_eq!(area.parameter_names(), ["width", "height"]);
//! ```
//!
//! # Example: #[signature]
//!
//! ```rust,ignore
//! use sig_rewrite::{Value, signature};
//!
//! #[signature]
//! fn greet(greeting: Option<Value>, name: Option<Value>) -> String {
//!     format!("{greeting:?} {name:?}")
//! }
//!
//! let greet = greet_function();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod function;
mod parameter;
mod signature;

use proc_macro::TokenStream;

/// Converts a closure into a `sig_rewrite::Function`.
///
/// The closure's parameter names, in order, become the function's
/// signature. Each parameter is bound to the corresponding argument slot as
/// an `Option<Value>`: `None` when the argument is absent. A parameter may
/// carry that type explicitly; any other type fails to compile.
///
/// # Requirements
///
/// - Parameters must be plain identifiers (`name`, `mut name`, `name: Type`)
/// - The closure must not be `async`
///
/// # Example
///
/// ```rust,ignore
/// use sig_rewrite::{arguments, function};
///
/// let describe = function!(|name, age| format!("{name:?} is {age:?}"));
/// assert_eq!(describe.call(arguments!["Ada", 36]), r#"Some(String("Ada")) is Some(Number(36))"#);
/// ```
#[proc_macro]
pub fn function(input: TokenStream) -> TokenStream {
    function::function_impl(input)
}

/// Records the parameter names of a free function.
///
/// Generates `<name>_function()`, with the same visibility, returning the
/// function as a `sig_rewrite::Function` whose signature lists the declared
/// parameter names. Every parameter must have type `Option<Value>`.
///
/// # Requirements
///
/// - A free function: no `self` receiver, no generics, not `async`
/// - Parameters must be plain identifiers
///
/// # Example
///
/// ```rust,ignore
/// use sig_rewrite::{Introspect, Value, signature};
///
/// #[signature]
/// pub fn volume(width: Option<Value>, height: Option<Value>, depth: Option<Value>) -> usize {
///     [width, height, depth].iter().flatten().count()
/// }
///
/// assert_eq!(volume_function().parameter_names(), ["width", "height", "depth"]);
/// ```
#[proc_macro_attribute]
pub fn signature(attribute: TokenStream, item: TokenStream) -> TokenStream {
    signature::signature_impl(attribute, item)
}
