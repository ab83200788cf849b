//! # sig-rewrite
//!
//! Rewrites the calling convention of an existing function without touching
//! its body.
//!
//! ## Overview
//!
//! Given a target [`Function`], [`compose`] can produce a function that
//!
//! - **fills defaults**: absent trailing arguments take preconfigured values,
//! - **takes options**: some or all parameters are read from an options object,
//! - **returns a builder**: arguments are set through chained, named setters
//!   and a terminal method invokes the target.
//!
//! The three rewrites are independent wrappers ([`with_defaults`],
//! [`with_options`], [`with_builder`]); [`compose`] validates a
//! [`WrapConfig`] and stacks them in a fixed order.
//!
//! ## Parameter names
//!
//! Rust has no runtime parameter-name reflection, so each [`Function`]
//! carries a [`Signature`] declared with it. The `derive` feature (on by
//! default) provides [`function!`] and [`#[signature]`](macro@signature),
//! which read the names from the source.
//!
//! ## Example
//!
//! ```rust
//! use sig_rewrite::{Defaults, WrapConfig, compose, function};
//! use serde_json::json;
//!
//! let resize = function!(|width, height, unit| {
//!     format!("{}x{} {}", width.unwrap_or_default(), height.unwrap_or_default(), unit.unwrap_or_default())
//! });
//!
//! let config = WrapConfig::new()
//!     .to_options(true)
//!     .defaults(Defaults::new().set("unit", "px"));
//! let resize = compose(resize, &config).unwrap().into_function().unwrap();
//!
//! assert_eq!(resize.call_with(json!({"width": 3, "height": 4})), r#"3x4 "px""#);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

extern crate self as sig_rewrite;

/// Prelude module for convenient imports.
///
/// ```rust
/// use sig_rewrite::prelude::*;
/// ```
pub mod prelude {
    pub use crate::builder::{Builder, BuilderShape, BuilderTemplate, Step};
    pub use crate::compose::{WrapConfig, Wrapped, compose};
    pub use crate::defaults::Defaults;
    pub use crate::error::{BuilderError, ConfigError, RewriteError};
    pub use crate::function::Function;
    pub use crate::options::ToOptions;
    pub use crate::signature::{Introspect, Signature};
    pub use crate::value::{Arguments, Value};

    #[cfg(feature = "derive")]
    pub use sig_rewrite_derive::{function, signature};
}

pub mod builder;
pub mod compose;
pub mod defaults;
pub mod error;
pub mod function;
pub mod options;
pub mod signature;
pub mod value;

pub use builder::{
    Builder, BuilderShape, BuilderTemplate, DEFAULT_TERMINAL, SETTER_PREFIX, Step, setter_name,
    to_builder,
};
pub use compose::{WrapConfig, Wrapped, compose, with_builder};
pub use defaults::{DefaultKey, Defaults, with_defaults};
pub use error::{BuilderError, ConfigError, RewriteError};
pub use function::{Function, Operand};
pub use options::{OPTIONS_PARAMETER, ToOptions, with_options};
pub use signature::{Introspect, Signature};
pub use value::{Arguments, Value};

#[cfg(feature = "derive")]
pub use sig_rewrite_derive::{function, signature};

#[doc(hidden)]
pub mod __private {
    pub use serde_json::json;
}
