//! Declared parameter names of a callable.
//!
//! Rust keeps no parameter names at runtime, so every [`Function`] carries a
//! [`Signature`] declared alongside it: either spelled out with
//! [`Function::new`], or captured at compile time by the `function!` and
//! `#[signature]` macros. Wrappers use it to map names to positions.
//!
//! The names are only as good as the declaration. Functions assembled at
//! runtime must supply their names explicitly, and the macros reject
//! parameters that are not plain identifiers.
//!
//! [`Function`]: crate::Function
//! [`Function::new`]: crate::Function::new

use std::fmt;
use std::sync::Arc;

/// Capability of reporting declared parameter names in declaration order.
pub trait Introspect {
    /// Declared parameter names, in order.
    fn parameter_names(&self) -> &[String];

    /// Number of declared parameters.
    fn arity(&self) -> usize {
        self.parameter_names().len()
    }

    /// Position of the parameter called `name`.
    fn position_of(&self, name: &str) -> Option<usize> {
        self.parameter_names()
            .iter()
            .position(|parameter| parameter == name)
    }
}

/// An ordered, immutable list of parameter names.
///
/// # Examples
///
/// ```rust
/// use sig_rewrite::{Introspect, Signature};
///
/// let signature = Signature::new(["width", "height"]);
/// assert_eq!(signature.arity(), 2);
/// assert_eq!(signature.position_of("height"), Some(1));
/// assert_eq!(signature.to_string(), "(width, height)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature {
    parameters: Arc<[String]>,
}

impl Signature {
    /// Creates a signature from parameter names.
    pub fn new<I, S>(parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parameters: parameters.into_iter().map(Into::<String>::into).collect(),
        }
    }

    /// Signature without parameters.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

impl Introspect for Signature {
    fn parameter_names(&self) -> &[String] {
        &self.parameters
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({})", self.parameters.join(", "))
    }
}
