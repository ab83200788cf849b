//! Callables with a declared signature.
//!
//! [`Function`] is the unit every wrapper consumes and produces: a shared
//! closure over [`Arguments`] together with the [`Signature`] describing
//! its positional parameters. Wrapping never copies the closure beneath,
//! it only clones the `Arc` that holds it.
//!
//! [`Operand`] is a value that may or may not be callable. It is what the
//! composer accepts for the target and for `builderTemplate`, so that a
//! configuration assembled at runtime can be rejected with
//! [`RewriteError::NotAFunction`](crate::RewriteError::NotAFunction)
//! instead of being unrepresentable.

use std::fmt;
use std::sync::Arc;

use crate::signature::{Introspect, Signature};
use crate::value::{Arguments, Value};

type Body<R> = dyn Fn(Arguments) -> R + Send + Sync;

/// A callable over positional [`Arguments`] with declared parameter names.
///
/// The return type is free: a fallible target returns `Result<T, E>` and
/// its errors pass through every wrapper untouched.
///
/// # Examples
///
/// ```rust
/// use sig_rewrite::{Function, Introspect, arguments};
/// use serde_json::json;
///
/// let area = Function::new(["width", "height"], |arguments| {
///     let width = arguments.get(0).and_then(|value| value.as_i64()).unwrap_or(0);
///     let height = arguments.get(1).and_then(|value| value.as_i64()).unwrap_or(0);
///     width * height
/// });
///
/// assert_eq!(area.arity(), 2);
/// assert_eq!(area.call(arguments![3, 4]), 12);
/// ```
pub struct Function<R> {
    signature: Signature,
    body: Arc<Body<R>>,
}

impl<R> Function<R> {
    /// Creates a function from its parameter names and body.
    pub fn new<I, S, F>(parameters: I, body: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(Arguments) -> R + Send + Sync + 'static,
    {
        Self::from_signature(Signature::new(parameters), body)
    }

    /// Creates a function from an existing signature.
    pub fn from_signature<F>(signature: Signature, body: F) -> Self
    where
        F: Fn(Arguments) -> R + Send + Sync + 'static,
    {
        Self {
            signature,
            body: Arc::new(body),
        }
    }

    /// The declared signature.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Calls the function with positional arguments.
    pub fn call(&self, arguments: impl Into<Arguments>) -> R {
        (self.body)(arguments.into())
    }

    /// Calls the function with a single argument.
    pub fn call_with(&self, argument: impl Into<Value>) -> R {
        let mut arguments = Arguments::with_capacity(1);
        arguments.push(argument);
        self.call(arguments)
    }
}

impl<R> Clone for Function<R> {
    fn clone(&self) -> Self {
        Self {
            signature: self.signature.clone(),
            body: Arc::clone(&self.body),
        }
    }
}

impl<R> Introspect for Function<R> {
    fn parameter_names(&self) -> &[String] {
        self.signature.parameter_names()
    }
}

impl<R> fmt::Debug for Function<R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Function")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Either a callable or a plain value.
///
/// # Examples
///
/// ```rust
/// use sig_rewrite::{Function, Operand};
/// use serde_json::json;
///
/// let callable: Operand<Function<()>> = Function::new(["a"], |_| ()).into();
/// let plain: Operand<Function<()>> = json!("not callable").into();
///
/// assert!(callable.is_callable());
/// assert!(!plain.is_callable());
/// ```
#[derive(Debug, Clone)]
pub enum Operand<F> {
    /// Something that can be called.
    Callable(F),
    /// Anything else.
    Value(Value),
}

impl<F> Operand<F> {
    /// Returns `true` for [`Operand::Callable`].
    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Callable(_))
    }

    /// Returns the callable, if any.
    pub fn into_callable(self) -> Option<F> {
        match self {
            Self::Callable(callable) => Some(callable),
            Self::Value(_) => None,
        }
    }

    /// Borrows the callable, if any.
    pub const fn as_callable(&self) -> Option<&F> {
        match self {
            Self::Callable(callable) => Some(callable),
            Self::Value(_) => None,
        }
    }
}

impl<R> From<Function<R>> for Operand<Function<R>> {
    fn from(function: Function<R>) -> Self {
        Self::Callable(function)
    }
}

impl<F> From<Value> for Operand<F> {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

static_assertions::assert_impl_all!(Function<Value>: Send, Sync, Clone);
static_assertions::assert_impl_all!(Function<Result<Value, String>>: Send, Sync, Clone);
