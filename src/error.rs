//! Error types for signature rewriting.
//!
//! Composition failures ([`RewriteError`], [`ConfigError`]) are raised by
//! [`compose`](crate::compose) and the individual wrappers before anything
//! is wrapped. [`BuilderError`] covers misuse of a [`Builder`] at call time.
//! Failures of the target function itself are never represented here: they
//! travel inside the target's own return type.
//!
//! [`Builder`]: crate::Builder

use thiserror::Error;

/// Errors reported by [`compose`](crate::compose).
///
/// # Examples
///
/// ```rust
/// use sig_rewrite::{ConfigError, RewriteError};
///
/// assert_eq!(
///     RewriteError::NotAFunction.to_string(),
///     "First argument must be a function"
/// );
/// assert_eq!(
///     RewriteError::from(ConfigError::OrphanedTemplate).to_string(),
///     "Specifying builderTemplate when toBuilderPattern is not true is invalid"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// The value to rewrite is not callable.
    #[error("First argument must be a function")]
    NotAFunction,
    /// The wrap configuration is absent, contradictory or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A wrap configuration that cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// None of `toOptions`, `toBuilderPattern` or `defaults` was requested.
    #[error("sig-rewrite requires one of: {{ toOptions, toBuilderPattern, defaults }} to be specified")]
    NothingToRewrite,
    /// Full options conversion and the builder pattern were both requested.
    #[error("full toOptions and builder pattern are not compatible")]
    FullOptionsWithBuilder,
    /// `builderTemplate` holds something other than a function.
    #[error("builderTemplate must be a function")]
    TemplateNotAFunction,
    /// `builderTemplate` without `toBuilderPattern`.
    #[error("Specifying builderTemplate when toBuilderPattern is not true is invalid")]
    OrphanedTemplate,
    /// A parameter name that the target does not declare.
    #[error("{context}: unknown parameter `{name}`, expected one of {signature}")]
    UnknownParameter {
        /// Which setting referred to the parameter.
        context: &'static str,
        /// The offending name.
        name: String,
        /// The target's declared parameters.
        signature: String,
    },
    /// The same parameter was named twice.
    #[error("{context}: parameter `{name}` is listed more than once")]
    DuplicateParameter {
        /// Which setting repeated the parameter.
        context: &'static str,
        /// The repeated name.
        name: String,
    },
    /// A default keyed by a position the target does not have.
    #[error("defaults: position {position} is out of range for arity {arity}")]
    PositionOutOfRange {
        /// The offending position.
        position: usize,
        /// The target's arity.
        arity: usize,
    },
    /// A builder setter shares its name with the terminal method.
    #[error("builder: setter `{method}` collides with the terminal method")]
    TerminalCollision {
        /// The colliding method name.
        method: String,
    },
}

/// Misuse of a [`Builder`](crate::Builder) instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// The builder has no method with this name.
    #[error("builder has no method `{method}`")]
    UnknownMethod {
        /// The requested method.
        method: String,
    },
    /// A setter received the wrong number of values.
    #[error("builder method `{method}` takes {expected} value(s), got {actual}")]
    ArityMismatch {
        /// The setter.
        method: String,
        /// Number of parameters bound to the setter.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
    /// A setter was called as if it were the terminal method.
    #[error("`{method}` is a setter, not the terminal method")]
    NotTerminal {
        /// The setter.
        method: String,
    },
    /// The terminal method was called as if it were a setter.
    #[error("`{method}` is the terminal method and cannot be used as a setter")]
    TerminalNotSetter {
        /// The terminal method.
        method: String,
    },
}
