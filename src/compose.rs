//! The composition entry point.
//!
//! [`compose`] validates a [`WrapConfig`] and stacks the requested wrappers
//! over a target function, always in the same order:
//!
//! ```text
//! target -> with_defaults -> with_options -> builder
//! ```
//!
//! Defaults sit closest to the target because the options and builder
//! layers both end in a positional call into the layer beneath them. The
//! options layer also receives the defaults table: an object has no order,
//! so every key missing from it takes its default, not only the trailing
//! ones.
//!
//! Every validation happens before anything is wrapped: `compose` either
//! returns a usable [`Wrapped`] function or an error.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::builder::{Builder, BuilderShape, BuilderTemplate, to_builder};
use crate::defaults::{Defaults, with_defaults};
use crate::error::{ConfigError, RewriteError};
use crate::function::{Function, Operand};
use crate::options::{ToOptions, options_layer};
use crate::signature::Signature;

/// Which rewrites [`compose`] should apply.
///
/// Built fluently, or deserialized from a document using the camelCase keys
/// `toOptions`, `toBuilderPattern`, `defaults` and `builderTemplate`. A
/// template can only be supplied in code; a falsy `builderTemplate` in a
/// document is treated as unset, any other value is kept as a plain value
/// and rejected by [`compose`].
///
/// # Examples
///
/// ```rust
/// use sig_rewrite::{Defaults, ToOptions, WrapConfig};
///
/// let config: WrapConfig = serde_json::from_str(
///     r#"{ "toOptions": ["b", "c"], "defaults": { "c": 3 } }"#,
/// ).unwrap();
///
/// assert_eq!(config.to_options, ToOptions::named(["b", "c"]));
/// assert_eq!(config.defaults, Some(Defaults::new().set("c", 3)));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WrapConfig {
    /// Parameters to collapse into an options object.
    pub to_options: ToOptions,
    /// Whether to return a builder instead of calling the target.
    pub to_builder_pattern: bool,
    /// Custom builder shape.
    #[serde(deserialize_with = "deserialize_template")]
    pub builder_template: Option<Operand<BuilderTemplate>>,
    /// Defaults for absent trailing arguments.
    pub defaults: Option<Defaults>,
}

impl WrapConfig {
    /// An empty configuration; [`compose`] rejects it until a rewrite is
    /// requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `toOptions`.
    #[must_use]
    pub fn to_options(mut self, mode: impl Into<ToOptions>) -> Self {
        self.to_options = mode.into();
        self
    }

    /// Sets `toBuilderPattern`.
    #[must_use]
    pub const fn to_builder_pattern(mut self, enabled: bool) -> Self {
        self.to_builder_pattern = enabled;
        self
    }

    /// Sets `builderTemplate` to a template function.
    #[must_use]
    pub fn builder_template<F>(self, template: F) -> Self
    where
        F: Fn(&[String]) -> BuilderShape + Send + Sync + 'static,
    {
        self.builder_template_operand(BuilderTemplate::new(template))
    }

    /// Sets `builderTemplate` to an arbitrary, possibly non-callable, operand.
    #[must_use]
    pub fn builder_template_operand(mut self, template: impl Into<Operand<BuilderTemplate>>) -> Self {
        self.builder_template = Some(template.into());
        self
    }

    /// Sets `defaults`.
    #[must_use]
    pub fn defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Checks the combination of settings.
    ///
    /// # Errors
    ///
    /// The first violated rule, in this order:
    /// [`ConfigError::NothingToRewrite`], [`ConfigError::FullOptionsWithBuilder`],
    /// [`ConfigError::TemplateNotAFunction`], [`ConfigError::OrphanedTemplate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.to_options.is_requested() && !self.to_builder_pattern && self.defaults.is_none() {
            return Err(ConfigError::NothingToRewrite);
        }
        if self.to_options == ToOptions::All && self.to_builder_pattern {
            return Err(ConfigError::FullOptionsWithBuilder);
        }
        match &self.builder_template {
            Some(template) if !template.is_callable() => Err(ConfigError::TemplateNotAFunction),
            Some(_) if !self.to_builder_pattern => Err(ConfigError::OrphanedTemplate),
            _ => Ok(()),
        }
    }
}

fn deserialize_template<'de, D>(deserializer: D) -> Result<Option<Operand<BuilderTemplate>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.filter(is_truthy).map(Operand::Value))
}

/// `null`, `false`, zero and the empty string leave a key unset.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|number| number.abs() > 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A composed function, in whichever calling convention it ended up with.
#[derive(Debug, Clone)]
pub enum Wrapped<R> {
    /// Called directly: positionally or with an options object.
    Function(Function<R>),
    /// Called to obtain a [`Builder`].
    Builder(Function<Builder<R>>),
}

impl<R> Wrapped<R> {
    /// Signature of the outermost layer.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        match self {
            Self::Function(function) => function.signature(),
            Self::Builder(function) => function.signature(),
        }
    }

    /// Returns `true` if calling this returns a builder.
    #[must_use]
    pub const fn is_builder(&self) -> bool {
        matches!(self, Self::Builder(_))
    }

    /// The direct-call function, if this is not a builder.
    #[must_use]
    pub fn into_function(self) -> Option<Function<R>> {
        match self {
            Self::Function(function) => Some(function),
            Self::Builder(_) => None,
        }
    }

    /// The builder function, if this is one.
    #[must_use]
    pub fn into_builder(self) -> Option<Function<Builder<R>>> {
        match self {
            Self::Builder(function) => Some(function),
            Self::Function(_) => None,
        }
    }

    /// Borrows the direct-call function.
    #[must_use]
    pub const fn as_function(&self) -> Option<&Function<R>> {
        match self {
            Self::Function(function) => Some(function),
            Self::Builder(_) => None,
        }
    }

    /// Borrows the builder function.
    #[must_use]
    pub const fn as_builder(&self) -> Option<&Function<Builder<R>>> {
        match self {
            Self::Builder(function) => Some(function),
            Self::Function(_) => None,
        }
    }
}

/// Wraps `target` in a builder when `enabled`, otherwise returns it as is.
///
/// # Errors
///
/// As for [`to_builder`].
pub fn with_builder<R: 'static>(
    target: Function<R>,
    enabled: bool,
    template: Option<&BuilderTemplate>,
) -> Result<Wrapped<R>, ConfigError> {
    if enabled {
        to_builder(target, template).map(Wrapped::Builder)
    } else {
        Ok(Wrapped::Function(target))
    }
}

/// Rewrites the signature of `target` according to `config`.
///
/// # Errors
///
/// [`RewriteError::NotAFunction`] when `target` is not callable, otherwise
/// any [`ConfigError`] from [`WrapConfig::validate`] or from the wrappers.
///
/// # Examples
///
/// ```rust
/// use sig_rewrite::{Arguments, Function, WrapConfig, compose};
/// use serde_json::json;
///
/// let target = Function::new(["a", "b", "c"], Arguments::into_vec);
/// let wrapped = compose(target, &WrapConfig::new().to_options(true))
///     .unwrap()
///     .into_function()
///     .unwrap();
///
/// assert_eq!(
///     wrapped.call_with(json!({"a": 1, "b": 2, "c": 3})),
///     vec![Some(json!(1)), Some(json!(2)), Some(json!(3))]
/// );
/// ```
pub fn compose<R: 'static>(
    target: impl Into<Operand<Function<R>>>,
    config: &WrapConfig,
) -> Result<Wrapped<R>, RewriteError> {
    let result = compose_layers(target.into(), config);
    if let Err(error) = &result {
        debug!(%error, "signature rewrite rejected");
    }
    result
}

fn compose_layers<R: 'static>(
    target: Operand<Function<R>>,
    config: &WrapConfig,
) -> Result<Wrapped<R>, RewriteError> {
    let Some(mut wrapped) = target.into_callable() else {
        return Err(RewriteError::NotAFunction);
    };
    config.validate()?;

    let original = wrapped.signature().clone();

    if let Some(defaults) = &config.defaults {
        wrapped = with_defaults(wrapped, defaults)?;
        debug!(count = defaults.len(), "applied defaults layer");
    }

    if config.to_options.is_requested() {
        wrapped = options_layer(wrapped, &config.to_options, config.defaults.as_ref())?;
        debug!(signature = %wrapped.signature(), "applied options layer");
    }

    let template = config.builder_template.as_ref().and_then(Operand::as_callable);
    let wrapped = with_builder(wrapped, config.to_builder_pattern, template)?;
    if wrapped.is_builder() {
        debug!(custom_template = template.is_some(), "applied builder layer");
    }

    debug!(
        original = %original,
        rewritten = %wrapped.signature(),
        builder = wrapped.is_builder(),
        "signature rewritten"
    );
    Ok(wrapped)
}
