//! Turning a function into a chained builder.
//!
//! A builder-style function returns a [`Builder`] instead of calling its
//! target. The builder exposes one setter per parameter and a terminal
//! method that invokes the target with everything accumulated so far:
//!
//! ```text
//! target(width, height)
//!
//! f().with_height(2).with_width(3).build()   ->  target(3, 2)
//! ```
//!
//! Setter methods are looked up by name at runtime, so a [`BuilderTemplate`]
//! can rename them, bind one setter to several parameters, or rename the
//! terminal. The shape is resolved once, when the builder function is
//! created, and shared by every builder it hands out.
//!
//! # State
//!
//! A builder accumulates until its terminal method runs. The terminal takes
//! the builder by value, so a finished builder cannot be touched again.
//! Each call of the builder function starts a fresh, independent builder.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::{BuilderError, ConfigError};
use crate::function::{Function, Operand};
use crate::signature::{Introspect, Signature};
use crate::value::{Arguments, Value};

/// Name of the terminal method in the default shape.
pub const DEFAULT_TERMINAL: &str = "build";

/// Prefix of the setter names in the default shape.
pub const SETTER_PREFIX: &str = "with_";

/// Returns the default setter name for `parameter`.
///
/// ```rust
/// assert_eq!(sig_rewrite::setter_name("width"), "with_width");
/// ```
#[must_use]
pub fn setter_name(parameter: &str) -> String {
    format!("{SETTER_PREFIX}{parameter}")
}

/// Describes the methods a builder exposes.
///
/// # Examples
///
/// ```rust
/// use sig_rewrite::BuilderShape;
///
/// let shape = BuilderShape::new("done")
///     .setter("w", "width")
///     .setter_for("size", ["width", "height"]);
///
/// assert_eq!(shape.terminal(), "done");
/// assert_eq!(shape.setters().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderShape {
    setters: BTreeMap<String, Vec<String>>,
    terminal: String,
}

impl BuilderShape {
    /// Creates a shape with no setters and the given terminal method.
    pub fn new(terminal: impl Into<String>) -> Self {
        Self {
            setters: BTreeMap::new(),
            terminal: terminal.into(),
        }
    }

    /// The default shape: `with_<parameter>` for every parameter, `build`
    /// as terminal.
    #[must_use]
    pub fn for_parameters(parameters: &[String]) -> Self {
        parameters
            .iter()
            .fold(Self::new(DEFAULT_TERMINAL), |shape, parameter| {
                shape.setter(setter_name(parameter), parameter.clone())
            })
    }

    /// Adds a setter bound to a single parameter.
    #[must_use]
    pub fn setter(self, method: impl Into<String>, parameter: impl Into<String>) -> Self {
        self.setter_for(method, [parameter])
    }

    /// Adds a setter bound to several parameters, taking one value for each.
    #[must_use]
    pub fn setter_for<I, S>(mut self, method: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.setters.insert(
            method.into(),
            parameters.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Name of the terminal method.
    #[must_use]
    pub fn terminal(&self) -> &str {
        &self.terminal
    }

    /// Setter names and the parameters each one binds.
    pub fn setters(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.setters
            .iter()
            .map(|(method, parameters)| (method.as_str(), parameters.as_slice()))
    }

    fn resolve(&self, signature: &Signature, context: &'static str) -> Result<ResolvedShape, ConfigError> {
        let mut setters = HashMap::with_capacity(self.setters.len());

        for (method, parameters) in &self.setters {
            if *method == self.terminal {
                return Err(ConfigError::TerminalCollision {
                    method: method.clone(),
                });
            }
            let positions = parameters
                .iter()
                .map(|parameter| {
                    signature
                        .position_of(parameter)
                        .ok_or_else(|| ConfigError::UnknownParameter {
                            context,
                            name: parameter.clone(),
                            signature: signature.to_string(),
                        })
                })
                .collect::<Result<SmallVec<[usize; 1]>, _>>()?;
            setters.insert(method.clone(), positions);
        }

        Ok(ResolvedShape {
            setters,
            terminal: self.terminal.clone(),
            signature: signature.clone(),
        })
    }
}

/// Produces a [`BuilderShape`] from a target's parameter names.
///
/// # Examples
///
/// ```rust
/// use sig_rewrite::{BuilderShape, BuilderTemplate};
///
/// let template = BuilderTemplate::new(|parameters: &[String]| {
///     parameters
///         .iter()
///         .fold(BuilderShape::new("done"), |shape, parameter| {
///             shape.setter(parameter.to_uppercase(), parameter.clone())
///         })
/// });
///
/// let shape = template.apply(&["a".to_string()]);
/// assert_eq!(shape.terminal(), "done");
/// ```
#[derive(Clone)]
pub struct BuilderTemplate(Arc<dyn Fn(&[String]) -> BuilderShape + Send + Sync>);

impl BuilderTemplate {
    /// Wraps a template function.
    pub fn new<F>(template: F) -> Self
    where
        F: Fn(&[String]) -> BuilderShape + Send + Sync + 'static,
    {
        Self(Arc::new(template))
    }

    /// Runs the template.
    #[must_use]
    pub fn apply(&self, parameters: &[String]) -> BuilderShape {
        (self.0)(parameters)
    }
}

impl fmt::Debug for BuilderTemplate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("BuilderTemplate(..)")
    }
}

impl From<BuilderTemplate> for Operand<BuilderTemplate> {
    fn from(template: BuilderTemplate) -> Self {
        Self::Callable(template)
    }
}

#[derive(Debug)]
struct ResolvedShape {
    setters: HashMap<String, SmallVec<[usize; 1]>>,
    terminal: String,
    signature: Signature,
}

/// The outcome of a dynamically dispatched builder method.
#[derive(Debug)]
pub enum Step<R> {
    /// A setter ran; the builder keeps accumulating.
    Continue(Builder<R>),
    /// The terminal ran and produced the target's result.
    Finished(R),
}

/// Accumulates arguments until its terminal method calls the target.
pub struct Builder<R> {
    target: Function<R>,
    shape: Arc<ResolvedShape>,
    arguments: Arguments,
}

impl<R> Builder<R> {
    /// Calls a single-parameter setter.
    ///
    /// # Errors
    ///
    /// [`BuilderError::UnknownMethod`], [`BuilderError::TerminalNotSetter`],
    /// or [`BuilderError::ArityMismatch`] when the setter binds more than
    /// one parameter.
    pub fn set(self, method: &str, value: impl Into<Value>) -> Result<Self, BuilderError> {
        self.set_all(method, [value.into()])
    }

    /// Calls a setter with one value per bound parameter.
    ///
    /// # Errors
    ///
    /// As for [`Builder::set`].
    pub fn set_all<I>(mut self, method: &str, values: I) -> Result<Self, BuilderError>
    where
        I: IntoIterator<Item = Value>,
    {
        if method == self.shape.terminal {
            return Err(BuilderError::TerminalNotSetter {
                method: method.to_string(),
            });
        }
        let positions = self
            .shape
            .setters
            .get(method)
            .ok_or_else(|| BuilderError::UnknownMethod {
                method: method.to_string(),
            })?;

        let values: SmallVec<[Value; 1]> = values.into_iter().collect();
        if values.len() != positions.len() {
            return Err(BuilderError::ArityMismatch {
                method: method.to_string(),
                expected: positions.len(),
                actual: values.len(),
            });
        }

        let shape = Arc::clone(&self.shape);
        for (position, value) in shape.setters[method].iter().zip(values) {
            trace!(method, position, "builder setter");
            self.arguments.set(*position, Some(value));
        }
        Ok(self)
    }

    /// Calls any method by name: a setter continues, the terminal finishes.
    ///
    /// # Errors
    ///
    /// As for [`Builder::set`]; the terminal accepts no values.
    pub fn call(self, method: &str, values: Vec<Value>) -> Result<Step<R>, BuilderError> {
        if method != self.shape.terminal {
            return self.set_all(method, values).map(Step::Continue);
        }
        if !values.is_empty() {
            return Err(BuilderError::ArityMismatch {
                method: method.to_string(),
                expected: 0,
                actual: values.len(),
            });
        }
        Ok(Step::Finished(self.build()))
    }

    /// Calls the terminal method by name.
    ///
    /// # Errors
    ///
    /// [`BuilderError::NotTerminal`] for a setter name,
    /// [`BuilderError::UnknownMethod`] for anything else.
    pub fn finish(self, method: &str) -> Result<R, BuilderError> {
        if method == self.shape.terminal {
            Ok(self.build())
        } else if self.shape.setters.contains_key(method) {
            Err(BuilderError::NotTerminal {
                method: method.to_string(),
            })
        } else {
            Err(BuilderError::UnknownMethod {
                method: method.to_string(),
            })
        }
    }

    /// Calls the terminal method, whatever its name, and invokes the target
    /// with the accumulated arguments. Unset parameters are absent.
    pub fn build(self) -> R {
        debug!(
            terminal = %self.shape.terminal,
            supplied = self.arguments.iter().filter(|slot| slot.is_some()).count(),
            "builder finished"
        );
        self.target.call(self.arguments)
    }

    /// Name of the terminal method.
    #[must_use]
    pub fn terminal(&self) -> &str {
        &self.shape.terminal
    }

    /// Setter names, sorted.
    #[must_use]
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.shape.setters.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    /// The value accumulated for `parameter`, if set.
    #[must_use]
    pub fn get(&self, parameter: &str) -> Option<&Value> {
        self.shape
            .signature
            .position_of(parameter)
            .and_then(|position| self.arguments.get(position))
    }

    /// Everything accumulated so far, in parameter order.
    #[must_use]
    pub const fn arguments(&self) -> &Arguments {
        &self.arguments
    }
}

impl<R> fmt::Debug for Builder<R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Builder")
            .field("signature", &self.shape.signature)
            .field("terminal", &self.shape.terminal)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Wraps `target` so each call returns a fresh [`Builder`].
///
/// Without a template every parameter `p` gets a setter `with_p` and the
/// terminal is `build`. Positional arguments passed to the returned
/// function pre-fill the builder.
///
/// # Errors
///
/// [`ConfigError::UnknownParameter`] when the shape binds a parameter the
/// target does not declare, [`ConfigError::TerminalCollision`] when a
/// setter is named like the terminal.
///
/// # Examples
///
/// ```rust
/// use sig_rewrite::{Arguments, Function, arguments, to_builder};
/// use serde_json::json;
///
/// let target = Function::new(["width", "height"], Arguments::into_vec);
/// let builder = to_builder(target, None).unwrap();
///
/// let result = builder
///     .call(arguments![])
///     .set("with_height", 2)
///     .and_then(|builder| builder.set("with_width", 3))
///     .map(|builder| builder.build())
///     .unwrap();
///
/// assert_eq!(result, vec![Some(json!(3)), Some(json!(2))]);
/// ```
pub fn to_builder<R: 'static>(
    target: Function<R>,
    template: Option<&BuilderTemplate>,
) -> Result<Function<Builder<R>>, ConfigError> {
    let signature = target.signature().clone();
    let shape = match template {
        Some(template) => template
            .apply(signature.parameter_names())
            .resolve(&signature, "builderTemplate")?,
        None => BuilderShape::for_parameters(signature.parameter_names())
            .resolve(&signature, "builder")?,
    };
    let shape = Arc::new(shape);
    let arity = signature.arity();

    Ok(Function::from_signature(signature, move |mut arguments: Arguments| {
        arguments.resize_absent(arity);
        Builder {
            target: target.clone(),
            shape: Arc::clone(&shape),
            arguments,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments;
    use rstest::rstest;
    use serde_json::json;

    fn echo() -> Function<Vec<Option<Value>>> {
        Function::new(["a", "b"], Arguments::into_vec)
    }

    fn start(function: &Function<Builder<Vec<Option<Value>>>>) -> Builder<Vec<Option<Value>>> {
        function.call(arguments![])
    }

    #[rstest]
    fn test_default_shape_methods() {
        let function = to_builder(echo(), None).unwrap();
        let builder = start(&function);

        assert_eq!(builder.methods(), ["with_a", "with_b"]);
        assert_eq!(builder.terminal(), DEFAULT_TERMINAL);
    }

    #[rstest]
    fn test_unset_parameters_are_absent() {
        let function = to_builder(echo(), None).unwrap();
        let result = start(&function).set("with_b", 2).unwrap().build();
        assert_eq!(result, vec![None, Some(json!(2))]);
    }

    #[rstest]
    fn test_setter_overwrites_previous_value() {
        let function = to_builder(echo(), None).unwrap();
        let builder = start(&function)
            .set("with_a", 1)
            .and_then(|builder| builder.set("with_a", 10))
            .unwrap();

        assert_eq!(builder.get("a"), Some(&json!(10)));
        assert_eq!(builder.build(), vec![Some(json!(10)), None]);
    }

    #[rstest]
    fn test_positional_arguments_prefill() {
        let function = to_builder(echo(), None).unwrap();
        let builder = function.call(arguments![1]);

        assert_eq!(builder.get("a"), Some(&json!(1)));
        assert_eq!(builder.set("with_b", 2).unwrap().build(), vec![Some(json!(1)), Some(json!(2))]);
    }

    #[rstest]
    fn test_builders_are_independent() {
        let function = to_builder(echo(), None).unwrap();
        let first = start(&function).set("with_a", 1).unwrap();
        let second = start(&function);

        assert_eq!(second.get("a"), None);
        assert_eq!(first.get("a"), Some(&json!(1)));
    }

    #[rstest]
    #[case("with_c", BuilderError::UnknownMethod { method: "with_c".to_string() })]
    #[case("build", BuilderError::TerminalNotSetter { method: "build".to_string() })]
    fn test_set_errors(#[case] method: &str, #[case] expected: BuilderError) {
        let function = to_builder(echo(), None).unwrap();
        assert_eq!(start(&function).set(method, 1).unwrap_err(), expected);
    }

    #[rstest]
    fn test_finish_by_name() {
        let function = to_builder(echo(), None).unwrap();

        assert_eq!(start(&function).finish("build").unwrap(), vec![None, None]);
        assert_eq!(
            start(&function).finish("with_a").unwrap_err(),
            BuilderError::NotTerminal { method: "with_a".to_string() }
        );
        assert!(matches!(
            start(&function).finish("done"),
            Err(BuilderError::UnknownMethod { .. })
        ));
    }

    #[rstest]
    fn test_dynamic_call_dispatch() {
        let function = to_builder(echo(), None).unwrap();

        let Ok(Step::Continue(builder)) = start(&function).call("with_a", vec![json!(1)]) else {
            panic!("setter should continue");
        };
        let Ok(Step::Finished(result)) = builder.call("build", vec![]) else {
            panic!("terminal should finish");
        };
        assert_eq!(result, vec![Some(json!(1)), None]);
    }

    #[rstest]
    fn test_terminal_rejects_values() {
        let function = to_builder(echo(), None).unwrap();
        assert!(matches!(
            start(&function).call("build", vec![json!(1)]),
            Err(BuilderError::ArityMismatch { expected: 0, actual: 1, .. })
        ));
    }

    #[rstest]
    fn test_template_with_multi_parameter_setter() {
        let template = BuilderTemplate::new(|parameters: &[String]| {
            BuilderShape::new("done").setter_for("both", parameters.iter().rev().cloned())
        });
        let function = to_builder(echo(), Some(&template)).unwrap();

        let builder = start(&function).set_all("both", [json!("b"), json!("a")]).unwrap();
        assert_eq!(builder.finish("done").unwrap(), vec![Some(json!("a")), Some(json!("b"))]);

        assert_eq!(
            start(&function).set("both", 1).unwrap_err(),
            BuilderError::ArityMismatch {
                method: "both".to_string(),
                expected: 2,
                actual: 1,
            }
        );
    }

    #[rstest]
    fn test_template_receives_parameter_names() {
        let template = BuilderTemplate::new(|parameters: &[String]| {
            assert_eq!(parameters, ["a", "b"]);
            BuilderShape::for_parameters(parameters)
        });
        assert!(to_builder(echo(), Some(&template)).is_ok());
    }

    #[rstest]
    fn test_template_with_unknown_parameter_is_rejected() {
        let template = BuilderTemplate::new(|_: &[String]| BuilderShape::new("done").setter("z", "z"));
        assert!(matches!(
            to_builder(echo(), Some(&template)),
            Err(ConfigError::UnknownParameter { context: "builderTemplate", .. })
        ));
    }

    #[rstest]
    fn test_template_with_terminal_collision_is_rejected() {
        let template = BuilderTemplate::new(|_: &[String]| BuilderShape::new("a").setter("a", "a"));
        assert_eq!(
            to_builder(echo(), Some(&template)).unwrap_err(),
            ConfigError::TerminalCollision { method: "a".to_string() }
        );
    }
}
