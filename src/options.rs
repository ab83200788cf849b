//! Collapsing positional parameters into an options object.
//!
//! [`with_options`] wraps a function so that some or all of its parameters
//! are read by name from a single object argument:
//!
//! ```text
//! target(a, b, c)
//!
//! ToOptions::All               -> f({ a, b, c })
//! ToOptions::Named([b, c])     -> f(a, { b, c })
//! ToOptions::Named([c, a])     -> f(b, { a, c })
//! ```
//!
//! Positional parameters keep declaration order and come first; the options
//! object always sits at the last position. A key missing from the object,
//! or an options argument that is absent, null or not an object, passes the
//! parameter as absent. Unknown keys are ignored. When composed with
//! defaults, a missing key takes its default instead, even if a later key
//! is present.

use serde::Deserialize;
use tracing::trace;

use crate::defaults::Defaults;
use crate::error::ConfigError;
use crate::function::Function;
use crate::signature::{Introspect, Signature};
use crate::value::{Arguments, Value};

/// Name given to the options parameter in a wrapped signature.
pub const OPTIONS_PARAMETER: &str = "options";

/// Which parameters to collapse into an options object.
///
/// Deserializes from `true`/`false` or an array of parameter names.
///
/// # Examples
///
/// ```rust
/// use sig_rewrite::ToOptions;
///
/// let named: ToOptions = serde_json::from_str(r#"["b", "c"]"#).unwrap();
/// assert_eq!(named, ToOptions::named(["b", "c"]));
///
/// let all: ToOptions = serde_json::from_str("true").unwrap();
/// assert_eq!(all, ToOptions::All);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawToOptions")]
pub enum ToOptions {
    /// Leave the signature alone.
    #[default]
    Off,
    /// Collapse every parameter.
    All,
    /// Collapse only the listed parameters.
    Named(Vec<String>),
}

impl ToOptions {
    /// Collapses the listed parameters.
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Named(names.into_iter().map(Into::into).collect())
    }

    /// Returns `true` unless this is [`ToOptions::Off`]. An empty name list
    /// still counts as requested.
    pub const fn is_requested(&self) -> bool {
        !matches!(self, Self::Off)
    }
}

impl From<bool> for ToOptions {
    fn from(flag: bool) -> Self {
        if flag { Self::All } else { Self::Off }
    }
}

impl<S: Into<String>> From<Vec<S>> for ToOptions {
    fn from(names: Vec<S>) -> Self {
        Self::named(names)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawToOptions {
    Flag(bool),
    Names(Vec<String>),
}

impl From<RawToOptions> for ToOptions {
    fn from(raw: RawToOptions) -> Self {
        match raw {
            RawToOptions::Flag(flag) => flag.into(),
            RawToOptions::Names(names) => Self::Named(names),
        }
    }
}

/// Where each target parameter comes from in the wrapped call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Positional(usize),
    Option,
}

/// Wraps `target` so the selected parameters are read from an options object.
///
/// [`ToOptions::Off`] returns the target unchanged.
///
/// # Errors
///
/// [`ConfigError::UnknownParameter`] when a listed name is not declared by
/// the target, [`ConfigError::DuplicateParameter`] when it is listed twice.
///
/// # Examples
///
/// ```rust
/// use sig_rewrite::{Arguments, Function, Introspect, ToOptions, arguments, with_options};
/// use serde_json::json;
///
/// let target = Function::new(["a", "b", "c"], Arguments::into_vec);
/// let wrapped = with_options(target, &ToOptions::named(["b", "c"])).unwrap();
///
/// assert_eq!(wrapped.parameter_names(), ["a", "options"]);
/// assert_eq!(
///     wrapped.call(arguments![1, json!({"b": 2, "c": 3})]),
///     vec![Some(json!(1)), Some(json!(2)), Some(json!(3))]
/// );
/// ```
pub fn with_options<R: 'static>(
    target: Function<R>,
    mode: &ToOptions,
) -> Result<Function<R>, ConfigError> {
    options_layer(target, mode, None)
}

/// Options layer that falls back to `defaults` for collapsed parameters
/// missing from the options object, whatever their position.
pub(crate) fn options_layer<R: 'static>(
    target: Function<R>,
    mode: &ToOptions,
    defaults: Option<&Defaults>,
) -> Result<Function<R>, ConfigError> {
    let sources = match mode {
        ToOptions::Off => return Ok(target),
        ToOptions::All => vec![Source::Option; target.arity()],
        ToOptions::Named(names) => resolve_sources(target.signature(), names)?,
    };
    let fallbacks = match defaults {
        Some(defaults) => defaults.resolve(target.signature())?,
        None => vec![None; target.arity()],
    };

    let parameters: Vec<String> = target.parameter_names().to_vec();
    let positional_names = parameters
        .iter()
        .zip(&sources)
        .filter(|(_, source)| matches!(source, Source::Positional(_)))
        .map(|(name, _)| name.as_str());
    let options_index = positional_names.clone().count();
    let signature = Signature::new(positional_names.chain([OPTIONS_PARAMETER]));

    Ok(Function::from_signature(signature, move |mut arguments: Arguments| {
        let options = arguments.take(options_index);
        let fields = options.as_ref().and_then(Value::as_object);
        if options.is_some() && fields.is_none() {
            trace!("options argument is not an object, reading it as empty");
        }

        let flattened: Arguments = parameters
            .iter()
            .zip(&sources)
            .zip(&fallbacks)
            .map(|((name, source), fallback)| match source {
                Source::Positional(index) => arguments.get(*index).cloned(),
                Source::Option => fields
                    .and_then(|fields| fields.get(name))
                    .or(fallback.as_ref())
                    .cloned(),
            })
            .collect();

        target.call(flattened)
    }))
}

fn resolve_sources(signature: &Signature, names: &[String]) -> Result<Vec<Source>, ConfigError> {
    let mut collapsed = vec![false; signature.arity()];

    for name in names {
        let position = signature
            .position_of(name)
            .ok_or_else(|| ConfigError::UnknownParameter {
                context: "toOptions",
                name: name.clone(),
                signature: signature.to_string(),
            })?;
        if collapsed[position] {
            return Err(ConfigError::DuplicateParameter {
                context: "toOptions",
                name: name.clone(),
            });
        }
        collapsed[position] = true;
    }

    let mut next_positional = 0;
    Ok(collapsed
        .into_iter()
        .map(|is_collapsed| {
            if is_collapsed {
                Source::Option
            } else {
                next_positional += 1;
                Source::Positional(next_positional - 1)
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments;
    use rstest::rstest;
    use serde_json::json;

    fn echo() -> Function<Vec<Option<Value>>> {
        Function::new(["a", "b", "c"], Arguments::into_vec)
    }

    #[rstest]
    fn test_full_options_reads_every_parameter() {
        let wrapped = with_options(echo(), &ToOptions::All).unwrap();

        assert_eq!(wrapped.parameter_names(), [OPTIONS_PARAMETER]);
        assert_eq!(
            wrapped.call_with(json!({"a": 1, "b": 2, "c": 3})),
            vec![Some(json!(1)), Some(json!(2)), Some(json!(3))]
        );
    }

    #[rstest]
    fn test_missing_keys_are_absent() {
        let wrapped = with_options(echo(), &ToOptions::All).unwrap();
        assert_eq!(
            wrapped.call_with(json!({"b": 2, "extra": true})),
            vec![None, Some(json!(2)), None]
        );
    }

    #[rstest]
    #[case(json!({"a": 1, "c": 3}), vec![Some(json!(1)), Some(json!(20)), Some(json!(3))])]
    #[case(json!({"c": 3}), vec![None, Some(json!(20)), Some(json!(3))])]
    #[case(json!({"b": null}), vec![None, Some(Value::Null), Some(json!(30))])]
    #[case(json!({}), vec![None, Some(json!(20)), Some(json!(30))])]
    fn test_missing_keys_take_defaults_in_any_position(
        #[case] options: Value,
        #[case] expected: Vec<Option<Value>>,
    ) {
        let defaults = Defaults::new().set("b", 20).set("c", 30);
        let wrapped = options_layer(echo(), &ToOptions::All, Some(&defaults)).unwrap();

        assert_eq!(wrapped.call_with(options), expected);
    }

    #[rstest]
    fn test_positional_parameters_ignore_defaults_table() {
        let defaults = Defaults::new().set("a", 10).set("c", 30);
        let wrapped = options_layer(echo(), &ToOptions::named(["c"]), Some(&defaults)).unwrap();

        assert_eq!(
            wrapped.call(arguments![_, 2, json!({})]),
            vec![None, Some(json!(2)), Some(json!(30))]
        );
    }

    #[rstest]
    #[case(arguments![])]
    #[case(arguments![Value::Null])]
    #[case(arguments![42])]
    fn test_non_object_options_read_as_empty(#[case] arguments: Arguments) {
        let wrapped = with_options(echo(), &ToOptions::All).unwrap();
        assert_eq!(wrapped.call(arguments), vec![None, None, None]);
    }

    #[rstest]
    fn test_named_options_keep_declaration_order_for_positionals() {
        let wrapped = with_options(echo(), &ToOptions::named(["c", "a"])).unwrap();

        assert_eq!(wrapped.parameter_names(), ["b", OPTIONS_PARAMETER]);
        assert_eq!(
            wrapped.call(arguments![2, json!({"a": 1, "c": 3})]),
            vec![Some(json!(1)), Some(json!(2)), Some(json!(3))]
        );
    }

    #[rstest]
    fn test_named_options_with_empty_list_appends_options() {
        let wrapped = with_options(echo(), &ToOptions::named(Vec::<String>::new())).unwrap();

        assert_eq!(wrapped.arity(), 4);
        assert_eq!(
            wrapped.call(arguments![1, 2, 3, json!({})]),
            vec![Some(json!(1)), Some(json!(2)), Some(json!(3))]
        );
    }

    #[rstest]
    fn test_off_returns_target_unchanged() {
        let wrapped = with_options(echo(), &ToOptions::Off).unwrap();
        assert_eq!(wrapped.signature(), echo().signature());
    }

    #[rstest]
    fn test_unknown_name_is_rejected() {
        let error = with_options(echo(), &ToOptions::named(["d"])).unwrap_err();
        assert_eq!(
            error.to_string(),
            "toOptions: unknown parameter `d`, expected one of (a, b, c)"
        );
    }

    #[rstest]
    fn test_duplicate_name_is_rejected() {
        let error = with_options(echo(), &ToOptions::named(["b", "b"])).unwrap_err();
        assert!(matches!(error, ConfigError::DuplicateParameter { .. }));
    }

    #[rstest]
    #[case("false", ToOptions::Off)]
    #[case("true", ToOptions::All)]
    #[case("[]", ToOptions::Named(vec![]))]
    fn test_deserialize(#[case] source: &str, #[case] expected: ToOptions) {
        assert_eq!(serde_json::from_str::<ToOptions>(source).unwrap(), expected);
    }
}
