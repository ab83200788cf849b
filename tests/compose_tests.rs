//! Integration tests for `compose`.
//!
//! Covers the failure modes of the entry point and the behavior of each
//! rewrite once composed.

use rstest::rstest;
use serde_json::json;
use sig_rewrite::{
    Arguments, BuilderShape, ConfigError, Defaults, Function, Introspect, RewriteError, ToOptions,
    Value, WrapConfig, arguments, compose,
};

fn noop() -> Function<()> {
    Function::new(Vec::<String>::new(), |_| ())
}

fn echo() -> Function<Vec<Option<Value>>> {
    Function::new(["a", "b", "c"], Arguments::into_vec)
}

fn supplied(values: &[i64]) -> Vec<Option<Value>> {
    values.iter().map(|value| Some(json!(value))).collect()
}

// =============================================================================
// Failure modes
// =============================================================================

mod failure_modes {
    use super::*;

    #[rstest]
    #[case(json!(null))]
    #[case(json!("asdf"))]
    #[case(json!({"toOptions": true}))]
    fn test_first_argument_must_be_a_function(#[case] target: Value) {
        let error = compose::<()>(target, &WrapConfig::new().to_options(true)).unwrap_err();
        assert_eq!(error.to_string(), "First argument must be a function");
    }

    #[rstest]
    fn test_requires_one_rewrite() {
        let error = compose(noop(), &WrapConfig::new()).unwrap_err();
        assert_eq!(
            error.to_string(),
            "sig-rewrite requires one of: { toOptions, toBuilderPattern, defaults } to be specified"
        );
    }

    #[rstest]
    fn test_full_options_and_builder_are_incompatible() {
        let config = WrapConfig::new().to_options(true).to_builder_pattern(true);
        let error = compose(noop(), &config).unwrap_err();
        assert_eq!(error.to_string(), "full toOptions and builder pattern are not compatible");
    }

    #[rstest]
    fn test_builder_template_must_be_a_function() {
        let config = WrapConfig::new()
            .to_builder_pattern(true)
            .builder_template_operand(json!("asdf"));
        let error = compose(noop(), &config).unwrap_err();
        assert_eq!(error.to_string(), "builderTemplate must be a function");
    }

    #[rstest]
    fn test_builder_template_without_builder_pattern() {
        let config = WrapConfig::new()
            .defaults(Defaults::new())
            .builder_template(|_: &[String]| BuilderShape::new("build"));
        let error = compose(noop(), &config).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Specifying builderTemplate when toBuilderPattern is not true is invalid"
        );
    }

    #[rstest]
    fn test_partial_options_with_builder_is_allowed() {
        let config = WrapConfig::new()
            .to_options(vec!["a"])
            .to_builder_pattern(true);
        assert!(compose(echo(), &config).is_ok());
    }

    #[rstest]
    fn test_unknown_option_name_fails_at_composition() {
        let error = compose(echo(), &WrapConfig::new().to_options(vec!["b", "x"])).unwrap_err();
        assert!(matches!(
            error,
            RewriteError::Config(ConfigError::UnknownParameter { ref name, .. }) if name == "x"
        ));
    }
}

// =============================================================================
// Composed behavior
// =============================================================================

mod composed_behavior {
    use super::*;

    #[rstest]
    fn test_returns_a_function() {
        let wrapped = compose(noop(), &WrapConfig::new().to_options(true)).unwrap();
        let function = wrapped.into_function().unwrap();
        function.call_with(json!({}));
    }

    #[rstest]
    fn test_full_options_round_trip() {
        let wrapped = compose(echo(), &WrapConfig::new().to_options(true))
            .unwrap()
            .into_function()
            .unwrap();

        assert_eq!(
            wrapped.call_with(json!({"a": 1, "b": 2, "c": 3})),
            supplied(&[1, 2, 3])
        );
    }

    #[rstest]
    fn test_partial_options_round_trip() {
        let wrapped = compose(echo(), &WrapConfig::new().to_options(vec!["b", "c"]))
            .unwrap()
            .into_function()
            .unwrap();

        assert_eq!(wrapped.parameter_names(), ["a", "options"]);
        assert_eq!(
            wrapped.call(arguments![1, json!({"b": 2, "c": 3})]),
            supplied(&[1, 2, 3])
        );
    }

    #[rstest]
    fn test_defaults_only() {
        let config = WrapConfig::new().defaults(Defaults::new().set("b", 20).set("c", 30));
        let wrapped = compose(echo(), &config).unwrap().into_function().unwrap();

        assert_eq!(wrapped.call(arguments![1]), supplied(&[1, 20, 30]));
        assert_eq!(wrapped.call(arguments![1, 2]), supplied(&[1, 2, 30]));
        assert_eq!(wrapped.call(arguments![1, 2, 3]), supplied(&[1, 2, 3]));
    }

    #[rstest]
    fn test_defaults_resolve_keys_missing_from_options() {
        let config = WrapConfig::new()
            .to_options(true)
            .defaults(Defaults::new().set("b", 20).set("c", 30));
        let wrapped = compose(echo(), &config).unwrap().into_function().unwrap();

        assert_eq!(wrapped.call_with(json!({"a": 1})), supplied(&[1, 20, 30]));
        assert_eq!(wrapped.call_with(json!({"a": 1, "c": 3})), supplied(&[1, 20, 3]));
        assert_eq!(
            wrapped.call_with(json!({"a": 1, "b": null})),
            vec![Some(json!(1)), Some(Value::Null), Some(json!(30))]
        );
        assert_eq!(wrapped.call_with(json!({"a": 1, "b": 2, "c": 3})), supplied(&[1, 2, 3]));
    }

    #[rstest]
    fn test_builder_setters_in_either_order() {
        let target = Function::new(["a", "b"], Arguments::into_vec);
        let builder = compose(target, &WrapConfig::new().to_builder_pattern(true))
            .unwrap()
            .into_builder()
            .unwrap();

        let forward = builder
            .call(arguments![])
            .set("with_a", 1)
            .and_then(|builder| builder.set("with_b", 2))
            .unwrap()
            .build();
        let backward = builder
            .call(arguments![])
            .set("with_b", 2)
            .and_then(|builder| builder.set("with_a", 1))
            .unwrap()
            .build();

        assert_eq!(forward, supplied(&[1, 2]));
        assert_eq!(backward, forward);
    }

    #[rstest]
    fn test_builder_with_defaults() {
        let config = WrapConfig::new()
            .to_builder_pattern(true)
            .defaults(Defaults::new().set("c", 30));
        let builder = compose(echo(), &config).unwrap().into_builder().unwrap();

        let result = builder.call(arguments![]).set("with_a", 1).unwrap().build();
        assert_eq!(result, vec![Some(json!(1)), None, Some(json!(30))]);
    }

    #[rstest]
    fn test_builder_with_custom_template() {
        let config = WrapConfig::new()
            .to_builder_pattern(true)
            .builder_template(|parameters: &[String]| {
                parameters
                    .iter()
                    .fold(BuilderShape::new("run"), |shape, parameter| {
                        shape.setter(format!("set_{parameter}"), parameter.clone())
                    })
            });
        let builder = compose(echo(), &config).unwrap().into_builder().unwrap();

        let started = builder.call(arguments![]);
        assert_eq!(started.methods(), ["set_a", "set_b", "set_c"]);
        assert_eq!(started.terminal(), "run");

        let result = started
            .set("set_c", 3)
            .and_then(|builder| builder.set("set_a", 1))
            .and_then(|builder| builder.finish("run"))
            .unwrap();
        assert_eq!(result, vec![Some(json!(1)), None, Some(json!(3))]);
    }

    #[rstest]
    fn test_target_errors_propagate_unchanged() {
        let target: Function<Result<i64, String>> = Function::new(["divisor"], |arguments: Arguments| {
            match arguments.get(0).and_then(Value::as_i64) {
                Some(0) | None => Err("division by zero".to_string()),
                Some(divisor) => Ok(100 / divisor),
            }
        });
        let config = WrapConfig::new()
            .to_options(ToOptions::All)
            .defaults(Defaults::new().set("divisor", 0));
        let wrapped = compose(target, &config).unwrap().into_function().unwrap();

        assert_eq!(wrapped.call_with(json!({"divisor": 4})), Ok(25));
        assert_eq!(wrapped.call_with(json!({})), Err("division by zero".to_string()));
    }

    #[rstest]
    fn test_config_from_json_document() {
        let config: WrapConfig = serde_json::from_str(
            r#"{ "toOptions": ["b", "c"], "defaults": { "c": 30 } }"#,
        )
        .unwrap();
        let wrapped = compose(echo(), &config).unwrap().into_function().unwrap();

        assert_eq!(
            wrapped.call(arguments![1, json!({"b": 2})]),
            supplied(&[1, 2, 30])
        );
    }
}
