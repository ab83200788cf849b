//! Filling trailing arguments from defaults.
//!
//! [`with_defaults`] wraps a function so that absent trailing arguments are
//! replaced by preconfigured values. Only the run of absent slots *after*
//! the last supplied argument is filled, mirroring optional parameters:
//! a gap before a supplied argument stays absent.
//!
//! ```text
//! defaults = { b: 2, c: 3 }
//!
//! f(1)           -> target(1, 2, 3)
//! f(1, _, 9)     -> target(1, _, 9)     // gap before a supplied value
//! f(1, null)     -> target(1, null, 3)  // null is a supplied value
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use tracing::trace;

use crate::error::ConfigError;
use crate::function::Function;
use crate::signature::Introspect;
use crate::value::{Arguments, Value};

/// Identifies the parameter a default applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DefaultKey {
    /// A declared parameter name.
    Name(String),
    /// A zero-based position in declaration order.
    Position(usize),
}

impl From<&str> for DefaultKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for DefaultKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for DefaultKey {
    fn from(position: usize) -> Self {
        Self::Position(position)
    }
}

/// Default values keyed by parameter name or position.
///
/// An empty `Defaults` still counts as requesting the defaults layer.
///
/// # Examples
///
/// ```rust
/// use sig_rewrite::Defaults;
/// use serde_json::json;
///
/// let defaults = Defaults::new().set("height", 10).set(0, json!("square"));
/// assert_eq!(defaults.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defaults {
    entries: BTreeMap<DefaultKey, Value>,
}

impl Defaults {
    /// Creates an empty set of defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a default, replacing any earlier one for the same key.
    #[must_use]
    pub fn set(mut self, key: impl Into<DefaultKey>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a default in place.
    pub fn insert(&mut self, key: impl Into<DefaultKey>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Number of configured defaults.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no default is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the configured defaults.
    pub fn iter(&self) -> impl Iterator<Item = (&DefaultKey, &Value)> {
        self.entries.iter()
    }

    /// Resolves every key to a position of `signature`.
    ///
    /// A name and a position that land on the same parameter resolve to the
    /// entry that was keyed by name.
    pub(crate) fn resolve(&self, signature: &impl Introspect) -> Result<Vec<Option<Value>>, ConfigError> {
        let arity = signature.arity();
        let mut resolved = vec![None; arity];
        let mut by_name = Vec::new();

        for (key, value) in &self.entries {
            match key {
                DefaultKey::Position(position) => {
                    if *position >= arity {
                        return Err(ConfigError::PositionOutOfRange {
                            position: *position,
                            arity,
                        });
                    }
                    resolved[*position] = Some(value.clone());
                }
                DefaultKey::Name(name) => {
                    let position = signature.position_of(name).ok_or_else(|| {
                        ConfigError::UnknownParameter {
                            context: "defaults",
                            name: name.clone(),
                            signature: format!("({})", signature.parameter_names().join(", ")),
                        }
                    })?;
                    by_name.push((position, value.clone()));
                }
            }
        }

        for (position, value) in by_name {
            resolved[position] = Some(value);
        }

        Ok(resolved)
    }
}

impl<K: Into<DefaultKey>, V: Into<Value>> FromIterator<(K, V)> for Defaults {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iterator: I) -> Self {
        let mut defaults = Self::new();
        for (key, value) in iterator {
            defaults.insert(key, value);
        }
        defaults
    }
}

impl<'de> Deserialize<'de> for Defaults {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DefaultsVisitor;

        impl<'de> Visitor<'de> for DefaultsVisitor {
            type Value = Defaults;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("an object keyed by parameter name or an array of defaults")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Defaults, A::Error> {
                let mut defaults = Defaults::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    match key.parse::<usize>() {
                        Ok(position) => defaults.insert(position, value),
                        Err(_) => defaults.insert(key, value),
                    }
                }
                Ok(defaults)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Defaults, A::Error> {
                let mut defaults = Defaults::new();
                let mut position = 0;
                while let Some(value) = access.next_element::<Option<Value>>()? {
                    if let Some(value) = value {
                        defaults.insert(position, value);
                    }
                    position += 1;
                }
                Ok(defaults)
            }
        }

        deserializer.deserialize_any(DefaultsVisitor)
    }
}

/// Wraps `target` so absent trailing arguments take their defaults.
///
/// The returned function keeps the target's signature. It always hands the
/// target at least `arity` slots; extra arguments pass through.
///
/// # Errors
///
/// [`ConfigError::UnknownParameter`] for a name the target does not declare,
/// [`ConfigError::PositionOutOfRange`] for a position past its arity.
///
/// # Examples
///
/// ```rust
/// use sig_rewrite::{Defaults, Function, arguments, with_defaults};
/// use serde_json::json;
///
/// let greet = Function::new(["greeting", "name"], |arguments| {
///     format!("{}, {}", arguments.get(0).unwrap_or(&json!("?")), arguments.get(1).unwrap_or(&json!("?")))
/// });
/// let greet = with_defaults(greet, &Defaults::new().set("name", "world")).unwrap();
///
/// assert_eq!(greet.call(arguments!["hello"]), r#""hello", "world""#);
/// assert_eq!(greet.call(arguments!["hi", "you"]), r#""hi", "you""#);
/// ```
pub fn with_defaults<R: 'static>(
    target: Function<R>,
    defaults: &Defaults,
) -> Result<Function<R>, ConfigError> {
    let resolved = defaults.resolve(target.signature())?;
    let signature = target.signature().clone();

    Ok(Function::from_signature(signature, move |mut arguments: Arguments| {
        let first_trailing = arguments.last_supplied().map_or(0, |index| index + 1);
        arguments.resize_absent(resolved.len());

        for (position, default) in resolved.iter().enumerate().skip(first_trailing) {
            if let Some(default) = default {
                trace!(position, "filling trailing argument from defaults");
                arguments.set(position, Some(default.clone()));
            }
        }

        target.call(arguments)
    }))
}
