//! Argument values passed between wrapper layers.
//!
//! Every layer speaks the same positional protocol: an ordered list of
//! argument slots. A slot is `Option<Value>`, where `None` marks an
//! *absent* argument (never supplied) and `Some(Value::Null)` is an
//! explicit null. Defaults are only ever substituted for absent slots.
//!
//! # Examples
//!
//! ```rust
//! use sig_rewrite::{Arguments, arguments};
//! use serde_json::json;
//!
//! let mut arguments = arguments![1, "two"];
//! arguments.push_absent();
//!
//! assert_eq!(arguments.len(), 3);
//! assert_eq!(arguments.get(1), Some(&json!("two")));
//! assert_eq!(arguments.get(2), None);
//! assert_eq!(arguments.last_supplied(), Some(1));
//! ```

use smallvec::SmallVec;

pub use serde_json::Value;

/// Number of argument slots stored inline before spilling to the heap.
const INLINE_ARGUMENTS: usize = 6;

/// An ordered list of positional argument slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    slots: SmallVec<[Option<Value>; INLINE_ARGUMENTS]>,
}

impl Arguments {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: SmallVec::new(),
        }
    }

    /// Creates an empty argument list with room for `capacity` slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SmallVec::with_capacity(capacity),
        }
    }

    /// Appends a supplied argument.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.slots.push(Some(value.into()));
    }

    /// Appends an absent argument.
    pub fn push_absent(&mut self) {
        self.slots.push(None);
    }

    /// Returns the supplied value at `index`, or `None` when the slot is
    /// absent or out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Stores `slot` at `index`, padding with absent slots when `index` lies
    /// past the end.
    pub fn set(&mut self, index: usize, slot: Option<Value>) {
        if index >= self.slots.len() {
            self.resize_absent(index + 1);
        }
        self.slots[index] = slot;
    }

    /// Removes and returns the slot at `index`, leaving it absent.
    pub fn take(&mut self, index: usize) -> Option<Value> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Grows the list to `length` with absent slots. Never shrinks.
    pub fn resize_absent(&mut self, length: usize) {
        if length > self.slots.len() {
            self.slots.resize(length, None);
        }
    }

    /// Index of the last supplied argument, if any.
    #[must_use]
    pub fn last_supplied(&self) -> Option<usize> {
        self.slots.iter().rposition(Option::is_some)
    }

    /// Returns `true` if the slot at `index` holds a value.
    #[must_use]
    pub fn is_supplied(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Number of slots, absent ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if there are no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over the slots.
    pub fn iter(&self) -> std::slice::Iter<'_, Option<Value>> {
        self.slots.iter()
    }

    /// Converts into a plain vector of slots.
    #[must_use]
    pub fn into_vec(self) -> Vec<Option<Value>> {
        self.slots.into_vec()
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        values.into_iter().map(Some).collect()
    }
}

impl From<Vec<Option<Value>>> for Arguments {
    fn from(slots: Vec<Option<Value>>) -> Self {
        Self {
            slots: SmallVec::from_vec(slots),
        }
    }
}

impl FromIterator<Option<Value>> for Arguments {
    fn from_iter<I: IntoIterator<Item = Option<Value>>>(iterator: I) -> Self {
        Self {
            slots: iterator.into_iter().collect(),
        }
    }
}

impl FromIterator<Value> for Arguments {
    fn from_iter<I: IntoIterator<Item = Value>>(iterator: I) -> Self {
        iterator.into_iter().map(Some).collect()
    }
}

impl IntoIterator for Arguments {
    type Item = Option<Value>;
    type IntoIter = smallvec::IntoIter<[Option<Value>; INLINE_ARGUMENTS]>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Option<Value>;
    type IntoIter = std::slice::Iter<'a, Option<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

/// Builds an [`Arguments`] list from expressions serializable into a
/// [`Value`]. Use `_` for an absent slot.
///
/// ```rust
/// use sig_rewrite::arguments;
///
/// let arguments = arguments![1, _, "three"];
/// assert_eq!(arguments.len(), 3);
/// assert!(!arguments.is_supplied(1));
/// ```
#[macro_export]
macro_rules! arguments {
    () => {
        $crate::Arguments::new()
    };
    ($($rest:tt)+) => {{
        let mut arguments = $crate::Arguments::new();
        $crate::__push_arguments!(arguments; $($rest)+);
        arguments
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __push_arguments {
    ($arguments:ident;) => {};
    ($arguments:ident; _ $(, $($rest:tt)*)?) => {
        $arguments.push_absent();
        $($crate::__push_arguments!($arguments; $($rest)*);)?
    };
    ($arguments:ident; $argument:expr $(, $($rest:tt)*)?) => {
        $arguments.push($crate::__private::json!($argument));
        $($crate::__push_arguments!($arguments; $($rest)*);)?
    };
}
