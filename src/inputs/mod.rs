//! Typed action inputs read from `INPUT_*` variables.
//!
//! An [`InputSchema`] lists the fields an action expects, each paired with a
//! validator built from [`string_input`], [`array_input`] or
//! [`boolean_input`]. [`get_inputs`] resolves the whole schema against an
//! [`InputSource`] and stops at the first failure.
//!
//! ```
//! use std::collections::HashMap;
//!
//! use actionkit::inputs::{InputSchema, boolean_input, get_inputs, string_input};
//!
//! let schema = InputSchema::new()
//!     .input("left", string_input())
//!     .input("step", boolean_input().default(true));
//! let source = HashMap::from([("INPUT_LEFT".to_owned(), "left".to_owned())]);
//!
//! let inputs = get_inputs(&schema, &source).expect("inputs should resolve");
//! assert_eq!(inputs.string("left"), Some("left"));
//! assert_eq!(inputs.boolean("step"), Some(true));
//! ```

mod error;
mod source;
mod validators;

use std::collections::BTreeMap;

use serde::Serialize;

pub use error::{InputError, InputResolutionError, ProviderError};
pub use source::{INPUT_PREFIX, InputSource, ProcessEnvironment, input_key, raw_inputs};
pub use validators::{
    ArrayInput, ArrayKind, BooleanInput, BooleanKind, DefaultProvider, DefaultValue, Input,
    InputKind, InputValidator, InputValue, StringInput, StringKind, array_input, boolean_input,
    string_input,
};

/// Ordered set of declared inputs keyed by result field name.
#[derive(Default)]
pub struct InputSchema {
    fields: Vec<(String, Box<dyn InputValidator>)>,
}

impl InputSchema {
    /// Creates an empty schema.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declares `field`, replacing any earlier declaration with that name.
    #[must_use]
    pub fn input(mut self, field: impl Into<String>, validator: impl InputValidator + 'static) -> Self {
        let name = field.into();
        let boxed: Box<dyn InputValidator> = Box::new(validator);
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = boxed,
            None => self.fields.push((name, boxed)),
        }
        self
    }

    /// Number of declared fields.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when no field is declared.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Environment key each field is read from, in declaration order.
    #[must_use]
    pub fn keys(&self) -> Vec<(&str, String)> {
        self.fields
            .iter()
            .map(|(field, validator)| (field.as_str(), lookup_key(field, validator.as_ref())))
            .collect()
    }
}

impl std::fmt::Debug for InputSchema {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_list()
            .entries(self.fields.iter().map(|(field, _)| field))
            .finish()
    }
}

/// Resolved inputs keyed by field name.
///
/// Optional inputs without a value are present with no value, so a field
/// declared in the schema is always a key here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Inputs(BTreeMap<String, Option<InputValue>>);

impl Inputs {
    /// Returns the value for `field` when it resolved to something.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&InputValue> {
        self.0.get(field).and_then(Option::as_ref)
    }

    /// Returns `true` when `field` was declared.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns the string value of `field`.
    #[must_use]
    pub fn string(&self, field: &str) -> Option<&str> {
        match self.get(field) {
            Some(InputValue::String(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the boolean value of `field`.
    #[must_use]
    pub fn boolean(&self, field: &str) -> Option<bool> {
        match self.get(field) {
            Some(InputValue::Boolean(value)) => Some(*value),
            _ => None,
        }
    }

    /// Returns the list value of `field`.
    #[must_use]
    pub fn array(&self, field: &str) -> Option<&[String]> {
        match self.get(field) {
            Some(InputValue::Array(values)) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// Iterates fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&InputValue>)> {
        self.0
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_ref()))
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolves every field of `schema` against `source`.
///
/// # Errors
///
/// Returns [`InputResolutionError`] for the first field that fails; no
/// partial result is returned.
pub fn get_inputs(
    schema: &InputSchema,
    source: &(impl InputSource + ?Sized),
) -> Result<Inputs, InputResolutionError> {
    let mut resolved = BTreeMap::new();
    for (field, validator) in &schema.fields {
        let key = lookup_key(field, validator.as_ref());
        let raw = source.var(&key);
        let value = validator
            .parse(raw.as_deref())
            .map_err(|error| InputResolutionError {
                field: field.clone(),
                key: key.clone(),
                source: error,
            })?;
        resolved.insert(field.clone(), value);
    }
    Ok(Inputs(resolved))
}

fn lookup_key(field: &str, validator: &dyn InputValidator) -> String {
    input_key(validator.name().unwrap_or(field))
}
