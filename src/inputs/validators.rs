//! Built-in input validators.
//!
//! Every validator shares the same missing-value policy: absent, empty and
//! whitespace-only raw values are "missing". A missing value falls back to
//! the configured default, and a validator without any default is required.
//! Kind-specific coercion (choices, splitting, boolean tokens) only runs on
//! present values, so defaults are returned untouched.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::error::{InputError, ProviderError};

/// A typed value produced by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum InputValue {
    /// Plain string input.
    String(String),
    /// Boolean input.
    Boolean(bool),
    /// Ordered list of string tokens.
    Array(Vec<String>),
}

/// Zero-argument computation supplying a default value.
pub type DefaultProvider<T> = Arc<dyn Fn() -> Result<T, ProviderError> + Send + Sync>;

/// Fallback used when an input has no raw value.
pub enum DefaultValue<T> {
    /// The input is optional and resolves to nothing.
    Unset,
    /// A literal value.
    Value(T),
    /// A provider invoked lazily, once, on the missing-value path only.
    Provider(DefaultProvider<T>),
}

impl<T: Clone> DefaultValue<T> {
    fn resolve(&self) -> Result<Option<T>, InputError> {
        match self {
            Self::Unset => Ok(None),
            Self::Value(value) => Ok(Some(value.clone())),
            Self::Provider(provider) => provider()
                .map(Some)
                .map_err(|source| InputError::DefaultProvider { source }),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for DefaultValue<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => formatter.write_str("Unset"),
            Self::Value(value) => formatter.debug_tuple("Value").field(value).finish(),
            Self::Provider(_) => formatter.write_str("Provider(..)"),
        }
    }
}

impl<T: Clone> Clone for DefaultValue<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Unset => Self::Unset,
            Self::Value(value) => Self::Value(value.clone()),
            Self::Provider(provider) => Self::Provider(Arc::clone(provider)),
        }
    }
}

/// Object-safe validator stored in an [`InputSchema`](super::InputSchema).
pub trait InputValidator: Send + Sync {
    /// Overrides the name used to derive the environment key.
    fn name(&self) -> Option<&str>;

    /// Turns a raw value into a typed one.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] when the value is missing without a default,
    /// when coercion fails, or when a default provider fails.
    fn parse(&self, raw: Option<&str>) -> Result<Option<InputValue>, InputError>;
}

/// Kind-specific coercion applied to present raw values.
pub trait InputKind: Send + Sync {
    /// Typed value produced by this kind.
    type Value: Clone + Send + Sync;

    /// Coerces a present, non-empty raw value.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] when the raw value is not acceptable.
    fn coerce(&self, raw: &str) -> Result<Self::Value, InputError>;

    /// Lifts a typed value into an [`InputValue`].
    fn into_value(value: Self::Value) -> InputValue;
}

/// String coercion with an optional allowed-value set.
#[derive(Debug, Clone, Default)]
pub struct StringKind {
    choices: Option<Vec<String>>,
}

impl InputKind for StringKind {
    type Value = String;

    fn coerce(&self, raw: &str) -> Result<String, InputError> {
        match &self.choices {
            Some(choices) if !choices.iter().any(|choice| choice == raw) => {
                Err(InputError::InvalidChoice {
                    value: raw.to_owned(),
                    choices: choices.clone(),
                })
            }
            _ => Ok(raw.to_owned()),
        }
    }

    fn into_value(value: String) -> InputValue {
        InputValue::String(value)
    }
}

/// Splits the raw value into tokens.
#[derive(Debug, Clone)]
pub struct ArrayKind {
    separator: String,
    trim: bool,
}

impl Default for ArrayKind {
    fn default() -> Self {
        Self {
            separator: ",".to_owned(),
            trim: false,
        }
    }
}

impl InputKind for ArrayKind {
    type Value = Vec<String>;

    fn coerce(&self, raw: &str) -> Result<Vec<String>, InputError> {
        Ok(raw
            .split(self.separator.as_str())
            .map(|token| if self.trim { token.trim() } else { token })
            .map(ToOwned::to_owned)
            .collect())
    }

    fn into_value(value: Vec<String>) -> InputValue {
        InputValue::Array(value)
    }
}

/// Accepts exactly `true` or `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanKind;

impl InputKind for BooleanKind {
    type Value = bool;

    fn coerce(&self, raw: &str) -> Result<bool, InputError> {
        match raw {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(InputError::InvalidBoolean {
                value: other.to_owned(),
            }),
        }
    }

    fn into_value(value: bool) -> InputValue {
        InputValue::Boolean(value)
    }
}

/// A declared input: lookup name, default policy and kind.
pub struct Input<K: InputKind> {
    name: Option<String>,
    default: Option<DefaultValue<K::Value>>,
    kind: K,
}

/// Validator producing a string.
pub type StringInput = Input<StringKind>;
/// Validator producing an ordered list of strings.
pub type ArrayInput = Input<ArrayKind>;
/// Validator producing a boolean.
pub type BooleanInput = Input<BooleanKind>;

/// Starts a required string input.
#[must_use]
pub fn string_input() -> StringInput {
    Input::new(StringKind::default())
}

/// Starts a required array input split on `,` without trimming.
#[must_use]
pub fn array_input() -> ArrayInput {
    Input::new(ArrayKind::default())
}

/// Starts a required boolean input.
#[must_use]
pub const fn boolean_input() -> BooleanInput {
    Input::new(BooleanKind)
}

impl<K: InputKind> Input<K> {
    const fn new(kind: K) -> Self {
        Self {
            name: None,
            default: None,
            kind,
        }
    }

    /// Reads the value from this name instead of the field name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Makes the input optional with a literal default.
    #[must_use]
    pub fn default(mut self, value: impl Into<K::Value>) -> Self {
        self.default = Some(DefaultValue::Value(value.into()));
        self
    }

    /// Makes the input optional with a lazily computed default.
    #[must_use]
    pub fn default_with<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Result<K::Value, ProviderError> + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Provider(Arc::new(provider)));
        self
    }

    /// Makes the input optional, resolving to nothing when missing.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.default = Some(DefaultValue::Unset);
        self
    }

    /// Returns `true` when no default of any kind is configured.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

impl Input<StringKind> {
    /// Restricts present values to `choices`.
    ///
    /// An empty list places no restriction.
    #[must_use]
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let collected: Vec<String> = choices.into_iter().map(Into::into).collect();
        self.kind.choices = (!collected.is_empty()).then_some(collected);
        self
    }
}

impl Input<ArrayKind> {
    /// Splits on `separator` instead of `,`.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.kind.separator = separator.into();
        self
    }

    /// Trims surrounding whitespace from every token.
    #[must_use]
    pub const fn trim(mut self, trim: bool) -> Self {
        self.kind.trim = trim;
        self
    }
}

impl<K: InputKind> fmt::Debug for Input<K>
where
    K: fmt::Debug,
    K::Value: fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Input")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("kind", &self.kind)
            .finish()
    }
}

impl<K: InputKind> InputValidator for Input<K> {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn parse(&self, raw: Option<&str>) -> Result<Option<InputValue>, InputError> {
        let resolved = match present(raw) {
            Some(value) => Some(self.kind.coerce(value)?),
            None => match &self.default {
                Some(default) => default.resolve()?,
                None => return Err(InputError::Missing),
            },
        };
        Ok(resolved.map(K::into_value))
    }
}

/// Absent and empty values are missing; anything else is used verbatim.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.is_empty())
}
