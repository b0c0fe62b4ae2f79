//! Lookup of raw input values.
//!
//! Resolution never reads the process environment directly. Callers pass an
//! [`InputSource`], and only the outermost entry points hand in
//! [`ProcessEnvironment`].

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::hash::BuildHasher;

/// Prefix the Actions runtime puts in front of every input variable.
pub const INPUT_PREFIX: &str = "INPUT_";

/// A read-only view of environment-style key/value pairs.
pub trait InputSource: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn var(&self, key: &str) -> Option<String>;

    /// Returns every pair visible through this source.
    fn vars(&self) -> Vec<(String, String)>;
}

/// [`InputSource`] backed by the real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl InputSource for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }

    fn vars(&self) -> Vec<(String, String)> {
        env::vars().collect()
    }
}

impl<S> InputSource for HashMap<String, String, S>
where
    S: BuildHasher + Send + Sync,
{
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl InputSource for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Derives the environment key for an input name.
///
/// Spaces become underscores and the result is upper-cased, so `"dry run"`
/// is read from `INPUT_DRY_RUN`.
///
/// ```
/// use actionkit::inputs::input_key;
///
/// assert_eq!(input_key("dry run"), "INPUT_DRY_RUN");
/// ```
#[must_use]
pub fn input_key(name: &str) -> String {
    format!("{INPUT_PREFIX}{}", name.replace(' ', "_").to_uppercase())
}

/// Returns every `INPUT_*` pair from `source`, sorted by key.
#[must_use]
pub fn raw_inputs(source: &(impl InputSource + ?Sized)) -> BTreeMap<String, String> {
    source
        .vars()
        .into_iter()
        .filter(|(key, _)| key.starts_with(INPUT_PREFIX))
        .collect()
}
