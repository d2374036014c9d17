//! The target object: own fields, private dependency slots and a method table.

use std::fmt;

use indexmap::IndexMap;

use super::class::ClassDescriptor;
use super::method::{Method, Output};
use super::value::{Args, Value};
use crate::error::AppError;

/// Prefix that turns a dependency name into its private key.
pub const PRIVATE_KEY_PREFIX: &str = "_";

/// The key under which a dependency value is stored: `_` + name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrivateKey(String);

impl PrivateKey {
    pub fn for_dependency(name: &str) -> Self {
        Self(format!("{PRIVATE_KEY_PREFIX}{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The dependency name this key was derived from.
    pub fn dependency(&self) -> &str {
        &self.0[PRIVATE_KEY_PREFIX.len()..]
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether an instance has been through the binder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindState {
    Unbound,
    /// Bound by the named class.
    Bound(String),
}

/// An object whose methods can be rebound with dependencies.
///
/// Dependencies live in their own slot map keyed by [`PrivateKey`], so they
/// never shadow fields or methods.
#[derive(Debug, Clone)]
pub struct Instance {
    fields: IndexMap<String, Value>,
    dependencies: IndexMap<PrivateKey, Value>,
    methods: IndexMap<String, Method>,
    state: BindState,
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

impl Instance {
    /// An empty, unbound instance.
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            dependencies: IndexMap::new(),
            methods: IndexMap::new(),
            state: BindState::Unbound,
        }
    }

    /// An unbound instance carrying every method implementation of `class`.
    pub fn of(class: &ClassDescriptor) -> Self {
        let mut instance = Self::new();
        for (name, method) in class.implementations() {
            instance.methods.insert(name.to_string(), method.clone());
        }
        instance
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn with_method(mut self, name: impl Into<String>, method: Method) -> Self {
        self.set_method(name, method);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// The value attached for dependency `name`, if any.
    pub fn dependency(&self, name: &str) -> Option<&Value> {
        self.dependencies.get(&PrivateKey::for_dependency(name))
    }

    /// Stores `value` under the private key of `name`, replacing any previous value.
    pub fn attach(&mut self, name: &str, value: Value) {
        self.dependencies.insert(PrivateKey::for_dependency(name), value);
    }

    pub fn dependencies(&self) -> impl Iterator<Item = (&PrivateKey, &Value)> {
        self.dependencies.iter()
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    pub fn set_method(&mut self, name: impl Into<String>, method: Method) {
        self.methods.insert(name.into(), method);
    }

    /// Method names in insertion order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub fn state(&self) -> &BindState {
        &self.state
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.state, BindState::Bound(_))
    }

    pub(crate) fn mark_bound(&mut self, class: &str) {
        self.state = BindState::Bound(class.to_string());
    }

    /// Invokes method `name` with this instance as receiver.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let out = greeter.call("greet", args![])?;
    /// ```
    pub fn call(&self, name: &str, args: impl Into<Args>) -> Result<Output, AppError> {
        let method = self
            .method(name)
            .ok_or_else(|| AppError::NoSuchMethod(name.to_string()))?;
        Ok(method.invoke(self, args.into())?)
    }
}
