//! Class-level declarations: the `$inject` list and the method table.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::method::{Method, MethodSignature, Output};
use super::value::Args;
use super::instance::Instance;
use crate::error::AppError;

/// The declarative half of a class: names only, no code.
///
/// Deserializable from a TOML manifest:
///
/// ```toml
/// name = "Greeter"
/// inject = ["logger"]
///
/// [methods.greet]
/// annotation = "/* $inject: logger */"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSchema {
    pub name: String,
    /// Constructor dependencies, paired positionally with bind-time values.
    #[serde(default)]
    pub inject: Vec<String>,
    /// Method signatures in declaration order.
    #[serde(default)]
    pub methods: IndexMap<String, MethodSignature>,
}

impl ClassSchema {
    /// Loads a schema from a TOML manifest file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Manifest(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&text)
            .map_err(|e| AppError::Manifest(format!("{}: {}", path.display(), e)))
    }

    /// Parses a manifest, keeping methods in document order.
    pub fn from_toml(text: &str) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|e| AppError::Manifest(e.to_string()))
    }
}

/// A class: its schema plus the implementation of every declared method.
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    schema: ClassSchema,
    implementations: IndexMap<String, Method>,
}

impl ClassDescriptor {
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder {
            schema: ClassSchema {
                name: name.into(),
                ..ClassSchema::default()
            },
            implementations: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn schema(&self) -> &ClassSchema {
        &self.schema
    }

    /// The declared constructor dependencies.
    pub fn inject(&self) -> &[String] {
        &self.schema.inject
    }

    pub fn implementation(&self, method: &str) -> Option<&Method> {
        self.implementations.get(method)
    }

    /// Method implementations in declaration order.
    pub fn implementations(&self) -> impl Iterator<Item = (&str, &Method)> {
        self.implementations.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Builds a [`ClassDescriptor`] one registration call per method.
///
/// # Example
///
/// ```ignore
/// let greeter = ClassDescriptor::builder("Greeter")
///     .inject(["logger"])
///     .method("greet", MethodSignature::inject(["logger"]), |_this, args| {
///         let logger: Arc<Logger> = args.get(0)?;
///         logger.log("hello");
///         Ok(None)
///     })
///     .build();
/// ```
#[derive(Debug)]
pub struct ClassBuilder {
    schema: ClassSchema,
    implementations: IndexMap<String, Method>,
}

impl ClassBuilder {
    pub fn inject<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.inject = names.into_iter().map(Into::into).collect();
        self
    }

    /// Registers a method. Registering a name twice replaces the earlier entry
    /// but keeps its position.
    pub fn method<F>(self, name: impl Into<String>, signature: MethodSignature, f: F) -> Self
    where
        F: Fn(&Instance, Args) -> anyhow::Result<Output> + Send + Sync + 'static,
    {
        self.method_impl(name, signature, Method::new(f))
    }

    pub fn method_impl(
        mut self,
        name: impl Into<String>,
        signature: MethodSignature,
        method: Method,
    ) -> Self {
        let name = name.into();
        self.schema.methods.insert(name.clone(), signature);
        self.implementations.insert(name, method);
        self
    }

    pub fn build(self) -> ClassDescriptor {
        ClassDescriptor {
            schema: self.schema,
            implementations: self.implementations,
        }
    }
}
