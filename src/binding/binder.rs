//! The binder: attaches constructor dependencies and pre-binds method dependencies.

use std::sync::Arc;

use serde::Serialize;

use super::class::{ClassDescriptor, ClassSchema};
use super::convention::Convention;
use super::instance::{BindState, Instance, PrivateKey};
use super::value::Value;
use crate::config::BinderSettings;
use crate::context::Context;
use crate::di::FromContext;
use crate::error::AppError;

/// What binding a class would do, computed from its schema alone.
#[derive(Debug, Clone, Serialize)]
pub struct BindingPlan {
    pub class: String,
    pub convention: &'static str,
    pub inject: Vec<String>,
    pub methods: Vec<MethodPlan>,
}

/// Plan for one method, in declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct MethodPlan {
    pub name: String,
    pub participates: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<PlannedDependency>,
}

/// A dependency a method will receive as a leading argument.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedDependency {
    pub name: String,
    pub key: String,
    /// Whether the class's `inject` list attaches this dependency.
    pub declared: bool,
}

impl BindingPlan {
    /// Methods that will be rebound.
    pub fn participating(&self) -> impl Iterator<Item = &MethodPlan> {
        self.methods.iter().filter(|m| m.participates)
    }

    /// Fails on the first dependency the class does not declare.
    ///
    /// This is a static check against the class's `inject` list only. A
    /// strict [`Binder::bind`] resolves against the target's slots instead,
    /// so it also accepts dependencies attached to the target beforehand.
    pub fn check_declared(&self) -> Result<(), AppError> {
        for method in self.participating() {
            if let Some(dep) = method.dependencies.iter().find(|d| !d.declared) {
                return Err(AppError::UnresolvedDependency {
                    class: self.class.clone(),
                    method: method.name.clone(),
                    dependency: dep.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Binds dependencies into instances.
///
/// Obtained directly with [`Binder::new`] or from a [`Context`] via
/// `Binder::from_ref(&ctx)`.
///
/// # Example
///
/// ```ignore
/// let binder = Binder::from_ref(&ctx);
/// let greeter = binder.bind(&class, &Instance::of(&class), vec![Value::new(logger)])?;
/// greeter.call("greet", Args::new())?;
/// ```
#[derive(FromContext, Clone, Debug, Default)]
pub struct Binder {
    settings: Arc<BinderSettings>,
}

impl Binder {
    pub fn new(settings: BinderSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &BinderSettings {
        &self.settings
    }

    /// Plans `schema` with the configured convention.
    ///
    /// Planning never consults an instance, so `strict` is not applied here;
    /// use [`BindingPlan::check_declared`] for the static check.
    pub fn plan(&self, schema: &ClassSchema) -> Result<BindingPlan, AppError> {
        Self::plan_with(self.settings.convention.convention(), schema)
    }

    /// Plans `schema` with an explicit convention.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Binding`] for the first method whose annotation
    /// carries the marker in a malformed shape.
    pub fn plan_with(
        convention: &dyn Convention,
        schema: &ClassSchema,
    ) -> Result<BindingPlan, AppError> {
        let mut methods = Vec::with_capacity(schema.methods.len());

        for (name, signature) in &schema.methods {
            let deps = convention
                .dependencies(signature)
                .map_err(|e| AppError::binding(&schema.name, name, e.0))?;

            let dependencies = deps
                .iter()
                .flatten()
                .map(|dep| PlannedDependency {
                    name: dep.clone(),
                    key: PrivateKey::for_dependency(dep).to_string(),
                    declared: schema.inject.contains(dep),
                })
                .collect();

            methods.push(MethodPlan {
                name: name.clone(),
                participates: deps.is_some(),
                dependencies,
            });
        }

        Ok(BindingPlan {
            class: schema.name.clone(),
            convention: convention.name(),
            inject: schema.inject.clone(),
            methods,
        })
    }

    /// Binds `values` and method dependencies into a copy of `target`.
    ///
    /// `values` pair positionally with the class's `inject` list. The
    /// returned instance is marked bound; `target` is left as it was, also
    /// when an error is returned.
    pub fn bind(
        &self,
        class: &ClassDescriptor,
        target: &Instance,
        values: Vec<Value>,
    ) -> Result<Instance, AppError> {
        self.bind_with(self.settings.convention.convention(), class, target, values)
    }

    /// Like [`Binder::bind`], with an explicit convention.
    pub fn bind_with(
        &self,
        convention: &dyn Convention,
        class: &ClassDescriptor,
        target: &Instance,
        values: Vec<Value>,
    ) -> Result<Instance, AppError> {
        let class_name = class.name();

        // A rebound method no longer carries its annotation
        if let BindState::Bound(by) = target.state() {
            return Err(AppError::AlreadyBound(by.clone()));
        }

        let inject = class.inject();
        if inject.len() != values.len() {
            return Err(AppError::InvalidArgument {
                class: class_name.to_string(),
                expected: inject.len(),
                actual: values.len(),
            });
        }

        let plan = Self::plan_with(convention, class.schema())?;
        let mut bound = target.clone();

        // Attach phase
        for (name, value) in inject.iter().zip(values) {
            tracing::debug!(class = class_name, dependency = %name, "attaching dependency");
            bound.attach(name, value);
        }

        // Rebind phase
        for method in &plan.methods {
            if !method.participates {
                tracing::trace!(class = class_name, method = %method.name, "method not annotated, skipping");
                continue;
            }

            let original = class.implementation(&method.name).ok_or_else(|| {
                AppError::binding(class_name, &method.name, "no implementation registered")
            })?;

            let mut resolved = Vec::with_capacity(method.dependencies.len());
            for dep in &method.dependencies {
                let value = bound.dependency(&dep.name).cloned();
                if value.is_none() {
                    if self.settings.strict {
                        return Err(AppError::UnresolvedDependency {
                            class: class_name.to_string(),
                            method: method.name.clone(),
                            dependency: dep.name.clone(),
                        });
                    }
                    tracing::warn!(
                        class = class_name,
                        method = %method.name,
                        dependency = %dep.name,
                        "dependency not attached, binding an absent value"
                    );
                }
                resolved.push(value);
            }

            tracing::debug!(
                class = class_name,
                method = %method.name,
                count = resolved.len(),
                "rebinding method"
            );
            bound.set_method(method.name.clone(), original.prebind(resolved));
        }

        bound.mark_bound(class_name);
        Ok(bound)
    }
}
