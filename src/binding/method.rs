//! Callable methods and their declared signatures.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::instance::Instance;
use super::value::{Args, Value};

/// What a method returns: an optional value.
pub type Output = Option<Value>;

type MethodFn = dyn Fn(&Instance, Args) -> anyhow::Result<Output> + Send + Sync;

/// A method implementation: called with its receiver and positional arguments.
///
/// Cloning shares the implementation; [`Method::ptr_eq`] compares identity.
#[derive(Clone)]
pub struct Method(Arc<MethodFn>);

impl Method {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Instance, Args) -> anyhow::Result<Output> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Calls the implementation with `this` as receiver.
    pub fn invoke(&self, this: &Instance, args: Args) -> anyhow::Result<Output> {
        (self.0)(this, args)
    }

    /// Returns a method that calls `self` with `bound` before the caller's arguments.
    pub fn prebind(&self, bound: Vec<Option<Value>>) -> Method {
        let original = self.clone();
        Method::new(move |this, args| original.invoke(this, args.prepend(&bound)))
    }

    pub fn ptr_eq(&self, other: &Method) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}

/// Declaration-side metadata of a method.
///
/// `params` are the formal parameter names in declared order. `annotation`
/// is the marker text a convention reads, e.g. `/* $inject: logger */`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl MethodSignature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// Signature carrying a marker comment listing `deps`: `/* $inject: a, b */`.
    pub fn inject<I, S>(deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list: Vec<String> = deps.into_iter().map(|d| d.as_ref().to_string()).collect();
        Self::new().annotation(format!("/* $inject: {} */", list.join(", ")))
    }

    /// Signature with the enabling marker, whose `params` name the dependencies.
    pub fn enabled<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new().params(params).annotation("/* $inject: enabled */")
    }
}
