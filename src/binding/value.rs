//! Type-erased dependency values and positional call arguments.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use crate::error::AppError;

/// A shared, type-erased dependency value.
///
/// Cloning is cheap and keeps identity: two clones are [`Value::ptr_eq`].
#[derive(Clone)]
pub struct Value(Arc<dyn Any + Send + Sync>);

impl Value {
    /// Wraps `value` in a new shared allocation.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Wraps an existing `Arc`, keeping its identity.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self(value)
    }

    /// Returns the value as `Arc<T>` if it holds a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.0.clone().downcast::<T>().ok()
    }

    /// Borrows the value as `&T` if it holds a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    /// Whether both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({:p})", Arc::as_ptr(&self.0))
    }
}

/// One positional argument. `None` is an absent value, e.g. an unresolved dependency.
pub type Arg = Option<Value>;

/// Positional arguments passed to a [`Method`](super::Method).
///
/// Bound dependencies come first, followed by the caller's arguments.
#[derive(Debug, Clone, Default)]
pub struct Args(Vec<Arg>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a present value.
    pub fn push(&mut self, value: Value) {
        self.0.push(Some(value));
    }

    /// Appends a possibly absent value.
    pub fn push_arg(&mut self, arg: Arg) {
        self.0.push(arg);
    }

    /// Builds the argument list a rebound method receives: `bound` then `self`.
    pub(crate) fn prepend(self, bound: &[Arg]) -> Self {
        let mut all = Vec::with_capacity(bound.len() + self.0.len());
        all.extend_from_slice(bound);
        all.extend(self.0);
        Self(all)
    }

    /// Gets argument `index` as `Arc<T>`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Argument`] if the argument is missing, absent,
    /// or holds another type.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let logger: Arc<Logger> = args.get(0)?;
    /// ```
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>, AppError> {
        self.get_opt(index)?.ok_or_else(|| AppError::Argument {
            index,
            reason: "value is absent".to_string(),
        })
    }

    /// Gets argument `index`, returning `None` when it is absent or past the end.
    ///
    /// Still returns an error if a value is present but holds another type.
    pub fn get_opt<T: Any + Send + Sync>(&self, index: usize) -> Result<Option<Arc<T>>, AppError> {
        match self.0.get(index) {
            Some(Some(value)) => value.downcast::<T>().map(Some).ok_or_else(|| AppError::Argument {
                index,
                reason: format!("expected {}", type_name::<T>()),
            }),
            Some(None) | None => Ok(None),
        }
    }

    /// Returns the raw argument, if the position exists.
    pub fn raw(&self, index: usize) -> Option<&Arg> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.0.iter()
    }
}

impl From<Vec<Arg>> for Args {
    fn from(args: Vec<Arg>) -> Self {
        Self(args)
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self(values.into_iter().map(Some).collect())
    }
}

impl FromIterator<Value> for Args {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().map(Some).collect())
    }
}
