//! Dependency injection infrastructure.
//!
//! Components are wired by constructor injection: `FromRef` plus the
//! derive macros from `di-macros`. There is no global service registry;
//! anything that needs a [`Binder`](crate::binding::Binder) resolves it
//! from the [`Context`](crate::context::Context) it was handed.
//!
//! - `FromRef<T>`: extract a value from a reference to `T`
//! - `#[derive(Context)]`: makes each field of a struct extractable via `FromRef`
//! - `#[derive(FromContext)]`: builds a struct by resolving each field
//!
//! # Example
//!
//! ```ignore
//! use prebind::{Binder, Context, FromRef};
//!
//! let ctx = Context::new(Config::load()?);
//! let binder = Binder::from_ref(&ctx);
//! ```

/// Trait for extracting a value from a reference to another type.
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

/// Any Clone type can be extracted from itself.
impl<T: Clone> FromRef<T> for T {
    fn from_ref(input: &T) -> Self {
        input.clone()
    }
}

// Re-export derive macros
pub use di_macros::{Context, FromContext};
