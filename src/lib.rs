//! prebind - pre-binds named dependencies into object methods.
//!
//! Methods declare the dependencies they need; the binder resolves them
//! against the values attached to an instance and produces methods that
//! receive those dependencies as leading arguments, with no injector
//! present at call time.

pub mod binding;
pub mod cli;
pub mod config;
pub mod context;
pub mod di;
pub mod error;

// Re-export FromRef at crate root for di-macros generated code
pub use di::FromRef;

pub use binding::{
    Args, Binder, ClassDescriptor, ClassSchema, Instance, Method, MethodSignature, Value,
};
pub use context::Context;
pub use error::AppError;
