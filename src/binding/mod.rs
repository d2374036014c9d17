//! Dependency binding for object methods.
//!
//! A [`ClassDescriptor`] declares constructor dependencies (`inject`) and a
//! table of methods, each with a [`MethodSignature`]. The [`Binder`] copies
//! a target [`Instance`], attaches the supplied values under private keys
//! (`_` + name) and replaces every annotated method with one that receives
//! its dependencies as leading arguments.
//!
//! Which methods take part, and with which dependencies, is decided by a
//! [`Convention`]; see [`convention`] for the two supported forms.

#[macro_use]
mod macros;

pub mod binder;
pub mod class;
pub mod convention;
pub mod instance;
pub mod method;
pub mod value;

pub use binder::{Binder, BindingPlan, MethodPlan, PlannedDependency};
pub use class::{ClassBuilder, ClassDescriptor, ClassSchema};
pub use convention::{Convention, ConventionKind, EnabledFlag, MalformedAnnotation, MarkerComment};
pub use instance::{BindState, Instance, PrivateKey, PRIVATE_KEY_PREFIX};
pub use method::{Method, MethodSignature, Output};
pub use value::{Arg, Args, Value};
