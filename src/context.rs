//! Application context providing the dependency injection root.

use std::sync::Arc;

use crate::config::{BinderSettings, Config};
use crate::di::Context as ContextDerive;

/// Root context for dependency injection.
///
/// `#[derive(Context)]` generates a `FromRef` implementation for each field,
/// so [`Binder`](crate::binding::Binder) and anything else deriving
/// `FromContext` can be resolved from it.
#[derive(ContextDerive, Clone, Debug)]
pub struct Context {
    /// Loaded configuration.
    pub config: Arc<Config>,
    /// Binder section of the configuration.
    pub settings: Arc<BinderSettings>,
}

impl Context {
    pub fn new(config: Config) -> Self {
        Self {
            settings: Arc::new(config.binder.clone()),
            config: Arc::new(config),
        }
    }
}
