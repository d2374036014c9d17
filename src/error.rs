//! Application error types.

use thiserror::Error;

/// Errors raised while binding dependencies or invoking bound methods.
#[derive(Error, Debug)]
pub enum AppError {
    // Bind-time errors
    #[error("Invalid argument for {class}: declared {expected} dependencies but got {actual} values")]
    InvalidArgument {
        class: String,
        expected: usize,
        actual: usize,
    },

    #[error("Binding error in {class}::{method}: {reason}")]
    Binding {
        class: String,
        method: String,
        reason: String,
    },

    #[error("Instance already bound by {0}")]
    AlreadyBound(String),

    #[error("Unresolved dependency '{dependency}' for {class}::{method}")]
    UnresolvedDependency {
        class: String,
        method: String,
        dependency: String,
    },

    // Call-time errors
    #[error("No such method: {0}")]
    NoSuchMethod(String),

    #[error("Argument {index}: {reason}")]
    Argument { index: usize, reason: String },

    #[error(transparent)]
    Method(#[from] anyhow::Error),

    // Loading errors
    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// Builds a [`AppError::Binding`] for a method of `class`.
    pub(crate) fn binding(class: &str, method: &str, reason: impl Into<String>) -> Self {
        Self::Binding {
            class: class.to_string(),
            method: method.to_string(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable code, used by the CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            AppError::Binding { .. } => "BINDING_ERROR",
            AppError::AlreadyBound(_) => "ALREADY_BOUND",
            AppError::UnresolvedDependency { .. } => "UNRESOLVED_DEPENDENCY",
            AppError::NoSuchMethod(_) => "NO_SUCH_METHOD",
            AppError::Argument { .. } => "ARGUMENT_ERROR",
            AppError::Method(_) => "METHOD_ERROR",
            AppError::Manifest(_) => "MANIFEST_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }
}
