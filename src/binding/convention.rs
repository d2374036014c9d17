//! Annotation conventions that decide which methods take part in binding.
//!
//! Both conventions key off the `$inject` marker in a method's annotation:
//!
//! - [`MarkerComment`]: `/* $inject: logger, config */` lists the dependencies.
//! - [`EnabledFlag`]: `/* $inject: enabled */` opts in, and the method's own
//!   parameter names are the dependencies.
//!
//! A method without the marker does not participate. A marker that does not
//! match the convention's grammar is a [`MalformedAnnotation`].

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::method::MethodSignature;

/// The token every participating annotation contains.
pub const MARKER: &str = "$inject";

static MARKER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$inject\b").expect("valid regex"));

static MARKER_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\*\s*\$inject\s*:([^*]*)\*/").expect("valid regex"));

static ENABLED_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\*\s*\$inject\s*:\s*enabled\s*\*/").expect("valid regex"));

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid regex"));

/// An annotation carries the marker but not in the expected form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct MalformedAnnotation(pub String);

/// A strategy reading a method's dependency list from its signature.
pub trait Convention: Send + Sync {
    /// Stable name, as used in configuration.
    fn name(&self) -> &'static str;

    /// The ordered dependency names of a method, or `None` if it does not participate.
    fn dependencies(
        &self,
        signature: &MethodSignature,
    ) -> Result<Option<Vec<String>>, MalformedAnnotation>;
}

/// Returns the annotation if it carries exactly one marker.
fn marked(signature: &MethodSignature) -> Result<Option<&str>, MalformedAnnotation> {
    let Some(text) = signature.annotation.as_deref() else {
        return Ok(None);
    };
    match MARKER_TOKEN.find_iter(text).count() {
        0 => Ok(None),
        1 => Ok(Some(text)),
        n => Err(MalformedAnnotation(format!(
            "annotation contains {n} `{MARKER}` markers"
        ))),
    }
}

fn check_identifier(name: &str, what: &str) -> Result<(), MalformedAnnotation> {
    if name.is_empty() {
        return Err(MalformedAnnotation(format!("empty {what}")));
    }
    if !IDENTIFIER.is_match(name) {
        return Err(MalformedAnnotation(format!(
            "{what} '{name}' is not an identifier"
        )));
    }
    Ok(())
}

/// `/* $inject: a, b */`: the comment lists the dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerComment;

impl Convention for MarkerComment {
    fn name(&self) -> &'static str {
        "marker-comment"
    }

    fn dependencies(
        &self,
        signature: &MethodSignature,
    ) -> Result<Option<Vec<String>>, MalformedAnnotation> {
        let Some(text) = marked(signature)? else {
            return Ok(None);
        };
        let captures = MARKER_COMMENT.captures(text).ok_or_else(|| {
            MalformedAnnotation(format!(
                "expected `/* {MARKER}: name, ... */`, found `{}`",
                text.trim()
            ))
        })?;
        let list = captures[1].trim();
        if list.is_empty() {
            return Err(MalformedAnnotation("empty dependency list".to_string()));
        }

        let names: Vec<String> = list.split(',').map(|n| n.trim().to_string()).collect();
        for name in &names {
            check_identifier(name, "dependency name")?;
        }
        Ok(Some(names))
    }
}

/// `/* $inject: enabled */`: the method's parameters are the dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnabledFlag;

impl Convention for EnabledFlag {
    fn name(&self) -> &'static str {
        "enabled-flag"
    }

    fn dependencies(
        &self,
        signature: &MethodSignature,
    ) -> Result<Option<Vec<String>>, MalformedAnnotation> {
        let Some(text) = marked(signature)? else {
            return Ok(None);
        };
        if !ENABLED_COMMENT.is_match(text) {
            return Err(MalformedAnnotation(format!(
                "expected `/* {MARKER}: enabled */`, found `{}`",
                text.trim()
            )));
        }

        let names: Vec<String> = signature
            .params
            .iter()
            .map(|p| p.trim().to_string())
            .collect();
        for name in &names {
            check_identifier(name, "parameter")?;
        }
        Ok(Some(names))
    }
}

/// Named choice of convention, as found in configuration and on the CLI.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ConventionKind {
    #[default]
    MarkerComment,
    EnabledFlag,
}

impl ConventionKind {
    pub fn convention(self) -> &'static dyn Convention {
        match self {
            ConventionKind::MarkerComment => &MarkerComment,
            ConventionKind::EnabledFlag => &EnabledFlag,
        }
    }
}

impl fmt::Display for ConventionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.convention().name())
    }
}
