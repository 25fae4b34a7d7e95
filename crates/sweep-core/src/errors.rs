//! Structured error types shared across sweep crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`SweepError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, row identifiers, keys).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Adds the offending path as a `path` context entry.
    pub fn with_path(self, path: &Path) -> Self {
        self.with_context("path", path.display().to_string())
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the sweep driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum SweepError {
    /// Filesystem read/write failures.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Parameter table shape or coercion errors.
    #[error("table error: {0}")]
    Table(ErrorInfo),
    /// Template configuration loading errors.
    #[error("template error: {0}")]
    Template(ErrorInfo),
    /// Missing or malformed keys targeted by an overlay.
    #[error("overlay error: {0}")]
    Overlay(ErrorInfo),
    /// Worker pool and process launch errors.
    #[error("dispatch error: {0}")]
    Dispatch(ErrorInfo),
    /// Sweep configuration errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl SweepError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SweepError::Io(info)
            | SweepError::Table(info)
            | SweepError::Template(info)
            | SweepError::Overlay(info)
            | SweepError::Dispatch(info)
            | SweepError::Config(info)
            | SweepError::Serde(info) => info,
        }
    }

    /// Wraps an I/O failure on `path` under the provided error code.
    pub fn io(code: &str, path: &Path, err: impl ToString) -> Self {
        SweepError::Io(ErrorInfo::new(code, err.to_string()).with_path(path))
    }
}
