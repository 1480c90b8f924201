//! Structured error types shared across specx crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`SpecxError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, sizes, etc.).
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

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
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

/// Canonical error type for the specx engine.
///
/// Each variant corresponds to one of the error kinds in the error handling
/// design: malformed caller input, a Havel-Hakimi/backtracking
/// non-graphical contradiction, a bounded search or retry budget exceeded,
/// a failure invoking an external tool (`labelg`), two jobs racing for the
/// single job lock, or an unexpected internal failure. `TimeoutElapsed` is
/// deliberately not a variant here: exact realization under a wall-clock
/// budget reports its timeout as `Ok(None)`, not as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum SpecxError {
    /// Caller-supplied input is malformed: unknown algorithm tag, invalid
    /// mode, non-positive iteration count, an edge endpoint out of range,
    /// or a vertex count out of the graph6 encodable range.
    #[error("validation error: {0}")]
    Validation(ErrorInfo),
    /// A degree sequence failed the Havel-Hakimi graphicality test where a
    /// valid realization was required.
    #[error("non-graphical degree sequence: {0}")]
    NonGraphical(ErrorInfo),
    /// A bounded operation exhausted its retry or step budget: degree
    /// generator repair attempts, backtracking realizer steps, or the
    /// connectivity enforcer's inner/outer attempt limits.
    #[error("limit exceeded: {0}")]
    LimitExceeded(ErrorInfo),
    /// Invoking an external tool (`labelg`) failed: the binary is missing,
    /// exited non-zero, or produced no usable output line.
    #[error("external tool error: {0}")]
    ExternalTool(ErrorInfo),
    /// A second autosearch job was requested while one was already running.
    #[error("concurrency conflict: {0}")]
    ConcurrencyConflict(ErrorInfo),
    /// Persistence or (de)serialization failure.
    #[error("store error: {0}")]
    Store(ErrorInfo),
    /// Unexpected internal failure not covered by the other kinds.
    #[error("internal error: {0}")]
    Internal(ErrorInfo),
}

impl SpecxError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SpecxError::Validation(info)
            | SpecxError::NonGraphical(info)
            | SpecxError::LimitExceeded(info)
            | SpecxError::ExternalTool(info)
            | SpecxError::ConcurrencyConflict(info)
            | SpecxError::Store(info)
            | SpecxError::Internal(info) => info,
        }
    }

    /// Shorthand for constructing a [`SpecxError::Validation`].
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        SpecxError::Validation(ErrorInfo::new(code, message))
    }

    /// Shorthand for constructing a [`SpecxError::NonGraphical`].
    pub fn non_graphical(code: impl Into<String>, message: impl Into<String>) -> Self {
        SpecxError::NonGraphical(ErrorInfo::new(code, message))
    }

    /// Shorthand for constructing a [`SpecxError::LimitExceeded`].
    pub fn limit_exceeded(code: impl Into<String>, message: impl Into<String>) -> Self {
        SpecxError::LimitExceeded(ErrorInfo::new(code, message))
    }

    /// Shorthand for constructing a [`SpecxError::ExternalTool`].
    pub fn external_tool(code: impl Into<String>, message: impl Into<String>) -> Self {
        SpecxError::ExternalTool(ErrorInfo::new(code, message))
    }

    /// Shorthand for constructing a [`SpecxError::ConcurrencyConflict`].
    pub fn concurrency_conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
        SpecxError::ConcurrencyConflict(ErrorInfo::new(code, message))
    }

    /// Shorthand for constructing a [`SpecxError::Store`].
    pub fn store(code: impl Into<String>, message: impl Into<String>) -> Self {
        SpecxError::Store(ErrorInfo::new(code, message))
    }

    /// Shorthand for constructing a [`SpecxError::Internal`].
    pub fn internal(code: impl Into<String>, message: impl Into<String>) -> Self {
        SpecxError::Internal(ErrorInfo::new(code, message))
    }
}
