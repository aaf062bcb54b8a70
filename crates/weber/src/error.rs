// ABOUTME: Error types for weber including the ErrorCode enum and WeberError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the categories of inference failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The document or anchor source could not be read or decoded.
    Load,
    /// An anchor has no locatable occurrence in the document.
    NoMatch,
    /// Ancestor chains were exhausted without a shared shape.
    NoConvergence,
    /// Aligned nodes disagree on their number of element children (strict mode).
    ChildArityMismatch,
    /// The schema or generated code could not be written.
    Write,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Load => "load error",
            ErrorCode::NoMatch => "no match",
            ErrorCode::NoConvergence => "no convergence",
            ErrorCode::ChildArityMismatch => "child arity mismatch",
            ErrorCode::Write => "write error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for weber operations.
///
/// `subject` names what the operation was working on: a source path or URL,
/// an anchor, or an output file.
#[derive(Debug, thiserror::Error)]
pub struct WeberError {
    pub code: ErrorCode,
    pub subject: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for WeberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "weber: {} {:?}: {}", self.op, self.subject, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl WeberError {
    fn new(
        code: ErrorCode,
        subject: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            subject: subject.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Load error.
    pub fn load(
        subject: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Load, subject, op, source)
    }

    /// Create a NoMatch error for the given anchor.
    pub fn no_match(anchor: impl Into<String>, op: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::NoMatch,
            anchor,
            op,
            Some(anyhow::anyhow!("anchor matched zero elements")),
        )
    }

    /// Create a NoConvergence error.
    pub fn no_convergence(
        subject: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::NoConvergence, subject, op, source)
    }

    /// Create a ChildArityMismatch error.
    pub fn child_arity_mismatch(
        subject: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::ChildArityMismatch, subject, op, source)
    }

    /// Create a Write error.
    pub fn write(
        subject: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Write, subject, op, source)
    }

    /// Returns true if this is a Load error.
    pub fn is_load(&self) -> bool {
        self.code == ErrorCode::Load
    }

    /// Returns true if this is a NoMatch error.
    pub fn is_no_match(&self) -> bool {
        self.code == ErrorCode::NoMatch
    }

    /// Returns true if this is a NoConvergence error.
    pub fn is_no_convergence(&self) -> bool {
        self.code == ErrorCode::NoConvergence
    }

    /// Returns true if this is a ChildArityMismatch error.
    pub fn is_child_arity_mismatch(&self) -> bool {
        self.code == ErrorCode::ChildArityMismatch
    }

    /// Returns true if this is a Write error.
    pub fn is_write(&self) -> bool {
        self.code == ErrorCode::Write
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WeberError>;
