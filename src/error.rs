use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to any other error
    /// category in this enum.
    ///
    /// Use of Internal is never a guarantee the error is not caused by the
    /// user (a hand-edited inventory file, say) - merely that the code
    /// cannot tell.
    Internal,

    /// The user provided invalid input, pointed at a missing file, or
    /// stored data the operations cannot interpret.
    User,
}

/// Fine-grained condition flags for consumers that want to branch on error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Interaction with the filesystem, stdin/stdout, or other I/O failed.
    Io,
    /// The inventory file is not well-formed CSV or lacks a required column.
    Format,
    /// An expiration date is not a valid `YYYY-MM-DD` calendar date.
    DateParse,
    /// Unexpected state reached within warehouse logic.
    InternalInvariant,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct InventoryError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Optional specific condition tag for consumers that need to
    /// branch their behavior. Any code consuming errors MUST handle
    /// the absence of a defined kind.
    pub kind: Option<ErrorKind>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl InventoryError {
    /// Creates a new error that also tags the failure with a kind.
    pub fn with_kind(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that carries both a kind tag and the originating source error.
    pub fn with_kind_and_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// Wraps an error raised while writing to the output stream.
    pub fn output(err: std::io::Error) -> Self {
        Self::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to write output",
            err,
        )
    }

    /// The message followed by every underlying cause, joined with `: `.
    pub fn describe(&self) -> String {
        let mut text = self.msg.clone();
        let mut cause = StdError::source(self);
        while let Some(err) = cause {
            text.push_str(": ");
            text.push_str(&err.to_string());
            cause = err.source();
        }
        text
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, InventoryError>;
