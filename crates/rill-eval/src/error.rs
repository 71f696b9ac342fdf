//! Interpreter error types.

use rill_types::Span;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An interpreter error: either caught before execution by the semantic
/// pre-pass, or raised while evaluating.
///
/// Both kinds carry the source span of the offending node and are
/// unrecoverable — the first one raised terminates the pass.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RillError {
    /// Undefined reference or duplicate declaration, found by the
    /// pre-pass without executing anything.
    #[error("{span}: semantic error: {message}")]
    Semantic { span: Span, message: String },

    /// Raised during evaluation: kind mismatch, division by zero, arity
    /// mismatch, bad intrinsic arguments, and the like.
    #[error("{span}: evaluation error: {message}")]
    Evaluation { span: Span, message: String },
}

impl RillError {
    pub fn semantic(span: Span, message: impl Into<String>) -> Self {
        Self::Semantic {
            span,
            message: message.into(),
        }
    }

    pub fn evaluation(span: Span, message: impl Into<String>) -> Self {
        Self::Evaluation {
            span,
            message: message.into(),
        }
    }

    /// The source span the error points at.
    pub fn span(&self) -> Span {
        match self {
            Self::Semantic { span, .. } | Self::Evaluation { span, .. } => *span,
        }
    }
}

/// Result alias used throughout both interpreter passes.
pub type RillResult<T> = Result<T, RillError>;
