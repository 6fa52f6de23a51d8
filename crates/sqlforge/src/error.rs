//! Error types for sqlforge

use thiserror::Error;

/// Result type alias for sqlforge operations
pub type QbResult<T> = Result<T, QbError>;

/// Error types raised while building, rendering or executing statements
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QbError {
    /// Function expression created without a name
    #[error("Cannot create function expression without arguments")]
    EmptyFunction,

    /// Operand that has no identifier rendering rule
    #[error("Cannot escape {0} as an identifier")]
    UnsupportedEscape(String),

    /// Operator outside the allow-list
    #[error("Operator not allowed: '{0}'")]
    InvalidOperator(String),

    /// `??` token without a matching parameter
    #[error("Raw expression has no parameter for identifier placeholder #{position}")]
    MissingRawParameter { position: usize },

    /// Builder state that cannot be rendered
    #[error("Validation error: {0}")]
    Validation(String),

    /// Failure reported by the executor
    #[error("Execution error: {0}")]
    Execution(String),

    /// Executor output that does not fit the statement kind
    #[error("Unexpected executor output: {0}")]
    UnexpectedOutput(String),
}

impl QbError {
    /// Create an unsupported-escape error describing the offending operand
    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::UnsupportedEscape(what.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Check if this error came from the executor
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Check if this error was raised while rendering
    pub fn is_render_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedEscape(_) | Self::MissingRawParameter { .. }
        )
    }
}
