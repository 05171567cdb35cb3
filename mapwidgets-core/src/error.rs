/// Structured error types for the command controller.
///
/// The first three variants are status conditions: the controller turns them
/// into a footer message and never lets them escape `submit_command`. The
/// last two carry failures raised by user code and are handed back to the
/// caller untouched.
use thiserror::Error;

use crate::command::Arity;

/// Main error type for command dispatch
#[derive(Error, Debug)]
pub enum CommandError {
    /// The line could not be tokenized (unterminated quote, dangling escape)
    #[error("Invalid command")]
    InvalidCommand,

    /// The first token names no registered command
    #[error("Command not found")]
    NotFound { name: String },

    /// The registry rejected the call before invoking the handler
    #[error("Wrong number of arguments")]
    WrongArguments {
        name: String,
        expected: Arity,
        given: usize,
    },

    /// The handler ran and returned an error of its own
    #[error("Command '{name}' failed: {source}")]
    Failed {
        name: String,
        source: anyhow::Error,
    },

    /// A custom submit callback returned an error
    #[error("Submit callback failed: {source}")]
    Callback { source: anyhow::Error },
}

/// Result type alias for command controller operations
pub type Result<T> = std::result::Result<T, CommandError>;

impl CommandError {
    /// Create a command-not-found error
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an arity mismatch error
    pub fn wrong_arguments(name: impl Into<String>, expected: Arity, given: usize) -> Self {
        Self::WrongArguments {
            name: name.into(),
            expected,
            given,
        }
    }

    /// Wrap an error returned by a command handler
    pub fn failed(name: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Failed {
            name: name.into(),
            source,
        }
    }

    /// Wrap an error returned by a submit callback
    pub fn callback(source: anyhow::Error) -> Self {
        Self::Callback { source }
    }

    /// Whether this error is reported on the status line instead of propagated
    pub fn is_status(&self) -> bool {
        matches!(
            self,
            Self::InvalidCommand | Self::NotFound { .. } | Self::WrongArguments { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        assert_eq!(CommandError::InvalidCommand.to_string(), "Invalid command");
        assert_eq!(CommandError::not_found("foo").to_string(), "Command not found");
        assert_eq!(
            CommandError::wrong_arguments("cmd", Arity::Exact(0), 2).to_string(),
            "Wrong number of arguments"
        );
    }

    #[test]
    fn test_status_classification() {
        assert!(CommandError::InvalidCommand.is_status());
        assert!(CommandError::not_found("x").is_status());
        assert!(!CommandError::failed("x", anyhow::anyhow!("boom")).is_status());
        assert!(!CommandError::callback(anyhow::anyhow!("boom")).is_status());
    }

    #[test]
    fn test_failed_keeps_source() {
        let err = CommandError::failed("load", anyhow::anyhow!("missing file"));
        assert!(err.to_string().contains("load"));
        assert!(err.to_string().contains("missing file"));
    }
}
