//! Defines the application's primary error type `AppError` and a convenience `Result` alias.
//!
//! Uses the `thiserror` crate for ergonomic error definition and provides `From`
//! implementations to convert common external errors into `AppError` variants.
//! Errors that do not implement `Clone` are wrapped in `Arc` to allow `AppError` to be cloneable.

use std::sync::Arc;
use thiserror::Error;

/// The primary error enumeration for all application-specific errors.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// A command that needs an `<id>` was invoked without one.
    #[error("Missing parameter <id>.")]
    MissingArgument,

    /// The supplied `<id>` could not be parsed as an integer.
    #[error("The value of parameter <id> is not a number: {0:?}")]
    NotANumber(String),

    /// No quiz is stored under the given id.
    #[error("There is no quiz with id = {0}.")]
    NotFound(i64),

    /// The store rejected a quiz; one message per violated field.
    #[error("The quiz is invalid: {}", .0.join(" "))]
    Validation(Vec<String>),

    /// Any other error originating from database operations (`sqlx`).
    #[error("Database Error: {0}")]
    Store(Arc<sqlx::Error>),

    /// Error originating from user interaction prompts (`dialoguer`).
    #[error("Dialoguer Error: {0}")]
    Prompt(Arc<dialoguer::Error>),

    /// The input channel was closed (EOF on stdin, or the reader task died).
    #[error("Input closed: {0}")]
    InputClosed(String),

    /// Error during seed file parsing (`serde_json`). Wrapped in Arc as serde_json::Error is not Clone.
    #[error("Seed File Error: {0}")]
    SeedFile(Arc<serde_json::Error>),

    /// Error related to accessing environment variables.
    #[error("Environment Error: {0}")]
    Env(#[from] std::env::VarError),

    /// Error related to standard I/O operations.
    #[error("I/O Error: {0}")]
    Io(Arc<std::io::Error>),
}

impl AppError {
    /// Whether this error ends the interactive session instead of just the current command.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Prompt(_) | AppError::InputClosed(_))
    }

    /// Human-readable lines for the console.
    ///
    /// Validation failures render as a header followed by one line per field message;
    /// every other kind renders as its single `Display` line.
    pub fn render_lines(&self) -> Vec<String> {
        match self {
            AppError::Validation(messages) => {
                let mut lines = Vec::with_capacity(messages.len() + 1);
                lines.push("The quiz is invalid:".to_string());
                lines.extend(messages.iter().cloned());
                lines
            },
            other => vec![other.to_string()],
        }
    }
}

/// A specialized `Result` type using the application's `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

// --- From implementations ---
// Arc is used for non-Clone error types.

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Store(Arc::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(Arc::new(err))
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        AppError::Prompt(Arc::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SeedFile(Arc::new(err))
    }
}
