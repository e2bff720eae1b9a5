//! Defines the quiz data structures.
//!
//! Includes:
//! - `Quiz`, the stored question/answer record (`sqlx::FromRow` for the store).
//! - `NewQuiz`, a candidate quiz that has not been assigned an id yet (also the seed file format).
//! - Field validation shared by the store's create and update paths.

use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// A question/answer pair as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Quiz {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    /// Checks a reply against the stored answer, ignoring case and surrounding whitespace.
    pub fn is_correct(&self, reply: &str) -> bool {
        reply.trim().to_lowercase() == self.answer.trim().to_lowercase()
    }

    /// Validates the current question and answer fields.
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.question, &self.answer)
    }
}

/// A quiz that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuiz {
    pub question: String,
    pub answer: String,
}

impl NewQuiz {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Validates the question and answer fields.
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.question, &self.answer)
    }
}

/// Collects every field violation instead of stopping at the first one.
///
/// # Errors
///
/// Returns `AppError::Validation` carrying one message per empty field.
pub fn validate_fields(question: &str, answer: &str) -> Result<()> {
    let mut violations = Vec::new();
    if question.trim().is_empty() {
        violations.push("Question must not be empty.".to_string());
    }
    if answer.trim().is_empty() {
        violations.push("Answer must not be empty.".to_string());
    }

    if violations.is_empty() {
        Ok(())
    } else {
        debug!("Quiz validation failed: {:?}", violations);
        Err(AppError::Validation(violations))
    }
}

/// Quizzes used to populate an empty store on first start.
pub fn default_quizzes() -> Vec<NewQuiz> {
    vec![
        NewQuiz::new("Capital of Italy", "Rome"),
        NewQuiz::new("Capital of France", "Paris"),
        NewQuiz::new("Capital of Spain", "Madrid"),
        NewQuiz::new("Capital of Portugal", "Lisbon"),
    ]
}

/// Reads a JSON array of `{ "question": ..., "answer": ... }` objects.
///
/// # Errors
///
/// Returns `AppError::Io` if the file cannot be read and `AppError::SeedFile`
/// if its contents are not a valid quiz list.
pub fn load_seed_file(path: &Path) -> Result<Vec<NewQuiz>> {
    info!("Loading seed quizzes from {}", path.display());
    let raw = std::fs::read_to_string(path)?;
    let quizzes: Vec<NewQuiz> = serde_json::from_str(&raw)?;
    info!("Loaded {} seed quizzes", quizzes.len());
    Ok(quizzes)
}
