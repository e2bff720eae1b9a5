//! Provides quiz persistence.
//!
//! Commands only see the `QuizStore` trait; the `sqlite` submodule provides the
//! `SqliteStore` implementation used by the binary.

mod sqlite;

pub use sqlite::*;

use crate::error::Result;
use crate::models::{NewQuiz, Quiz};
use async_trait::async_trait;

/// Keyed collection of quizzes.
///
/// Every method is a suspend point for the calling command.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Looks a quiz up by id. Absence is `Ok(None)`, not an error.
    async fn find_by_id(&self, id: i64) -> Result<Option<Quiz>>;

    /// Every quiz, in creation order.
    async fn list_all(&self) -> Result<Vec<Quiz>>;

    /// Only the ids of every quiz, in creation order.
    async fn list_ids(&self) -> Result<Vec<i64>>;

    /// Validates and inserts a new quiz, returning it with its assigned id.
    async fn create(&self, quiz: NewQuiz) -> Result<Quiz>;

    /// Validates and persists the question and answer of an existing quiz.
    async fn update(&self, quiz: &Quiz) -> Result<Quiz>;

    /// Deletes a quiz and returns how many rows went away.
    /// Deleting an absent id succeeds with 0 and changes nothing.
    async fn delete_by_id(&self, id: i64) -> Result<u64>;
}
