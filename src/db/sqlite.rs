//! Provides SQLite database interaction functionalities using `sqlx`.
//!
//! Includes capabilities for establishing connection pools, initializing the database schema,
//! seeding an empty database, and the `QuizStore` operations used by the commands.
//! Tests run against an in-memory database.

use super::QuizStore;
use crate::error::{AppError, Result};
use crate::models::{NewQuiz, Quiz};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use tracing::{debug, error, info};

/// Represents the database connection pool and provides the quiz operations.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Creates a new `SqliteStore` by establishing a connection pool.
    ///
    /// In-memory URLs get a single connection that is never recycled, since every
    /// SQLite memory connection is its own database.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the connection pool cannot be established.
    pub async fn new(database_url: &str) -> Result<Self> {
        info!("Connecting to database...");

        let options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(4)
        };

        let pool = options.connect(database_url).await.map_err(|e| {
            error!("Failed to connect to database: {}", e);
            AppError::from(e)
        })?;

        info!("Connected to database successfully");
        Ok(Self { pool })
    }

    /// Creates the `quizzes` table if it does not exist yet. Safe to run repeatedly.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the DDL fails.
    pub async fn init_schema(&self) -> Result<()> {
        info!("Initializing database schema (if necessary)...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS quizzes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to create quizzes table: {}", e);
            AppError::from(e)
        })?;

        info!("Database schema initialized successfully");
        Ok(())
    }

    /// Number of stored quizzes.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to count quizzes: {}", e);
                AppError::from(e)
            })?;
        debug!("Store holds {} quizzes", count);
        Ok(count)
    }

    /// Inserts `quizzes` only when the table is empty. Returns how many were inserted.
    ///
    /// All quizzes are validated before anything is written, and the inserts share one
    /// transaction: either the whole seed lands or the table stays empty.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if a seed quiz is invalid, `AppError::Store` otherwise.
    pub async fn seed_if_empty(&self, quizzes: &[NewQuiz]) -> Result<usize> {
        if self.count().await? > 0 {
            debug!("Store already populated, skipping seed");
            return Ok(0);
        }

        for quiz in quizzes {
            quiz.validate()?;
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start seed transaction: {}", e);
            AppError::from(e)
        })?;

        let now = Utc::now();
        for quiz in quizzes {
            sqlx::query(
                "INSERT INTO quizzes (question, answer, created_at, updated_at) VALUES (?, ?, ?, ?)",
            )
            .bind(&quiz.question)
            .bind(&quiz.answer)
            .bind(now)
            .bind(now)
            .execute(&mut tx)
            .await
            .map_err(|e| {
                error!("Failed to insert seed quiz: {}", e);
                AppError::from(e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            error!("Failed to commit seed transaction: {}", e);
            AppError::from(e)
        })?;

        info!("Seeded {} quizzes", quizzes.len());
        Ok(quizzes.len())
    }
}

#[async_trait]
impl QuizStore for SqliteStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Quiz>> {
        debug!("Fetching quiz {}", id);
        sqlx::query_as::<_, Quiz>(
            "SELECT id, question, answer, created_at, updated_at FROM quizzes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to fetch quiz {}: {}", id, e);
            AppError::from(e)
        })
    }

    async fn list_all(&self) -> Result<Vec<Quiz>> {
        let quizzes = sqlx::query_as::<_, Quiz>(
            "SELECT id, question, answer, created_at, updated_at FROM quizzes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to list quizzes: {}", e);
            AppError::from(e)
        })?;

        debug!("Listed {} quizzes", quizzes.len());
        Ok(quizzes)
    }

    async fn list_ids(&self) -> Result<Vec<i64>> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM quizzes ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to list quiz ids: {}", e);
                AppError::from(e)
            })
    }

    async fn create(&self, quiz: NewQuiz) -> Result<Quiz> {
        quiz.validate()?;

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO quizzes (question, answer, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&quiz.question)
        .bind(&quiz.answer)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to insert quiz: {}", e);
            AppError::from(e)
        })?;

        let id = result.last_insert_rowid();
        info!("Created quiz {}", id);
        Ok(Quiz {
            id,
            question: quiz.question,
            answer: quiz.answer,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, quiz: &Quiz) -> Result<Quiz> {
        quiz.validate()?;

        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE quizzes SET question = ?, answer = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&quiz.question)
        .bind(&quiz.answer)
        .bind(now)
        .bind(quiz.id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to update quiz {}: {}", quiz.id, e);
            AppError::from(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(quiz.id));
        }

        info!("Updated quiz {}", quiz.id);
        Ok(Quiz {
            updated_at: now,
            ..quiz.clone()
        })
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to delete quiz {}: {}", id, e);
                AppError::from(e)
            })?;

        let deleted = result.rows_affected();
        info!("Deleted quiz {} ({} rows)", id, deleted);
        Ok(deleted)
    }
}
