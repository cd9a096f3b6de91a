//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `QuizRepository` port from the `core` crate. It stores quizzes in SQLite
//! using `sqlx`, keeping each quiz's questions as a JSON blob.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use quizzy_core::domain::{Question, Quiz};
use quizzy_core::ports::{PortError, PortResult, QuizRepository};
use quizzy_core::validate::validate_success_percentage;
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, warn};

const QUIZ_COLUMNS: &str = "id, title, questions_json, success_percentage, created_at";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `QuizRepository` port.
#[derive(Clone)]
pub struct SqliteQuizAdapter {
    pool: SqlitePool,
}

impl SqliteQuizAdapter {
    /// Creates a new `SqliteQuizAdapter`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct QuizRecord {
    id: i64,
    title: String,
    questions_json: String,
    success_percentage: Option<f64>,
    // SQLite's CURRENT_TIMESTAMP is UTC without an offset.
    created_at: NaiveDateTime,
}

impl QuizRecord {
    fn to_domain(self) -> PortResult<Quiz> {
        let questions: Vec<Question> = serde_json::from_str(&self.questions_json).map_err(|e| {
            PortError::Unexpected(format!("Quiz {} has unreadable questions: {}", self.id, e))
        })?;
        Ok(Quiz {
            title: self.title,
            questions,
            success_percentage: self.success_percentage,
            created_at: Some(self.created_at.and_utc()),
            id: Some(self.id),
        })
    }
}

fn not_found(id: i64) -> PortError {
    PortError::NotFound(format!("Quiz {} not found", id))
}

//=========================================================================================
// `QuizRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl QuizRepository for SqliteQuizAdapter {
    async fn create_quiz(&self, quiz: &Quiz) -> PortResult<Quiz> {
        let questions_json = serde_json::to_string(&quiz.questions)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let record = sqlx::query_as::<_, QuizRecord>(&format!(
            "INSERT INTO quizzes (title, questions_json, success_percentage) VALUES (?, ?, ?) RETURNING {}",
            QUIZ_COLUMNS
        ))
        .bind(&quiz.title)
        .bind(questions_json)
        .bind(quiz.success_percentage)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!("Stored quiz {} with {} questions", record.id, quiz.questions.len());
        record.to_domain()
    }

    async fn get_quiz(&self, id: i64) -> PortResult<Quiz> {
        let record = sqlx::query_as::<_, QuizRecord>(&format!(
            "SELECT {} FROM quizzes WHERE id = ?",
            QUIZ_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => not_found(id),
            _ => PortError::Unexpected(e.to_string()),
        })?;
        record.to_domain()
    }

    async fn list_quizzes(&self) -> PortResult<Vec<Quiz>> {
        let records = sqlx::query_as::<_, QuizRecord>(&format!(
            "SELECT {} FROM quizzes ORDER BY created_at DESC, id DESC",
            QUIZ_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // A row whose questions cannot be read is skipped so the rest stay listable.
        Ok(records
            .into_iter()
            .filter_map(|record| match record.to_domain() {
                Ok(quiz) => Some(quiz),
                Err(e) => {
                    warn!("Skipping quiz in listing: {}", e);
                    None
                }
            })
            .collect())
    }

    async fn delete_quiz(&self, id: i64) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn record_success_percentage(&self, id: i64, percentage: f64) -> PortResult<Quiz> {
        validate_success_percentage(percentage)?;

        let record = sqlx::query_as::<_, QuizRecord>(&format!(
            "UPDATE quizzes SET success_percentage = ? WHERE id = ? RETURNING {}",
            QUIZ_COLUMNS
        ))
        .bind(percentage)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?
        .ok_or_else(|| not_found(id))?;

        record.to_domain()
    }
}
