//! crates/quizzy_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete quiz store and generative-content service.

use async_trait::async_trait;

use crate::domain::{Answer, GeminiResponse, Quiz};
use crate::score::ScoreError;
use crate::validate::ValidationError;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Malformed response from the generative service: {0}")]
    MalformedResponse(String),
    #[error("Invalid quiz: {0}")]
    Invalid(#[from] ValidationError),
    #[error("Invalid attempt: {0}")]
    Score(#[from] ScoreError),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Persistence boundary for quizzes.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Stores a new quiz and returns it with its assigned `id` and `created_at`.
    /// Any `id` already on the quiz is ignored.
    async fn create_quiz(&self, quiz: &Quiz) -> PortResult<Quiz>;

    async fn get_quiz(&self, id: i64) -> PortResult<Quiz>;

    /// Returns all stored quizzes, newest first.
    async fn list_quizzes(&self) -> PortResult<Vec<Quiz>>;

    async fn delete_quiz(&self, id: i64) -> PortResult<()>;

    /// Stores the percentage scored on the latest attempt.
    async fn record_success_percentage(&self, id: i64, percentage: f64) -> PortResult<Quiz>;
}

/// Generative-content boundary.
#[async_trait]
pub trait QuizGenerationService: Send + Sync {
    /// Produces up to `count` question/answer/explanation facts about `topic`.
    async fn generate_facts(&self, topic: &str, count: usize) -> PortResult<Vec<GeminiResponse>>;

    /// Produces up to `count` plausible but wrong answers for a fact.
    async fn generate_distractors(
        &self,
        fact: &GeminiResponse,
        count: usize,
    ) -> PortResult<Vec<Answer>>;
}
