//! crates/quizzy_core/src/domain.rs
//!
//! Defines the core data structures for the application.
//! These are the shapes exchanged between the presentation layer, the quiz store
//! and the generative-content service, so they carry their JSON (camelCase) form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate response to a question, flagged correct or incorrect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub text: String,
    pub is_correct: bool,
    pub explanation: String,
}

impl Answer {
    pub fn new(text: impl Into<String>, is_correct: bool, explanation: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_correct,
            explanation: explanation.into(),
        }
    }

    pub fn correct(text: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self::new(text, true, explanation)
    }

    pub fn incorrect(text: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self::new(text, false, explanation)
    }
}

/// A prompt with its candidate answers and a (possibly empty) hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub hint: String,
}

impl Question {
    /// Returns the first answer flagged as correct, if any.
    pub fn correct_answer(&self) -> Option<&Answer> {
        self.answers.iter().find(|a| a.is_correct)
    }
}

/// The root aggregate: a titled collection of questions.
///
/// `id` and `created_at` are only present once the quiz has been stored;
/// `success_percentage` only once an attempt has been scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub title: String,
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl Quiz {
    /// Creates an empty, unsaved quiz.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            questions: Vec::new(),
            success_percentage: None,
            created_at: None,
            id: None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// A single fact as returned by the generative-content service, before it is
/// translated into a `Question`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GeminiResponse {
    pub question: String,
    pub answer: String,
    pub explanation: String,
}
