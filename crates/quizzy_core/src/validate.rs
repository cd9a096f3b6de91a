//! crates/quizzy_core/src/validate.rs
//!
//! Invariant checks for quizzes crossing a boundary. The data shapes themselves
//! accept anything; these checks run wherever a quiz is about to be stored or a
//! success percentage is produced.

use crate::domain::{Question, Quiz};

/// Describes the first invariant a quiz violates. Questions are identified by
/// their zero-based position in the quiz.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("quiz title must not be empty")]
    EmptyTitle,
    #[error("quiz must contain at least one question")]
    NoQuestions,
    #[error("question {0} has no text")]
    EmptyQuestionText(usize),
    #[error("question {0} has no answers")]
    NoAnswers(usize),
    #[error("question {0} has no correct answer")]
    NoCorrectAnswer(usize),
    #[error("question {index} has {count} correct answers, expected exactly one")]
    MultipleCorrectAnswers { index: usize, count: usize },
    #[error("success percentage {0} is outside the range 0 to 100")]
    PercentageOutOfRange(f64),
}

/// Checks every invariant of a quiz in document order.
pub fn validate_quiz(quiz: &Quiz) -> Result<(), ValidationError> {
    if quiz.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if quiz.questions.is_empty() {
        return Err(ValidationError::NoQuestions);
    }
    for (index, question) in quiz.questions.iter().enumerate() {
        validate_question(index, question)?;
    }
    if let Some(percentage) = quiz.success_percentage {
        validate_success_percentage(percentage)?;
    }
    Ok(())
}

/// Checks a single question; `index` is only used to label the error.
pub fn validate_question(index: usize, question: &Question) -> Result<(), ValidationError> {
    if question.question.trim().is_empty() {
        return Err(ValidationError::EmptyQuestionText(index));
    }
    if question.answers.is_empty() {
        return Err(ValidationError::NoAnswers(index));
    }
    match question.answers.iter().filter(|a| a.is_correct).count() {
        0 => Err(ValidationError::NoCorrectAnswer(index)),
        1 => Ok(()),
        count => Err(ValidationError::MultipleCorrectAnswers { index, count }),
    }
}

/// Accepts finite values in `[0, 100]`.
pub fn validate_success_percentage(percentage: f64) -> Result<(), ValidationError> {
    if percentage.is_finite() && (0.0..=100.0).contains(&percentage) {
        Ok(())
    } else {
        Err(ValidationError::PercentageOutOfRange(percentage))
    }
}

impl Quiz {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_quiz(self)
    }
}
