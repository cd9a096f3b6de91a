//! crates/quizzy_core/src/score.rs
//!
//! Grades a user's answer selections against `Answer::is_correct`. This is the
//! only place a success percentage is produced.

use crate::domain::Quiz;
use crate::validate::{validate_success_percentage, ValidationError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("cannot grade a quiz without questions")]
    EmptyQuiz,
    #[error("expected {expected} selections, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("question {question} has no answer at index {answer}")]
    AnswerOutOfRange { question: usize, answer: usize },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// The outcome of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 * 100.0 / self.total as f64
    }

    /// Whether the attempt reached `threshold` percent.
    pub fn passed(&self, threshold: f64) -> bool {
        self.percentage() >= threshold
    }
}

/// Grades one attempt. `selections` holds one entry per question: the chosen
/// answer's index, or `None` if the question was skipped.
pub fn grade(quiz: &Quiz, selections: &[Option<usize>]) -> Result<Score, ScoreError> {
    if quiz.questions.is_empty() {
        return Err(ScoreError::EmptyQuiz);
    }
    if selections.len() != quiz.questions.len() {
        return Err(ScoreError::LengthMismatch {
            expected: quiz.questions.len(),
            actual: selections.len(),
        });
    }

    let mut correct = 0;
    for (index, (question, selection)) in quiz.questions.iter().zip(selections).enumerate() {
        let Some(choice) = *selection else {
            continue;
        };
        let answer = question
            .answers
            .get(choice)
            .ok_or(ScoreError::AnswerOutOfRange { question: index, answer: choice })?;
        if answer.is_correct {
            correct += 1;
        }
    }

    let score = Score { correct, total: quiz.questions.len() };
    validate_success_percentage(score.percentage())?;
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Answer, Question};

    fn quiz() -> Quiz {
        let mut quiz = Quiz::new("Capitals");
        for (prompt, right, wrong) in [
            ("Capital of France?", "Paris", "Lyon"),
            ("Capital of Italy?", "Rome", "Milan"),
            ("Capital of Spain?", "Madrid", "Seville"),
            ("Capital of Japan?", "Tokyo", "Osaka"),
        ] {
            quiz.questions.push(Question {
                question: prompt.to_string(),
                answers: vec![Answer::incorrect(wrong, ""), Answer::correct(right, "")],
                hint: String::new(),
            });
        }
        quiz
    }

    #[test]
    fn counts_correct_selections() {
        let score = grade(&quiz(), &[Some(1), Some(0), Some(1), None]).unwrap();
        assert_eq!(score, Score { correct: 2, total: 4 });
        assert_eq!(score.percentage(), 50.0);
        assert!(score.passed(50.0));
        assert!(!score.passed(75.0));
    }

    #[test]
    fn perfect_and_empty_attempts_stay_in_range() {
        let perfect = grade(&quiz(), &[Some(1); 4]).unwrap();
        assert_eq!(perfect.percentage(), 100.0);

        let skipped = grade(&quiz(), &[None; 4]).unwrap();
        assert_eq!(skipped.percentage(), 0.0);
    }

    #[test]
    fn rejects_wrong_number_of_selections() {
        assert_eq!(
            grade(&quiz(), &[Some(1)]),
            Err(ScoreError::LengthMismatch { expected: 4, actual: 1 })
        );
    }

    #[test]
    fn rejects_unknown_answer_index() {
        assert_eq!(
            grade(&quiz(), &[Some(1), Some(2), None, None]),
            Err(ScoreError::AnswerOutOfRange { question: 1, answer: 2 })
        );
    }

    #[test]
    fn rejects_empty_quiz() {
        assert_eq!(grade(&Quiz::new("Nothing"), &[]), Err(ScoreError::EmptyQuiz));
    }
}
