//! crates/quizzy_core/src/context.rs
//!
//! The per-operation bundle of a quiz and the collaborators that act on it.

use crate::domain::{Question, Quiz};
use crate::ports::{PortError, PortResult, QuizGenerationService, QuizRepository};
use crate::score::{grade, Score};

/// A quiz together with borrowed handles to the quiz store and the generative
/// service. The handles are owned by the caller and outlive the context.
pub struct Context<'a> {
    pub quiz: Quiz,
    pub db: Option<&'a dyn QuizRepository>,
    pub gemini: Option<&'a dyn QuizGenerationService>,
}

impl<'a> Context<'a> {
    pub fn new(quiz: Quiz) -> Self {
        Self { quiz, db: None, gemini: None }
    }

    pub fn with_db(mut self, db: &'a dyn QuizRepository) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_gemini(mut self, gemini: &'a dyn QuizGenerationService) -> Self {
        self.gemini = Some(gemini);
        self
    }

    pub fn into_quiz(self) -> Quiz {
        self.quiz
    }

    /// Asks the generative service for `count` facts about `topic` and appends
    /// them as questions. With `distractors > 0`, each question also gets that
    /// many wrong answers, and the correct one is placed at a varying position.
    ///
    /// Returns the number of questions added. On error the quiz is left unchanged.
    pub async fn extend_from_topic(
        &mut self,
        topic: &str,
        count: usize,
        distractors: usize,
    ) -> PortResult<usize> {
        let gemini = self
            .gemini
            .ok_or_else(|| PortError::Unavailable("no generative service configured".to_string()))?;

        let facts = gemini.generate_facts(topic, count).await?;

        // The quiz is only touched once every fact has been translated.
        let mut added = Vec::with_capacity(facts.len());
        for fact in facts {
            let question = if distractors > 0 {
                let wrong = gemini.generate_distractors(&fact, distractors).await?;
                let position = self.quiz.questions.len() + added.len();
                Question::from(fact).with_distractors(wrong, position)
            } else {
                Question::from(fact)
            };
            added.push(question);
        }

        let added_count = added.len();
        self.quiz.questions.extend(added);
        Ok(added_count)
    }

    /// Validates the quiz and stores it, replacing the in-memory quiz with the
    /// stored one (which now carries `id` and `created_at`).
    pub async fn save(&mut self) -> PortResult<&Quiz> {
        self.quiz.validate()?;
        let db = self
            .db
            .ok_or_else(|| PortError::Unavailable("no quiz store configured".to_string()))?;

        self.quiz = db.create_quiz(&self.quiz).await?;
        Ok(&self.quiz)
    }

    /// Grades an attempt and records its percentage on the quiz. The store is
    /// only updated when the quiz has been saved and a store is present.
    pub async fn record_score(&mut self, selections: &[Option<usize>]) -> PortResult<Score> {
        let score = grade(&self.quiz, selections)?;
        let percentage = score.percentage();

        match (self.quiz.id, self.db) {
            (Some(id), Some(db)) => {
                self.quiz = db.record_success_percentage(id, percentage).await?;
            }
            _ => self.quiz.success_percentage = Some(percentage),
        }

        Ok(score)
    }
}
