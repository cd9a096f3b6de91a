//! crates/quizzy_core/src/translate.rs
//!
//! Turns facts from the generative-content service into quiz questions.

use crate::domain::{Answer, GeminiResponse, Question, Quiz};

impl From<GeminiResponse> for Question {
    /// A fact becomes a question with a single, correct answer and no hint.
    fn from(response: GeminiResponse) -> Self {
        Question {
            question: response.question,
            answers: vec![Answer::correct(response.answer, response.explanation)],
            hint: String::new(),
        }
    }
}

impl Question {
    /// Adds incorrect answers to the question and moves the first answer to
    /// `correct_position` (taken modulo the new answer count).
    ///
    /// Distractors are always stored as incorrect, whatever flag they arrive with.
    pub fn with_distractors(mut self, distractors: Vec<Answer>, correct_position: usize) -> Self {
        self.answers.extend(distractors.into_iter().map(|mut d| {
            d.is_correct = false;
            d
        }));
        if !self.answers.is_empty() {
            let position = correct_position % self.answers.len();
            self.answers.rotate_right(position);
        }
        self
    }
}

/// Builds an unsaved quiz from generated facts, keeping their order.
pub fn quiz_from_responses(
    title: impl Into<String>,
    responses: impl IntoIterator<Item = GeminiResponse>,
) -> Quiz {
    let mut quiz = Quiz::new(title);
    quiz.questions = responses.into_iter().map(Question::from).collect();
    quiz
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_question;

    fn arithmetic() -> GeminiResponse {
        GeminiResponse {
            question: "2+2?".to_string(),
            answer: "4".to_string(),
            explanation: "basic arithmetic".to_string(),
        }
    }

    #[test]
    fn translates_a_fact_into_a_single_correct_answer() {
        let question = Question::from(arithmetic());
        assert_eq!(
            question,
            Question {
                question: "2+2?".to_string(),
                answers: vec![Answer {
                    text: "4".to_string(),
                    is_correct: true,
                    explanation: "basic arithmetic".to_string(),
                }],
                hint: String::new(),
            }
        );
        assert!(validate_question(0, &question).is_ok());
    }

    #[test]
    fn distractors_are_forced_incorrect_and_rotated() {
        let question = Question::from(arithmetic()).with_distractors(
            vec![Answer::correct("3", "off by one"), Answer::incorrect("5", "off by one")],
            1,
        );

        let texts: Vec<_> = question.answers.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, ["5", "4", "3"]);
        assert_eq!(question.answers.iter().filter(|a| a.is_correct).count(), 1);
        assert_eq!(question.correct_answer().map(|a| a.text.as_str()), Some("4"));
    }

    #[test]
    fn correct_position_wraps_around() {
        let question = Question::from(arithmetic())
            .with_distractors(vec![Answer::incorrect("5", "")], 4);
        assert_eq!(question.answers[0].text, "4");
    }

    #[test]
    fn builds_quiz_in_response_order() {
        let second = GeminiResponse {
            question: "3+3?".to_string(),
            answer: "6".to_string(),
            explanation: String::new(),
        };
        let quiz = quiz_from_responses("Sums", vec![arithmetic(), second]);

        assert_eq!(quiz.title, "Sums");
        assert!(quiz.id.is_none());
        let prompts: Vec<_> = quiz.questions.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(prompts, ["2+2?", "3+3?"]);
        assert!(quiz.validate().is_ok());
    }
}
