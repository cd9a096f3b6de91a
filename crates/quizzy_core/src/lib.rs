pub mod context;
pub mod domain;
pub mod ports;
pub mod score;
pub mod translate;
pub mod validate;

pub use context::Context;
pub use domain::{Answer, GeminiResponse, Question, Quiz};
pub use ports::{PortError, PortResult, QuizGenerationService, QuizRepository};
pub use score::{grade, Score, ScoreError};
pub use translate::quiz_from_responses;
pub use validate::{validate_quiz, validate_success_percentage, ValidationError};
