pub mod db;
pub mod gemini;

pub use db::SqliteQuizAdapter;
pub use gemini::GeminiQuizAdapter;
