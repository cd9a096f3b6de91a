//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use quizzy_core::domain::Quiz;
use quizzy_core::ports::{QuizGenerationService, QuizRepository};
use quizzy_core::Context;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn QuizRepository>,
    pub config: Arc<Config>,
    /// `None` when no Gemini API key is configured.
    pub gemini: Option<Arc<dyn QuizGenerationService>>,
}

impl AppState {
    /// Bundles a quiz with borrowed handles to every configured collaborator.
    pub fn context(&self, quiz: Quiz) -> Context<'_> {
        let ctx = Context::new(quiz).with_db(self.db.as_ref());
        match self.gemini.as_deref() {
            Some(gemini) => ctx.with_gemini(gemini),
            None => ctx,
        }
    }
}
