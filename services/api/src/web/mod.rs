pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use rest::{
    create_quiz_handler, delete_quiz_handler, generate_quiz_handler, get_quiz_handler,
    list_quizzes_handler, submit_attempt_handler,
};
pub use state::AppState;

/// Builds the quiz routes. CORS, tracing and the Swagger UI are layered on by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/quizzes", get(list_quizzes_handler).post(create_quiz_handler))
        .route("/quizzes/generate", post(generate_quiz_handler))
        .route("/quizzes/{id}", get(get_quiz_handler).delete(delete_quiz_handler))
        .route("/quizzes/{id}/attempts", post(submit_attempt_handler))
        .with_state(app_state)
}
