//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use quizzy_core::domain::{Answer, Question, Quiz};
use quizzy_core::ports::PortError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::{OpenApi, ToSchema};

/// Upper bound on questions generated by a single request.
pub const MAX_GENERATED_QUESTIONS: usize = 50;
/// Upper bound on distractors requested per generated question.
pub const MAX_DISTRACTORS: usize = 5;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_quizzes_handler,
        create_quiz_handler,
        get_quiz_handler,
        delete_quiz_handler,
        generate_quiz_handler,
        submit_attempt_handler,
    ),
    components(
        schemas(Quiz, Question, Answer, GenerateQuizRequest, AttemptRequest, AttemptResponse)
    ),
    tags(
        (name = "Quizzy API", description = "Store, generate and take quizzes.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Asks the generative service for a new quiz about a topic.
#[derive(Deserialize, ToSchema)]
pub struct GenerateQuizRequest {
    /// Falls back to the topic when blank.
    #[serde(default)]
    pub title: String,
    pub topic: String,
    pub count: usize,
    /// Wrong answers to add to each question.
    #[serde(default)]
    pub distractors: usize,
}

/// One entry per question: the chosen answer's index, or `null` if skipped.
#[derive(Deserialize, ToSchema)]
pub struct AttemptRequest {
    pub selections: Vec<Option<usize>>,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResponse {
    pub correct: usize,
    pub total: usize,
    pub success_percentage: f64,
    pub passed: bool,
}

type HandlerError = (StatusCode, String);

/// Maps a port failure onto the HTTP status the client should see.
pub fn port_error_response(e: PortError) -> HandlerError {
    match e {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::Invalid(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        PortError::Score(err) => (StatusCode::BAD_REQUEST, err.to_string()),
        PortError::MalformedResponse(msg) => {
            warn!("Generative service returned an unusable response: {}", msg);
            (StatusCode::BAD_GATEWAY, msg)
        }
        PortError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        PortError::Unexpected(msg) => {
            error!("Unexpected port error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            )
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List every stored quiz, newest first.
#[utoipa::path(
    get,
    path = "/quizzes",
    responses(
        (status = 200, description = "Stored quizzes", body = [Quiz]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_quizzes_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Quiz>>, HandlerError> {
    let quizzes = app_state.db.list_quizzes().await.map_err(port_error_response)?;
    Ok(Json(quizzes))
}

/// Store a new quiz.
///
/// The quiz must have a title and at least one question, and every question
/// must have exactly one correct answer.
#[utoipa::path(
    post,
    path = "/quizzes",
    request_body = Quiz,
    responses(
        (status = 201, description = "Quiz stored", body = Quiz),
        (status = 422, description = "The quiz violates an invariant"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_quiz_handler(
    State(app_state): State<Arc<AppState>>,
    Json(quiz): Json<Quiz>,
) -> Result<(StatusCode, Json<Quiz>), HandlerError> {
    let mut ctx = app_state.context(quiz);
    ctx.save().await.map_err(port_error_response)?;
    let quiz = ctx.into_quiz();

    info!("Created quiz {:?} '{}'", quiz.id, quiz.title);
    Ok((StatusCode::CREATED, Json(quiz)))
}

#[utoipa::path(
    get,
    path = "/quizzes/{id}",
    params(("id" = i64, Path, description = "The quiz id.")),
    responses(
        (status = 200, description = "The quiz", body = Quiz),
        (status = 404, description = "No quiz with this id")
    )
)]
pub async fn get_quiz_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Quiz>, HandlerError> {
    let quiz = app_state.db.get_quiz(id).await.map_err(port_error_response)?;
    Ok(Json(quiz))
}

#[utoipa::path(
    delete,
    path = "/quizzes/{id}",
    params(("id" = i64, Path, description = "The quiz id.")),
    responses(
        (status = 204, description = "Quiz deleted"),
        (status = 404, description = "No quiz with this id")
    )
)]
pub async fn delete_quiz_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, HandlerError> {
    app_state.db.delete_quiz(id).await.map_err(port_error_response)?;
    info!("Deleted quiz {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Generate and store a quiz about a topic.
#[utoipa::path(
    post,
    path = "/quizzes/generate",
    request_body = GenerateQuizRequest,
    responses(
        (status = 201, description = "Quiz generated and stored", body = Quiz),
        (status = 400, description = "Bad request (e.g., empty topic or count out of range)"),
        (status = 502, description = "The generative service returned an unusable response"),
        (status = 503, description = "No generative service is configured")
    )
)]
pub async fn generate_quiz_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<GenerateQuizRequest>,
) -> Result<(StatusCode, Json<Quiz>), HandlerError> {
    let topic = req.topic.trim();
    if topic.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "topic must not be empty".to_string()));
    }
    if req.count == 0 || req.count > MAX_GENERATED_QUESTIONS {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("count must be between 1 and {}", MAX_GENERATED_QUESTIONS),
        ));
    }
    if req.distractors > MAX_DISTRACTORS {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("distractors must be at most {}", MAX_DISTRACTORS),
        ));
    }

    let title = match req.title.trim() {
        "" => topic.to_string(),
        title => title.to_string(),
    };

    let mut ctx = app_state.context(Quiz::new(title));
    let added = ctx
        .extend_from_topic(topic, req.count, req.distractors)
        .await
        .map_err(port_error_response)?;
    ctx.save().await.map_err(port_error_response)?;
    let quiz = ctx.into_quiz();

    info!("Generated quiz {:?} with {} questions about '{}'", quiz.id, added, topic);
    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Grade an attempt and record its success percentage on the quiz.
#[utoipa::path(
    post,
    path = "/quizzes/{id}/attempts",
    params(("id" = i64, Path, description = "The quiz id.")),
    request_body = AttemptRequest,
    responses(
        (status = 200, description = "The graded attempt", body = AttemptResponse),
        (status = 400, description = "Selections do not match the quiz"),
        (status = 404, description = "No quiz with this id")
    )
)]
pub async fn submit_attempt_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<AttemptRequest>,
) -> Result<Json<AttemptResponse>, HandlerError> {
    let quiz = app_state.db.get_quiz(id).await.map_err(port_error_response)?;

    let mut ctx = app_state.context(quiz);
    let score = ctx
        .record_score(&req.selections)
        .await
        .map_err(port_error_response)?;

    let success_percentage = score.percentage();
    Ok(Json(AttemptResponse {
        correct: score.correct,
        total: score.total,
        success_percentage,
        passed: score.passed(app_state.config.passing_percentage),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::SqliteQuizAdapter;
    use crate::config::Config;
    use async_trait::async_trait;
    use quizzy_core::domain::GeminiResponse;
    use quizzy_core::ports::{PortResult, QuizGenerationService};
    use sqlx::sqlite::SqlitePoolOptions;

    struct CannedGenerator {
        raw: &'static str,
    }

    #[async_trait]
    impl QuizGenerationService for CannedGenerator {
        async fn generate_facts(&self, _topic: &str, count: usize) -> PortResult<Vec<GeminiResponse>> {
            let mut facts = crate::adapters::gemini::parse_facts(self.raw)?;
            facts.truncate(count);
            Ok(facts)
        }

        async fn generate_distractors(
            &self,
            fact: &GeminiResponse,
            count: usize,
        ) -> PortResult<Vec<Answer>> {
            Ok((0..count)
                .map(|n| Answer::incorrect(format!("{}{}", fact.answer, n + 1), ""))
                .collect())
        }
    }

    const FACTS: &str = r#"[
        {"question": "2+2?", "answer": "4", "explanation": "basic arithmetic"},
        {"question": "3*3?", "answer": "9", "explanation": "multiplication"}
    ]"#;

    async fn state(gemini: Option<CannedGenerator>) -> Arc<AppState> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let db = SqliteQuizAdapter::new(pool);
        db.run_migrations().await.unwrap();

        let config = Config::from_lookup(|_| None).unwrap();
        Arc::new(AppState {
            db: Arc::new(db),
            config: Arc::new(config),
            gemini: gemini.map(|g| Arc::new(g) as Arc<dyn QuizGenerationService>),
        })
    }

    fn capitals() -> Quiz {
        let mut quiz = Quiz::new("Capitals");
        quiz.questions.push(Question {
            question: "Capital of France?".to_string(),
            answers: vec![Answer::incorrect("Lyon", ""), Answer::correct("Paris", "")],
            hint: String::new(),
        });
        quiz.questions.push(Question {
            question: "Capital of Peru?".to_string(),
            answers: vec![Answer::correct("Lima", ""), Answer::incorrect("Cusco", "")],
            hint: "On the coast".to_string(),
        });
        quiz
    }

    #[tokio::test]
    async fn create_then_fetch_quiz() {
        let state = state(None).await;

        let (status, Json(created)) = create_quiz_handler(State(state.clone()), Json(capitals()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let id = created.id.unwrap();

        let Json(fetched) = get_quiz_handler(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(fetched, created);

        let Json(all) = list_quizzes_handler(State(state)).await.unwrap();
        assert_eq!(all, vec![created]);
    }

    #[tokio::test]
    async fn invalid_quiz_is_unprocessable() {
        let state = state(None).await;
        let mut quiz = capitals();
        quiz.questions[0].answers[0].is_correct = true;

        let (status, message) = create_quiz_handler(State(state.clone()), Json(quiz))
            .await
            .unwrap_err();

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(message.contains("question 0"));
        let Json(all) = list_quizzes_handler(State(state)).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn delete_then_fetch_is_not_found() {
        let state = state(None).await;
        let (_, Json(created)) = create_quiz_handler(State(state.clone()), Json(capitals()))
            .await
            .unwrap();
        let id = created.id.unwrap();

        let status = delete_quiz_handler(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = get_quiz_handler(State(state.clone()), Path(id)).await.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = delete_quiz_handler(State(state), Path(id)).await.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn generates_quiz_with_distractors() {
        let state = state(Some(CannedGenerator { raw: FACTS })).await;
        let req = GenerateQuizRequest {
            title: String::new(),
            topic: "arithmetic".to_string(),
            count: 2,
            distractors: 2,
        };

        let (status, Json(quiz)) = generate_quiz_handler(State(state), Json(req)).await.unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(quiz.title, "arithmetic");
        assert!(quiz.id.is_some());
        assert_eq!(quiz.questions.len(), 2);
        for question in &quiz.questions {
            assert_eq!(question.answers.len(), 3);
            assert_eq!(question.answers.iter().filter(|a| a.is_correct).count(), 1);
        }
        assert_eq!(quiz.questions[0].correct_answer().unwrap().explanation, "basic arithmetic");
    }

    #[tokio::test]
    async fn generation_without_gemini_is_unavailable() {
        let state = state(None).await;
        let req = GenerateQuizRequest {
            title: "Sums".to_string(),
            topic: "arithmetic".to_string(),
            count: 1,
            distractors: 0,
        };

        let (status, _) = generate_quiz_handler(State(state), Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn malformed_generation_is_bad_gateway() {
        let state = state(Some(CannedGenerator { raw: "I cannot help with that." })).await;
        let req = GenerateQuizRequest {
            title: String::new(),
            topic: "arithmetic".to_string(),
            count: 1,
            distractors: 0,
        };

        let (status, _) = generate_quiz_handler(State(state), Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn generation_rejects_bad_requests() {
        let state = state(Some(CannedGenerator { raw: FACTS })).await;
        for (topic, count, distractors) in [("", 1, 0), ("math", 0, 0), ("math", 51, 0), ("math", 1, 6)] {
            let req = GenerateQuizRequest {
                title: String::new(),
                topic: topic.to_string(),
                count,
                distractors,
            };
            let (status, _) = generate_quiz_handler(State(state.clone()), Json(req))
                .await
                .unwrap_err();
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn attempt_is_graded_and_recorded() {
        let state = state(None).await;
        let (_, Json(created)) = create_quiz_handler(State(state.clone()), Json(capitals()))
            .await
            .unwrap();
        let id = created.id.unwrap();

        let Json(result) = submit_attempt_handler(
            State(state.clone()),
            Path(id),
            Json(AttemptRequest { selections: vec![Some(1), Some(1)] }),
        )
        .await
        .unwrap();

        assert_eq!(result.correct, 1);
        assert_eq!(result.total, 2);
        assert_eq!(result.success_percentage, 50.0);
        assert!(result.passed);

        let Json(stored) = get_quiz_handler(State(state), Path(id)).await.unwrap();
        assert_eq!(stored.success_percentage, Some(50.0));
    }

    #[tokio::test]
    async fn mismatched_attempt_is_bad_request() {
        let state = state(None).await;
        let (_, Json(created)) = create_quiz_handler(State(state.clone()), Json(capitals()))
            .await
            .unwrap();

        let (status, _) = submit_attempt_handler(
            State(state),
            Path(created.id.unwrap()),
            Json(AttemptRequest { selections: vec![Some(0)] }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn attempt_response_uses_camel_case() {
        let json = serde_json::to_value(AttemptResponse {
            correct: 3,
            total: 4,
            success_percentage: 75.0,
            passed: true,
        })
        .unwrap();
        assert_eq!(json["successPercentage"], 75.0);
    }
}
