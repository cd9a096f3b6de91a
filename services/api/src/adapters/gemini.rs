//! services/api/src/adapters/gemini.rs
//!
//! This module contains the adapter for the fact-generating LLM.
//! It implements the `QuizGenerationService` port from the `core` crate by calling
//! Gemini through its OpenAI-compatible chat completions endpoint.

const FACTS_INSTRUCTIONS: &str = r#"You write quiz material.

Given a TOPIC and a COUNT, produce exactly COUNT distinct facts about the topic.
Each fact is a short question, its single correct answer, and a one or two sentence
explanation of why the answer is correct.

Respond with ONLY a JSON array, no prose and no Markdown, in this exact shape:
[{"question": "...", "answer": "...", "explanation": "..."}]"#;

const DISTRACTOR_INSTRUCTIONS: &str = r#"You write wrong answers for multiple-choice quizzes.

Given a QUESTION, its CORRECT ANSWER and a COUNT, produce exactly COUNT plausible but
incorrect answers. Each must be clearly wrong to someone who knows the material and
must not be a rephrasing of the correct answer.

Respond with ONLY a JSON array, no prose and no Markdown, in this exact shape:
[{"text": "...", "explanation": "why this answer is wrong"}]"#;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

use std::sync::OnceLock;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use quizzy_core::domain::{Answer, GeminiResponse};
use quizzy_core::ports::{PortError, PortResult, QuizGenerationService};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `QuizGenerationService` using Gemini.
#[derive(Clone)]
pub struct GeminiQuizAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl GeminiQuizAdapter {
    /// Creates a new `GeminiQuizAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Builds a client pointed at Gemini's OpenAI-compatible endpoint.
    pub fn client(api_key: &str, api_base: &str) -> Client<OpenAIConfig> {
        let config = OpenAIConfig::new()
            .with_api_base(api_base)
            .with_api_key(api_key);
        Client::with_config(config)
    }

    /// Sends one system/user exchange and returns the text of the first choice.
    async fn complete(&self, instructions: &str, user_input: String) -> PortResult<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(instructions)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_input)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::MalformedResponse("Gemini returned no text content.".to_string())
            })
    }
}

//=========================================================================================
// Response Parsing
//=========================================================================================

/// Strips a surrounding Markdown code fence (```json ... ```) if the model added one.
fn strip_code_fence(raw: &str) -> &str {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*\n(.*?)\n?\s*```\s*$").expect("fence pattern is valid")
    });
    match fence.captures(raw).and_then(|c| c.get(1)) {
        Some(body) => body.as_str(),
        None => raw.trim(),
    }
}

/// Parses the model's fact list, dropping entries with a blank question or
/// answer. A blank explanation is kept.
pub fn parse_facts(raw: &str) -> PortResult<Vec<GeminiResponse>> {
    let facts: Vec<GeminiResponse> = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| PortError::MalformedResponse(format!("expected a JSON array of facts: {}", e)))?;

    let total = facts.len();
    let usable: Vec<GeminiResponse> = facts
        .into_iter()
        .filter(|f| !f.question.trim().is_empty() && !f.answer.trim().is_empty())
        .collect();

    if usable.len() < total {
        warn!("Dropped {} incomplete facts from Gemini response", total - usable.len());
    }
    if usable.is_empty() {
        return Err(PortError::MalformedResponse(
            "response contained no usable facts".to_string(),
        ));
    }
    Ok(usable)
}

/// A distractor may come back as a bare string or as `{text, explanation}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDistractor {
    Text(String),
    Detailed {
        text: String,
        #[serde(default)]
        explanation: String,
    },
}

/// Parses the model's distractor list into incorrect answers, never repeating
/// the correct answer.
pub fn parse_distractors(raw: &str, correct_answer: &str) -> PortResult<Vec<Answer>> {
    let distractors: Vec<RawDistractor> = serde_json::from_str(strip_code_fence(raw)).map_err(|e| {
        PortError::MalformedResponse(format!("expected a JSON array of distractors: {}", e))
    })?;

    Ok(distractors
        .into_iter()
        .map(|d| match d {
            RawDistractor::Text(text) => Answer::incorrect(text, ""),
            RawDistractor::Detailed { text, explanation } => Answer::incorrect(text, explanation),
        })
        .filter(|a| {
            let text = a.text.trim();
            !text.is_empty() && !text.eq_ignore_ascii_case(correct_answer.trim())
        })
        .collect())
}

//=========================================================================================
// `QuizGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl QuizGenerationService for GeminiQuizAdapter {
    async fn generate_facts(&self, topic: &str, count: usize) -> PortResult<Vec<GeminiResponse>> {
        debug!("Requesting {} facts about '{}'", count, topic);
        let raw = self
            .complete(FACTS_INSTRUCTIONS, format!("TOPIC: {}\nCOUNT: {}", topic, count))
            .await?;

        let mut facts = parse_facts(&raw)?;
        facts.truncate(count);
        Ok(facts)
    }

    async fn generate_distractors(
        &self,
        fact: &GeminiResponse,
        count: usize,
    ) -> PortResult<Vec<Answer>> {
        let raw = self
            .complete(
                DISTRACTOR_INSTRUCTIONS,
                format!(
                    "QUESTION: {}\nCORRECT ANSWER: {}\nCOUNT: {}",
                    fact.question, fact.answer, count
                ),
            )
            .await?;

        let mut distractors = parse_distractors(&raw, &fact.answer)?;
        distractors.truncate(count);
        Ok(distractors)
    }
}
