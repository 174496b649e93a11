pub mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::topics::{self, DEFAULT_TOPIC, TOPIC_CATEGORIES};
use gemini::GeminiGenerator;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Network Error: {0}")]
    Network(String),
    #[error("AI API Error: {0}")]
    Api(String),
    #[error("Empty response from AI model")]
    Empty,
    #[error("Invalid response format from AI model")]
    Format,
    #[error("Missing required fields in AI response")]
    MissingField,
}

/// The structured answer the upstream contract promises: a required
/// explanation and topic plus optional supporting sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredExplanation {
    pub definition: Option<String>,
    pub explanation: String,
    pub code_example: Option<String>,
    pub summary: Option<String>,
    pub topic: String,
}

/// One question in, one validated structured explanation out. Nothing is
/// persisted here; that is the caller's job.
#[async_trait]
pub trait ExplanationGenerator: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, question: &str) -> Result<StructuredExplanation, GenerationError>;
}

pub struct GeneratorFactory;

impl GeneratorFactory {
    pub fn create_default(config: &AppConfig) -> Option<Arc<dyn ExplanationGenerator>> {
        match config.ai.provider.as_str() {
            "gemini" => {
                let cfg = config.ai.gemini.as_ref()?;
                Some(Arc::new(GeminiGenerator::new(
                    cfg.api_key.clone(),
                    cfg.api_base.clone(),
                    cfg.model.clone(),
                )))
            }
            _ => None,
        }
    }
}

/// Fixed instructional prompt sent with every generation request.
pub fn system_prompt() -> String {
    format!(
        r#"You are an expert educational AI tutor. Your goal is to provide clear, structured explanations that help students learn.

When answering questions, provide a response in the following JSON format:
{{
  "definition": "A concise definition if applicable (optional)",
  "explanation": "A detailed step-by-step explanation with clear reasoning. Use numbered lists or bullet points where helpful.",
  "codeExample": "A practical code example if relevant (optional). Include comments to explain the code.",
  "summary": "2-3 key takeaways or summary points (optional)",
  "topic": "The most relevant category from: {}"
}}

Guidelines:
- Keep explanations clear and educational
- Use simple language but maintain technical accuracy
- Include practical examples where relevant
- Break down complex concepts into digestible parts
- For code examples, use proper syntax and include helpful comments
- Choose the most specific topic category that fits the question
- If no category fits perfectly, use "{}""#,
        TOPIC_CATEGORIES.join(", "),
        DEFAULT_TOPIC
    )
}

/// Validates a raw model payload against the response contract. A topic
/// outside the taxonomy is coerced to the default category instead of
/// failing; missing or blank required fields are an error.
pub fn parse_structured(raw: &str) -> Result<StructuredExplanation, GenerationError> {
    if raw.trim().is_empty() {
        return Err(GenerationError::Empty);
    }

    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|_| GenerationError::Format)?;
    let object = value.as_object().ok_or(GenerationError::Format)?;

    let explanation = object
        .get("explanation")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let topic = object.get("topic").and_then(|v| v.as_str()).unwrap_or("");

    if explanation.trim().is_empty() || topic.trim().is_empty() {
        return Err(GenerationError::MissingField);
    }

    let optional = |name: &str| {
        object
            .get(name)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    };

    Ok(StructuredExplanation {
        definition: optional("definition"),
        explanation: explanation.to_string(),
        code_example: optional("codeExample"),
        summary: optional("summary"),
        topic: topics::normalize(topic).to_string(),
    })
}
