use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use crate::ai::{self, ExplanationGenerator, GenerationError, StructuredExplanation};
use crate::topics::TOPIC_CATEGORIES;

pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiGenerator {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            model,
        }
    }
}

#[async_trait]
impl ExplanationGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, question: &str) -> Result<StructuredExplanation, GenerationError> {
        info!("Generating explanation for question: {}", question);

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        // The response is constrained to the explanation schema so the
        // model answers with machine-readable JSON rather than prose.
        let body = json!({
            "systemInstruction": {
                "parts": [{ "text": ai::system_prompt() }]
            },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "object",
                    "properties": {
                        "definition": { "type": "string" },
                        "explanation": { "type": "string" },
                        "codeExample": { "type": "string" },
                        "summary": { "type": "string" },
                        "topic": { "type": "string", "enum": TOPIC_CATEGORIES }
                    },
                    "required": ["explanation", "topic"]
                }
            },
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": question }]
                }
            ]
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api(format!(
                "Gemini Error {}: {}",
                status, text
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let raw = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or("");

        debug!("Gemini response text: {}", raw);

        ai::parse_structured(raw)
    }
}
