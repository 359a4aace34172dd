//! LLM agent module for structured conversation suggestions.
//!
//! Talks to the Gemini `generateContent` endpoint directly over reqwest, with
//! the response constrained to the [`ConversationSuggestion`] JSON schema.

pub use crate::suggestion::ConversationSuggestion;

use crate::config::{AgentConfig, Config};
use crate::form::FormInputs;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("{0}")]
    RequestFailed(String),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("response contained no text")]
    EmptyResponse,
    #[error("failed to parse response: {0}")]
    ParseError(String),
    #[error("response is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("configuration error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        AgentError::RequestFailed(err.to_string())
    }
}

/// Anything that can turn the four form inputs into a suggestion.
#[async_trait]
pub trait SuggestionClient: Send + Sync {
    async fn get_conversation_starter(
        &self,
        inputs: &FormInputs,
    ) -> Result<ConversationSuggestion, AgentError>;
}

/// Gemini-backed suggestion client
#[derive(Clone)]
pub struct GeminiAgent {
    client: Client,
    api_key: String,
    settings: AgentConfig,
}

impl std::fmt::Debug for GeminiAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAgent")
            .field("endpoint", &self.settings.endpoint)
            .field("model", &self.settings.model)
            .finish_non_exhaustive()
    }
}

impl GeminiAgent {
    /// Build the client. Fails when no API key is configured, so the caller
    /// can stop before any UI is shown.
    pub fn new(config: &Config) -> Result<Self, AgentError> {
        let api_key = config.api_key()?.to_string();
        let client = Client::builder()
            .user_agent(concat!("loichao/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key,
            settings: config.agent.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model
        )
    }

    async fn generate(&self, prompt: &str) -> Result<String, AgentError> {
        let request = build_request(prompt, &self.settings);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "generation request rejected");
            let message = serde_json::from_str::<GeminiResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(AgentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| AgentError::ParseError(e.to_string()))?;
        response_text(parsed)
    }
}

#[async_trait]
impl SuggestionClient for GeminiAgent {
    async fn get_conversation_starter(
        &self,
        inputs: &FormInputs,
    ) -> Result<ConversationSuggestion, AgentError> {
        let prompt = build_prompt(inputs);
        info!(model = %self.settings.model, "sending generation request");
        let text = self.generate(&prompt).await?;
        let suggestion = parse_suggestion(&text)?;
        info!(model = %self.settings.model, "suggestion generated");
        Ok(suggestion)
    }
}

// Gemini API types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_json_schema: Value,
    temperature: f64,
    top_p: f64,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    code: u16,
    message: String,
}

/// Build the Vietnamese prompt embedding the four inputs verbatim
pub fn build_prompt(inputs: &FormInputs) -> String {
    format!(
        r#"Dựa trên các thông tin sau, hãy tạo ra một gợi ý bắt đầu cuộc trò chuyện:

1. **Thông tin về người nói:** {}
2. **Thông tin về đối tượng giao tiếp:** {}
3. **Bối cảnh cuộc trò chuyện:** {}
4. **Mục đích cuộc trò chuyện:** {}

Hãy cung cấp câu trả lời của bạn dưới dạng một đối tượng JSON tuân thủ theo schema đã được định nghĩa. Đảm bảo toàn bộ nội dung trong JSON đều bằng tiếng Việt."#,
        inputs.speaker_info, inputs.audience_info, inputs.context, inputs.goal
    )
}

fn build_request(prompt: &str, settings: &AgentConfig) -> GeminiRequest {
    GeminiRequest {
        contents: vec![GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: Some(prompt.to_string()),
            }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_json_schema: ConversationSuggestion::response_schema(),
            temperature: settings.temperature,
            top_p: settings.top_p,
        },
    }
}

/// Concatenate the text parts of the first candidate
fn response_text(response: GeminiResponse) -> Result<String, AgentError> {
    if let Some(error) = response.error {
        return Err(AgentError::Api {
            status: error.code,
            message: error.message,
        });
    }

    let text: String = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AgentError::EmptyResponse);
    }
    Ok(text)
}

/// Parse the model's text payload into a validated suggestion
pub fn parse_suggestion(text: &str) -> Result<ConversationSuggestion, AgentError> {
    let cleaned = strip_markdown_json(text);
    let value: Value =
        serde_json::from_str(&cleaned).map_err(|e| AgentError::ParseError(e.to_string()))?;
    ConversationSuggestion::from_value(&value).map_err(AgentError::MissingField)
}

/// Strip markdown code block wrappers from JSON response
fn strip_markdown_json(text: &str) -> String {
    let trimmed = text.trim();

    // Remove ```json ... ``` or ``` ... ```
    if let Some(rest) = trimmed.strip_prefix("```") {
        let without_prefix = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(end_idx) = without_prefix.rfind("```") {
            return without_prefix[..end_idx].trim().to_string();
        }
    }

    trimmed.to_string()
}
