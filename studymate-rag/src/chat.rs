//! OpenAI-compatible chat answerer, preset for Groq.
//!
//! This module is only available when the `openai` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::answer::{Answerer, build_prompt};
use crate::error::{RagError, Result};
use crate::openai::ErrorResponse;

/// Groq's OpenAI-compatible API base URL.
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// The default Groq chat model.
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// An [`Answerer`] backed by an OpenAI-compatible `/chat/completions` API.
///
/// The question and retrieved context are rendered with [`build_prompt`] and
/// sent as a single user message.
///
/// # Example
///
/// ```rust,ignore
/// use studymate_rag::chat::ChatCompletionAnswerer;
///
/// let answerer = ChatCompletionAnswerer::from_env()?;
/// let answer = answerer.answer("What color is the sky?", &["The sky is blue."]).await?;
/// ```
pub struct ChatCompletionAnswerer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl std::fmt::Debug for ChatCompletionAnswerer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionAnswerer")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl ChatCompletionAnswerer {
    /// Create an answerer for any OpenAI-compatible server.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::ConfigError("chat API key must not be empty".into()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            max_tokens: 300,
            temperature: 0.5,
        })
    }

    /// Groq with `llama-3.3-70b-versatile`.
    pub fn groq(api_key: impl Into<String>) -> Result<Self> {
        Self::new(api_key, GROQ_API_BASE, GROQ_DEFAULT_MODEL)
    }

    /// Groq, reading the key from the `GROQ_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY").map_err(|_| {
            RagError::ConfigError("GROQ_API_KEY environment variable not set".into())
        })?;
        Self::groq(api_key)
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Cap the length of generated answers.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    fn unavailable(message: String) -> RagError {
        RagError::AnswerUnavailable { provider: "ChatCompletion".into(), message }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl Answerer for ChatCompletionAnswerer {
    async fn answer(&self, question: &str, context: &[&str]) -> Result<String> {
        let prompt = build_prompt(question, context);
        debug!(model = %self.model, context_len = context.len(), "requesting answer");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request(&prompt))
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.model, error = %e, "chat request failed");
                Self::unavailable(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(model = %self.model, %status, "chat API error");
            return Err(Self::unavailable(format!("API returned {status}: {detail}")));
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            error!(model = %self.model, error = %e, "failed to parse chat response");
            Self::unavailable(format!("failed to parse response: {e}"))
        })?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Self::unavailable("API returned no answer".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groq_preset_matches_defaults() {
        let answerer = ChatCompletionAnswerer::groq("gsk-test").unwrap();
        assert_eq!(answerer.base_url, GROQ_API_BASE);
        assert_eq!(answerer.model, GROQ_DEFAULT_MODEL);
        assert_eq!(answerer.max_tokens, 300);
    }

    #[test]
    fn request_carries_prompt_as_single_user_message() {
        let answerer = ChatCompletionAnswerer::groq("gsk-test").unwrap().with_temperature(0.0);
        let json = serde_json::to_value(answerer.request("hello")).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert_eq!(json["temperature"], 0.0);
    }

    #[test]
    fn response_without_content_is_tolerated_by_decoder() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
