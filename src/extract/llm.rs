//! Language model client
//!
//! The extractor only needs "prompt in, completion text out". The default
//! implementation talks to an OpenAI-compatible chat-completions endpoint
//! over a blocking `ureq` agent.

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::config::LlmSettings;
use crate::error::{ManhoursError, ManhoursResult};

/// Produces a completion for a prompt
pub trait LanguageModel {
    fn complete(&self, prompt: &str) -> ManhoursResult<String>;
}

/// Chat-completions client
pub struct OpenAiClient {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    /// Build a client from settings. Fails when the API key is not set.
    pub fn from_settings(settings: &LlmSettings) -> ManhoursResult<Self> {
        let api_key = settings.api_key().ok_or_else(|| {
            ManhoursError::Config(format!(
                "No language model API key configured (set {})",
                settings.api_key_env
            ))
        })?;

        let timeout = Duration::from_secs(settings.timeout_secs.max(1));
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .user_agent(concat!("manhours-cli/", env!("CARGO_PKG_VERSION")))
            .build();

        Ok(Self {
            agent,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            api_key,
            temperature: settings.temperature,
        })
    }

    fn payload(&self, prompt: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.temperature,
        })
    }
}

impl LanguageModel for OpenAiClient {
    fn complete(&self, prompt: &str) -> ManhoursResult<String> {
        tracing::info!(model = %self.model, "requesting table extraction");

        let response = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Accept", "application/json")
            .send_json(self.payload(prompt))
            .map_err(llm_error)?;

        let body: ChatResponse = response
            .into_json()
            .map_err(|e| ManhoursError::Llm(format!("Unreadable response: {}", e)))?;

        Ok(first_content(body))
    }
}

// A missing completion is treated as an empty table.
fn first_content(body: ChatResponse) -> String {
    body.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "[]".to_string())
}

fn llm_error(err: ureq::Error) -> ManhoursError {
    match err {
        ureq::Error::Status(status, response) => {
            let detail = response.into_string().unwrap_or_default();
            tracing::warn!(status, "language model request rejected");
            ManhoursError::Llm(format!("HTTP {}: {}", status, detail.trim()))
        }
        ureq::Error::Transport(transport) => ManhoursError::Llm(transport.to_string()),
    }
}
