use std::time::Duration;

use serde::{Deserialize, Serialize};
use vigil_core::{GateError, LlmConfig};

/// API version pinned for the hosted chat-completions endpoint.
const API_VERSION: &str = "2024-08-01-preview";

/// Deterministic-leaning sampling temperature for review calls.
const TEMPERATURE: f64 = 0.3;

/// Output token budget per review call.
const MAX_TOKENS: u32 = 2000;

/// A message in a chat conversation with the LLM.
///
/// # Examples
///
/// ```
/// use vigil_review::llm::{ChatMessage, Role};
///
/// let msg = ChatMessage {
///     role: Role::User,
///     content: "Review this code".into(),
/// };
/// assert!(matches!(msg.role, Role::User));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: Role,
    /// Text content of the message.
    pub content: String,
}

/// Role in the chat conversation.
///
/// # Examples
///
/// ```
/// use vigil_review::llm::Role;
///
/// let role = Role::System;
/// assert_eq!(serde_json::to_string(&role).unwrap(), "\"system\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-level instructions.
    System,
    /// User input.
    User,
    /// Assistant response.
    Assistant,
}

/// Chat-completions client for an Azure-style hosted deployment.
///
/// Requests go to
/// `{endpoint}/openai/deployments/{deployment}/chat/completions` with the
/// `api-key` header; the deployment identifier selects the model.
///
/// # Examples
///
/// ```
/// use vigil_core::LlmConfig;
/// use vigil_review::llm::LlmClient;
///
/// let config = LlmConfig {
///     endpoint: "https://unit.openai.azure.com".into(),
///     api_key: "secret".into(),
///     deployment: "gpt-4o-mini".into(),
/// };
/// let client = LlmClient::new(&config).unwrap();
/// assert_eq!(client.deployment(), "gpt-4o-mini");
/// ```
pub struct LlmClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new LLM client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Llm`] if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self, GateError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| GateError::Llm(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Return the deployment identifier from the configuration.
    pub fn deployment(&self) -> &str {
        &self.config.deployment
    }

    /// Send a chat completion request and return the text response.
    ///
    /// Uses temperature 0.3 and a bounded output budget so verdicts stay
    /// close to deterministic across runs.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Llm`] on HTTP errors or response parsing failures.
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, GateError> {
        let endpoint = self.config.endpoint.trim_end_matches('/');
        let url = format!(
            "{endpoint}/openai/deployments/{}/chat/completions?api-version={API_VERSION}",
            self.config.deployment
        );

        let body = serde_json::json!({
            "messages": messages,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GateError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(GateError::Llm(format!(
                "LLM API error {status}: {body_text}"
            )));
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GateError::Llm(format!("failed to parse response: {e}")))?;

        let content = response_body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                GateError::Llm(format!("unexpected response structure: {response_body}"))
            })?;

        Ok(content.to_string())
    }
}
