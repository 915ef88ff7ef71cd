use crate::config::Config;
use crate::events::ChatMessage;
use serde::Serialize;

/// Errors raised by a completion request
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Endpoint URL is not configured. Set `endpoint_url` in the config or CHATRELAY_ENDPOINT_URL.")]
    Configuration,

    #[error("Worker error {status}: {body}")]
    Transport { status: u16, body: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result of a completion request that reached the endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The assistant's reply text
    Reply(String),
    /// The endpoint answered but carried no extractable content
    NoReply,
}

/// Anything that can turn a conversation into the next assistant message.
pub trait CompletionTransport {
    fn complete(
        &self,
        messages: &[ChatMessage],
    ) -> impl std::future::Future<Output = Result<Completion, ChatError>>;
}

/// Outbound payload
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    messages: &'a [ChatMessage],
}

/// HTTP client for the completion worker
#[derive(Clone)]
pub struct LlmClient {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl LlmClient {
    pub fn new(endpoint: Option<String>) -> Self {
        // No request timeout: a turn waits for as long as the worker takes.
        let client = reqwest::Client::builder()
            .user_agent(concat!("chatrelay/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        let endpoint = endpoint
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Self { endpoint, client }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.endpoint().map(str::to_string))
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Pull `choices[0].message.content` out of a response body
    fn extract_reply(body: &str) -> Result<Completion, ChatError> {
        let value: serde_json::Value = serde_json::from_str(body)?;

        // Only the first choice matters; any other shape is a missing reply.
        let content = value
            .pointer("/choices/0/message/content")
            .and_then(serde_json::Value::as_str)
            .filter(|content| !content.is_empty());

        Ok(match content {
            Some(text) => Completion::Reply(text.to_string()),
            None => {
                tracing::debug!("response carried no choices[0].message.content");
                Completion::NoReply
            }
        })
    }
}

impl CompletionTransport for LlmClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, ChatError> {
        let url = self.endpoint.as_deref().ok_or(ChatError::Configuration)?;

        tracing::debug!(url, messages = messages.len(), "sending completion request");

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&CompletionRequest { messages })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ChatError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        Self::extract_reply(&body)
    }
}
