//! LLM gateway: a closed set of chat-completion backends behind one trait.
//!
//! The orchestrator never sees a gateway failure as an exception: errors
//! carry client-facing text and are forwarded as if they were the reply.
//! `GatewayError` keeps the two cases typed internally so a future revision
//! can distinguish them without breaking the event contract.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 150;
const ERROR_EXCERPT_CHARS: usize = 100;

/// Supported chat-completion backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Groq,
    Together,
    OpenRouter,
    Perplexity,
}

impl Provider {
    /// Parses a client-supplied provider name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "groq" => Some(Provider::Groq),
            "together" => Some(Provider::Together),
            "openrouter" => Some(Provider::OpenRouter),
            "perplexity" => Some(Provider::Perplexity),
            _ => None,
        }
    }

    fn endpoint(self) -> &'static str {
        match self {
            Provider::Groq => "https://api.groq.com/openai/v1/chat/completions",
            Provider::Together => "https://api.together.xyz/v1/chat/completions",
            Provider::OpenRouter => "https://openrouter.ai/api/v1/chat/completions",
            Provider::Perplexity => "https://api.perplexity.ai/chat/completions",
        }
    }

    fn model(self) -> &'static str {
        match self {
            Provider::Groq => "llama-3.1-8b-instant",
            Provider::Together => "meta-llama/Llama-3-8b-chat-hf",
            Provider::OpenRouter => "meta-llama/llama-3.1-8b-instruct:free",
            Provider::Perplexity => "llama-3.1-sonar-small-128k-online",
        }
    }

    /// Label used to prefix error text shown to the client.
    pub fn label(self) -> &'static str {
        match self {
            Provider::Groq => "Groq",
            Provider::Together => "Together",
            Provider::OpenRouter => "OpenRouter",
            Provider::Perplexity => "Perplexity",
        }
    }
}

/// Gateway failure classes. The `Display` text is exactly what the client
/// receives in place of a reply.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid provider. Choose: groq, together, openrouter, or perplexity")]
    InvalidProvider,
    #[error("{provider} Error {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("{provider} Error: {cause}")]
    Transport {
        provider: &'static str,
        cause: String,
    },
}

/// External collaborator that turns a prompt pair into reply text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn generate_reply(
        &self,
        credential: &str,
        user_prompt: &str,
        system_prompt: &str,
        provider_name: &str,
    ) -> Result<String, GatewayError>;
}

fn excerpt(text: &str) -> String {
    text.chars().take(ERROR_EXCERPT_CHARS).collect()
}

/// `LlmGateway` over plain REST chat-completion endpoints.
pub struct HttpLlmGateway {
    client: reqwest::Client,
}

impl HttpLlmGateway {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpLlmGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl LlmGateway for HttpLlmGateway {
    async fn generate_reply(
        &self,
        credential: &str,
        user_prompt: &str,
        system_prompt: &str,
        provider_name: &str,
    ) -> Result<String, GatewayError> {
        let provider = Provider::parse(provider_name).ok_or(GatewayError::InvalidProvider)?;
        debug!(provider = provider.label(), "sending chat completion request");

        let body = json!({
            "model": provider.model(),
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt }
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let mut request = self
            .client
            .post(provider.endpoint())
            .bearer_auth(credential)
            .timeout(REQUEST_TIMEOUT)
            .json(&body);
        if provider == Provider::OpenRouter {
            request = request
                .header("HTTP-Referer", "http://localhost:3000")
                .header("X-Title", "Voice AI Interviewer");
        }

        let response = request.send().await.map_err(|e| GatewayError::Transport {
            provider: provider.label(),
            cause: excerpt(&e.to_string()),
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| GatewayError::Transport {
            provider: provider.label(),
            cause: excerpt(&e.to_string()),
        })?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                provider: provider.label(),
                status: status.as_u16(),
                body: excerpt(&text),
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| GatewayError::Transport {
                provider: provider.label(),
                cause: excerpt(&e.to_string()),
            })?;
        let content = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or_default()
            .trim()
            .to_string();
        Ok(content)
    }
}
