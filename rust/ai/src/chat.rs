//! Chat-completion client for OpenAI-compatible endpoints.
//!
//! Each request runs on a private current-thread runtime under a timeout, so
//! the engine sees a plain blocking call that always returns.
//!
//! The client speaks plain HTTP only. Hosted services that require TLS need
//! a local proxy in front of them; an `https://` endpoint is refused when the
//! provider is built.

use std::sync::Arc;
use std::time::Duration;

use hyper::client::HttpConnector;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE};
use hyper::{Body, Client, Method, Request, Uri};
use serde::{Deserialize, Serialize};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, warn};

use tablemind_engine::decision::{ActionContext, DecisionProvider, ProviderError, ReflectContext};

use crate::prompt::PromptTemplates;

/// Local Ollama server.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    /// Base URL; `/chat/completions` is appended
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct ChatProvider {
    model: String,
    templates: Arc<PromptTemplates>,
    settings: ChatSettings,
    client: Client<HttpConnector>,
    runtime: Runtime,
}

impl ChatProvider {
    pub fn new(
        model: impl Into<String>,
        templates: Arc<PromptTemplates>,
        settings: ChatSettings,
    ) -> Result<Self, ProviderError> {
        if settings.endpoint.trim_start().to_ascii_lowercase().starts_with("https://") {
            return Err(ProviderError::Transport(format!(
                "https endpoints are not supported, use plain http: {}",
                settings.endpoint
            )));
        }
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ProviderError::Transport(format!("runtime: {}", e)))?;
        Ok(Self {
            model: model.into(),
            templates,
            settings,
            client: Client::new(),
            runtime,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one user message and returns the reply content (empty when the
    /// service sent none).
    pub fn chat(&self, prompt: &str) -> Result<String, ProviderError> {
        let timeout = self.settings.timeout;
        let result = self
            .runtime
            .block_on(async { tokio::time::timeout(timeout, self.post(prompt)).await });
        match result {
            Ok(reply) => reply,
            Err(_) => Err(ProviderError::Timeout(timeout)),
        }
    }

    async fn post(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!(
            "{}/chat/completions",
            self.settings.endpoint.trim_end_matches('/')
        );
        let uri: Uri = url
            .parse()
            .map_err(|e| ProviderError::Transport(format!("bad endpoint {}: {}", url, e)))?;
        let body = serde_json::to_vec(&ChatRequest {
            model: &self.model,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        })
        .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json");
        if let Some(key) = &self.settings.api_key {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", key));
        }
        let request = builder
            .body(Body::from(body))
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        debug!(model = %self.model, %url, "chat request");
        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body())
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        if !status.is_success() {
            warn!(model = %self.model, status = status.as_u16(), "chat endpoint refused request");
            return Err(ProviderError::Status(status.as_u16()));
        }

        let parsed: ChatResponse =
            serde_json::from_slice(&bytes).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Malformed("reply has no choices".to_string()))?;
        let content = choice.message.content.unwrap_or_default();
        debug!(model = %self.model, reply = %content, "chat reply");
        Ok(content)
    }
}

impl DecisionProvider for ChatProvider {
    fn decide(&self, ctx: &ActionContext<'_>) -> Result<String, ProviderError> {
        self.chat(&self.templates.action_prompt(ctx))
    }

    fn reflect(&self, ctx: &ReflectContext<'_>) -> Result<String, ProviderError> {
        self.chat(&self.templates.reflect_prompt(ctx))
    }

    fn name(&self) -> &str {
        &self.model
    }
}
