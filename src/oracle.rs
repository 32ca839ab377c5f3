//! The text-completion backend behind recipe generation.
//!
//! Whether an oracle exists is decided once at startup and captured in an
//! [`OracleSlot`], which the assembler receives by injection. Tests swap in a
//! [`ScriptedOracle`].

use async_trait::async_trait;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::api_connection::connection::ApiConnectionError;
use crate::api_connection::endpoints::{
    ChatCompletionRequest, ChatMessage, Provider, ResponseFormat,
};
use crate::config::{GeneratorSettings, OracleBackend};

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Oracle timed out after {0:?}")]
    Timeout(Duration),

    #[error("Oracle request failed: {0}")]
    Request(#[from] ApiConnectionError),

    #[error("Oracle returned an empty response")]
    EmptyResponse,

    #[error("Scripted oracle failure: {0}")]
    Scripted(String),
}

/// Prompt in, text out. One instance is shared read-only by every request.
#[async_trait]
pub trait RecipeOracle: Send + Sync + fmt::Debug {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError>;

    /// Identifies the backend in logs.
    fn name(&self) -> &str;
}

/// Production oracle: one chat completion per prompt through OpenRouter.
#[derive(Debug, Clone)]
pub struct OpenRouterOracle {
    provider: Provider,
    model: String,
}

impl OpenRouterOracle {
    pub fn new(api_key_env_var: &str, model: impl Into<String>) -> Self {
        Self {
            provider: Provider::openrouter(api_key_env_var),
            model: model.into(),
        }
    }
}

#[async_trait]
impl RecipeOracle for OpenRouterOracle {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            response_format: Some(ResponseFormat::json_object()),
            temperature: Some(0.7),
            max_tokens: Some(1024),
        };

        let text = self.provider.complete_text(request).await?;
        if text.is_empty() {
            return Err(OracleError::EmptyResponse);
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Deterministic oracle. Replies are served from a queue, then from the default;
/// with neither, every call fails.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<Result<String, String>>>,
    default_reply: Option<String>,
    delay: Option<Duration>,
    calls: Mutex<usize>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answers with `reply`.
    pub fn always(reply: &str) -> Self {
        Self::new().with_default_reply(reply)
    }

    /// Fails every call.
    pub fn failing() -> Self {
        Self::new()
    }

    pub fn with_default_reply(mut self, reply: &str) -> Self {
        self.default_reply = Some(reply.to_string());
        self
    }

    pub fn with_reply(self, reply: &str) -> Self {
        self.lock_replies().push_back(Ok(reply.to_string()));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.lock_replies().push_back(Err(message.to_string()));
        self
    }

    /// Sleeps before answering, for exercising the caller's timeout.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, String>>> {
        self.replies.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RecipeOracle for ScriptedOracle {
    async fn complete(&self, _prompt: &str) -> Result<String, OracleError> {
        *self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.lock_replies().pop_front();
        match next {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(OracleError::Scripted(message)),
            None => self
                .default_reply
                .clone()
                .ok_or_else(|| OracleError::Scripted("no reply configured".to_string())),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// The oracle capability, detected once and then only read.
#[derive(Debug, Clone)]
pub enum OracleSlot {
    Available(Arc<dyn RecipeOracle>),
    Unavailable { reason: String },
}

impl OracleSlot {
    pub fn available(oracle: impl RecipeOracle + 'static) -> Self {
        OracleSlot::Available(Arc::new(oracle))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        OracleSlot::Unavailable { reason: reason.into() }
    }

    /// Startup detection. A disabled backend or a missing API key routes every
    /// later generation to the fallback synthesizer.
    pub fn detect(settings: &GeneratorSettings) -> Self {
        match settings.backend {
            OracleBackend::Disabled => {
                info!("Oracle disabled by configuration, using rule-based recipes only");
                Self::unavailable("disabled by configuration")
            }
            OracleBackend::OpenRouter => {
                let oracle =
                    OpenRouterOracle::new(&settings.api_key_env_var, settings.model.clone());
                if oracle.provider.has_api_key() {
                    info!(oracle = oracle.name(), "OpenRouter oracle configured");
                    Self::available(oracle)
                } else {
                    warn!(
                        "{} not set; falling back to rule-based recipes",
                        settings.api_key_env_var
                    );
                    Self::unavailable(format!("{} not set", settings.api_key_env_var))
                }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, OracleSlot::Available(_))
    }
}
