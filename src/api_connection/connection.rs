use dotenv::dotenv;
use reqwest::Client;
use serde_json::json;
use std::env;
use thiserror::Error;
use tracing::debug;

use super::endpoints::{
    ChatCompletionRequest, ChatCompletionResponse, Provider, OPENROUTER_CHAT_URL,
};

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("API error {status}: {error_body}")]
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },

    #[error("API returned no choices")]
    NoChoices,
}

impl Provider {
    pub fn openrouter(api_key_env_var_name: &str) -> Self {
        dotenv().ok();
        Self::OpenRouter {
            api_key: api_key_env_var_name.to_string(),
            client: Client::new(),
        }
    }

    /// True when the key variable is set, without making a request.
    pub fn has_api_key(&self) -> bool {
        match self {
            Provider::OpenRouter { api_key, .. } => env::var(api_key)
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false),
        }
    }

    pub async fn call_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiConnectionError> {
        match self {
            Provider::OpenRouter {
                api_key: api_key_env_var_name,
                client,
                ..
            } => {
                let actual_api_key = env::var(api_key_env_var_name)
                    .map_err(|_| ApiConnectionError::MissingApiKey(api_key_env_var_name.clone()))?;

                let mut request_payload = serde_json::to_value(&request)?;
                if let Some(obj) = request_payload.as_object_mut() {
                    obj.insert("provider".to_string(), json!({ "only": ["Cerebras"] }));
                }

                let site_url =
                    env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
                let app_name = env::var("APP_NAME").unwrap_or_else(|_| "AppetIte".to_string());

                debug!(model = %request.model, "Sending chat completion request");
                let response = client
                    .post(OPENROUTER_CHAT_URL)
                    .bearer_auth(actual_api_key)
                    .header("Content-Type", "application/json")
                    .header("HTTP-Referer", site_url)
                    .header("X-Title", app_name)
                    .json(&request_payload)
                    .send()
                    .await?;

                if response.status().is_success() {
                    Ok(response.json::<ChatCompletionResponse>().await?)
                } else {
                    let status = response.status();
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    Err(ApiConnectionError::ApiError { status, error_body })
                }
            }
        }
    }

    /// Sends one request and returns the first choice's text.
    pub async fn complete_text(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<String, ApiConnectionError> {
        let response = self.call_chat_completion(request).await?;
        response
            .first_content()
            .map(|content| content.trim().to_string())
            .ok_or(ApiConnectionError::NoChoices)
    }
}
