// SPDX-FileCopyrightText: 2026 Memchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI provider adapter for memchat.
//!
//! Implements [`ProviderAdapter`] over the chat-completions API, non-streaming.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use memchat_config::model::OpenAiConfig;
use memchat_core::{
    AdapterType, HealthStatus, MemchatError, PluginAdapter, ProviderAdapter, ProviderRequest,
    ProviderResponse, TokenUsage,
};
use secrecy::SecretString;
use tracing::info;

use crate::client::OpenAiClient;
use crate::types::{ApiMessage, ChatCompletionRequest, ChatCompletionResponse};

/// OpenAI provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiProvider {
    client: OpenAiClient,
    model: String,
    max_tokens: Option<u32>,
}

impl OpenAiProvider {
    /// Creates a provider from the `[openai]` config section.
    pub fn new(config: &OpenAiConfig) -> Result<Self, MemchatError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(model = config.model, "OpenAI provider initialized");

        Ok(Self {
            client,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn to_completion_request(&self, request: ProviderRequest) -> ChatCompletionRequest {
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model
        };

        ChatCompletionRequest {
            model,
            messages: request
                .messages
                .into_iter()
                .map(|m| ApiMessage {
                    role: m.role.to_string(),
                    content: m.content,
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens.or(self.max_tokens),
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, MemchatError> {
        // A completion would spend tokens; a constructed client has a key.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    fn default_model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, MemchatError> {
        let api_request = self.to_completion_request(request);
        let response = self.client.complete(&api_request).await?;
        into_provider_response(response)
    }
}

/// Takes the first choice; a response without one, or with null content,
/// is a provider error.
fn into_provider_response(
    response: ChatCompletionResponse,
) -> Result<ProviderResponse, MemchatError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| MemchatError::provider("completion returned no choices"))?;

    let content = choice
        .message
        .content
        .ok_or_else(|| MemchatError::provider("completion choice has no content"))?;

    Ok(ProviderResponse {
        id: response.id,
        content,
        model: response.model,
        finish_reason: choice.finish_reason,
        usage: response.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        }),
    })
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<SecretString, MemchatError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(SecretString::from(key.clone()));
    }
    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| {
            MemchatError::Config(
                "OpenAI API key not found. Set openai.api_key in config or OPENAI_API_KEY environment variable.".into(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use memchat_core::ChatMessage;
    use secrecy::ExposeSecret;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenAiProvider {
        let config = OpenAiConfig {
            api_key: Some("sk-test".into()),
            base_url: server.uri(),
            max_tokens: Some(256),
            ..OpenAiConfig::default()
        };
        OpenAiProvider::new(&config).unwrap()
    }

    fn request(model: &str) -> ProviderRequest {
        ProviderRequest {
            model: model.into(),
            messages: vec![
                ChatMessage::system("You are terse."),
                ChatMessage::user("Hi"),
            ],
            temperature: Some(0.2),
            max_tokens: None,
        }
    }

    #[test]
    fn config_key_takes_priority() {
        let key = resolve_api_key(&Some("sk-config".into())).unwrap();
        assert_eq!(key.expose_secret(), "sk-config");
    }

    #[tokio::test]
    async fn complete_maps_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "max_tokens": 256,
                "messages": [
                    {"role": "system", "content": "You are terse."},
                    {"role": "user", "content": "Hi"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "c1",
                "model": "gpt-4o-mini",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello."}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 2}
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let response = provider.complete(request("")).await.unwrap();
        assert_eq!(response.content, "Hello.");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(
            response.usage,
            Some(TokenUsage {
                input_tokens: 12,
                output_tokens: 2
            })
        );
    }

    #[tokio::test]
    async fn empty_choices_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": "c1", "choices": []})),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .complete(request("gpt-4o"))
            .await
            .unwrap_err();
        assert!(matches!(err, MemchatError::Provider { .. }));
        assert!(err.to_string().contains("no choices"));
    }

    #[tokio::test]
    async fn null_content_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "c1",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .complete(request("gpt-4o"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no content"));
    }

    #[tokio::test]
    async fn request_model_overrides_default() {
        let server = MockServer::start().await;
        let provider = provider_for(&server);
        assert_eq!(provider.default_model(), "gpt-4o-mini");

        let api_request = provider.to_completion_request(request("gpt-4.1"));
        assert_eq!(api_request.model, "gpt-4.1");
        assert_eq!(api_request.max_tokens, Some(256));
        assert_eq!(api_request.messages[0].role, "system");
    }
}
