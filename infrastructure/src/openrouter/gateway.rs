//! OpenRouter chat completions client.

use super::content::{extract_images, text_of};
use super::models::{ModelInfo, ModelsResponse, filter_models};
use async_trait::async_trait;
use council_application::ports::llm_gateway::{
    GatewayError, LlmGateway, ModelReply, QueryOptions,
};
use council_domain::util::truncate_with_ellipsis;
use council_domain::{ChatMessage, ModelId};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Public OpenRouter API root.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Timeout for the model catalogue request.
const LIST_MODELS_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error body kept in [`GatewayError::Http`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Connection settings for [`OpenRouterGateway`]
#[derive(Debug, Clone)]
pub struct OpenRouterSettings {
    pub api_key: String,
    pub base_url: String,
    /// Sent as `HTTP-Referer` for OpenRouter app attribution
    pub referer: Option<String>,
    /// Sent as `X-Title` for OpenRouter app attribution
    pub app_title: Option<String>,
}

impl OpenRouterSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: None,
            app_title: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// [`LlmGateway`] adapter for OpenRouter
#[derive(Debug, Clone)]
pub struct OpenRouterGateway {
    client: reqwest::Client,
    base_url: String,
}

impl OpenRouterGateway {
    pub fn new(settings: OpenRouterSettings) -> Result<Self, GatewayError> {
        if settings.api_key.trim().is_empty() {
            return Err(GatewayError::Configuration(
                "OpenRouter API key is empty".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth_value = HeaderValue::from_str(&format!("Bearer {}", settings.api_key))
            .map_err(|_| GatewayError::Configuration("Invalid API key format".to_string()))?;
        headers.insert(AUTHORIZATION, auth_value);

        if let Some(referer) = &settings.referer
            && let Ok(value) = HeaderValue::from_str(referer)
        {
            headers.insert("HTTP-Referer", value);
        }
        if let Some(title) = &settings.app_title
            && let Ok(value) = HeaderValue::from_str(title)
        {
            headers.insert("X-Title", value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| {
                GatewayError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.base_url)
    }

    /// Text-generation models offered by OpenRouter, sorted by name.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, GatewayError> {
        let response = self
            .client
            .get(self.models_url())
            .timeout(LIST_MODELS_TIMEOUT)
            .send()
            .await
            .map_err(map_transport_error)?;

        let body = read_success_body(response).await?;
        let parsed: ModelsResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::InvalidResponse(format!("Invalid JSON: {}", e)))?;

        Ok(filter_models(parsed.data))
    }
}

// ==================== API Types ====================

#[derive(Serialize)]
struct ChatApiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    modalities: Option<[&'static str; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Serialize)]
struct ImageConfig {
    aspect_ratio: &'static str,
}

#[derive(Deserialize)]
struct ChatApiResponse {
    choices: Option<Vec<Choice>>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Value,
    reasoning_details: Option<Value>,
    /// OpenRouter returns generated images next to the content
    #[serde(default)]
    images: Value,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
}

#[async_trait]
impl LlmGateway for OpenRouterGateway {
    async fn query(
        &self,
        model: &ModelId,
        messages: &[ChatMessage],
        options: &QueryOptions,
    ) -> Result<ModelReply, GatewayError> {
        let request = ChatApiRequest {
            model: model.as_str(),
            messages,
            modalities: options.enable_image_generation.then_some(["text", "image"]),
            image_config: options
                .enable_image_generation
                .then_some(ImageConfig { aspect_ratio: "1:1" }),
        };

        debug!("POST {} model={}", self.chat_url(), model);
        let response = self
            .client
            .post(self.chat_url())
            .timeout(options.timeout)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let body = read_success_body(response).await?;
        let parsed: ChatApiResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::InvalidResponse(format!("Invalid JSON: {}", e)))?;

        if let Some(error) = parsed.error {
            return Err(GatewayError::InvalidResponse(
                error.message.unwrap_or_else(|| "unknown API error".to_string()),
            ));
        }

        let message = parsed
            .choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.message)
            .ok_or_else(|| GatewayError::InvalidResponse("No choices in response".to_string()))?;

        let images = if options.enable_image_generation {
            let mut images = extract_images(&message.content);
            for image in extract_images(&message.images) {
                if !images.contains(&image) {
                    images.push(image);
                }
            }
            images
        } else {
            Vec::new()
        };

        Ok(ModelReply {
            content: text_of(&message.content),
            reasoning_details: message.reasoning_details.filter(|v| !v.is_null()),
            images,
        })
    }
}

fn map_transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(err.to_string())
    }
}

/// Body of a 2xx response, or [`GatewayError::Http`].
async fn read_success_body(response: reqwest::Response) -> Result<String, GatewayError> {
    let status = response.status();
    let body = response.text().await.map_err(map_transport_error)?;

    if !status.is_success() {
        return Err(GatewayError::Http {
            status: status.as_u16(),
            body: truncate_with_ellipsis(&body, MAX_ERROR_BODY_CHARS),
        });
    }
    Ok(body)
}
