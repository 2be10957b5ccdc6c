/**
 * AI Gateway Client
 *
 * Thin wrapper over the OpenAI-style chat-completions protocol. Three
 * call shapes cover every endpoint: plain text completion, completion
 * with an attached image, and a forced tool call whose arguments come
 * back as structured JSON (used by the exam generator so the model
 * cannot reply with prose where questions are expected).
 *
 * Status mapping is fixed: 429 becomes `RateLimited`, 402 becomes
 * `QuotaExhausted`, anything else non-2xx becomes `Upstream`. The
 * client never sees upstream response bodies on failure.
 */

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::server::config::AiConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the external chat-completions gateway
#[derive(Clone)]
pub struct AiGateway {
    client: reqwest::Client,
    config: AiConfig,
}

impl AiGateway {
    pub fn new(config: AiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    /// Plain completion: system prompt plus one user message.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, ApiError> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        let response = self.request(body).await?;
        extract_content(&response)
    }

    /// Completion with an attached image (data URL or https URL).
    pub async fn complete_with_image(
        &self,
        system: &str,
        user: &str,
        image_url: &str,
    ) -> Result<String, ApiError> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": user },
                        { "type": "image_url", "image_url": { "url": image_url } },
                    ],
                },
            ],
        });

        let response = self.request(body).await?;
        extract_content(&response)
    }

    /// Forced tool call.
    ///
    /// `tool` is a full function-tool definition; `tool_choice` pins the
    /// model to it, so the reply carries JSON arguments rather than
    /// free text. Returns the parsed arguments object.
    pub async fn complete_with_tool(
        &self,
        system: &str,
        user: &str,
        tool: Value,
        tool_name: &str,
    ) -> Result<Value, ApiError> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "tools": [tool],
            "tool_choice": { "type": "function", "function": { "name": tool_name } },
        });

        let response = self.request(body).await?;

        let arguments = response["choices"][0]["message"]["tool_calls"][0]["function"]
            ["arguments"]
            .as_str()
            .ok_or_else(|| ApiError::Upstream("Gateway reply carried no tool call".to_string()))?;

        serde_json::from_str(arguments)
            .map_err(|e| ApiError::Upstream(format!("Tool arguments were not valid JSON: {e}")))
    }

    async fn request(&self, body: Value) -> Result<Value, ApiError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ApiError::Upstream("AI gateway is not configured".to_string()))?;

        let response = self
            .client
            .post(&self.config.gateway_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("Gateway request failed: {e}")))?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited),
            StatusCode::PAYMENT_REQUIRED => Err(ApiError::QuotaExhausted),
            status if !status.is_success() => {
                tracing::error!("AI gateway returned {}", status);
                Err(ApiError::Upstream(format!("Gateway returned {status}")))
            }
            _ => response
                .json()
                .await
                .map_err(|e| ApiError::Upstream(format!("Gateway reply was not JSON: {e}"))),
        }
    }
}

fn extract_content(response: &Value) -> Result<String, ApiError> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ApiError::Upstream("Gateway reply carried no content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_is_extracted_from_the_first_choice() {
        let response = json!({
            "choices": [{ "message": { "role": "assistant", "content": "سلام" } }]
        });
        assert_eq!(extract_content(&response).unwrap(), "سلام");
    }

    #[test]
    fn missing_content_maps_to_an_upstream_error() {
        let response = json!({ "choices": [] });
        assert!(matches!(
            extract_content(&response),
            Err(ApiError::Upstream(_))
        ));
    }
}
