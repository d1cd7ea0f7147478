use crate::traits::*;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

/// Chat model speaking the OpenAI-compatible wire shape. Works against
/// any endpoint exposing `POST {base_url}/chat/completions`.
pub struct OpenAICompatibleModel {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAICompatibleModel {
    pub fn new(client: Client, base_url: String, api_key: Option<String>, model: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAICompatibleModel {
    async fn reply(&self, messages: &[Message]) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": 0.7,
        });

        let mut request = self.client.post(&url).json(&body);

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!("{}: {}", status, text)));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        // Parse OpenAI-compatible response
        let content = json["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str())
            .ok_or_else(|| ProviderError::Parse("No message content in response".to_string()))?;

        Ok(content.to_string())
    }

    fn name(&self) -> &str {
        "OpenAI Compatible"
    }
}
