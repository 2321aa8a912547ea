//! HTTP client for an Ollama-style inference endpoint.

use async_trait::async_trait;
use tracing::debug;

use crate::api::{ChatReply, ChatRequest, InferenceClient, InferenceError, ModelTag, TagsResponse};
use crate::utils::url::{construct_api_url, normalize_base_url};

/// Client for a local or remote Ollama-compatible server.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl InferenceClient for OllamaClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, InferenceError> {
        let url = construct_api_url(&self.base_url, "api/chat");
        debug!("chat request to {url} with model {}", request.model);
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(InferenceError::Api { status, body });
        }

        Ok(response.json::<ChatReply>().await?)
    }

    async fn list_models(&self) -> Result<Vec<ModelTag>, InferenceError> {
        let url = construct_api_url(&self.base_url, "api/tags");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(InferenceError::Api { status, body });
        }

        Ok(response.json::<TagsResponse>().await?.models)
    }

    async fn check_connection(&self) -> bool {
        self.list_models().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized_on_construction() {
        let client = OllamaClient::new("http://localhost:11434/");
        assert_eq!(client.base_url(), "http://localhost:11434");
        let client = OllamaClient::new("");
        assert_eq!(client.base_url(), "http://localhost:11434");
    }
}
