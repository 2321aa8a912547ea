//! Wire types and client trait for the inference endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::settings::GenerationParams;

pub mod client;

pub use client::OllamaClient;

/// One message in a chat request.
#[derive(Debug, Serialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Sampling options forwarded with a request.
#[derive(Debug, Serialize, Clone, Copy)]
pub struct ChatOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub repeat_penalty: f32,
    pub num_predict: u32,
}

impl From<GenerationParams> for ChatOptions {
    fn from(params: GenerationParams) -> Self {
        Self {
            temperature: params.temperature,
            top_p: params.top_p,
            repeat_penalty: params.repeat_penalty,
            num_predict: params.max_tokens,
        }
    }
}

/// Body of a chat completion request.
#[derive(Debug, Serialize, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ChatOptions>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplyMessage {
    pub role: String,
    pub content: String,
}

/// Body of a chat completion response.
#[derive(Debug, Deserialize, Clone)]
pub struct ChatReply {
    pub message: ReplyMessage,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelTag {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TagsResponse {
    pub models: Vec<ModelTag>,
}

/// Errors from talking to the inference endpoint.
#[derive(Debug)]
pub enum InferenceError {
    /// Transport-level failure (connection refused, timeout, bad TLS).
    Http(reqwest::Error),
    /// The endpoint answered with a non-success status.
    Api { status: u16, body: String },
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceError::Http(err) => write!(f, "Request to inference endpoint failed: {err}"),
            InferenceError::Api { status, body } => {
                write!(f, "API request failed with status {status}: {body}")
            }
        }
    }
}

impl std::error::Error for InferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InferenceError::Http(err) => Some(err),
            InferenceError::Api { .. } => None,
        }
    }
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        InferenceError::Http(err)
    }
}

/// The inference endpoint as the session orchestrator sees it. Implemented
/// by [`OllamaClient`] in production and by scripted doubles in tests.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, InferenceError>;

    async fn list_models(&self) -> Result<Vec<ModelTag>, InferenceError>;

    /// Whether the endpoint currently answers at all.
    async fn check_connection(&self) -> bool;
}
