//! Conversation message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::id::mint_id;

/// Role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        }
    }

    pub fn is_user(self) -> bool {
        self == MessageRole::User
    }

    pub fn is_assistant(self) -> bool {
        self == MessageRole::Assistant
    }
}

impl AsRef<str> for MessageRole {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Delivery state of an outbound user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sending,
    Delivered,
}

/// Optional per-message metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    /// Model that produced this message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// True when the original content was withheld by the content validator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered: Option<bool>,
    /// True when this message replaced an earlier generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regenerated: Option<bool>,
}

impl MessageMetadata {
    pub fn filtered() -> Self {
        Self {
            filtered: Some(true),
            ..Default::default()
        }
    }
}

/// A single message in a contact's conversation. Appended once and never
/// mutated afterwards, except for the delivery-status flip and the
/// filtered-placeholder overwrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: String,
    pub contact_id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Base64 data URL of an attached image, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeliveryStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl ContactMessage {
    /// Mint a new message for a contact with a fresh id and the current time.
    pub fn new(contact_id: impl Into<String>, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: mint_id("msg"),
            contact_id: contact_id.into(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            image: None,
            status: None,
            metadata: None,
        }
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    pub fn with_status(mut self, status: DeliveryStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn is_filtered(&self) -> bool {
        self.metadata
            .as_ref()
            .and_then(|m| m.filtered)
            .unwrap_or(false)
    }
}
