//! Chat session orchestration.
//!
//! [`ChatSession`] wires the validator, prompt composer, contact manager,
//! inference client, and image pool into the send pipeline:
//!
//! sanitize -> validate -> optimistic user append -> compose + history ->
//! inference -> validate reply -> optional multi-bubble split -> optional
//! image drop -> persist.
//!
//! Rejected input never reaches the network. An invalid reply is replaced
//! with a placeholder and flagged in metadata rather than dropped, so the
//! transcript stays coherent.
//!
//! The session keeps the active conversation in memory across sends. For
//! learner contacts the manager also persists it; for pre-trained contacts
//! nothing is written, so the transcript lives only as long as the session
//! while still providing in-conversation context.

use std::error::Error as StdError;
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, warn};

use crate::api::{ChatMessage, ChatOptions, ChatRequest, InferenceClient};
use crate::core::constants::{
    BUBBLE_DELAY_MS, FILTERED_PLACEHOLDER, IMAGE_DELAY_MS, IMAGE_PROBABILITY, MEMORY_WINDOW,
    SPLIT_MIN_CHARS, SPLIT_PROBABILITY,
};
use crate::core::contacts::{Contact, ContactManager};
use crate::core::images::ImagePool;
use crate::core::message::{ContactMessage, DeliveryStatus, MessageMetadata, MessageRole};
use crate::core::persona::{get_by_id, PersonaTemplate};
use crate::core::prompt::compose;
use crate::core::random::RandomSource;
use crate::core::safety::{sanitize, validate, ValidationResult};
use crate::core::settings::AppSettings;

static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+[A-Z]").expect("sentence boundary pattern compiles"));

/// Why a send attempt did not produce a reply.
#[derive(Debug)]
pub enum SendError {
    /// Input was empty after sanitization and carried no attachment.
    EmptyInput,
    /// The inference endpoint is not reachable.
    NotConnected,
    /// No contact is selected.
    NoActiveContact,
    /// The content validator rejected the input; nothing was sent.
    Rejected(ValidationResult),
    /// The inference call failed after the user message was recorded.
    Inference(String),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::EmptyInput => write!(f, "Message is empty"),
            SendError::NotConnected => write!(f, "Not connected to the inference endpoint"),
            SendError::NoActiveContact => write!(f, "No active contact selected"),
            SendError::Rejected(result) => write!(
                f,
                "Message rejected: {}",
                result.reason.as_deref().unwrap_or("content not allowed")
            ),
            SendError::Inference(err) => write!(f, "Inference request failed: {err}"),
        }
    }
}

impl StdError for SendError {}

/// What a successful send produced.
#[derive(Debug)]
pub struct SendOutcome {
    /// The recorded user message, already marked delivered.
    pub user_message: ContactMessage,
    /// Reply bubbles in delivery order, image message included if one was
    /// dropped.
    pub replies: Vec<ContactMessage>,
    /// Rejection reason when the reply was withheld and replaced with the
    /// placeholder.
    pub filtered: Option<String>,
}

/// A live conversation bound to the active contact.
pub struct ChatSession {
    client: Box<dyn InferenceClient>,
    contacts: ContactManager,
    settings: AppSettings,
    custom_personas: Vec<PersonaTemplate>,
    images: Option<ImagePool>,
    rng: Box<dyn RandomSource>,
    connected: bool,
    transcript: Vec<ContactMessage>,
    transcript_contact: Option<String>,
}

impl ChatSession {
    pub fn new(
        client: Box<dyn InferenceClient>,
        contacts: ContactManager,
        settings: AppSettings,
        custom_personas: Vec<PersonaTemplate>,
        images: Option<ImagePool>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            client,
            contacts,
            settings,
            custom_personas,
            images,
            rng,
            connected: false,
            transcript: Vec::new(),
            transcript_contact: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn contacts(&self) -> &ContactManager {
        &self.contacts
    }

    pub fn contacts_mut(&mut self) -> &mut ContactManager {
        &mut self.contacts
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Re-probe the endpoint and record the result.
    pub async fn refresh_connectivity(&mut self) -> bool {
        self.connected = self.client.check_connection().await;
        debug!("connectivity probe: connected = {}", self.connected);
        self.connected
    }

    fn persona_for(&self, contact: &Contact) -> Option<PersonaTemplate> {
        contact
            .persona_id
            .as_deref()
            .and_then(|id| get_by_id(id, &self.custom_personas))
    }

    fn system_prompt(&self, contact: &Contact) -> String {
        let persona = self.persona_for(contact);
        let context_window = if self.settings.memory_enabled {
            MEMORY_WINDOW
        } else {
            0
        };
        let mut prompt = compose(
            &contact.personality,
            &contact.name,
            &self.settings.safety,
            persona.as_ref(),
            context_window,
        );
        if let Some(addition) = contact.prompt_addition.as_deref().filter(|a| !a.is_empty()) {
            prompt.push('\n');
            prompt.push_str(addition);
            prompt.push('\n');
        }
        prompt
    }

    /// Load the active contact's conversation into memory if it is not the
    /// one already held. Pre-trained contacts start empty (nothing on disk)
    /// but keep their in-session transcript across sends.
    fn ensure_transcript(&mut self, contact: &Contact) {
        if self.transcript_contact.as_deref() != Some(contact.id.as_str()) {
            self.transcript = self.contacts.load_messages(&contact.id);
            self.transcript_contact = Some(contact.id.clone());
        }
    }

    /// Run the full send pipeline for the active contact. An attachment is
    /// a base64 data URL; it satisfies the non-empty gate on its own and is
    /// forwarded with the request.
    pub async fn send_message(
        &mut self,
        input: &str,
        attachment: Option<String>,
    ) -> Result<SendOutcome, SendError> {
        let sanitized = sanitize(input);
        if sanitized.is_empty() && attachment.is_none() {
            return Err(SendError::EmptyInput);
        }
        if !self.connected {
            return Err(SendError::NotConnected);
        }
        let contact = self
            .contacts
            .active_contact()
            .ok_or(SendError::NoActiveContact)?;

        // Validation happens before anything leaves the process.
        let verdict = validate(&sanitized, &self.settings.safety);
        if !verdict.is_valid {
            return Err(SendError::Rejected(verdict));
        }

        // Optimistic append: the user message is recorded before the call
        // so a transport failure leaves it visible as undelivered.
        self.ensure_transcript(&contact);
        let user_message = ContactMessage::new(&contact.id, MessageRole::User, sanitized.clone())
            .with_image(attachment.clone())
            .with_status(DeliveryStatus::Sending);
        self.transcript.push(user_message.clone());
        self.contacts.save_messages(&contact.id, &self.transcript);

        let request = self.build_request(&contact, &self.transcript, attachment.as_ref());
        let reply = match self.client.chat(request).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!("inference call failed: {err}");
                return Err(SendError::Inference(err.to_string()));
            }
        };

        // Delivery confirmed; flip the optimistic message.
        if let Some(last) = self.transcript.last_mut() {
            last.status = Some(DeliveryStatus::Delivered);
        }
        let mut user_message = user_message;
        user_message.status = Some(DeliveryStatus::Delivered);

        let content = reply.message.content.trim().to_string();
        let reply_verdict = validate(&content, &self.settings.safety);
        let mut outcome = SendOutcome {
            user_message,
            replies: Vec::new(),
            filtered: None,
        };

        if !reply_verdict.is_valid {
            debug!(
                "reply withheld: {}",
                reply_verdict.reason.as_deref().unwrap_or("unspecified")
            );
            let placeholder =
                ContactMessage::new(&contact.id, MessageRole::Assistant, FILTERED_PLACEHOLDER)
                    .with_metadata(MessageMetadata {
                        model: Some(contact.model.clone()),
                        filtered: Some(true),
                        regenerated: None,
                    });
            self.transcript.push(placeholder.clone());
            outcome.replies.push(placeholder);
            outcome.filtered = reply_verdict.reason;
            self.contacts.save_messages(&contact.id, &self.transcript);
            return Ok(outcome);
        }

        let bubbles = self.bubble_plan(&content);
        let metadata = MessageMetadata {
            model: Some(contact.model.clone()),
            ..Default::default()
        };
        for (index, bubble) in bubbles.into_iter().enumerate() {
            if index > 0 {
                let delay = self.rng.range_u64(BUBBLE_DELAY_MS.0, BUBBLE_DELAY_MS.1);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            let message = ContactMessage::new(&contact.id, MessageRole::Assistant, bubble)
                .with_metadata(metadata.clone());
            self.transcript.push(message.clone());
            outcome.replies.push(message);
        }

        if let Some(image) = self.maybe_pick_image().await {
            let message = ContactMessage::new(&contact.id, MessageRole::Assistant, "")
                .with_image(Some(image))
                .with_metadata(metadata.clone());
            self.transcript.push(message.clone());
            outcome.replies.push(message);
        }

        self.contacts.save_messages(&contact.id, &self.transcript);
        Ok(outcome)
    }

    /// Assemble the outgoing list: system prompt, the last `MEMORY_WINDOW`
    /// stored messages (when memory is on), then the new user message. The
    /// newest transcript entry is the user message just appended.
    fn build_request(
        &self,
        contact: &Contact,
        messages: &[ContactMessage],
        attachment: Option<&String>,
    ) -> ChatRequest {
        let mut outgoing = vec![ChatMessage::new(
            MessageRole::System.as_str(),
            self.system_prompt(contact),
        )];
        let (history, newest) = messages.split_at(messages.len() - 1);
        let window = if self.settings.memory_enabled {
            MEMORY_WINDOW
        } else {
            0
        };
        let start = history.len().saturating_sub(window);
        for message in &history[start..] {
            outgoing.push(ChatMessage::new(message.role.as_str(), &message.content));
        }
        for message in newest {
            outgoing.push(ChatMessage::new(message.role.as_str(), &message.content));
        }
        ChatRequest {
            model: contact.model.clone(),
            messages: outgoing,
            images: attachment.map(|a| vec![a.clone()]),
            stream: false,
            options: Some(ChatOptions::from(contact.params)),
        }
    }

    /// Decide how the reply is presented: usually one bubble, sometimes
    /// split into two or three for long replies.
    fn bubble_plan(&mut self, content: &str) -> Vec<String> {
        let long_enough = content.chars().count() > SPLIT_MIN_CHARS;
        if !long_enough || !self.rng.chance(SPLIT_PROBABILITY) {
            return vec![content.to_string()];
        }
        let target = 2 + self.rng.pick_index(2);
        split_into_bubbles(content, target)
    }

    async fn maybe_pick_image(&mut self) -> Option<String> {
        let pool = self.images.as_mut()?;
        if !self.rng.chance(IMAGE_PROBABILITY) {
            return None;
        }
        let delay = self.rng.range_u64(IMAGE_DELAY_MS.0, IMAGE_DELAY_MS.1);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        match pool.pick(self.rng.as_mut()) {
            Ok(asset) => Some(asset.data_url),
            Err(err) => {
                warn!("image pick failed, skipping drop: {err}");
                None
            }
        }
    }
}

/// Split a reply at sentence boundaries into roughly equal bubbles. Falls
/// back to a single bubble when no boundary exists. Never produces an empty
/// bubble.
fn split_into_bubbles(content: &str, target: usize) -> Vec<String> {
    let boundaries: Vec<usize> = SENTENCE_BOUNDARY
        .find_iter(content)
        .map(|m| m.start() + 1)
        .collect();
    if boundaries.is_empty() {
        return vec![content.trim().to_string()];
    }

    let mut cuts = Vec::new();
    for k in 1..target {
        let ideal = content.len() * k / target;
        if let Some(&nearest) = boundaries.iter().min_by_key(|&&b| b.abs_diff(ideal)) {
            cuts.push(nearest);
        }
    }
    cuts.sort_unstable();
    cuts.dedup();

    let mut bubbles = Vec::new();
    let mut start = 0;
    for cut in cuts {
        let piece = content[start..cut].trim();
        if !piece.is_empty() {
            bubbles.push(piece.to_string());
        }
        start = cut;
    }
    let tail = content[start..].trim();
    if !tail.is_empty() {
        bubbles.push(tail.to_string());
    }
    bubbles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChatReply, InferenceError, ModelTag, ReplyMessage};
    use crate::core::contacts::{ContactMode, NewContact};
    use crate::core::random::SequenceRandom;
    use crate::core::storage::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const NEVER: u64 = u64::MAX;
    const ALWAYS: u64 = 0;

    struct ScriptedClient {
        replies: Mutex<Vec<Result<String, String>>>,
        calls: AtomicUsize,
        requests: Arc<Mutex<Vec<ChatRequest>>>,
    }

    impl ScriptedClient {
        fn replying(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(
                    replies.iter().rev().map(|r| Ok(r.to_string())).collect(),
                ),
                calls: AtomicUsize::new(0),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                replies: Mutex::new(vec![Err(message.to_string())]),
                calls: AtomicUsize::new(0),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn request_log(&self) -> Arc<Mutex<Vec<ChatRequest>>> {
            Arc::clone(&self.requests)
        }
    }

    #[async_trait]
    impl InferenceClient for ScriptedClient {
        async fn chat(&self, request: ChatRequest) -> Result<ChatReply, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request);
            match self.replies.lock().unwrap().pop() {
                Some(Ok(content)) => Ok(ChatReply {
                    message: ReplyMessage {
                        role: "assistant".to_string(),
                        content,
                    },
                }),
                Some(Err(message)) => Err(InferenceError::Api {
                    status: 500,
                    body: message,
                }),
                None => Err(InferenceError::Api {
                    status: 500,
                    body: "no scripted reply".to_string(),
                }),
            }
        }

        async fn list_models(&self) -> Result<Vec<ModelTag>, InferenceError> {
            Ok(Vec::new())
        }

        async fn check_connection(&self) -> bool {
            true
        }
    }

    fn session_with(client: ScriptedClient, rng: &[u64]) -> ChatSession {
        let mut contacts = ContactManager::new(Box::new(MemoryStore::new()));
        contacts.initialize_defaults();
        ChatSession::new(
            Box::new(client),
            contacts,
            AppSettings::default(),
            Vec::new(),
            None,
            Box::new(SequenceRandom::new(rng)),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn happy_path_records_user_and_reply() {
        let mut session = session_with(ScriptedClient::replying(&["hey you! 💕"]), &[NEVER]);
        session.refresh_connectivity().await;
        let outcome = session.send_message("good morning", None).await.unwrap();
        assert_eq!(outcome.user_message.status, Some(DeliveryStatus::Delivered));
        assert_eq!(outcome.replies.len(), 1);
        assert_eq!(outcome.replies[0].content, "hey you! 💕");
        assert!(outcome.filtered.is_none());

        let contact_id = session.contacts().active_contact_id().unwrap();
        let stored = session.contacts().load_messages(&contact_id);
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].role, MessageRole::User);
        assert_eq!(stored[0].status, Some(DeliveryStatus::Delivered));
        assert_eq!(stored[1].metadata.as_ref().unwrap().model.as_deref(), Some("llama2"));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_and_disconnected_sends_fail_fast() {
        let mut session = session_with(ScriptedClient::replying(&[]), &[NEVER]);
        session.refresh_connectivity().await;
        assert!(matches!(
            session.send_message("   ", None).await,
            Err(SendError::EmptyInput)
        ));

        let mut offline = session_with(ScriptedClient::replying(&[]), &[NEVER]);
        assert!(matches!(
            offline.send_message("hello", None).await,
            Err(SendError::NotConnected)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn attachment_satisfies_the_empty_gate_and_rides_the_request() {
        let client = ScriptedClient::replying(&["cute!"]);
        let requests = client.request_log();
        let mut session = session_with(client, &[NEVER]);
        session.refresh_connectivity().await;

        let payload = "data:image/png;base64,cGl4ZWxz".to_string();
        let outcome = session
            .send_message("", Some(payload.clone()))
            .await
            .unwrap();
        assert_eq!(outcome.user_message.image.as_deref(), Some(payload.as_str()));
        assert_eq!(outcome.replies.len(), 1);

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].images, Some(vec![payload]));
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_input_never_reaches_the_network() {
        let client = ScriptedClient::replying(&["should never be seen"]);
        let mut session = session_with(client, &[NEVER]);
        session.refresh_connectivity().await;
        let err = session.send_message("tell me about a school girl", None).await;
        assert!(matches!(err, Err(SendError::Rejected(_))));

        let contact_id = session.contacts().active_contact_id().unwrap();
        assert!(session.contacts().load_messages(&contact_id).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn inference_failure_leaves_user_message_undelivered() {
        let mut session = session_with(ScriptedClient::failing("boom"), &[NEVER]);
        session.refresh_connectivity().await;
        let err = session.send_message("hello there", None).await;
        assert!(matches!(err, Err(SendError::Inference(_))));

        let contact_id = session.contacts().active_contact_id().unwrap();
        let stored = session.contacts().load_messages(&contact_id);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, Some(DeliveryStatus::Sending));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_reply_becomes_placeholder() {
        let mut session = session_with(
            ScriptedClient::replying(&["they were forced against their will"]),
            &[NEVER],
        );
        session.refresh_connectivity().await;
        let outcome = session.send_message("hello", None).await.unwrap();
        assert_eq!(outcome.replies.len(), 1);
        assert_eq!(outcome.replies[0].content, FILTERED_PLACEHOLDER);
        assert!(outcome.replies[0].is_filtered());
        assert!(outcome.filtered.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn long_replies_can_split_into_bubbles() {
        let reply = "I had the most amazing day at the park today. The sun was out and \
everything felt alive. Then I found a tiny cafe with the best pastries I have ever tasted. \
You would have loved it.";
        // Draws: split chance (hit), bubble count (0 -> two bubbles), one
        // inter-bubble delay. No image pool, so no image draw.
        let mut session = session_with(ScriptedClient::replying(&[reply]), &[ALWAYS, 0, 0]);
        session.refresh_connectivity().await;
        let outcome = session.send_message("how was your day?", None).await.unwrap();
        assert_eq!(outcome.replies.len(), 2);
        assert!(outcome.replies.iter().all(|m| !m.content.is_empty()));
        let rejoined = outcome
            .replies
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert!(rejoined.contains("amazing day"));
        assert!(rejoined.contains("You would have loved it."));
    }

    #[tokio::test(start_paused = true)]
    async fn short_replies_never_split() {
        let mut session = session_with(ScriptedClient::replying(&["short and sweet"]), &[ALWAYS]);
        session.refresh_connectivity().await;
        let outcome = session.send_message("hi", None).await.unwrap();
        assert_eq!(outcome.replies.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn image_drop_attaches_a_data_url() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pic.png"), b"pixels").unwrap();
        let pool = ImagePool::from_dir(dir.path()).unwrap();

        let mut contacts = ContactManager::new(Box::new(MemoryStore::new()));
        contacts.initialize_defaults();
        // Draws: split chance skipped (short reply), image chance (hit),
        // image delay, image index.
        let mut session = ChatSession::new(
            Box::new(ScriptedClient::replying(&["look at this"])),
            contacts,
            AppSettings::default(),
            Vec::new(),
            Some(pool),
            Box::new(SequenceRandom::new([ALWAYS, 0, 0])),
        );
        session.refresh_connectivity().await;
        let outcome = session.send_message("send me a photo", None).await.unwrap();
        assert_eq!(outcome.replies.len(), 2);
        let image = outcome.replies[1].image.as_ref().unwrap();
        assert!(image.starts_with("data:image/png;base64,"));
    }

    #[tokio::test(start_paused = true)]
    async fn memory_window_bounds_the_outgoing_history() {
        let client = ScriptedClient::replying(&["ok"; 30]);
        let requests = client.request_log();
        let mut session = session_with(client, &[NEVER]);
        session.refresh_connectivity().await;
        for i in 0..14 {
            session
                .send_message(&format!("message {i}"), None)
                .await
                .unwrap();
        }
        session.send_message("latest", None).await.unwrap();

        // 28 messages were stored before the last send; the request carries
        // the system prompt, the trailing MEMORY_WINDOW of them, and the new
        // user message.
        let requests = requests.lock().unwrap();
        let last = requests.last().unwrap();
        assert_eq!(last.messages.len(), 1 + MEMORY_WINDOW + 1);
        assert_eq!(last.messages[0].role, "system");
        assert_eq!(last.messages.last().unwrap().content, "latest");
        assert_eq!(last.messages[1].content, "message 9");

        let contact_id = session.contacts().active_contact_id().unwrap();
        assert_eq!(session.contacts().load_messages(&contact_id).len(), 30);
    }

    #[tokio::test(start_paused = true)]
    async fn pre_trained_contacts_keep_context_but_never_persist() {
        let client = ScriptedClient::replying(&["hello", "again"]);
        let requests = client.request_log();
        let mut contacts = ContactManager::new(Box::new(MemoryStore::new()));
        let contact = contacts.create(NewContact {
            mode: Some(ContactMode::PreTrained),
            ..NewContact::named("Sage")
        });
        contacts.set_active_contact(Some(&contact.id));
        let mut session = ChatSession::new(
            Box::new(client),
            contacts,
            AppSettings::default(),
            Vec::new(),
            None,
            Box::new(SequenceRandom::new([NEVER])),
        );
        session.refresh_connectivity().await;
        session.send_message("first", None).await.unwrap();
        session.send_message("second", None).await.unwrap();

        // Nothing is written through the manager.
        assert!(session.contacts().load_messages(&contact.id).is_empty());

        // But the second request still carries the first exchange.
        let requests = requests.lock().unwrap();
        let second = &requests[1];
        assert!(second.messages.iter().any(|m| m.content == "first"));
        assert!(second.messages.iter().any(|m| m.content == "hello"));
        assert_eq!(second.messages.last().unwrap().content, "second");
    }

    #[test]
    fn split_respects_sentence_boundaries() {
        let text = "First sentence here. Second one follows! Third wraps it up.";
        let bubbles = split_into_bubbles(text, 3);
        assert_eq!(bubbles.len(), 3);
        assert_eq!(bubbles[0], "First sentence here.");
        assert_eq!(bubbles[1], "Second one follows!");
        assert_eq!(bubbles[2], "Third wraps it up.");
    }

    #[test]
    fn split_without_boundaries_yields_one_bubble() {
        let text = "no sentence boundary in sight just one long thought";
        let bubbles = split_into_bubbles(text, 3);
        assert_eq!(bubbles, vec![text.to_string()]);
    }

    #[test]
    fn split_never_produces_empty_bubbles() {
        let text = "Hi. Yes. No. Sure. Done.";
        for target in 2..=3 {
            let bubbles = split_into_bubbles(text, target);
            assert!(!bubbles.is_empty());
            assert!(bubbles.iter().all(|b| !b.trim().is_empty()));
        }
    }
}
