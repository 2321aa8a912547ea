//! Contacts and their per-contact conversation stores.
//!
//! Each contact is an AI partner with its own personality, model settings,
//! and isolated message history. Learner contacts persist their
//! conversations; pre-trained contacts never read or write message history,
//! whatever is on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::message::ContactMessage;
use crate::core::personality::PersonalityTraits;
use crate::core::settings::{GenerationParams, GenerationProfile};
use crate::core::storage::{read_json, write_json, StorageBackend};
use crate::utils::id::mint_id;

const CONTACTS_KEY: &str = "contacts";
const ACTIVE_CONTACT_KEY: &str = "active_contact";

fn messages_key(contact_id: &str) -> String {
    format!("messages_{contact_id}")
}

/// How a contact handles conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactMode {
    /// Conversations are persisted and fed back as context.
    #[serde(rename = "learner")]
    Learner,
    /// Stateless: history is never stored or loaded.
    #[serde(rename = "pre-trained")]
    PreTrained,
}

/// An AI partner with individual settings and an isolated conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub avatar: String,
    pub mode: ContactMode,
    pub personality: PersonalityTraits,
    pub model: String,
    pub params: GenerationParams,
    pub profile: GenerationProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_addition: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_at: Option<DateTime<Utc>>,
    pub message_count: usize,
    pub tags: Vec<String>,
    pub pinned: bool,
}

/// Parameters for creating a contact; unset fields take defaults.
#[derive(Debug, Clone, Default)]
pub struct NewContact {
    pub name: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub mode: Option<ContactMode>,
    pub personality: Option<PersonalityTraits>,
    pub model: Option<String>,
    pub params: Option<GenerationParams>,
    pub profile: Option<GenerationProfile>,
    pub persona_id: Option<String>,
    pub prompt_addition: Option<String>,
    pub tags: Vec<String>,
}

impl NewContact {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Partial update applied to an existing contact. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub mode: Option<ContactMode>,
    pub personality: Option<PersonalityTraits>,
    pub model: Option<String>,
    pub params: Option<GenerationParams>,
    pub profile: Option<GenerationProfile>,
    pub persona_id: Option<String>,
    pub prompt_addition: Option<String>,
    pub tags: Option<Vec<String>>,
    pub pinned: Option<bool>,
}

/// Lightweight row for contact list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub mode: ContactMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_at: Option<DateTime<Utc>>,
    pub pinned: bool,
}

/// Owns the storage port for contacts, the active-contact pointer, and
/// every per-contact message list.
pub struct ContactManager {
    store: Box<dyn StorageBackend>,
}

impl ContactManager {
    pub fn new(store: Box<dyn StorageBackend>) -> Self {
        Self { store }
    }

    fn load_contacts(&self) -> Vec<Contact> {
        read_json(self.store.as_ref(), CONTACTS_KEY).unwrap_or_default()
    }

    fn save_contacts(&mut self, contacts: &[Contact]) {
        write_json(self.store.as_mut(), CONTACTS_KEY, &contacts);
    }

    /// All contacts in storage order.
    pub fn list(&self) -> Vec<Contact> {
        self.load_contacts()
    }

    /// Create and persist a new contact.
    pub fn create(&mut self, new: NewContact) -> Contact {
        let now = Utc::now();
        let contact = Contact {
            id: mint_id("contact"),
            name: new.name,
            description: new.description,
            avatar: new.avatar.unwrap_or_else(|| "👤".to_string()),
            mode: new.mode.unwrap_or(ContactMode::Learner),
            personality: new.personality.unwrap_or_default(),
            model: new.model.unwrap_or_else(|| "llama2".to_string()),
            params: new.params.unwrap_or_default(),
            profile: new.profile.unwrap_or(GenerationProfile::Balanced),
            persona_id: new.persona_id,
            prompt_addition: new.prompt_addition,
            created_at: now,
            updated_at: now,
            last_message_at: None,
            message_count: 0,
            tags: new.tags,
            pinned: false,
        };
        let mut contacts = self.load_contacts();
        contacts.push(contact.clone());
        self.save_contacts(&contacts);
        contact
    }

    /// Apply a partial update, bumping `updated_at`. Returns the updated
    /// contact, or `None` for an unknown id.
    pub fn update(&mut self, contact_id: &str, patch: ContactPatch) -> Option<Contact> {
        let mut contacts = self.load_contacts();
        let contact = contacts.iter_mut().find(|c| c.id == contact_id)?;
        if let Some(name) = patch.name {
            contact.name = name;
        }
        if let Some(description) = patch.description {
            contact.description = Some(description);
        }
        if let Some(avatar) = patch.avatar {
            contact.avatar = avatar;
        }
        if let Some(mode) = patch.mode {
            contact.mode = mode;
        }
        if let Some(personality) = patch.personality {
            contact.personality = personality;
        }
        if let Some(model) = patch.model {
            contact.model = model;
        }
        if let Some(params) = patch.params {
            contact.params = params;
        }
        if let Some(profile) = patch.profile {
            contact.profile = profile;
        }
        if let Some(persona_id) = patch.persona_id {
            contact.persona_id = Some(persona_id);
        }
        if let Some(addition) = patch.prompt_addition {
            contact.prompt_addition = Some(addition);
        }
        if let Some(tags) = patch.tags {
            contact.tags = tags;
        }
        if let Some(pinned) = patch.pinned {
            contact.pinned = pinned;
        }
        contact.updated_at = Utc::now();
        let updated = contact.clone();
        self.save_contacts(&contacts);
        Some(updated)
    }

    /// Delete a contact, its message list, and the active pointer if it
    /// pointed here. Returns false for an unknown id.
    pub fn delete(&mut self, contact_id: &str) -> bool {
        let contacts = self.load_contacts();
        let before = contacts.len();
        let remaining: Vec<Contact> = contacts
            .into_iter()
            .filter(|c| c.id != contact_id)
            .collect();
        if remaining.len() == before {
            return false;
        }
        self.save_contacts(&remaining);
        let _ = self.store.remove(&messages_key(contact_id));
        if self.active_contact_id().as_deref() == Some(contact_id) {
            self.set_active_contact(None);
        }
        true
    }

    pub fn get_by_id(&self, contact_id: &str) -> Option<Contact> {
        self.load_contacts().into_iter().find(|c| c.id == contact_id)
    }

    /// Flip a contact's pin state. Returns the new state, or `None` for an
    /// unknown id.
    pub fn toggle_pin(&mut self, contact_id: &str) -> Option<bool> {
        let pinned = !self.get_by_id(contact_id)?.pinned;
        self.update(
            contact_id,
            ContactPatch {
                pinned: Some(pinned),
                ..Default::default()
            },
        )?;
        Some(pinned)
    }

    pub fn active_contact_id(&self) -> Option<String> {
        match self.store.get(ACTIVE_CONTACT_KEY) {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!("failed to read active contact pointer: {err}");
                None
            }
        }
    }

    pub fn set_active_contact(&mut self, contact_id: Option<&str>) {
        let result = match contact_id {
            Some(id) => self.store.set(ACTIVE_CONTACT_KEY, id),
            None => self.store.remove(ACTIVE_CONTACT_KEY),
        };
        if let Err(err) = result {
            tracing::warn!("failed to update active contact pointer: {err}");
        }
    }

    /// The active contact's record, when the pointer resolves.
    pub fn active_contact(&self) -> Option<Contact> {
        let id = self.active_contact_id()?;
        self.get_by_id(&id)
    }

    /// Load a contact's conversation. Pre-trained contacts always get an
    /// empty history, regardless of what is on disk.
    pub fn load_messages(&self, contact_id: &str) -> Vec<ContactMessage> {
        let Some(contact) = self.get_by_id(contact_id) else {
            return Vec::new();
        };
        if contact.mode == ContactMode::PreTrained {
            return Vec::new();
        }
        read_json(self.store.as_ref(), &messages_key(contact_id)).unwrap_or_default()
    }

    /// Overwrite a contact's conversation and bump its counters. A no-op
    /// for pre-trained contacts and unknown ids.
    pub fn save_messages(&mut self, contact_id: &str, messages: &[ContactMessage]) {
        let Some(contact) = self.get_by_id(contact_id) else {
            return;
        };
        if contact.mode == ContactMode::PreTrained {
            return;
        }
        write_json(self.store.as_mut(), &messages_key(contact_id), &messages);
        if let Some(last) = messages.last() {
            let mut contacts = self.load_contacts();
            if let Some(c) = contacts.iter_mut().find(|c| c.id == contact_id) {
                c.message_count = messages.len();
                c.last_message_at = Some(last.timestamp);
                c.updated_at = Utc::now();
            }
            self.save_contacts(&contacts);
        }
    }

    /// Append one message to a contact's conversation.
    pub fn append_message(&mut self, contact_id: &str, message: ContactMessage) {
        let mut messages = self.load_messages(contact_id);
        messages.push(message);
        self.save_messages(contact_id, &messages);
    }

    /// Drop a contact's conversation and reset its counters.
    pub fn clear_messages(&mut self, contact_id: &str) {
        let _ = self.store.remove(&messages_key(contact_id));
        let mut contacts = self.load_contacts();
        if let Some(c) = contacts.iter_mut().find(|c| c.id == contact_id) {
            c.message_count = 0;
            c.last_message_at = None;
            c.updated_at = Utc::now();
        }
        self.save_contacts(&contacts);
    }

    /// Summaries for list views: pinned contacts first, then most recent
    /// conversation first.
    pub fn summaries(&self) -> Vec<ContactSummary> {
        let mut rows: Vec<ContactSummary> = self
            .load_contacts()
            .into_iter()
            .map(|contact| {
                let messages = self.load_messages(&contact.id);
                let last_message = messages
                    .last()
                    .map(|m| m.content.chars().take(50).collect());
                ContactSummary {
                    id: contact.id,
                    name: contact.name,
                    avatar: contact.avatar,
                    mode: contact.mode,
                    last_message,
                    last_message_at: contact.last_message_at,
                    pinned: contact.pinned,
                }
            })
            .collect();
        rows.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then_with(|| b.last_message_at.cmp(&a.last_message_at))
        });
        rows
    }

    /// Seed the default companion contact on first run and make sure the
    /// active pointer resolves. Idempotent.
    pub fn initialize_defaults(&mut self) {
        let contacts = self.load_contacts();
        if contacts.is_empty() {
            let default = self.create(NewContact {
                name: "Mira".to_string(),
                description: Some("Your AI companion".to_string()),
                avatar: Some("💖".to_string()),
                mode: Some(ContactMode::Learner),
                tags: vec!["default".to_string()],
                ..Default::default()
            });
            self.set_active_contact(Some(&default.id));
        } else if self.active_contact().is_none() {
            let first_id = contacts[0].id.clone();
            self.set_active_contact(Some(&first_id));
        }
    }
}
