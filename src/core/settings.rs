//! Application settings, safety configuration, and generation parameters.
//!
//! There is exactly one active [`AppSettings`] value per process. It is owned
//! by a [`SettingsStore`], which loads it once at startup and persists it on
//! every change; components receive `&AppSettings` (or `&SafetySettings`)
//! explicitly rather than reading global state.

use std::error::Error as StdError;
use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::core::persona::PersonaTemplate;
use crate::core::personality::PersonalityTraits;
use crate::core::storage::{read_json, write_json, StorageBackend};
use crate::utils::url::DEFAULT_BASE_URL;

const SETTINGS_KEY: &str = "settings";
const CUSTOM_PERSONAS_KEY: &str = "custom_personas";

/// Three-level policy controlling the permissiveness of the mode-tier filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    Safe,
    Mature,
    Adult,
}

impl ContentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentMode::Safe => "safe",
            ContentMode::Mature => "mature",
            ContentMode::Adult => "adult",
        }
    }

    /// Short warning line shown when the mode is selected.
    pub fn warning(self) -> &'static str {
        match self {
            ContentMode::Safe => "Safe mode: adult content is filtered",
            ContentMode::Mature => "Mature mode: explicit content is filtered",
            ContentMode::Adult => {
                "Adult mode: only prohibited content is filtered. You must be 18+"
            }
        }
    }
}

impl fmt::Display for ContentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Safety and content controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetySettings {
    pub content_mode: ContentMode,
    pub content_filter_enabled: bool,
    pub show_nsfw_indicators: bool,
    pub require_consent_confirmation: bool,
    pub audit_logging_enabled: bool,
    pub age_verified: bool,
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self {
            content_mode: ContentMode::Safe,
            content_filter_enabled: true,
            show_nsfw_indicators: true,
            require_consent_confirmation: true,
            audit_logging_enabled: false,
            age_verified: false,
        }
    }
}

/// Model generation parameters sent with every chat request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    /// Sampling temperature (0.1-2.0); higher is more creative.
    pub temperature: f32,
    /// Nucleus sampling cutoff (0.1-1.0).
    pub top_p: f32,
    /// Penalty applied to repeated tokens (1.0-2.0).
    pub repeat_penalty: f32,
    /// Maximum response length in tokens.
    pub max_tokens: u32,
    /// Streaming is unused by this client; requests always send `stream: false`.
    pub stream: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        GenerationProfile::Balanced.params()
    }
}

/// Preset generation profiles for different conversational registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationProfile {
    Creative,
    Roleplay,
    Balanced,
    Safe,
    Strict,
}

impl GenerationProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationProfile::Creative => "creative",
            GenerationProfile::Roleplay => "roleplay",
            GenerationProfile::Balanced => "balanced",
            GenerationProfile::Safe => "safe",
            GenerationProfile::Strict => "strict",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            GenerationProfile::Creative => "More imaginative and varied responses",
            GenerationProfile::Roleplay => "Optimized for immersive roleplay",
            GenerationProfile::Balanced => "Balanced creativity and consistency",
            GenerationProfile::Safe => "More predictable and appropriate responses",
            GenerationProfile::Strict => "Most consistent and filtered responses",
        }
    }

    /// The fixed parameter preset for this profile.
    pub fn params(self) -> GenerationParams {
        match self {
            GenerationProfile::Creative => GenerationParams {
                temperature: 1.2,
                top_p: 0.95,
                repeat_penalty: 1.05,
                max_tokens: 600,
                stream: false,
            },
            GenerationProfile::Roleplay => GenerationParams {
                temperature: 1.0,
                top_p: 0.92,
                repeat_penalty: 1.1,
                max_tokens: 550,
                stream: false,
            },
            GenerationProfile::Balanced => GenerationParams {
                temperature: 0.8,
                top_p: 0.9,
                repeat_penalty: 1.1,
                max_tokens: 500,
                stream: false,
            },
            GenerationProfile::Safe => GenerationParams {
                temperature: 0.6,
                top_p: 0.85,
                repeat_penalty: 1.15,
                max_tokens: 450,
                stream: false,
            },
            GenerationProfile::Strict => GenerationParams {
                temperature: 0.4,
                top_p: 0.8,
                repeat_penalty: 1.2,
                max_tokens: 400,
                stream: false,
            },
        }
    }
}

/// Process-wide configuration, persisted on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub ai_name: String,
    pub model: String,
    pub params: GenerationParams,
    pub profile: GenerationProfile,
    pub personality: PersonalityTraits,
    pub persona_id: Option<String>,
    pub base_url: String,
    pub memory_enabled: bool,
    pub safety: SafetySettings,
    pub dark_theme: bool,
    pub show_timestamps: bool,
    pub show_typing_indicator: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            ai_name: "Mira".to_string(),
            model: "llama2".to_string(),
            params: GenerationParams::default(),
            profile: GenerationProfile::Balanced,
            personality: PersonalityTraits::default(),
            persona_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            memory_enabled: true,
            safety: SafetySettings::default(),
            dark_theme: true,
            show_timestamps: true,
            show_typing_indicator: true,
        }
    }
}

/// Error returned by [`SettingsStore::import_all`] for malformed backups.
#[derive(Debug)]
pub enum ImportError {
    /// The payload is not valid JSON.
    InvalidJson(serde_json::Error),

    /// The payload parses but is not a recognized backup (missing version).
    InvalidFormat,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::InvalidJson(err) => write!(f, "Failed to parse backup data: {err}"),
            ImportError::InvalidFormat => write!(f, "Invalid backup format"),
        }
    }
}

impl StdError for ImportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ImportError::InvalidJson(err) => Some(err),
            ImportError::InvalidFormat => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct BackupEnvelope {
    version: String,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<AppSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_personas: Option<Vec<PersonaTemplate>>,
}

/// Single owner of the active [`AppSettings`], responsible for
/// persistence-on-change.
pub struct SettingsStore {
    store: Box<dyn StorageBackend>,
    settings: AppSettings,
}

impl SettingsStore {
    /// Load settings from the backing store, falling back to defaults when the
    /// record is missing or unreadable.
    pub fn load(store: Box<dyn StorageBackend>) -> Self {
        let settings = read_json(store.as_ref(), SETTINGS_KEY).unwrap_or_default();
        Self { store, settings }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Apply a mutation and persist the result.
    pub fn update(&mut self, mutate: impl FnOnce(&mut AppSettings)) {
        mutate(&mut self.settings);
        write_json(self.store.as_mut(), SETTINGS_KEY, &self.settings);
    }

    /// Reset settings to defaults and persist.
    pub fn reset(&mut self) {
        self.settings = AppSettings::default();
        write_json(self.store.as_mut(), SETTINGS_KEY, &self.settings);
    }

    pub fn custom_personas(&self) -> Vec<PersonaTemplate> {
        read_json(self.store.as_ref(), CUSTOM_PERSONAS_KEY).unwrap_or_default()
    }

    pub fn save_custom_personas(&mut self, personas: &[PersonaTemplate]) {
        write_json(self.store.as_mut(), CUSTOM_PERSONAS_KEY, &personas);
    }

    /// Export settings and custom personas as a versioned JSON backup.
    pub fn export_all(&self) -> String {
        let envelope = BackupEnvelope {
            version: "1.0".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            settings: Some(self.settings.clone()),
            custom_personas: Some(self.custom_personas()),
        };
        serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| "{}".to_string())
    }

    /// Import a backup produced by [`SettingsStore::export_all`].
    ///
    /// Returns a structured error instead of panicking so batch-import callers
    /// can continue past a bad payload.
    pub fn import_all(&mut self, json: &str) -> Result<(), ImportError> {
        let raw: serde_json::Value = serde_json::from_str(json).map_err(ImportError::InvalidJson)?;
        if raw.get("version").and_then(|v| v.as_str()).is_none() {
            return Err(ImportError::InvalidFormat);
        }
        let envelope: BackupEnvelope =
            serde_json::from_value(raw).map_err(ImportError::InvalidJson)?;
        if let Some(settings) = envelope.settings {
            self.settings = settings;
            write_json(self.store.as_mut(), SETTINGS_KEY, &self.settings);
        }
        if let Some(personas) = envelope.custom_personas {
            self.save_custom_personas(&personas);
        }
        Ok(())
    }

    /// Whether the age-verification gate has been completed.
    pub fn age_verified(&self) -> bool {
        self.settings.safety.age_verified
    }

    pub fn set_age_verified(&mut self, verified: bool) {
        self.update(|s| s.safety.age_verified = verified);
    }
}
