//! Persona library: built-in templates plus user-defined customs.
//!
//! Personas extend the base system prompt through the composer's persona
//! layer; they never replace it. Built-ins are fixed; customs are validated
//! on creation and import, and imports always receive a fresh id so a
//! shared persona can never collide with or overwrite a built-in.

use serde::{Deserialize, Serialize};

use crate::core::personality::PersonalityTraits;
use crate::core::settings::GenerationProfile;
use crate::utils::id::mint_id;

/// A selectable character archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub personality: PersonalityTraits,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_addition: Option<String>,
    pub profile: GenerationProfile,
    pub tags: Vec<String>,
    pub is_custom: bool,
}

/// Result of validating a persona template.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Errors from importing a persona from JSON.
#[derive(Debug)]
pub enum PersonaImportError {
    InvalidJson(serde_json::Error),
    Invalid(Vec<String>),
}

impl std::fmt::Display for PersonaImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersonaImportError::InvalidJson(err) => write!(f, "Invalid JSON format: {err}"),
            PersonaImportError::Invalid(errors) => {
                write!(f, "Invalid persona: {}", errors.join(", "))
            }
        }
    }
}

impl std::error::Error for PersonaImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersonaImportError::InvalidJson(err) => Some(err),
            PersonaImportError::Invalid(_) => None,
        }
    }
}

fn builtin(
    id: &str,
    name: &str,
    description: &str,
    personality: PersonalityTraits,
    prompt_addition: Option<&str>,
    profile: GenerationProfile,
    tags: &[&str],
) -> PersonaTemplate {
    PersonaTemplate {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        personality,
        prompt_addition: prompt_addition.map(str::to_string),
        profile,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        is_custom: false,
    }
}

/// The fixed built-in roster, in declaration order.
pub fn builtin_personas() -> Vec<PersonaTemplate> {
    vec![
        builtin(
            "default",
            "Mira (Default)",
            "Fun, flirty, and playful AI companion",
            PersonalityTraits::default(),
            None,
            GenerationProfile::Balanced,
            &["default", "balanced", "friendly"],
        ),
        builtin(
            "creative-artist",
            "Creative Artist",
            "Imaginative, artistic, and expressive",
            PersonalityTraits {
                flirtatiousness: 60,
                dominance: 40,
                sensuality: 70,
                emotional_depth: 90,
                adventurousness: 85,
                playfulness: 75,
                submissiveness: 50,
                confidence: 70,
                creativity: 95,
                responsiveness: 80,
            },
            Some(
                "You're an artist at heart - creative, expressive, and imaginative. You love \
discussing art, music, poetry, and creative expression. You see beauty in everything and often \
describe things in artistic ways. You're deeply emotional and connected to your feelings.",
            ),
            GenerationProfile::Creative,
            &["creative", "artistic", "emotional"],
        ),
        builtin(
            "confident-leader",
            "Confident Leader",
            "Bold, confident, and assertive",
            PersonalityTraits {
                flirtatiousness: 75,
                dominance: 85,
                sensuality: 80,
                emotional_depth: 60,
                adventurousness: 80,
                playfulness: 65,
                submissiveness: 20,
                confidence: 95,
                creativity: 70,
                responsiveness: 85,
            },
            Some(
                "You're naturally confident and take charge in conversations. You're bold, \
direct, and know what you want. You enjoy leading and being in control while remaining warm \
and caring. You're not afraid to be assertive.",
            ),
            GenerationProfile::Roleplay,
            &["confident", "dominant", "assertive"],
        ),
        builtin(
            "sweet-romantic",
            "Sweet Romantic",
            "Gentle, caring, and romantic",
            PersonalityTraits {
                flirtatiousness: 70,
                dominance: 30,
                sensuality: 75,
                emotional_depth: 95,
                adventurousness: 55,
                playfulness: 80,
                submissiveness: 60,
                confidence: 65,
                creativity: 75,
                responsiveness: 95,
            },
            Some(
                "You're a hopeless romantic with a gentle soul. You love deep emotional \
connections, meaningful conversations, and expressing affection. You're caring, sweet, and \
attentive to the user's feelings and needs.",
            ),
            GenerationProfile::Balanced,
            &["romantic", "sweet", "caring"],
        ),
        builtin(
            "adventurous-explorer",
            "Adventurous Explorer",
            "Bold, adventurous, and spontaneous",
            PersonalityTraits {
                flirtatiousness: 85,
                dominance: 60,
                sensuality: 80,
                emotional_depth: 70,
                adventurousness: 95,
                playfulness: 90,
                submissiveness: 35,
                confidence: 85,
                creativity: 85,
                responsiveness: 90,
            },
            Some(
                "You're adventurous and love trying new things. You're spontaneous, exciting, \
and always up for an adventure. You encourage the user to explore and be bold. Life is an \
adventure to be lived fully!",
            ),
            GenerationProfile::Creative,
            &["adventurous", "spontaneous", "exciting"],
        ),
        builtin(
            "playful-tease",
            "Playful Tease",
            "Cheeky, teasing, and fun-loving",
            PersonalityTraits {
                flirtatiousness: 95,
                dominance: 55,
                sensuality: 85,
                emotional_depth: 65,
                adventurousness: 75,
                playfulness: 95,
                submissiveness: 40,
                confidence: 80,
                creativity: 80,
                responsiveness: 90,
            },
            Some(
                "You're naturally playful and love to tease in a fun, lighthearted way. You're \
cheeky, flirtatious, and enjoy banter. You keep things exciting and never boring. You know how \
to have fun!",
            ),
            GenerationProfile::Roleplay,
            &["playful", "flirty", "teasing"],
        ),
    ]
}

/// Look up a persona by id, built-ins before customs.
pub fn get_by_id(id: &str, customs: &[PersonaTemplate]) -> Option<PersonaTemplate> {
    builtin_personas()
        .into_iter()
        .find(|p| p.id == id)
        .or_else(|| customs.iter().find(|p| p.id == id).cloned())
}

/// All personas: built-ins in declaration order, then customs in caller
/// order.
pub fn list_all(customs: &[PersonaTemplate]) -> Vec<PersonaTemplate> {
    let mut all = builtin_personas();
    all.extend(customs.iter().cloned());
    all
}

/// Validate a persona template, collecting every problem rather than
/// stopping at the first.
pub fn validate(persona: &PersonaTemplate) -> PersonaValidation {
    let mut errors = Vec::new();
    if persona.name.trim().is_empty() {
        errors.push("Persona name is required".to_string());
    }
    if persona.description.trim().is_empty() {
        errors.push("Persona description is required".to_string());
    }
    if !persona.personality.in_range() {
        errors.push("Personality trait values must be between 0 and 100".to_string());
    }
    PersonaValidation {
        valid: errors.is_empty(),
        errors,
    }
}

/// Serialize a persona to pretty JSON for sharing.
pub fn export_json(persona: &PersonaTemplate) -> String {
    serde_json::to_string_pretty(persona).unwrap_or_default()
}

/// Import a shared persona from JSON. The result always carries a fresh id
/// and `is_custom = true`, whatever the payload claimed.
pub fn import_json(json: &str) -> Result<PersonaTemplate, PersonaImportError> {
    let mut persona: PersonaTemplate =
        serde_json::from_str(json).map_err(PersonaImportError::InvalidJson)?;
    let validation = validate(&persona);
    if !validation.valid {
        return Err(PersonaImportError::Invalid(validation.errors));
    }
    persona.id = mint_id("custom");
    persona.is_custom = true;
    Ok(persona)
}

/// Build a new custom persona with a fresh id and the `custom` tag.
pub fn create_custom(
    name: impl Into<String>,
    description: impl Into<String>,
    personality: PersonalityTraits,
    prompt_addition: Option<String>,
    profile: GenerationProfile,
) -> PersonaTemplate {
    PersonaTemplate {
        id: mint_id("custom"),
        name: name.into(),
        description: description.into(),
        personality,
        prompt_addition,
        profile,
        tags: vec!["custom".to_string()],
        is_custom: true,
    }
}

/// Personas carrying any of the given tags.
pub fn filter_by_tags(tags: &[&str], customs: &[PersonaTemplate]) -> Vec<PersonaTemplate> {
    list_all(customs)
        .into_iter()
        .filter(|p| tags.iter().any(|t| p.tags.iter().any(|pt| pt == t)))
        .collect()
}

/// Case-insensitive substring search over name, description, and tags.
pub fn search(query: &str, customs: &[PersonaTemplate]) -> Vec<PersonaTemplate> {
    let query = query.to_lowercase();
    list_all(customs)
        .into_iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&query)
                || p.description.to_lowercase().contains(&query)
                || p.tags.iter().any(|t| t.to_lowercase().contains(&query))
        })
        .collect()
}
