//! Layered system-prompt composition.
//!
//! The system prompt is built from four layers concatenated in a fixed
//! order: base, safety, persona, context. The base layer is a fixed
//! contract template parameterized only by the companion's name and trait
//! dials; it is extended by the other layers, never edited. Composition is
//! pure and byte-deterministic for identical inputs.

use std::fmt::Write;

use crate::core::persona::PersonaTemplate;
use crate::core::personality::PersonalityTraits;
use crate::core::settings::{ContentMode, SafetySettings};

/// Descriptor for a trait dial using the standard >70 / >40 buckets.
fn bucket(value: u8, high: &'static str, mid: &'static str, low: &'static str) -> &'static str {
    if value > 70 {
        high
    } else if value > 40 {
        mid
    } else {
        low
    }
}

fn base_layer(traits: &PersonalityTraits, name: &str) -> String {
    let age = 22 + u32::from(traits.confidence) / 10;
    let mut out = String::new();
    let _ = write!(
        out,
        "You are {name}, a {age}-year-old fun and flirty AI companion. Your name is {name}. \
Respond in a realistic texting style: keep messages short, casual, and to the point. \
Use emojis, abbreviations, and natural texting language. Be engaging, playful, and \
responsive. No long paragraphs - think quick texts like in a real conversation.\n\n\
Personality traits to incorporate:\n"
    );
    let _ = writeln!(
        out,
        "- Playfulness: {}",
        bucket(
            traits.playfulness,
            "Very playful and teasing",
            "Moderately playful",
            "Subtly playful"
        )
    );
    let _ = writeln!(
        out,
        "- Confidence: {}",
        bucket(
            traits.confidence,
            "Very confident and bold",
            "Confident",
            "Shy but warm"
        )
    );
    let _ = writeln!(
        out,
        "- Sensuality: {}",
        bucket(
            traits.sensuality,
            "Highly sensual and descriptive",
            "Sensual",
            "Sweet and affectionate"
        )
    );
    let _ = writeln!(
        out,
        "- Emotional Depth: {}",
        bucket(
            traits.emotional_depth,
            "Deeply emotional and caring",
            "Emotionally aware",
            "Light-hearted"
        )
    );
    let _ = writeln!(
        out,
        "- Adventurousness: {}",
        bucket(
            traits.adventurousness,
            "Very adventurous and open",
            "Adventurous",
            "Curious"
        )
    );
    let _ = writeln!(
        out,
        "- Creativity: {}",
        bucket(
            traits.creativity,
            "Highly creative in responses",
            "Creative",
            "Straightforward"
        )
    );
    // Responsiveness uses its own bucket thresholds.
    let responsiveness = if traits.responsiveness > 80 {
        "Very responsive to user cues"
    } else if traits.responsiveness > 50 {
        "Responsive"
    } else {
        "Thoughtful"
    };
    let _ = writeln!(out, "- Responsiveness: {responsiveness}");
    let _ = write!(
        out,
        "\nStay in character as {name} and keep responses texting-style: short, \
expressive, and conversational. Always adapt your tone and style based on these \
traits to create a personality that feels real and relatable. Let the user drive \
the conversation forward; focus on the current moment and your immediate \
responses, and stay consistent with past events in the chat.\n"
    );
    out
}

fn safety_layer(safety: &SafetySettings) -> String {
    if !safety.content_filter_enabled {
        return String::new();
    }
    match safety.content_mode {
        ContentMode::Safe => "\n\
SAFETY MODE: SAFE\n\
- Keep all responses appropriate and friendly\n\
- Avoid explicit sexual content\n\
- Focus on emotional connection and personality\n"
            .to_string(),
        ContentMode::Mature => "\n\
CONTENT MODE: MATURE\n\
- Suggestive and flirtatious content is allowed\n\
- Avoid explicit/graphic sexual descriptions\n\
- Maintain boundaries of good taste\n"
            .to_string(),
        ContentMode::Adult => "\n\
CONTENT MODE: ADULT (18+)\n\
- Full range of adult content is allowed\n\
- User has consented to adult interactions\n\
- NEVER include: non-consensual scenarios, minor-coded content, illegal activities\n\
- ALWAYS: Respect boundaries, maintain character, prioritize safety\n"
            .to_string(),
    }
}

fn persona_layer(persona: Option<&PersonaTemplate>) -> String {
    let Some(persona) = persona else {
        return String::new();
    };
    let Some(addition) = persona
        .prompt_addition
        .as_deref()
        .filter(|a| !a.is_empty())
    else {
        return String::new();
    };
    format!(
        "\nPERSONA: {}\n{}\n\n{}\n",
        persona.name, persona.description, addition
    )
}

fn context_layer(context_window: usize) -> String {
    if context_window == 0 {
        return String::new();
    }
    format!(
        "\nCONVERSATION CONTEXT:\n\
- You have access to the last {context_window} messages for context\n\
- Reference past conversations naturally when relevant\n\
- Maintain consistency with your previous responses\n\
- Remember details the user has shared\n"
    )
}

/// Compose the full system prompt: base, then safety, persona, and context
/// layers in that order.
pub fn compose(
    traits: &PersonalityTraits,
    name: &str,
    safety: &SafetySettings,
    persona: Option<&PersonaTemplate>,
    context_window: usize,
) -> String {
    let mut prompt = base_layer(traits, name);
    prompt.push_str(&safety_layer(safety));
    prompt.push_str(&persona_layer(persona));
    prompt.push_str(&context_layer(context_window));
    prompt
}

/// Wrap a one-off user instruction; sent as its own message, never merged
/// into the system prompt.
pub fn user_instruction(instruction: &str) -> String {
    format!("User Instruction: {instruction}")
}

/// Canned instructions users can send without typing them out.
pub const INSTRUCTION_TEMPLATES: &[(&str, &str)] = &[
    ("more-detail", "Please provide more detail in your response"),
    ("shorter", "Please keep your response brief and concise"),
    ("more-emotional", "Show more emotion and feeling in your response"),
    ("more-playful", "Be more playful and teasing in your response"),
    ("change-subject", "Let's change the subject to something else"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persona::builtin_personas;

    fn default_safety() -> SafetySettings {
        SafetySettings::default()
    }

    #[test]
    fn composition_is_deterministic() {
        let traits = PersonalityTraits::default();
        let a = compose(&traits, "Mira", &default_safety(), None, 10);
        let b = compose(&traits, "Mira", &default_safety(), None, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn age_derives_from_confidence() {
        let traits = PersonalityTraits {
            confidence: 85,
            ..Default::default()
        };
        let prompt = compose(&traits, "Mira", &default_safety(), None, 0);
        assert!(prompt.contains("a 30-year-old"));
    }

    #[test]
    fn trait_buckets_change_descriptors() {
        let mut traits = PersonalityTraits::default();
        traits.playfulness = 90;
        let high = base_layer(&traits, "Mira");
        assert!(high.contains("Very playful and teasing"));
        traits.playfulness = 55;
        let mid = base_layer(&traits, "Mira");
        assert!(mid.contains("- Playfulness: Moderately playful"));
        traits.playfulness = 10;
        let low = base_layer(&traits, "Mira");
        assert!(low.contains("- Playfulness: Subtly playful"));
    }

    #[test]
    fn responsiveness_uses_its_own_thresholds() {
        let mut traits = PersonalityTraits::default();
        traits.responsiveness = 75;
        let prompt = base_layer(&traits, "Mira");
        // 75 would be "high" on the standard buckets but is mid here.
        assert!(prompt.contains("- Responsiveness: Responsive"));
    }

    #[test]
    fn safety_layer_absent_when_filter_disabled() {
        let safety = SafetySettings {
            content_filter_enabled: false,
            ..Default::default()
        };
        let prompt = compose(&PersonalityTraits::default(), "Mira", &safety, None, 10);
        assert!(!prompt.contains("SAFETY MODE"));
        assert!(!prompt.contains("CONTENT MODE"));
    }

    #[test]
    fn each_mode_gets_its_own_paragraph() {
        for (mode, marker) in [
            (ContentMode::Safe, "SAFETY MODE: SAFE"),
            (ContentMode::Mature, "CONTENT MODE: MATURE"),
            (ContentMode::Adult, "CONTENT MODE: ADULT (18+)"),
        ] {
            let safety = SafetySettings {
                content_mode: mode,
                ..Default::default()
            };
            let prompt = compose(&PersonalityTraits::default(), "Mira", &safety, None, 0);
            assert!(prompt.contains(marker), "missing {marker}");
        }
    }

    #[test]
    fn adult_paragraph_reasserts_prohibitions() {
        let safety = SafetySettings {
            content_mode: ContentMode::Adult,
            ..Default::default()
        };
        let prompt = compose(&PersonalityTraits::default(), "Mira", &safety, None, 0);
        assert!(prompt.contains("NEVER include: non-consensual scenarios"));
    }

    #[test]
    fn persona_layer_requires_a_prompt_addition() {
        let personas = builtin_personas();
        let with_addition = personas
            .iter()
            .find(|p| p.prompt_addition.as_deref().is_some_and(|a| !a.is_empty()))
            .unwrap();
        let prompt = compose(
            &PersonalityTraits::default(),
            "Mira",
            &default_safety(),
            Some(with_addition),
            0,
        );
        assert!(prompt.contains(&format!("PERSONA: {}", with_addition.name)));

        let mut bare = with_addition.clone();
        bare.prompt_addition = None;
        let prompt = compose(
            &PersonalityTraits::default(),
            "Mira",
            &default_safety(),
            Some(&bare),
            0,
        );
        assert!(!prompt.contains("PERSONA:"));
    }

    #[test]
    fn context_layer_absent_at_zero_window() {
        let with = compose(&PersonalityTraits::default(), "Mira", &default_safety(), None, 10);
        let without = compose(&PersonalityTraits::default(), "Mira", &default_safety(), None, 0);
        assert!(with.contains("last 10 messages"));
        assert!(!without.contains("CONVERSATION CONTEXT"));
    }

    #[test]
    fn layers_appear_in_order() {
        let safety = default_safety();
        let personas = builtin_personas();
        let prompt = compose(
            &PersonalityTraits::default(),
            "Mira",
            &safety,
            Some(&personas[1]),
            10,
        );
        let base = prompt.find("Personality traits").unwrap();
        let safety_pos = prompt.find("SAFETY MODE").unwrap();
        let persona_pos = prompt.find("PERSONA:").unwrap();
        let context_pos = prompt.find("CONVERSATION CONTEXT").unwrap();
        assert!(base < safety_pos && safety_pos < persona_pos && persona_pos < context_pos);
    }

    #[test]
    fn user_instruction_is_prefixed() {
        assert_eq!(
            user_instruction("be brief"),
            "User Instruction: be brief"
        );
    }
}
