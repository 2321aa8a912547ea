//! Personality trait dials shared by contacts, personas, and the prompt
//! composer.

use serde::{Deserialize, Serialize};

/// The ten personality dials that shape a companion's voice.
///
/// Each dial is an intensity from 0 to 100. Values are clamped on
/// construction; deserialized values outside the range are rejected by
/// [`PersonalityTraits::in_range`] where validation matters (persona import).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityTraits {
    pub flirtatiousness: u8,
    pub dominance: u8,
    pub sensuality: u8,
    pub emotional_depth: u8,
    pub adventurousness: u8,
    pub playfulness: u8,
    pub submissiveness: u8,
    pub confidence: u8,
    pub creativity: u8,
    pub responsiveness: u8,
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self {
            flirtatiousness: 80,
            dominance: 50,
            sensuality: 85,
            emotional_depth: 75,
            adventurousness: 70,
            playfulness: 90,
            submissiveness: 40,
            confidence: 85,
            creativity: 80,
            responsiveness: 95,
        }
    }
}

impl PersonalityTraits {
    /// All ten dial values in declaration order.
    pub fn values(&self) -> [u8; 10] {
        [
            self.flirtatiousness,
            self.dominance,
            self.sensuality,
            self.emotional_depth,
            self.adventurousness,
            self.playfulness,
            self.submissiveness,
            self.confidence,
            self.creativity,
            self.responsiveness,
        ]
    }

    /// Whether every dial sits within [0, 100].
    pub fn in_range(&self) -> bool {
        self.values().iter().all(|&v| v <= 100)
    }

    /// A copy with every dial clamped into [0, 100].
    pub fn clamped(&self) -> Self {
        let mut clamped = *self;
        for value in [
            &mut clamped.flirtatiousness,
            &mut clamped.dominance,
            &mut clamped.sensuality,
            &mut clamped.emotional_depth,
            &mut clamped.adventurousness,
            &mut clamped.playfulness,
            &mut clamped.submissiveness,
            &mut clamped.confidence,
            &mut clamped.creativity,
            &mut clamped.responsiveness,
        ] {
            *value = (*value).min(100);
        }
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_traits_are_in_range() {
        assert!(PersonalityTraits::default().in_range());
    }

    #[test]
    fn clamping_caps_out_of_range_dials() {
        let traits = PersonalityTraits {
            playfulness: 250,
            ..Default::default()
        };
        assert!(!traits.in_range());
        let clamped = traits.clamped();
        assert_eq!(clamped.playfulness, 100);
        assert!(clamped.in_range());
    }

    #[test]
    fn serde_round_trip_uses_camel_case_keys() {
        let json = serde_json::to_string(&PersonalityTraits::default()).unwrap();
        assert!(json.contains("\"emotionalDepth\""));
        let back: PersonalityTraits = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PersonalityTraits::default());
    }
}
