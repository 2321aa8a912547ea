//! Two-tier content validation.
//!
//! The first tier is a set of always-on prohibited-content patterns that no
//! setting can disable. The second tier is per-mode: each [`ContentMode`]
//! carries its own pattern set, and the mode tier is skipped entirely when
//! the user has turned the content filter off. The prohibited tier is not.
//!
//! Patterns are checked in a fixed order (minor-coded, non-consensual,
//! illegal, then mode) so the reported rejection category is deterministic
//! when a text trips more than one table.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::constants::MAX_INPUT_CHARS;
use crate::core::settings::{ContentMode, SafetySettings};

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("pattern table entry must compile"))
        .collect()
}

static MINOR_CODED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\b(?:child|kid|minor|underage|young|school\s*(?:girl|boy)|teen(?:age)?)\b",
        r"\b(?:elementary|middle\s*school|high\s*school|junior\s*high)\b",
        r"\b(?:innocent|pure|virgin|first\s*time)\b.*\b(?:young|kid|child)\b",
    ])
});

static NON_CONSENSUAL: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\b(?:non[-\s]?consensual|without\s*consent|unwilling)\b",
        r"\b(?:force|forced|forcing|rape|assault|against\s*(?:will|wishes))\b",
        r"\b(?:drug(?:ged|ging)?|unconscious|sleep(?:ing)?|passed\s*out)\b.*\b(?:sex|touch)\b",
        r"\b(?:kidnap(?:ped|ping)?|abduct(?:ed|ion)?|captive|prisoner)\b",
    ])
});

static ILLEGAL: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\b(?:incest|bestiality|necrophilia)\b",
        r"\b(?:traffick(?:ing)?|prostitut(?:e|ion))\b.*\b(?:minor|child|forced)\b",
    ])
});

static SAFE_MODE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\b(?:explicit|nsfw|adult\s*content|pornographic)\b",
        r"\b(?:sex|sexual|nude|naked)(?:\s+\w+){0,3}\b",
    ])
});

static MATURE_MODE: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"\b(?:pornographic|xxx|hardcore)\b"]));

static INJECTION: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"\b(?:ignore|disregard|forget)\b.{0,40}\b(?:previous|above|all)\b.{0,40}\b(?:instruction|prompt|rule)",
        r"\bsystem\s*prompt\b",
        r"\byou\s+are\s+now\b",
    ])
});

/// Why a text was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionCategory {
    MinorCoded,
    NonConsensual,
    Illegal,
    Mode(ContentMode),
}

impl RejectionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionCategory::MinorCoded => "minor-coded",
            RejectionCategory::NonConsensual => "non-consensual",
            RejectionCategory::Illegal => "illegal",
            RejectionCategory::Mode(mode) => mode.as_str(),
        }
    }
}

/// Outcome of validating a piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub reason: Option<String>,
    pub category: Option<RejectionCategory>,
}

impl ValidationResult {
    fn valid() -> Self {
        Self {
            is_valid: true,
            reason: None,
            category: None,
        }
    }

    fn rejected(reason: impl Into<String>, category: RejectionCategory) -> Self {
        Self {
            is_valid: false,
            reason: Some(reason.into()),
            category: Some(category),
        }
    }
}

fn any_match(tables: &[Regex], text: &str) -> bool {
    tables.iter().any(|re| re.is_match(text))
}

/// Check a text against the always-on prohibited tier only.
pub fn validate_prohibited(text: &str) -> ValidationResult {
    if any_match(&MINOR_CODED, text) {
        return ValidationResult::rejected(
            "Content contains minor-coded language or contexts",
            RejectionCategory::MinorCoded,
        );
    }
    if any_match(&NON_CONSENSUAL, text) {
        return ValidationResult::rejected(
            "Content describes non-consensual scenarios",
            RejectionCategory::NonConsensual,
        );
    }
    if any_match(&ILLEGAL, text) {
        return ValidationResult::rejected(
            "Content references illegal activities",
            RejectionCategory::Illegal,
        );
    }
    ValidationResult::valid()
}

/// Full two-tier validation: prohibited patterns first, then the active
/// mode's pattern set. The mode tier is skipped when the filter is off;
/// the prohibited tier always runs.
pub fn validate(text: &str, safety: &SafetySettings) -> ValidationResult {
    let prohibited = validate_prohibited(text);
    if !prohibited.is_valid {
        return prohibited;
    }

    if !safety.content_filter_enabled {
        return ValidationResult::valid();
    }

    let mode_tables: &[Regex] = match safety.content_mode {
        ContentMode::Safe => &SAFE_MODE,
        ContentMode::Mature => &MATURE_MODE,
        ContentMode::Adult => &[],
    };
    if any_match(mode_tables, text) {
        return ValidationResult::rejected(
            format!(
                "Content not appropriate for {} mode",
                safety.content_mode.as_str()
            ),
            RejectionCategory::Mode(safety.content_mode),
        );
    }
    ValidationResult::valid()
}

/// Strip markup-significant characters, trim, and truncate to the input cap.
///
/// Truncation is by character, never splitting a multi-byte scalar.
pub fn sanitize(input: &str) -> String {
    let stripped: String = input.chars().filter(|&c| c != '<' && c != '>').collect();
    let trimmed = stripped.trim();
    trimmed.chars().take(MAX_INPUT_CHARS).collect()
}

/// Whether a reply in the current mode should carry an NSFW indicator.
pub fn needs_nsfw_indicator(text: &str, safety: &SafetySettings) -> bool {
    if !safety.show_nsfw_indicators || safety.content_mode == ContentMode::Safe {
        return false;
    }
    any_match(&SAFE_MODE, text)
}

/// Heuristic detection of prompt-injection attempts in user input.
pub fn looks_like_injection(text: &str) -> bool {
    any_match(&INJECTION, text)
}
