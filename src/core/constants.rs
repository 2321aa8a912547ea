//! Shared constants used across the application.
//!
//! The split/image probabilities and delay bounds are presentation heuristics
//! carried over as configurable constants; they model human multi-bubble
//! texting behavior and have no correctness criterion beyond staying bounded.

/// Maximum sanitized input length, in characters.
pub const MAX_INPUT_CHARS: usize = 4000;

/// Number of recent messages sent along for context when memory is enabled.
pub const MEMORY_WINDOW: usize = 10;

/// Probability that a long reply is split into multiple bubbles.
pub const SPLIT_PROBABILITY: f64 = 0.3;

/// Replies at or below this length (in characters) are never split.
pub const SPLIT_MIN_CHARS: usize = 100;

/// Probability that a supplementary image follows a reply.
pub const IMAGE_PROBABILITY: f64 = 0.3;

/// Delay range between consecutive reply bubbles, in milliseconds.
pub const BUBBLE_DELAY_MS: (u64, u64) = (600, 1800);

/// Delay before a supplementary image message, in milliseconds.
pub const IMAGE_DELAY_MS: (u64, u64) = (1200, 2600);

/// How many past image selections to avoid repeating.
pub const RECENT_IMAGE_WINDOW: usize = 5;

/// Interval between endpoint connectivity polls, in seconds.
pub const CONNECTIVITY_POLL_SECS: u64 = 30;

/// Placeholder content for replies withheld by the content validator.
pub const FILTERED_PLACEHOLDER: &str = "[filtered]";
