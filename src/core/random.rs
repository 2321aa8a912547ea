//! Randomness seam for the presentation heuristics.
//!
//! The session orchestrator rolls dice for bubble splitting, image drops,
//! and typing delays. Routing those rolls through [`RandomSource`] lets
//! tests script every branch deterministically.

/// Source of random draws.
pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        // Top 53 bits give a uniform float in [0, 1).
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        unit < p
    }

    /// Uniform index into a collection of `len` elements. `len` must be
    /// non-zero.
    fn pick_index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }

    /// Uniform draw from `[lo, hi]` inclusive.
    fn range_u64(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            return lo;
        }
        lo + self.next_u64() % (hi - lo + 1)
    }
}

/// OS-backed randomness for production use.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        // On failure the draw degrades to zero rather than aborting a chat.
        let _ = getrandom::fill(&mut bytes);
        u64::from_le_bytes(bytes)
    }
}

/// Scripted draws for tests. A `0` makes `chance` succeed and `pick_index`
/// return 0; `u64::MAX` makes `chance` fail. Draws past the end of the
/// script repeat the last value.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<u64>,
    cursor: usize,
}

#[cfg(test)]
impl SequenceRandom {
    pub fn new(values: impl Into<Vec<u64>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty());
        Self { values, cursor: 0 }
    }
}

#[cfg(test)]
impl RandomSource for SequenceRandom {
    fn next_u64(&mut self) -> u64 {
        let value = self.values[self.cursor.min(self.values.len() - 1)];
        self.cursor += 1;
        value
    }
}
