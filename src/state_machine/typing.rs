//! Artificial typing delay before a bot message is shown

use std::time::Duration;

/// Reading-speed based delay, bounded on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingPolicy {
    pub chars_per_word: u64,
    pub words_per_minute: u64,
    pub min: Duration,
    pub max: Duration,
}

impl Default for TypingPolicy {
    fn default() -> Self {
        Self {
            chars_per_word: 5,
            words_per_minute: 30,
            min: Duration::from_millis(1000),
            max: Duration::from_millis(5000),
        }
    }
}

impl TypingPolicy {
    /// `clamp(len / chars_per_word / words_per_minute * 60s, min, max)`
    pub fn delay_for(&self, text: &str) -> Duration {
        let chars = u64::try_from(text.chars().count()).unwrap_or(u64::MAX);
        let per_minute = self.chars_per_word.saturating_mul(self.words_per_minute).max(1);
        let millis = chars.saturating_mul(60_000) / per_minute;
        Duration::from_millis(millis).clamp(self.min, self.max)
    }
}
