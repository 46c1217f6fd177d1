//! Runtime configuration and the fixed option tables of the topic form.

use std::path::PathBuf;
use std::time::Duration;

use crate::models::Difficulty;

pub const DEFAULT_API_URL: &str = "https://opentdb.com";

/// General Knowledge.
pub const DEFAULT_CATEGORY: u32 = 9;
pub const DEFAULT_AMOUNT: u32 = 10;
pub const DEFAULT_TIME_PER_QUESTION: u32 = 30;
pub const DEFAULT_TRANSITION_MS: u64 = 500;

pub const QUESTION_COUNTS: [u32; 4] = [5, 10, 15, 20];
pub const TIME_OPTIONS: [u32; 4] = [15, 30, 45, 60];

/// Initial values of the topic selection form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPreset {
    pub category: u32,
    pub difficulty: Difficulty,
    pub amount: u32,
    pub time_per_question: u32,
}

impl Default for FormPreset {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY,
            difficulty: Difficulty::Easy,
            amount: DEFAULT_AMOUNT,
            time_per_question: DEFAULT_TIME_PER_QUESTION,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Where log lines go. Nothing is logged when unset, since the
    /// terminal belongs to the UI.
    pub file: Option<PathBuf>,
    /// Default filter directive when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub preset: FormPreset,
    /// Pause between confirming "next" and showing the next question.
    pub transition_delay: Duration,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            preset: FormPreset::default(),
            transition_delay: Duration::from_millis(DEFAULT_TRANSITION_MS),
            log: LogConfig::default(),
        }
    }
}

/// Extends `options` with `value` when it is not already listed, keeping the
/// list sorted, so presets outside the table can still be selected.
pub fn options_with(options: &[u32], value: u32) -> Vec<u32> {
    let mut all = options.to_vec();
    if !all.contains(&value) {
        all.push(value);
        all.sort_unstable();
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_with_known_value_is_unchanged() {
        assert_eq!(options_with(&QUESTION_COUNTS, 10), QUESTION_COUNTS);
    }

    #[test]
    fn test_options_with_custom_value_is_sorted_in() {
        assert_eq!(options_with(&TIME_OPTIONS, 20), [15, 20, 30, 45, 60]);
    }
}
