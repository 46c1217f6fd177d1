use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// The question bank serves at most this many questions per request.
pub const MIN_AMOUNT: u32 = 1;
pub const MAX_AMOUNT: u32 = 50;

pub const MIN_TIME_PER_QUESTION: u32 = 1;
pub const MAX_TIME_PER_QUESTION: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(QuizError::InvalidSettings(format!(
                "Unknown difficulty: {other}"
            ))),
        }
    }
}

/// Parameters of one quiz run.
///
/// Only constructible through [`QuizSettings::new`], so a value of this type
/// is always within the allowed ranges. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    category: u32,
    difficulty: Difficulty,
    amount: u32,
    time_per_question: u32,
}

impl QuizSettings {
    pub fn new(
        category: u32,
        difficulty: Difficulty,
        amount: u32,
        time_per_question: u32,
    ) -> Result<Self, QuizError> {
        if category == 0 {
            return Err(QuizError::InvalidSettings(
                "Category must be a valid category id".to_string(),
            ));
        }

        if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&amount) {
            return Err(QuizError::InvalidSettings(format!(
                "Number of questions must be between {MIN_AMOUNT} and {MAX_AMOUNT}"
            )));
        }

        if !(MIN_TIME_PER_QUESTION..=MAX_TIME_PER_QUESTION).contains(&time_per_question) {
            return Err(QuizError::InvalidSettings(format!(
                "Time per question must be between {MIN_TIME_PER_QUESTION} and {MAX_TIME_PER_QUESTION} seconds"
            )));
        }

        Ok(Self {
            category,
            difficulty,
            amount,
            time_per_question,
        })
    }

    pub fn category(&self) -> u32 {
        self.category
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn time_per_question(&self) -> u32 {
        self.time_per_question
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_settings_in_range() {
        let settings = QuizSettings::new(9, Difficulty::Easy, 10, 30).unwrap();
        assert_eq!(settings.category(), 9);
        assert_eq!(settings.amount(), 10);
        assert_eq!(settings.time_per_question(), 30);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(QuizSettings::new(0, Difficulty::Easy, 10, 30).is_err());
        assert!(QuizSettings::new(9, Difficulty::Easy, 0, 30).is_err());
        assert!(QuizSettings::new(9, Difficulty::Easy, 51, 30).is_err());
        assert!(QuizSettings::new(9, Difficulty::Hard, 10, 0).is_err());
        assert!(QuizSettings::new(9, Difficulty::Hard, 10, 601).is_err());
    }

    #[test]
    fn test_rejection_is_invalid_settings() {
        let err = QuizSettings::new(9, Difficulty::Easy, 0, 30).unwrap_err();
        assert!(matches!(err, QuizError::InvalidSettings(_)));
    }

    #[test]
    fn test_difficulty_round_trips_through_str() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.as_str().parse::<Difficulty>().unwrap(), difficulty);
        }
        assert!("extreme".parse::<Difficulty>().is_err());
    }
}
