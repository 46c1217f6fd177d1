/// A committed answer for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// The player picked one of the candidates.
    Given(String),
    /// Time ran out before anything was committed, or the player moved on
    /// without choosing.
    Skipped,
}

impl Answer {
    pub fn as_given(&self) -> Option<&str> {
        match self {
            Answer::Given(text) => Some(text),
            Answer::Skipped => None,
        }
    }
}

/// One multiple-choice question, with all text already entity-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub category: String,
    pub difficulty: String,
    pub text: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    pub selected: Option<Answer>,
}

impl QuizQuestion {
    pub fn new(
        text: impl Into<String>,
        correct_answer: impl Into<String>,
        incorrect_answers: Vec<String>,
    ) -> Self {
        Self {
            category: String::new(),
            difficulty: String::new(),
            text: text.into(),
            correct_answer: correct_answer.into(),
            incorrect_answers,
            selected: None,
        }
    }

    /// Correct answer followed by the incorrect ones, in source order.
    pub fn candidates(&self) -> Vec<String> {
        std::iter::once(&self.correct_answer)
            .chain(self.incorrect_answers.iter())
            .cloned()
            .collect()
    }

    pub fn is_candidate(&self, answer: &str) -> bool {
        self.correct_answer == answer || self.incorrect_answers.iter().any(|a| a == answer)
    }

    /// True only for a committed, non-skipped answer equal to the correct one.
    pub fn is_correct(&self) -> bool {
        self.selected
            .as_ref()
            .and_then(Answer::as_given)
            .is_some_and(|given| given == self.correct_answer)
    }

    pub fn is_answered(&self) -> bool {
        matches!(self.selected, Some(Answer::Given(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> QuizQuestion {
        QuizQuestion::new(
            "Capital of France?",
            "Paris",
            vec!["Lyon".to_string(), "Nice".to_string(), "Lille".to_string()],
        )
    }

    #[test]
    fn test_candidates_keep_source_order() {
        assert_eq!(question().candidates(), ["Paris", "Lyon", "Nice", "Lille"]);
    }

    #[test]
    fn test_is_correct_requires_exact_match() {
        let mut q = question();
        assert!(!q.is_correct());

        q.selected = Some(Answer::Given("paris".to_string()));
        assert!(!q.is_correct());

        q.selected = Some(Answer::Given("Paris".to_string()));
        assert!(q.is_correct());

        q.selected = Some(Answer::Skipped);
        assert!(!q.is_correct());
        assert!(!q.is_answered());
    }
}
