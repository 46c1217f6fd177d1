//! Wire payloads of the question bank and their conversion into models.

use serde::Deserialize;

use crate::error::{QuizError, Result};
use crate::models::{Category, QuizQuestion};

#[derive(Debug, Deserialize)]
pub struct CategoriesResponse {
    pub trivia_categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionsResponse {
    pub response_code: u32,
    #[serde(default)]
    pub results: Vec<RawQuestion>,
}

/// A question exactly as served, with HTML entities still encoded.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestion {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

impl From<RawQuestion> for QuizQuestion {
    fn from(raw: RawQuestion) -> Self {
        QuizQuestion {
            category: decode_html(&raw.category),
            difficulty: raw.difficulty,
            text: decode_html(&raw.question),
            correct_answer: decode_html(&raw.correct_answer),
            incorrect_answers: raw.incorrect_answers.iter().map(|a| decode_html(a)).collect(),
            selected: None,
        }
    }
}

pub fn decode_html(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Meaning of a non-zero `response_code`.
pub fn response_code_message(code: u32) -> String {
    match code {
        1 => "not enough questions for this category and difficulty".to_string(),
        2 => "the question bank rejected the request parameters".to_string(),
        3 => "session token not found".to_string(),
        4 => "session token has returned all available questions".to_string(),
        5 => "too many requests, wait a few seconds".to_string(),
        other => format!("unexpected response code {other}"),
    }
}

pub fn parse_categories(body: &str) -> Result<Vec<Category>> {
    let response: CategoriesResponse = serde_json::from_str(body)?;
    Ok(response.trivia_categories)
}

pub fn parse_questions(body: &str) -> Result<Vec<QuizQuestion>> {
    let response: QuestionsResponse = serde_json::from_str(body)?;

    if response.response_code != 0 {
        return Err(QuizError::InvalidResponse(response_code_message(
            response.response_code,
        )));
    }

    Ok(response.results.into_iter().map(QuizQuestion::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUESTIONS_BODY: &str = r#"{
        "response_code": 0,
        "results": [
            {
                "category": "Entertainment: Film",
                "type": "multiple",
                "difficulty": "easy",
                "question": "Who directed &quot;Jaws&quot;?",
                "correct_answer": "Steven Spielberg",
                "incorrect_answers": ["George Lucas", "Ridley Scott", "James Cameron"]
            },
            {
                "category": "Science &amp; Nature",
                "type": "multiple",
                "difficulty": "easy",
                "question": "What&#039;s the chemical symbol for gold?",
                "correct_answer": "Au",
                "incorrect_answers": ["Ag", "Gd", "Go"]
            }
        ]
    }"#;

    #[test]
    fn test_parse_questions_decodes_entities() {
        let questions = parse_questions(QUESTIONS_BODY).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text, "Who directed \"Jaws\"?");
        assert_eq!(questions[1].text, "What's the chemical symbol for gold?");
        assert_eq!(questions[1].category, "Science & Nature");
        assert_eq!(questions[1].difficulty, "easy");
        assert_eq!(questions[0].incorrect_answers.len(), 3);
        assert!(questions.iter().all(|q| q.selected.is_none()));
    }

    #[test]
    fn test_nonzero_response_code_is_invalid_response() {
        let err = parse_questions(r#"{"response_code": 1, "results": []}"#).unwrap_err();
        match err {
            QuizError::InvalidResponse(message) => assert!(message.contains("not enough questions")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_body_is_invalid_response() {
        let err = parse_questions(r#"{"results": "nope"}"#).unwrap_err();
        assert!(matches!(err, QuizError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_categories() {
        let body = r#"{"trivia_categories":[{"id":9,"name":"General Knowledge"},{"id":10,"name":"Entertainment: Books"}]}"#;
        let categories = parse_categories(body).unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].id, 9);
        assert_eq!(categories[1].name, "Entertainment: Books");
    }

    #[test]
    fn test_decoded_answers_compare_equal() {
        let raw = RawQuestion {
            category: String::new(),
            difficulty: "hard".to_string(),
            question: "Q".to_string(),
            correct_answer: "Rock &amp; Roll".to_string(),
            incorrect_answers: vec!["Jazz".to_string()],
        };
        let question = QuizQuestion::from(raw);
        assert!(question.is_candidate("Rock & Roll"));
    }
}
