//! HTTP client for the trivia question bank.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};

use crate::error::{QuizError, Result};
use crate::models::{Category, QuizQuestion, QuizSettings};

use super::types::{parse_categories, parse_questions};

const USER_AGENT_VALUE: &str = concat!("trivia-quiz/", env!("CARGO_PKG_VERSION"));

/// Only multiple-choice questions are requested.
const QUESTION_TYPE: &str = "multiple";

#[derive(Debug, Clone)]
pub struct TriviaClient {
    client: reqwest::Client,
    base_url: String,
}

impl TriviaClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url: String = base_url.into();
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| QuizError::NetworkFailure(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn categories_url(&self) -> String {
        format!("{}/api_category.php", self.base_url)
    }

    pub fn questions_url(&self) -> String {
        format!("{}/api.php", self.base_url)
    }

    /// Query parameters for a question request.
    pub fn question_query(settings: &QuizSettings) -> [(&'static str, String); 4] {
        [
            ("amount", settings.amount().to_string()),
            ("category", settings.category().to_string()),
            ("difficulty", settings.difficulty().as_str().to_string()),
            ("type", QUESTION_TYPE.to_string()),
        ]
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        let url = self.categories_url();
        tracing::debug!("fetching categories from {}", url);

        let response = self.client.get(&url).send().await?;
        let body = read_body(response).await?;
        parse_categories(&body)
    }

    pub async fn questions(&self, settings: &QuizSettings) -> Result<Vec<QuizQuestion>> {
        let url = self.questions_url();
        tracing::debug!(
            amount = settings.amount(),
            category = settings.category(),
            difficulty = %settings.difficulty(),
            "fetching questions from {}",
            url
        );

        let response = self
            .client
            .get(&url)
            .query(&Self::question_query(settings))
            .send()
            .await?;
        let body = read_body(response).await?;
        parse_questions(&body)
    }
}

async fn read_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(QuizError::NetworkFailure(format!(
            "server answered with status {status}"
        )));
    }
    Ok(response.text().await?)
}
