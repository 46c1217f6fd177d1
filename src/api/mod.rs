//! Question bank access.

mod client;
mod types;

pub use client::TriviaClient;
pub use types::{decode_html, parse_categories, parse_questions, response_code_message};
