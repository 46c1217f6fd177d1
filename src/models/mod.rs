mod category;
mod question;
mod settings;

pub use category::Category;
pub use question::{Answer, QuizQuestion};
pub use settings::{
    Difficulty, QuizSettings, MAX_AMOUNT, MAX_TIME_PER_QUESTION, MIN_AMOUNT,
    MIN_TIME_PER_QUESTION,
};
