use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use trivia_quiz::config::{
    Config, DEFAULT_AMOUNT, DEFAULT_API_URL, DEFAULT_CATEGORY, DEFAULT_TIME_PER_QUESTION,
    DEFAULT_TRANSITION_MS, FormPreset, LogConfig,
};
use trivia_quiz::logging::init_logging;
use trivia_quiz::{Difficulty, TriviaQuiz};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the Open Trivia Database compatible API
    #[arg(long, env = "TRIVIA_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Category id preselected in the topic form
    #[arg(short, long, default_value_t = DEFAULT_CATEGORY)]
    category: u32,

    /// Difficulty preselected in the topic form
    #[arg(short, long, value_enum, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,

    /// Number of questions preselected in the topic form
    #[arg(short, long, default_value_t = DEFAULT_AMOUNT)]
    amount: u32,

    /// Seconds per question preselected in the topic form
    #[arg(short, long, default_value_t = DEFAULT_TIME_PER_QUESTION)]
    time: u32,

    /// Pause in milliseconds before the next question is shown
    #[arg(long, default_value_t = DEFAULT_TRANSITION_MS)]
    transition_ms: u64,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            api_url: args.api_url,
            preset: FormPreset {
                category: args.category,
                difficulty: args.difficulty,
                amount: args.amount,
                time_per_question: args.time,
            },
            transition_delay: Duration::from_millis(args.transition_ms),
            log: LogConfig {
                file: args.log_file,
                level: args.log_level,
            },
        }
    }
}

#[tokio::main]
async fn main() {
    let config = Config::from(Args::parse());

    if let Err(e) = init_logging(&config.log) {
        eprintln!("Error setting up logging: {}", e.user_message());
        std::process::exit(1);
    }

    let quiz = match TriviaQuiz::new(&config) {
        Ok(quiz) => quiz,
        Err(e) => {
            eprintln!("Error starting quiz: {}", e.user_message());
            std::process::exit(1);
        }
    };

    if let Err(e) = quiz.run().await {
        tracing::error!(error = %e, "quiz exited with an error");
        eprintln!("Error running quiz: {}", e.user_message());
        std::process::exit(1);
    }
}
