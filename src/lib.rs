//! # trivia-quiz
//!
//! A terminal trivia quiz backed by the Open Trivia Database.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trivia_quiz::{Config, QuizError, TriviaQuiz};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let quiz = TriviaQuiz::new(&Config::default())?;
//!
//!     // Take over the terminal until the user quits
//!     quiz.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! The quiz core ([`QuizMachine`]) has no I/O of its own and can be driven
//! directly:
//!
//! ```rust
//! use trivia_quiz::{Difficulty, QuizMachine, QuizQuestion, QuizSettings};
//!
//! let mut machine = QuizMachine::new();
//! let settings = QuizSettings::new(9, Difficulty::Easy, 1, 30).unwrap();
//! let token = machine.configure(settings);
//! machine
//!     .attach_questions(token, vec![QuizQuestion::new("2 + 2?", "4", vec!["5".into()])])
//!     .unwrap();
//! machine.submit_answer("4").unwrap();
//! machine.advance().unwrap();
//! assert_eq!(machine.score(), 1);
//! ```

pub mod api;
mod app;
pub mod config;
mod error;
pub mod logging;
mod models;
pub mod quiz;
pub mod terminal;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

pub use api::TriviaClient;
pub use app::{App, CategoryList, FormField, Screen, TopicForm};
pub use config::Config;
pub use error::{QuizError, Result};
pub use models::{Answer, Category, Difficulty, QuizQuestion, QuizSettings};
pub use quiz::{Phase, QuizMachine, QuizSnapshot, Rejection, RequestToken};

const TICK: Duration = Duration::from_secs(1);

/// A quiz session that can be run in the terminal.
pub struct TriviaQuiz {
    app: App,
    client: TriviaClient,
}

impl TriviaQuiz {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            app: App::new(config),
            client: TriviaClient::new(&config.api_url)?,
        })
    }

    /// Run the quiz in the terminal.
    ///
    /// This takes over the terminal and returns when the user quits.
    pub async fn run(mut self) -> Result<()> {
        let mut terminal = terminal::TerminalGuard::enter()?;
        let (tx, rx) = mpsc::unbounded_channel();
        let mut fetches = Fetches::new(self.client.clone(), tx);
        fetches.categories();

        let result = run_event_loop(&mut terminal, &mut self.app, &mut fetches, rx).await;
        fetches.cancel();
        result
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

/// Results of background requests, delivered to the UI loop.
#[derive(Debug)]
enum FetchEvent {
    Categories(Result<Vec<Category>>),
    Questions {
        token: RequestToken,
        result: Result<Vec<QuizQuestion>>,
    },
}

/// Spawns question bank requests. At most one question fetch is in flight.
struct Fetches {
    client: TriviaClient,
    tx: mpsc::UnboundedSender<FetchEvent>,
    questions: Option<JoinHandle<()>>,
}

impl Fetches {
    fn new(client: TriviaClient, tx: mpsc::UnboundedSender<FetchEvent>) -> Self {
        Self {
            client,
            tx,
            questions: None,
        }
    }

    fn categories(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.categories().await;
            let _ = tx.send(FetchEvent::Categories(result));
        });
    }

    fn questions(&mut self, settings: QuizSettings, token: RequestToken) {
        self.cancel();
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.questions = Some(tokio::spawn(async move {
            let result = client.questions(&settings).await;
            let _ = tx.send(FetchEvent::Questions { token, result });
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.questions.take() {
            handle.abort();
        }
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq)]
enum Action {
    None,
    Quit,
    FetchQuestions(QuizSettings, RequestToken),
    CancelFetch,
    ReloadCategories,
}

async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
    fetches: &mut Fetches,
    mut rx: mpsc::UnboundedReceiver<FetchEvent>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = time::interval_at(time::Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut timer_epoch = app.machine().timer_epoch();

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // A fresh or resumed countdown gets a full first second.
        let epoch = app.machine().timer_epoch();
        if epoch != timer_epoch {
            ticker.reset();
            timer_epoch = epoch;
        }

        let transition = app.transition_deadline();
        let deadline = time::Instant::from_std(transition.unwrap_or_else(Instant::now));

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match handle_input(app, key.code) {
                        Action::None => {}
                        Action::Quit => break,
                        Action::FetchQuestions(settings, token) => fetches.questions(settings, token),
                        Action::CancelFetch => fetches.cancel(),
                        Action::ReloadCategories => fetches.categories(),
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            _ = ticker.tick() => {
                app.tick();
            }
            Some(event) = rx.recv() => handle_fetch_event(app, event),
            _ = time::sleep_until(deadline), if transition.is_some() => {
                app.finish_transition();
            }
        }
    }

    Ok(())
}

fn handle_fetch_event(app: &mut App, event: FetchEvent) {
    match event {
        FetchEvent::Categories(result) => app.categories_loaded(result),
        FetchEvent::Questions { token, result } => app.questions_loaded(token, result),
    }
}

fn handle_input(app: &mut App, key: KeyCode) -> Action {
    match app.screen() {
        Screen::TopicSelection => handle_topic_input(app, key),
        Screen::Loading => handle_loading_input(app, key),
        Screen::Quiz => handle_quiz_input(app, key),
        Screen::Results => handle_result_input(app, key),
    }
}

fn handle_topic_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => app.focus_previous(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.focus_next(),
        KeyCode::Left | KeyCode::Char('h') => app.cycle_value(false),
        KeyCode::Right | KeyCode::Char('l') => app.cycle_value(true),
        KeyCode::Enter => {
            if let Ok((settings, token)) = app.start_quiz() {
                return Action::FetchQuestions(settings, token);
            }
        }
        KeyCode::Char('r') | KeyCode::Char('R')
            if matches!(app.categories(), CategoryList::Failed(_)) =>
        {
            app.categories_loading();
            return Action::ReloadCategories;
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Action::Quit,
        _ => {}
    }
    Action::None
}

fn handle_loading_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Enter => match app.retry_fetch() {
            Some((settings, token)) => Action::FetchQuestions(settings, token),
            None => Action::None,
        },
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Esc => {
            app.reset();
            Action::CancelFetch
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
        _ => Action::None,
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> Action {
    if app.is_exit_prompt_open() {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_exit(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_exit(),
            KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
            _ => {}
        }
        return Action::None;
    }

    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_answer(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_answer(),
        KeyCode::Enter | KeyCode::Char(' ') => app.stage_selected(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(digit) = c.to_digit(10) {
                app.stage_at(digit as usize - 1);
            }
        }
        KeyCode::Char('n') | KeyCode::Right | KeyCode::Tab => app.next_question(Instant::now()),
        KeyCode::Char('x') | KeyCode::Esc => app.request_exit(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return Action::Quit,
        _ => {}
    }
    Action::None
}

fn handle_result_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Action::Quit,
        _ => {}
    }
    Action::None
}
