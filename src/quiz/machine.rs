//! Quiz state machine.
//!
//! ```text
//! Unconfigured --configure--> AwaitingQuestions --attach_questions--> InProgress
//!      ^                                                               |   |
//!      |                                            advance (last) ----+   | force_exit
//!      |                                                               v   v
//!      +-------------------------------reset------------------------- Completed
//! ```
//!
//! All mutation goes through the methods on [`QuizMachine`]. Refused intents
//! return a [`Rejection`] and leave the state untouched.

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::models::{Answer, QuizQuestion, QuizSettings};

use super::shuffle::shuffled;
use super::timer::{Countdown, Tick};

/// Where the quiz currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No settings; the topic selection is shown.
    Unconfigured,
    /// Settings chosen, questions not loaded yet (or the load failed).
    AwaitingQuestions,
    /// A question is on screen.
    InProgress,
    /// Finished, either by answering the last question or by exiting early.
    Completed { exited_early: bool },
}

/// Identifies one `configure` call. Fetch results carry it back so a result
/// for superseded settings can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// Why an intent was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no quiz is configured")]
    NotConfigured,
    #[error("no quiz is in progress")]
    NotInProgress,
    #[error("result belongs to a superseded request")]
    StaleRequest,
    #[error("question already answered")]
    AlreadyAnswered,
    #[error("time is up for this question")]
    TimeUp,
    #[error("a question transition is in flight")]
    Transitioning,
    #[error("no question transition is pending")]
    NoPendingTransition,
    #[error("{0:?} is not one of the offered answers")]
    UnknownAnswer(String),
}

/// Result of a successful advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the question at this index.
    Moved(usize),
    /// That was the last question.
    Finished,
}

/// What a one-second tick did to the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    Idle,
    Remaining(u32),
    /// The question at `question` ran out of time and was committed.
    Expired { question: usize, advance: Advance },
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSnapshot {
    pub phase: Phase,
    pub settings: Option<QuizSettings>,
    pub questions: Vec<QuizQuestion>,
    pub current_question_index: usize,
    pub staged_answer: Option<String>,
    pub time_remaining: u32,
    pub time_up: bool,
    pub transitioning: bool,
    pub fetch_error: Option<String>,
    pub score: usize,
}

/// One row of the results review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    pub number: usize,
    pub question: String,
    pub selected: Option<Answer>,
    pub correct_answer: String,
    pub candidates: Vec<String>,
    pub is_correct: bool,
    pub is_skipped: bool,
}

pub struct QuizMachine {
    phase: Phase,
    settings: Option<QuizSettings>,
    questions: Vec<QuizQuestion>,
    current: usize,
    staged: Option<String>,
    answer_order: Vec<String>,
    countdown: Countdown,
    time_up: bool,
    transitioning: bool,
    fetch_error: Option<String>,
    generation: u64,
    rng: StdRng,
}

impl QuizMachine {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic shuffles, for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            phase: Phase::Unconfigured,
            settings: None,
            questions: Vec::new(),
            current: 0,
            staged: None,
            answer_order: Vec::new(),
            countdown: Countdown::new(),
            time_up: false,
            transitioning: false,
            fetch_error: None,
            generation: 0,
            rng,
        }
    }

    // ---- transitions ----------------------------------------------------

    /// Start a new quiz with `settings`, discarding anything from before.
    ///
    /// The returned token must accompany the fetched questions.
    pub fn configure(&mut self, settings: QuizSettings) -> RequestToken {
        self.clear_run();
        self.generation += 1;
        tracing::info!(
            category = settings.category(),
            difficulty = %settings.difficulty(),
            amount = settings.amount(),
            generation = self.generation,
            "quiz configured"
        );

        self.countdown.arm(settings.time_per_question());
        self.settings = Some(settings);
        self.phase = Phase::AwaitingQuestions;

        RequestToken(self.generation)
    }

    /// Attach the questions fetched for `token`.
    ///
    /// An empty list completes the quiz immediately with a score of zero.
    pub fn attach_questions(
        &mut self,
        token: RequestToken,
        questions: Vec<QuizQuestion>,
    ) -> Result<(), Rejection> {
        self.check_request(token)?;
        let time_per_question = self.time_per_question().ok_or(Rejection::NotConfigured)?;

        self.questions = questions;
        for question in &mut self.questions {
            question.selected = None;
        }
        self.current = 0;
        self.staged = None;
        self.time_up = false;
        self.fetch_error = None;

        if self.questions.is_empty() {
            self.countdown.stop();
            self.phase = Phase::Completed {
                exited_early: false,
            };
            tracing::info!("received no questions, quiz completed immediately");
            return Ok(());
        }

        self.phase = Phase::InProgress;
        self.countdown.bind(0, time_per_question);
        self.reshuffle();

        tracing::info!(count = self.questions.len(), "questions attached");
        Ok(())
    }

    /// Record a failed fetch for `token`. The quiz stays in
    /// `AwaitingQuestions` until the user retries or resets.
    pub fn fetch_failed(
        &mut self,
        token: RequestToken,
        message: impl Into<String>,
    ) -> Result<(), Rejection> {
        self.check_request(token)?;
        self.fetch_error = Some(message.into());
        Ok(())
    }

    /// Stage `answer` for the current question. A later call before the
    /// question is committed replaces the staged value.
    pub fn submit_answer(&mut self, answer: &str) -> Result<(), Rejection> {
        self.ensure_interactive()?;

        let question = &self.questions[self.current];
        if question.selected.is_some() {
            return Err(Rejection::AlreadyAnswered);
        }
        if !question.is_candidate(answer) {
            return Err(Rejection::UnknownAnswer(answer.to_string()));
        }

        self.staged = Some(answer.to_string());
        Ok(())
    }

    /// Commit the staged answer (or skip) and move on immediately.
    pub fn advance(&mut self) -> Result<Advance, Rejection> {
        self.ensure_in_progress()?;
        if self.transitioning {
            return Err(Rejection::Transitioning);
        }
        Ok(self.commit_and_advance())
    }

    /// Open the transition window. Until [`complete_advance`] is called,
    /// answers and further advances are refused and the timer is paused.
    ///
    /// [`complete_advance`]: QuizMachine::complete_advance
    pub fn begin_advance(&mut self) -> Result<(), Rejection> {
        self.ensure_interactive()?;
        self.transitioning = true;
        self.countdown.pause();
        Ok(())
    }

    /// Close the transition window opened by [`begin_advance`] and advance.
    ///
    /// [`begin_advance`]: QuizMachine::begin_advance
    pub fn complete_advance(&mut self) -> Result<Advance, Rejection> {
        self.ensure_in_progress()?;
        if !self.transitioning {
            return Err(Rejection::NoPendingTransition);
        }
        self.transitioning = false;
        Ok(self.commit_and_advance())
    }

    /// Stop the quiz now, scoring whatever has been committed so far.
    pub fn force_exit(&mut self) -> Result<(), Rejection> {
        self.ensure_in_progress()?;

        if let Some(staged) = self.staged.take() {
            self.questions[self.current].selected = Some(Answer::Given(staged));
        }
        self.transitioning = false;
        self.time_up = true;
        self.countdown.stop();
        self.phase = Phase::Completed { exited_early: true };

        tracing::info!(score = self.score(), "quiz exited early");
        Ok(())
    }

    /// Back to `Unconfigured`, from anywhere.
    pub fn reset(&mut self) {
        self.clear_run();
        self.settings = None;
        self.phase = Phase::Unconfigured;
        // Any fetch still in flight belongs to the old run.
        self.generation += 1;
        tracing::info!("quiz reset");
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> TickEvent {
        if self.phase != Phase::InProgress || self.transitioning {
            return TickEvent::Idle;
        }

        match self.countdown.tick() {
            Tick::Idle => TickEvent::Idle,
            Tick::Remaining(remaining) => TickEvent::Remaining(remaining),
            Tick::Expired => {
                let question = self.current;
                self.time_up = true;
                tracing::debug!(question, "time expired");
                let advance = self.commit_and_advance();
                TickEvent::Expired { question, advance }
            }
        }
    }

    pub fn pause_timer(&mut self) {
        self.countdown.pause();
    }

    pub fn resume_timer(&mut self) {
        if !self.transitioning {
            self.countdown.resume();
        }
    }

    // ---- reads ----------------------------------------------------------

    /// Committed answers equal to their question's correct answer.
    pub fn score(&self) -> usize {
        self.questions.iter().filter(|q| q.is_correct()).count()
    }

    /// Questions with a committed, non-skipped answer.
    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_answered()).count()
    }

    /// Questions skipped by timeout or never answered.
    pub fn skipped_count(&self) -> usize {
        self.questions.len() - self.answered_count()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn settings(&self) -> Option<&QuizSettings> {
        self.settings.as_ref()
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn current_question_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            Phase::InProgress => self.questions.get(self.current),
            _ => None,
        }
    }

    pub fn staged_answer(&self) -> Option<&str> {
        self.staged.as_deref()
    }

    /// Display order of the current question's candidates.
    pub fn answer_order(&self) -> &[String] {
        &self.answer_order
    }

    pub fn time_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn time_per_question(&self) -> Option<u32> {
        self.settings.as_ref().map(QuizSettings::time_per_question)
    }

    pub fn is_time_up(&self) -> bool {
        self.time_up
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    pub fn is_timer_paused(&self) -> bool {
        self.countdown.is_paused()
    }

    pub fn timer_epoch(&self) -> u64 {
        self.countdown.epoch()
    }

    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            phase: self.phase,
            settings: self.settings.clone(),
            questions: self.questions.clone(),
            current_question_index: self.current,
            staged_answer: self.staged.clone(),
            time_remaining: self.time_remaining(),
            time_up: self.time_up,
            transitioning: self.transitioning,
            fetch_error: self.fetch_error.clone(),
            score: self.score(),
        }
    }

    /// Review rows with each question's candidates freshly shuffled.
    pub fn review(&mut self) -> Vec<ReviewEntry> {
        let Self { questions, rng, .. } = self;
        questions
            .iter()
            .enumerate()
            .map(|(index, question)| ReviewEntry {
                number: index + 1,
                question: question.text.clone(),
                selected: question.selected.clone(),
                correct_answer: question.correct_answer.clone(),
                candidates: shuffled(&question.candidates(), &mut *rng),
                is_correct: question.is_correct(),
                is_skipped: !question.is_answered(),
            })
            .collect()
    }

    // ---- internals ------------------------------------------------------

    fn check_request(&self, token: RequestToken) -> Result<(), Rejection> {
        if self.settings.is_none() {
            return Err(Rejection::NotConfigured);
        }
        if token.0 != self.generation || self.phase != Phase::AwaitingQuestions {
            return Err(Rejection::StaleRequest);
        }
        Ok(())
    }

    fn ensure_in_progress(&self) -> Result<(), Rejection> {
        match self.phase {
            Phase::Unconfigured => Err(Rejection::NotConfigured),
            Phase::InProgress => Ok(()),
            _ => Err(Rejection::NotInProgress),
        }
    }

    fn ensure_interactive(&self) -> Result<(), Rejection> {
        self.ensure_in_progress()?;
        if self.transitioning {
            return Err(Rejection::Transitioning);
        }
        if self.time_up {
            return Err(Rejection::TimeUp);
        }
        Ok(())
    }

    fn commit_and_advance(&mut self) -> Advance {
        let answer = match self.staged.take() {
            Some(text) => Answer::Given(text),
            None => Answer::Skipped,
        };
        let question = &mut self.questions[self.current];
        if question.selected.is_none() {
            question.selected = Some(answer);
        }

        self.current += 1;
        if self.current >= self.questions.len() {
            self.countdown.stop();
            self.answer_order.clear();
            self.phase = Phase::Completed {
                exited_early: false,
            };
            tracing::info!(score = self.score(), total = self.questions.len(), "quiz completed");
            return Advance::Finished;
        }

        self.time_up = false;
        if let Some(time_per_question) = self.time_per_question() {
            self.countdown.bind(self.current, time_per_question);
        }
        self.reshuffle();
        Advance::Moved(self.current)
    }

    fn reshuffle(&mut self) {
        self.answer_order = match self.questions.get(self.current) {
            Some(question) => shuffled(&question.candidates(), &mut self.rng),
            None => Vec::new(),
        };
    }

    fn clear_run(&mut self) {
        self.questions.clear();
        self.current = 0;
        self.staged = None;
        self.answer_order.clear();
        self.countdown.clear();
        self.time_up = false;
        self.transitioning = false;
        self.fetch_error = None;
    }
}

impl Default for QuizMachine {
    fn default() -> Self {
        Self::new()
    }
}
