use std::time::{Duration, Instant};

use crate::config::{options_with, Config, QUESTION_COUNTS, TIME_OPTIONS};
use crate::error::QuizError;
use crate::models::{Category, Difficulty, QuizQuestion, QuizSettings};
use crate::quiz::{Advance, Phase, QuizMachine, Rejection, RequestToken, ReviewEntry, TickEvent};

/// Which screen the terminal shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    TopicSelection,
    Loading,
    Quiz,
    Results,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryList {
    Loading,
    Loaded(Vec<Category>),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Category,
    Difficulty,
    Amount,
    Time,
    Start,
}

impl FormField {
    const ORDER: [FormField; 5] = [
        FormField::Category,
        FormField::Difficulty,
        FormField::Amount,
        FormField::Time,
        FormField::Start,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// State of the topic selection form.
#[derive(Debug, Clone)]
pub struct TopicForm {
    pub focus: FormField,
    /// Id picked before the category list arrived.
    pub preferred_category: u32,
    pub category_index: usize,
    pub difficulty: Difficulty,
    pub amounts: Vec<u32>,
    pub amount_index: usize,
    pub times: Vec<u32>,
    pub time_index: usize,
}

impl TopicForm {
    fn from_config(config: &Config) -> Self {
        let preset = &config.preset;
        let amounts = options_with(&QUESTION_COUNTS, preset.amount);
        let times = options_with(&TIME_OPTIONS, preset.time_per_question);
        Self {
            focus: FormField::Category,
            preferred_category: preset.category,
            category_index: 0,
            difficulty: preset.difficulty,
            amount_index: amounts.iter().position(|a| *a == preset.amount).unwrap_or(0),
            amounts,
            time_index: times
                .iter()
                .position(|t| *t == preset.time_per_question)
                .unwrap_or(0),
            times,
        }
    }

    pub fn amount(&self) -> u32 {
        self.amounts[self.amount_index]
    }

    pub fn time_per_question(&self) -> u32 {
        self.times[self.time_index]
    }
}

pub struct App {
    machine: QuizMachine,
    form: TopicForm,
    categories: CategoryList,
    settings_error: Option<String>,
    answer_cursor: usize,
    cursor_question: Option<usize>,
    exit_prompt: bool,
    transition_delay: Duration,
    transition_deadline: Option<Instant>,
    review: Vec<ReviewEntry>,
    review_built: bool,
    result_scroll: usize,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self::with_machine(config, QuizMachine::new())
    }

    pub fn with_machine(config: &Config, machine: QuizMachine) -> Self {
        Self {
            machine,
            form: TopicForm::from_config(config),
            categories: CategoryList::Loading,
            settings_error: None,
            answer_cursor: 0,
            cursor_question: None,
            exit_prompt: false,
            transition_delay: config.transition_delay,
            transition_deadline: None,
            review: Vec::new(),
            review_built: false,
            result_scroll: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        match self.machine.phase() {
            Phase::Unconfigured => Screen::TopicSelection,
            Phase::AwaitingQuestions => Screen::Loading,
            Phase::InProgress => Screen::Quiz,
            Phase::Completed { .. } => Screen::Results,
        }
    }

    pub fn machine(&self) -> &QuizMachine {
        &self.machine
    }

    pub fn form(&self) -> &TopicForm {
        &self.form
    }

    pub fn categories(&self) -> &CategoryList {
        &self.categories
    }

    pub fn settings_error(&self) -> Option<&str> {
        self.settings_error.as_deref()
    }

    pub fn answer_cursor(&self) -> usize {
        self.answer_cursor
    }

    pub fn is_exit_prompt_open(&self) -> bool {
        self.exit_prompt
    }

    pub fn transition_deadline(&self) -> Option<Instant> {
        self.transition_deadline
    }

    pub fn review(&self) -> &[ReviewEntry] {
        &self.review
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    // ---- topic selection -------------------------------------------------

    pub fn categories_loaded(&mut self, result: Result<Vec<Category>, QuizError>) {
        self.categories = match result {
            Ok(categories) => {
                self.form.category_index = categories
                    .iter()
                    .position(|c| c.id == self.form.preferred_category)
                    .unwrap_or(0);
                tracing::info!(count = categories.len(), "categories loaded");
                CategoryList::Loaded(categories)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load categories");
                CategoryList::Failed(err.user_message())
            }
        };
    }

    /// Mark the category list as being fetched again.
    pub fn categories_loading(&mut self) {
        self.categories = CategoryList::Loading;
    }

    pub fn selected_category(&self) -> Option<&Category> {
        match &self.categories {
            CategoryList::Loaded(categories) => categories.get(self.form.category_index),
            _ => None,
        }
    }

    pub fn focus_next(&mut self) {
        let next = (self.form.focus.position() + 1) % FormField::ORDER.len();
        self.form.focus = FormField::ORDER[next];
    }

    pub fn focus_previous(&mut self) {
        let len = FormField::ORDER.len();
        let previous = (self.form.focus.position() + len - 1) % len;
        self.form.focus = FormField::ORDER[previous];
    }

    /// Step the focused field's value forwards or backwards, wrapping around.
    pub fn cycle_value(&mut self, forward: bool) {
        self.settings_error = None;
        let form = &mut self.form;
        match form.focus {
            FormField::Category => {
                if let CategoryList::Loaded(categories) = &self.categories {
                    form.category_index = step(form.category_index, categories.len(), forward);
                }
            }
            FormField::Difficulty => {
                let all = Difficulty::ALL;
                let index = all.iter().position(|d| *d == form.difficulty).unwrap_or(0);
                form.difficulty = all[step(index, all.len(), forward)];
            }
            FormField::Amount => {
                form.amount_index = step(form.amount_index, form.amounts.len(), forward);
            }
            FormField::Time => {
                form.time_index = step(form.time_index, form.times.len(), forward);
            }
            FormField::Start => {}
        }
    }

    /// Validate the form and configure the quiz. The caller fetches
    /// questions for the returned settings and token.
    pub fn start_quiz(&mut self) -> Result<(QuizSettings, RequestToken), QuizError> {
        let category = self
            .selected_category()
            .map(|c| c.id)
            .unwrap_or(self.form.preferred_category);

        let settings = QuizSettings::new(
            category,
            self.form.difficulty,
            self.form.amount(),
            self.form.time_per_question(),
        )
        .inspect_err(|err| self.settings_error = Some(err.user_message()))?;

        self.settings_error = None;
        let token = self.machine.configure(settings.clone());
        self.clear_presentation();
        Ok((settings, token))
    }

    /// Re-configure with the same settings after a failed fetch.
    pub fn retry_fetch(&mut self) -> Option<(QuizSettings, RequestToken)> {
        if self.machine.phase() != Phase::AwaitingQuestions || self.machine.fetch_error().is_none() {
            return None;
        }
        let settings = self.machine.settings()?.clone();
        let token = self.machine.configure(settings.clone());
        Some((settings, token))
    }

    pub fn questions_loaded(
        &mut self,
        token: RequestToken,
        result: Result<Vec<QuizQuestion>, QuizError>,
    ) {
        let outcome = match result {
            Ok(questions) => self.machine.attach_questions(token, questions),
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch questions");
                self.machine.fetch_failed(token, err.user_message())
            }
        };

        if let Err(rejection) = outcome {
            tracing::debug!(%rejection, "discarding fetch result");
        }
        self.sync();
    }

    // ---- quiz ------------------------------------------------------------

    pub fn select_next_answer(&mut self) {
        let count = self.machine.answer_order().len();
        if count > 0 {
            self.answer_cursor = (self.answer_cursor + 1) % count;
        }
    }

    pub fn select_previous_answer(&mut self) {
        let count = self.machine.answer_order().len();
        if count > 0 {
            self.answer_cursor = (self.answer_cursor + count - 1) % count;
        }
    }

    /// Stage the answer under the cursor.
    pub fn stage_selected(&mut self) {
        self.stage_at(self.answer_cursor);
    }

    /// Stage the answer shown at `index`, moving the cursor there.
    pub fn stage_at(&mut self, index: usize) {
        let Some(answer) = self.machine.answer_order().get(index).cloned() else {
            return;
        };
        self.answer_cursor = index;
        log_rejection(self.machine.submit_answer(&answer));
    }

    /// Start the transition to the next question; it lands once
    /// [`App::finish_transition`] runs after the deadline.
    pub fn next_question(&mut self, now: Instant) {
        if self.exit_prompt {
            return;
        }
        if let Err(rejection) = self.machine.begin_advance() {
            tracing::debug!(%rejection, "next ignored");
            return;
        }
        self.transition_deadline = Some(now + self.transition_delay);
    }

    pub fn transition_due(&self, now: Instant) -> bool {
        self.transition_deadline.is_some_and(|deadline| now >= deadline)
    }

    pub fn finish_transition(&mut self) -> Option<Advance> {
        self.transition_deadline = None;
        let advance = self.machine.complete_advance();
        if let Err(rejection) = &advance {
            tracing::debug!(%rejection, "transition dropped");
        }
        self.sync();
        advance.ok()
    }

    pub fn tick(&mut self) -> TickEvent {
        let event = self.machine.tick();
        if matches!(event, TickEvent::Expired { .. }) {
            self.sync();
        }
        event
    }

    pub fn request_exit(&mut self) {
        if self.screen() == Screen::Quiz && !self.machine.is_transitioning() {
            self.exit_prompt = true;
            self.machine.pause_timer();
        }
    }

    pub fn cancel_exit(&mut self) {
        if self.exit_prompt {
            self.exit_prompt = false;
            self.machine.resume_timer();
        }
    }

    pub fn confirm_exit(&mut self) {
        if !self.exit_prompt {
            return;
        }
        self.exit_prompt = false;
        log_rejection(self.machine.force_exit());
        self.sync();
    }

    /// Back to topic selection, keeping the loaded categories.
    pub fn reset(&mut self) {
        self.machine.reset();
        self.clear_presentation();
    }

    // ---- results ---------------------------------------------------------

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self.review.len().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    // ---- internals -------------------------------------------------------

    /// Bring presentation-only state in line with the machine after a
    /// transition.
    fn sync(&mut self) {
        match self.machine.phase() {
            Phase::InProgress => {
                let index = self.machine.current_question_index();
                if self.cursor_question != Some(index) {
                    self.cursor_question = Some(index);
                    self.answer_cursor = 0;
                }
            }
            Phase::Completed { .. } => {
                self.exit_prompt = false;
                self.transition_deadline = None;
                if !self.review_built {
                    self.review = self.machine.review();
                    self.review_built = true;
                    self.result_scroll = 0;
                }
            }
            Phase::Unconfigured | Phase::AwaitingQuestions => {}
        }
    }

    fn clear_presentation(&mut self) {
        self.answer_cursor = 0;
        self.cursor_question = None;
        self.exit_prompt = false;
        self.transition_deadline = None;
        self.review.clear();
        self.review_built = false;
        self.result_scroll = 0;
        self.settings_error = None;
    }
}

fn step(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

fn log_rejection<T>(result: Result<T, Rejection>) {
    if let Err(rejection) = result {
        tracing::debug!(%rejection, "intent ignored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::default()
    }

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: 9,
                name: "General Knowledge".to_string(),
            },
            Category {
                id: 17,
                name: "Science & Nature".to_string(),
            },
        ]
    }

    fn questions(n: usize) -> Vec<QuizQuestion> {
        (0..n)
            .map(|i| {
                QuizQuestion::new(
                    format!("Q{i}"),
                    format!("yes {i}"),
                    vec![format!("no {i}a"), format!("no {i}b"), format!("no {i}c")],
                )
            })
            .collect()
    }

    fn running(n: usize) -> App {
        let mut app = App::with_machine(&config(), QuizMachine::with_seed(3));
        app.categories_loaded(Ok(categories()));
        let (_, token) = app.start_quiz().unwrap();
        app.questions_loaded(token, Ok(questions(n)));
        app
    }

    #[test]
    fn test_preset_category_is_preselected() {
        let mut app = App::new(&config());
        app.categories_loaded(Ok(categories()));
        assert_eq!(app.selected_category().map(|c| c.id), Some(9));
    }

    #[test]
    fn test_cycle_values_wrap() {
        let mut app = App::new(&config());
        app.categories_loaded(Ok(categories()));

        app.cycle_value(true);
        app.cycle_value(true);
        assert_eq!(app.selected_category().map(|c| c.id), Some(9));

        app.focus_next();
        app.cycle_value(false);
        assert_eq!(app.form().difficulty, Difficulty::Hard);

        app.focus_next();
        app.cycle_value(true);
        assert_eq!(app.form().amount(), 15);

        app.focus_next();
        app.cycle_value(false);
        assert_eq!(app.form().time_per_question(), 15);
    }

    #[test]
    fn test_focus_wraps_both_ways() {
        let mut app = App::new(&config());
        app.focus_previous();
        assert_eq!(app.form().focus, FormField::Start);
        app.focus_next();
        assert_eq!(app.form().focus, FormField::Category);
    }

    #[test]
    fn test_start_quiz_moves_to_loading() {
        let mut app = App::new(&config());
        app.categories_loaded(Ok(categories()));
        let (settings, _) = app.start_quiz().unwrap();
        assert_eq!(settings.amount(), 10);
        assert_eq!(app.screen(), Screen::Loading);
    }

    #[test]
    fn test_failed_fetch_can_be_retried() {
        let mut app = App::new(&config());
        let (_, token) = app.start_quiz().unwrap();
        app.questions_loaded(
            token,
            Err(QuizError::InvalidResponse("rate limited".to_string())),
        );
        assert_eq!(app.screen(), Screen::Loading);
        assert!(app.machine().fetch_error().is_some());

        let (_, retry_token) = app.retry_fetch().unwrap();
        assert!(app.machine().fetch_error().is_none());

        app.questions_loaded(token, Ok(questions(2)));
        assert_eq!(app.screen(), Screen::Loading);

        app.questions_loaded(retry_token, Ok(questions(2)));
        assert_eq!(app.screen(), Screen::Quiz);
    }

    #[test]
    fn test_retry_needs_a_failure() {
        let mut app = App::new(&config());
        app.start_quiz().unwrap();
        assert!(app.retry_fetch().is_none());
    }

    #[test]
    fn test_stage_and_transition() {
        let mut app = running(2);
        let now = Instant::now();

        app.select_next_answer();
        app.stage_selected();
        assert_eq!(app.machine().staged_answer(), Some(app.machine().answer_order()[1].as_str()));

        app.next_question(now);
        assert!(!app.transition_due(now));
        assert!(app.transition_due(now + Duration::from_millis(500)));

        app.next_question(now);
        assert_eq!(app.finish_transition(), Some(Advance::Moved(1)));
        assert_eq!(app.answer_cursor(), 0);
        assert_eq!(app.machine().current_question_index(), 1);
        assert!(app.transition_deadline().is_none());
    }

    #[test]
    fn test_exit_prompt_pauses_timer() {
        let mut app = running(2);
        app.request_exit();
        assert!(app.is_exit_prompt_open());
        assert!(app.machine().is_timer_paused());
        assert_eq!(app.tick(), TickEvent::Idle);

        app.next_question(Instant::now());
        assert!(app.transition_deadline().is_none());

        app.cancel_exit();
        assert!(!app.machine().is_timer_paused());
        assert!(matches!(app.tick(), TickEvent::Remaining(_)));
    }

    #[test]
    fn test_confirm_exit_builds_review() {
        let mut app = running(3);
        app.stage_at(0);
        app.request_exit();
        app.confirm_exit();

        assert_eq!(app.screen(), Screen::Results);
        assert_eq!(app.review().len(), 3);
        assert!(!app.review()[0].is_skipped);

        app.scroll_results_down();
        app.scroll_results_down();
        app.scroll_results_down();
        assert_eq!(app.result_scroll(), 2);
    }

    #[test]
    fn test_reset_keeps_categories() {
        let mut app = running(1);
        app.reset();
        assert_eq!(app.screen(), Screen::TopicSelection);
        assert!(matches!(app.categories(), CategoryList::Loaded(_)));
        assert!(app.review().is_empty());
    }
}
