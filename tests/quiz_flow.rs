use proptest::prelude::*;
use trivia_quiz::quiz::{Advance, TickEvent};
use trivia_quiz::{Answer, Difficulty, Phase, QuizMachine, QuizQuestion, QuizSettings, Rejection};

fn questions(n: usize) -> Vec<QuizQuestion> {
    (1..=n)
        .map(|i| {
            QuizQuestion::new(
                format!("Question {i}"),
                format!("right {i}"),
                vec![
                    format!("wrong {i}a"),
                    format!("wrong {i}b"),
                    format!("wrong {i}c"),
                ],
            )
        })
        .collect()
}

fn settings(amount: u32, time: u32) -> QuizSettings {
    QuizSettings::new(9, Difficulty::Easy, amount, time).unwrap()
}

fn started(amount: usize, time: u32, seed: u64) -> QuizMachine {
    let mut machine = QuizMachine::with_seed(seed);
    let token = machine.configure(settings(amount as u32, time));
    machine.attach_questions(token, questions(amount)).unwrap();
    machine
}

#[test]
fn answered_skipped_and_exited_quiz_scores_three() {
    let mut machine = started(5, 15, 42);

    machine.submit_answer("right 1").unwrap();
    assert_eq!(machine.advance(), Ok(Advance::Moved(1)));
    machine.submit_answer("right 2").unwrap();
    assert_eq!(machine.advance(), Ok(Advance::Moved(2)));

    for remaining in (1..15).rev() {
        assert_eq!(machine.tick(), TickEvent::Remaining(remaining));
    }
    assert_eq!(
        machine.tick(),
        TickEvent::Expired {
            question: 2,
            advance: Advance::Moved(3),
        }
    );

    machine.submit_answer("right 4").unwrap();
    assert_eq!(machine.advance(), Ok(Advance::Moved(4)));

    machine.force_exit().unwrap();

    assert_eq!(machine.score(), 3);
    assert_eq!(machine.phase(), Phase::Completed { exited_early: true });
    assert!(machine.is_time_up());
    assert_eq!(machine.questions()[2].selected, Some(Answer::Skipped));
    assert_eq!(machine.questions()[4].selected, None);
    assert_eq!(machine.answered_count(), 3);
    assert_eq!(machine.skipped_count(), 2);
}

#[test]
fn questions_for_superseded_settings_are_not_attached() {
    let mut machine = QuizMachine::with_seed(7);
    let first = machine.configure(settings(5, 30));
    let second = machine.configure(settings(10, 45));

    assert_eq!(
        machine.attach_questions(first, questions(5)),
        Err(Rejection::StaleRequest)
    );
    assert_eq!(machine.phase(), Phase::AwaitingQuestions);
    assert!(machine.questions().is_empty());
    assert_eq!(machine.settings().map(QuizSettings::amount), Some(10));

    machine.attach_questions(second, questions(10)).unwrap();
    assert_eq!(machine.questions().len(), 10);
    assert_eq!(machine.time_remaining(), 45);
}

#[test]
fn questions_after_reset_are_not_attached() {
    let mut machine = QuizMachine::with_seed(7);
    let token = machine.configure(settings(5, 30));
    machine.reset();

    assert!(machine.attach_questions(token, questions(5)).is_err());
    assert_eq!(machine.snapshot(), QuizMachine::with_seed(7).snapshot());
}

#[test]
fn advancing_n_times_completes_on_the_last_call() {
    for n in 1..=6 {
        let mut machine = started(n, 30, n as u64);
        for i in 1..n {
            assert_eq!(machine.advance(), Ok(Advance::Moved(i)));
            assert_eq!(machine.phase(), Phase::InProgress);
        }
        assert_eq!(machine.advance(), Ok(Advance::Finished));
        assert_eq!(machine.phase(), Phase::Completed { exited_early: false });
        assert_eq!(machine.advance(), Err(Rejection::NotInProgress));
    }
}

#[test]
fn empty_question_list_completes_immediately() {
    let mut machine = QuizMachine::with_seed(1);
    let token = machine.configure(settings(5, 30));
    machine.attach_questions(token, Vec::new()).unwrap();

    assert_eq!(machine.phase(), Phase::Completed { exited_early: false });
    assert_eq!(machine.score(), 0);
}

#[test]
fn debounced_advance_ignores_input_until_complete() {
    let mut machine = started(2, 30, 11);
    machine.submit_answer("right 1").unwrap();
    machine.begin_advance().unwrap();

    assert_eq!(machine.submit_answer("wrong 1a"), Err(Rejection::Transitioning));
    assert_eq!(machine.begin_advance(), Err(Rejection::Transitioning));
    assert_eq!(machine.advance(), Err(Rejection::Transitioning));
    assert_eq!(machine.tick(), TickEvent::Idle);

    assert_eq!(machine.complete_advance(), Ok(Advance::Moved(1)));
    assert_eq!(machine.score(), 1);
    assert_eq!(machine.time_remaining(), 30);
}

#[test]
fn reset_from_every_phase_restores_the_initial_snapshot() {
    let initial = QuizMachine::with_seed(0).snapshot();

    let mut unconfigured = QuizMachine::with_seed(0);
    unconfigured.reset();
    assert_eq!(unconfigured.snapshot(), initial);

    let mut awaiting = QuizMachine::with_seed(0);
    let token = awaiting.configure(settings(5, 30));
    awaiting.fetch_failed(token, "offline").unwrap();
    awaiting.reset();
    assert_eq!(awaiting.snapshot(), initial);

    let mut in_progress = started(3, 30, 0);
    in_progress.submit_answer("right 1").unwrap();
    in_progress.begin_advance().unwrap();
    in_progress.reset();
    assert_eq!(in_progress.snapshot(), initial);

    let mut completed = started(1, 30, 0);
    completed.advance().unwrap();
    completed.reset();
    assert_eq!(completed.snapshot(), initial);
}

#[derive(Debug, Clone)]
enum Step {
    Answer(usize),
    Advance,
    Expire,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0usize..4).prop_map(Step::Answer),
        Just(Step::Advance),
        Just(Step::Expire),
    ]
}

proptest! {
    #[test]
    fn score_counts_exactly_the_correct_committed_answers(
        n in 1usize..8,
        seed in any::<u64>(),
        steps in prop::collection::vec(step(), 0..40),
        exit in any::<bool>(),
    ) {
        let mut machine = started(n, 3, seed);

        for step in steps {
            match step {
                Step::Answer(i) => {
                    let candidate = machine.answer_order().get(i).cloned();
                    if let Some(answer) = candidate {
                        let _ = machine.submit_answer(&answer);
                    }
                }
                Step::Advance => {
                    let _ = machine.advance();
                }
                Step::Expire => {
                    for _ in 0..3 {
                        machine.tick();
                    }
                }
            }
        }
        if exit {
            let _ = machine.force_exit();
        }

        let correct = machine
            .questions()
            .iter()
            .filter(|q| q.selected.as_ref().and_then(Answer::as_given) == Some(q.correct_answer.as_str()))
            .count();

        prop_assert_eq!(machine.score(), correct);
        prop_assert!(machine.score() <= machine.answered_count());
        prop_assert!(machine.answered_count() + machine.skipped_count() == n);
    }
}
