//! Quiz core: the run state machine and its per-question countdown.

mod machine;
mod shuffle;
mod timer;

pub use machine::{
    Advance, Phase, QuizMachine, QuizSnapshot, Rejection, RequestToken, ReviewEntry, TickEvent,
};
pub use shuffle::shuffled;
pub use timer::{Countdown, Tick};
