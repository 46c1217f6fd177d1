//! Per-question countdown.
//!
//! The countdown is purely logical: it never looks at the clock. Whoever owns
//! it calls [`Countdown::tick`] once per second while it is running.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountdownState {
    Idle,
    Running,
    Paused,
    Expired,
}

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not running; nothing happened.
    Idle,
    /// One second elapsed, this much remains.
    Remaining(u32),
    /// Remaining time just reached zero. Raised at most once per start.
    Expired,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    duration: u32,
    remaining: u32,
    state: CountdownState,
    bound_to: Option<usize>,
    expiry_fired: bool,
    epoch: u64,
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            duration: 0,
            remaining: 0,
            state: CountdownState::Idle,
            bound_to: None,
            expiry_fired: false,
            epoch: 0,
        }
    }

    /// Reset to `duration` and begin ticking.
    pub fn start(&mut self, duration: u32) {
        self.duration = duration;
        self.remaining = duration;
        self.state = CountdownState::Running;
        self.expiry_fired = false;
        self.epoch += 1;
    }

    /// Load `duration` without ticking.
    pub fn arm(&mut self, duration: u32) {
        self.duration = duration;
        self.remaining = duration;
        self.state = CountdownState::Idle;
        self.expiry_fired = false;
    }

    /// Restart for `question` unless the countdown already belongs to it.
    pub fn bind(&mut self, question: usize, duration: u32) {
        if self.bound_to != Some(question) {
            self.bound_to = Some(question);
            self.start(duration);
        }
    }

    pub fn pause(&mut self) {
        if self.state == CountdownState::Running {
            self.state = CountdownState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == CountdownState::Paused {
            self.state = CountdownState::Running;
            self.epoch += 1;
        }
    }

    /// Stop ticking at zero. Does not raise an expiry.
    pub fn stop(&mut self) {
        self.remaining = 0;
        self.state = CountdownState::Idle;
    }

    /// Back to the freshly constructed state, forgetting the bound question.
    pub fn clear(&mut self) {
        let epoch = self.epoch;
        *self = Self::new();
        self.epoch = epoch;
    }

    pub fn tick(&mut self) -> Tick {
        if self.state != CountdownState::Running {
            return Tick::Idle;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return Tick::Remaining(self.remaining);
        }

        self.state = CountdownState::Expired;
        if self.expiry_fired {
            Tick::Idle
        } else {
            self.expiry_fired = true;
            Tick::Expired
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == CountdownState::Paused
    }

    pub fn bound_to(&self) -> Option<usize> {
        self.bound_to
    }

    /// Increases whenever ticking (re)starts, so a driver can realign its
    /// one-second schedule.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_then_expires_once() {
        let mut countdown = Countdown::new();
        countdown.start(3);

        assert_eq!(countdown.tick(), Tick::Remaining(2));
        assert_eq!(countdown.tick(), Tick::Remaining(1));
        assert_eq!(countdown.tick(), Tick::Expired);
        assert_eq!(countdown.remaining(), 0);

        assert_eq!(countdown.tick(), Tick::Idle);
        assert_eq!(countdown.tick(), Tick::Idle);
        assert!(!countdown.is_running());
    }

    #[test]
    fn test_pause_freezes_remaining_time() {
        let mut countdown = Countdown::new();
        countdown.start(10);
        countdown.tick();

        countdown.pause();
        countdown.pause();
        assert!(countdown.is_paused());
        assert_eq!(countdown.tick(), Tick::Idle);
        assert_eq!(countdown.remaining(), 9);

        countdown.resume();
        assert_eq!(countdown.tick(), Tick::Remaining(8));
    }

    #[test]
    fn test_resume_without_pause_is_noop() {
        let mut countdown = Countdown::new();
        countdown.start(5);
        let epoch = countdown.epoch();

        countdown.resume();
        assert_eq!(countdown.epoch(), epoch);
        assert!(countdown.is_running());
    }

    #[test]
    fn test_bind_restarts_only_on_new_question() {
        let mut countdown = Countdown::new();
        countdown.bind(0, 15);
        countdown.tick();
        countdown.tick();

        countdown.bind(0, 15);
        assert_eq!(countdown.remaining(), 13);

        countdown.bind(1, 15);
        assert_eq!(countdown.remaining(), 15);
        assert_eq!(countdown.bound_to(), Some(1));
    }

    #[test]
    fn test_rebinding_clears_expiry_guard() {
        let mut countdown = Countdown::new();
        countdown.bind(0, 1);
        assert_eq!(countdown.tick(), Tick::Expired);

        countdown.bind(1, 1);
        assert_eq!(countdown.tick(), Tick::Expired);
    }

    #[test]
    fn test_clear_forgets_binding() {
        let mut countdown = Countdown::new();
        countdown.bind(0, 10);
        countdown.clear();

        assert_eq!(countdown.bound_to(), None);
        assert_eq!(countdown.remaining(), 0);

        countdown.bind(0, 10);
        assert!(countdown.is_running());
    }

    #[test]
    fn test_stop_never_raises_expiry() {
        let mut countdown = Countdown::new();
        countdown.start(10);
        countdown.stop();

        assert_eq!(countdown.remaining(), 0);
        assert_eq!(countdown.tick(), Tick::Idle);
    }
}
