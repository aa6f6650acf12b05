//! Countdown state machine

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle phase of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Configured,
    Running,
    Paused,
    Finished,
}

/// Whether an operation changed the timer or was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Ignored,
}

impl Transition {
    pub fn is_applied(self) -> bool {
        matches!(self, Transition::Applied)
    }
}

/// Result of a single tick delivered to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belonged to a cancelled schedule, or the timer is not running
    Stale,
    /// One second was counted off
    Counted(u64),
    /// The countdown reached zero and the schedule was released
    Finished,
}

/// Countdown timer state
///
/// `running` and `paused` are both derived from [`TimerPhase`], so they can
/// never be true together. While running, the state carries the id of the
/// one tick schedule allowed to advance it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    configured_duration: Option<u64>,
    remaining: u64,
    phase: TimerPhase,
    schedule: Option<u64>,
    next_schedule: u64,
}

impl TimerState {
    /// Create an idle timer with no configured duration
    pub fn new() -> Self {
        Self {
            configured_duration: None,
            remaining: 0,
            phase: TimerPhase::Idle,
            schedule: None,
            next_schedule: 1,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn configured_duration(&self) -> Option<u64> {
        self.configured_duration
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == TimerPhase::Paused
    }

    /// Id of the tick schedule that may currently advance the timer
    pub fn active_schedule(&self) -> Option<u64> {
        self.schedule
    }

    /// Configure a new duration in seconds. Zero is rejected.
    pub fn set_duration(&mut self, seconds: u64) -> Transition {
        if seconds == 0 {
            return Transition::Ignored;
        }
        self.cancel_schedule();
        self.configured_duration = Some(seconds);
        self.remaining = seconds;
        self.phase = TimerPhase::Configured;
        Transition::Applied
    }

    /// Begin or resume counting down
    pub fn start(&mut self) -> Transition {
        let startable = matches!(
            self.phase,
            TimerPhase::Configured | TimerPhase::Paused | TimerPhase::Finished
        );
        if !startable || self.remaining == 0 {
            return Transition::Ignored;
        }
        self.schedule = Some(self.next_schedule);
        self.next_schedule += 1;
        self.phase = TimerPhase::Running;
        Transition::Applied
    }

    /// Advance the countdown by one second on behalf of `schedule`
    pub fn tick(&mut self, schedule: u64) -> TickOutcome {
        if self.phase != TimerPhase::Running || self.schedule != Some(schedule) {
            return TickOutcome::Stale;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.cancel_schedule();
            self.phase = TimerPhase::Finished;
            TickOutcome::Finished
        } else {
            TickOutcome::Counted(self.remaining)
        }
    }

    pub fn pause(&mut self) -> Transition {
        if self.phase != TimerPhase::Running {
            return Transition::Ignored;
        }
        self.cancel_schedule();
        self.phase = TimerPhase::Paused;
        Transition::Applied
    }

    /// Restore the configured duration, or go idle if none was ever set
    pub fn reset(&mut self) -> Transition {
        self.cancel_schedule();
        match self.configured_duration {
            Some(seconds) => {
                self.remaining = seconds;
                self.phase = TimerPhase::Configured;
            }
            None => {
                self.remaining = 0;
                self.phase = TimerPhase::Idle;
            }
        }
        Transition::Applied
    }

    pub fn clear(&mut self) -> Transition {
        self.cancel_schedule();
        self.configured_duration = None;
        self.remaining = 0;
        self.phase = TimerPhase::Idle;
        Transition::Applied
    }

    /// Remaining time rendered as `MM:SS`
    pub fn display(&self) -> String {
        format_clock(self.remaining)
    }

    fn cancel_schedule(&mut self) {
        self.schedule = None;
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Observable view of the timer handed to the host layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub configured_seconds: Option<u64>,
    pub remaining_seconds: u64,
    pub display: String,
    pub running: bool,
    pub paused: bool,
}

impl From<&TimerState> for TimerSnapshot {
    fn from(timer: &TimerState) -> Self {
        Self {
            phase: timer.phase(),
            configured_seconds: timer.configured_duration(),
            remaining_seconds: timer.remaining(),
            display: timer.display(),
            running: timer.is_running(),
            paused: timer.is_paused(),
        }
    }
}

/// Format seconds as zero-padded `MM:SS`. There is no hour field, so
/// minutes keep growing past 59.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Interpret user input as a positive whole number of seconds.
///
/// Accepts JSON integers and numeric strings; anything else yields `None`.
pub fn parse_duration(input: &Value) -> Option<u64> {
    let seconds = match input {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    (seconds > 0).then_some(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn configured(seconds: u64) -> TimerState {
        let mut timer = TimerState::new();
        assert!(timer.set_duration(seconds).is_applied());
        timer
    }

    fn tick_active(timer: &mut TimerState) -> TickOutcome {
        let id = timer.active_schedule().expect("running timer has a schedule");
        timer.tick(id)
    }

    #[test]
    fn new_timer_is_idle() {
        let timer = TimerState::new();
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.configured_duration(), None);
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.is_running());
        assert!(!timer.is_paused());
        assert_eq!(timer.active_schedule(), None);
    }

    #[test]
    fn set_duration_configures_remaining() {
        let timer = configured(90);
        assert_eq!(timer.phase(), TimerPhase::Configured);
        assert_eq!(timer.configured_duration(), Some(90));
        assert_eq!(timer.remaining(), 90);
    }

    #[test]
    fn zero_duration_is_ignored() {
        let mut timer = configured(30);
        let before = timer.clone();
        assert_eq!(timer.set_duration(0), Transition::Ignored);
        assert_eq!(timer, before);
    }

    #[test]
    fn set_duration_while_running_cancels_schedule() {
        let mut timer = configured(10);
        timer.start();
        let old = timer.active_schedule().unwrap();

        assert!(timer.set_duration(20).is_applied());
        assert_eq!(timer.phase(), TimerPhase::Configured);
        assert_eq!(timer.active_schedule(), None);
        assert_eq!(timer.tick(old), TickOutcome::Stale);
        assert_eq!(timer.remaining(), 20);
    }

    #[test]
    fn start_without_remaining_is_ignored() {
        let mut idle = TimerState::new();
        assert_eq!(idle.start(), Transition::Ignored);
        assert_eq!(idle.phase(), TimerPhase::Idle);
        assert_eq!(idle.active_schedule(), None);
    }

    #[test]
    fn start_while_running_keeps_one_schedule() {
        let mut timer = configured(10);
        timer.start();
        let id = timer.active_schedule();
        assert_eq!(timer.start(), Transition::Ignored);
        assert_eq!(timer.active_schedule(), id);
    }

    #[test]
    fn ticks_count_down_to_finished() {
        let mut timer = configured(3);
        timer.start();
        assert_eq!(tick_active(&mut timer), TickOutcome::Counted(2));
        assert_eq!(tick_active(&mut timer), TickOutcome::Counted(1));
        assert_eq!(tick_active(&mut timer), TickOutcome::Finished);
        assert_eq!(timer.phase(), TimerPhase::Finished);
        assert_eq!(timer.remaining(), 0);
        assert_eq!(timer.active_schedule(), None);
    }

    #[test]
    fn tick_after_finish_does_not_underflow() {
        let mut timer = configured(1);
        timer.start();
        let id = timer.active_schedule().unwrap();
        assert_eq!(timer.tick(id), TickOutcome::Finished);
        assert_eq!(timer.tick(id), TickOutcome::Stale);
        assert_eq!(timer.remaining(), 0);
        assert_eq!(timer.start(), Transition::Ignored);
    }

    #[test]
    fn pause_then_start_resumes_from_paused_value() {
        let mut timer = configured(10);
        timer.start();
        tick_active(&mut timer);
        tick_active(&mut timer);
        assert!(timer.pause().is_applied());
        assert!(timer.is_paused());
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), 8);

        assert!(timer.start().is_applied());
        assert_eq!(tick_active(&mut timer), TickOutcome::Counted(7));
    }

    #[test]
    fn pause_when_not_running_is_ignored() {
        let mut timer = configured(10);
        assert_eq!(timer.pause(), Transition::Ignored);
        assert_eq!(timer.phase(), TimerPhase::Configured);
    }

    #[test]
    fn stale_schedule_cannot_advance_resumed_timer() {
        let mut timer = configured(10);
        timer.start();
        let first = timer.active_schedule().unwrap();
        timer.pause();
        timer.start();
        let second = timer.active_schedule().unwrap();

        assert_ne!(first, second);
        assert_eq!(timer.tick(first), TickOutcome::Stale);
        assert_eq!(timer.remaining(), 10);
        assert_eq!(timer.tick(second), TickOutcome::Counted(9));
    }

    #[test]
    fn reset_restores_configured_duration() {
        let mut timer = configured(5);
        timer.start();
        tick_active(&mut timer);
        let old = timer.active_schedule().unwrap();

        assert!(timer.reset().is_applied());
        assert_eq!(timer.phase(), TimerPhase::Configured);
        assert_eq!(timer.remaining(), 5);
        assert_eq!(timer.tick(old), TickOutcome::Stale);
    }

    #[test]
    fn reset_without_duration_goes_idle() {
        let mut timer = TimerState::new();
        timer.reset();
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn clear_forgets_duration() {
        let mut timer = configured(5);
        timer.start();
        assert!(timer.clear().is_applied());
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert_eq!(timer.configured_duration(), None);
        assert_eq!(timer.remaining(), 0);
        assert_eq!(timer.active_schedule(), None);

        timer.reset();
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(60), "01:00");
        assert_eq!(format_clock(3661), "61:01");
        assert_eq!(configured(125).display(), "02:05");
    }

    #[test]
    fn parses_positive_whole_seconds() {
        assert_eq!(parse_duration(&json!(5)), Some(5));
        assert_eq!(parse_duration(&json!(" 42 ")), Some(42));
        assert_eq!(parse_duration(&json!(0)), None);
        assert_eq!(parse_duration(&json!(-3)), None);
        assert_eq!(parse_duration(&json!(2.5)), None);
        assert_eq!(parse_duration(&json!("abc")), None);
        assert_eq!(parse_duration(&json!("-1")), None);
        assert_eq!(parse_duration(&Value::Null), None);
        assert_eq!(parse_duration(&json!([1])), None);
    }
}
