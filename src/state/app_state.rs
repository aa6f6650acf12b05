//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, error, info, warn};

use super::{
    format_clock, parse_duration, Theme, TickOutcome, TimerSnapshot, TimerState, Transition,
};
use crate::{services::run_finish_hook, tasks::countdown_ticker_task};

/// Interval between countdown ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// The one running tick task and the schedule it serves
#[derive(Debug)]
struct Ticker {
    schedule: u64,
    handle: JoinHandle<()>,
}

/// Outcome of an operation forwarded by the host
#[derive(Debug, Clone)]
pub struct ActionResult {
    pub transition: Transition,
    pub timer: TimerSnapshot,
    pub theme: Theme,
}

/// Main application state that owns the countdown, its tick task and the theme
#[derive(Debug)]
pub struct AppState {
    /// Countdown state machine
    pub timer_state: Mutex<TimerState>,
    /// Active tick task, present only while the timer is running
    ticker: Mutex<Option<Ticker>>,
    pub theme: Mutex<Theme>,
    pub tick_period: Duration,
    /// Shell command run whenever a countdown finishes
    pub finish_hook: Option<String>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Failures the host should be able to see
    pub errors: Mutex<Vec<String>>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create a new AppState with an idle timer
    pub fn new(port: u16, host: String, theme: Theme, finish_hook: Option<String>) -> Self {
        let timer = TimerState::new();
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerSnapshot::from(&timer));

        Self {
            timer_state: Mutex::new(timer),
            ticker: Mutex::new(None),
            theme: Mutex::new(theme),
            tick_period: TICK_PERIOD,
            finish_hook,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            errors: Mutex::new(Vec::new()),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Apply an operation to a copy of the timer, bring the tick task in line
    /// with the resulting schedule, then commit the copy and notify watchers.
    /// If the tick task cannot be synced the timer is left unchanged.
    fn apply<F>(self: &Arc<Self>, action: &str, op: F) -> Result<ActionResult, String>
    where
        F: FnOnce(&mut TimerState) -> Transition,
    {
        let mut timer = self.timer_state.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        let mut next = timer.clone();
        let transition = op(&mut next);
        let snapshot = TimerSnapshot::from(&next);

        if transition.is_applied() {
            self.sync_ticker(&next)?;
            *timer = next;
            self.publish(snapshot.clone());
        }
        drop(timer); // Release the lock early

        if transition.is_applied() {
            info!("Timer {}: phase={:?}, remaining={}", action, snapshot.phase, snapshot.display);
            self.record_action(action);
        } else {
            debug!("Timer {} ignored in phase {:?}", action, snapshot.phase);
        }

        Ok(ActionResult {
            transition,
            timer: snapshot,
            theme: self.get_theme()?,
        })
    }

    /// Cancel or spawn the tick task so that it matches the timer's schedule.
    /// Called with the timer lock held.
    fn sync_ticker(self: &Arc<Self>, timer: &TimerState) -> Result<(), String> {
        let mut ticker = self.ticker.lock()
            .map_err(|e| format!("Failed to lock ticker: {}", e))?;

        let wanted = timer.active_schedule();
        if ticker.as_ref().map(|t| t.schedule) == wanted {
            return Ok(());
        }

        if let Some(old) = ticker.take() {
            old.handle.abort();
            debug!("Cancelled tick schedule {}", old.schedule);
        }

        if let Some(schedule) = wanted {
            let first_tick = tokio::time::Instant::now() + self.tick_period;
            let task = countdown_ticker_task(Arc::clone(self), schedule, first_tick);
            let handle = tokio::spawn(task);
            debug!("Started tick schedule {}", schedule);
            *ticker = Some(Ticker { schedule, handle });
        }

        Ok(())
    }

    /// Set the countdown duration from raw host input
    pub fn set_duration(self: &Arc<Self>, input: &Value) -> Result<ActionResult, String> {
        let seconds = parse_duration(input);
        if seconds.is_none() {
            debug!("Rejecting duration input: {}", input);
        }
        self.apply("set-duration", |timer| match seconds {
            Some(seconds) => timer.set_duration(seconds),
            None => Transition::Ignored,
        })
    }

    pub fn start(self: &Arc<Self>) -> Result<ActionResult, String> {
        self.apply("start", TimerState::start)
    }

    pub fn pause(self: &Arc<Self>) -> Result<ActionResult, String> {
        self.apply("pause", TimerState::pause)
    }

    pub fn reset(self: &Arc<Self>) -> Result<ActionResult, String> {
        self.apply("reset", TimerState::reset)
    }

    pub fn clear(self: &Arc<Self>) -> Result<ActionResult, String> {
        self.apply("clear", TimerState::clear)
    }

    /// Deliver one tick from the task serving `schedule`
    pub fn tick(&self, schedule: u64) -> Result<TickOutcome, String> {
        let mut timer = self.timer_state.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        let outcome = timer.tick(schedule);
        match outcome {
            TickOutcome::Stale => {
                debug!("Ignoring tick from cancelled schedule {}", schedule);
                return Ok(outcome);
            }
            TickOutcome::Counted(remaining) => {
                debug!("Tick: {} remaining", format_clock(remaining));
            }
            TickOutcome::Finished => {
                info!("Countdown finished");
                // The calling task is the ticker itself; release its handle
                // without aborting it.
                let mut ticker = self.ticker.lock()
                    .map_err(|e| format!("Failed to lock ticker: {}", e))?;
                if ticker.as_ref().is_some_and(|t| t.schedule == schedule) {
                    ticker.take();
                }
            }
        }

        self.publish(TimerSnapshot::from(&*timer));
        Ok(outcome)
    }

    /// Run the configured finish hook, recording any failure
    pub async fn on_finished(&self) {
        let Some(command) = &self.finish_hook else {
            return;
        };

        if let Err(e) = run_finish_hook(command).await {
            error!("Finish hook failed: {}", e);
            if let Err(e) = self.add_error(format!("Finish hook failed: {}", e)) {
                error!("Failed to record finish hook error: {}", e);
            }
        }
    }

    /// Flip between light and dark
    pub fn toggle_theme(&self) -> Result<ActionResult, String> {
        let mut theme = self.theme.lock()
            .map_err(|e| format!("Failed to lock theme: {}", e))?;
        *theme = theme.toggled();
        let new_theme = *theme;
        drop(theme);

        info!("Theme set to {:?}", new_theme);
        self.record_action("toggle-theme");

        Ok(ActionResult {
            transition: Transition::Applied,
            timer: self.get_timer_state()?,
            theme: new_theme,
        })
    }

    /// Stop any running tick task. The timer state itself is left as is.
    pub fn shutdown(&self) -> Result<(), String> {
        let mut ticker = self.ticker.lock()
            .map_err(|e| format!("Failed to lock ticker: {}", e))?;

        if let Some(old) = ticker.take() {
            old.handle.abort();
            info!("Cancelled tick schedule {} on shutdown", old.schedule);
        }
        Ok(())
    }

    /// Whether a tick task is currently scheduled
    pub fn has_ticker(&self) -> Result<bool, String> {
        self.ticker.lock()
            .map(|ticker| ticker.is_some())
            .map_err(|e| format!("Failed to lock ticker: {}", e))
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerSnapshot, String> {
        self.timer_state.lock()
            .map(|timer| TimerSnapshot::from(&*timer))
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    pub fn get_theme(&self) -> Result<Theme, String> {
        self.theme.lock()
            .map(|theme| *theme)
            .map_err(|e| format!("Failed to lock theme: {}", e))
    }

    /// Watch every published timer snapshot
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.timer_update_tx.subscribe()
    }

    pub fn add_error(&self, error: String) -> Result<(), String> {
        let mut errors = self.errors.lock()
            .map_err(|e| format!("Failed to lock error list: {}", e))?;

        warn!("Adding error to state: {}", error);
        errors.push(error);
        Ok(())
    }

    pub fn get_errors(&self) -> Result<Vec<String>, String> {
        self.errors.lock()
            .map(|errors| errors.clone())
            .map_err(|e| format!("Failed to lock error list: {}", e))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn publish(&self, snapshot: TimerSnapshot) {
        if let Err(e) = self.timer_update_tx.send(snapshot) {
            warn!("Failed to send timer update: {}", e);
        }
    }
}
