//! State management module
//! 
//! This module contains the countdown state machine, the theme flag and the
//! shared application state that owns them.

pub mod app_state;
pub mod theme_state;
pub mod timer_state;

// Re-export main types
pub use app_state::{ActionResult, AppState};
pub use theme_state::Theme;
pub use timer_state::{
    format_clock, parse_duration, TickOutcome, TimerPhase, TimerSnapshot, TimerState, Transition,
};
